// src/core/project_locator.rs

use crate::constants::PROJECT_MARKER_FILENAME;
use crate::core::config_loader::{ConfigError, ScanConfigSource};
use crate::core::ignore::IgnoreMatcher;
use crate::core::paths;
use crate::core::project_cache::{self, CacheKey, CacheState};
use crate::models::ScanConfig;
use icu_collator::Collator;
use icu_collator::options::{CollatorOptions, Strength};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Discovers project roots under the configured base folders.
///
/// Results are reused within the process while the configuration is
/// unchanged, and across processes through the on-disk cache.
#[derive(Debug)]
pub struct ProjectLocator<S> {
    source: S,
    cache_path: PathBuf,
    state: CacheState,
}

impl<S: ScanConfigSource> ProjectLocator<S> {
    /// Creates a locator reading its configuration from `source` and keeping
    /// its cache in `cache_path`.
    pub fn new(source: S, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            source,
            cache_path: cache_path.into(),
            state: CacheState::Empty,
        }
    }

    /// The configuration source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Gives mutable access to the configuration source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Where the cache file is kept.
    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// The result of the last scan or cache hit.
    pub fn projects(&self) -> &[PathBuf] {
        self.state
            .entry()
            .map(|entry| entry.paths.as_slice())
            .unwrap_or_default()
    }

    /// `true` once a result is held in memory.
    pub fn is_located(&self) -> bool {
        self.state.entry().is_some()
    }

    /// Returns the discovered project roots, scanning only when needed.
    ///
    /// Only a malformed configuration is an error; unreadable folders and
    /// cache problems are absorbed.
    pub fn locate_projects(&mut self) -> Result<&[PathBuf], ConfigError> {
        let config = self.source.load_scan_config()?;
        let key = CacheKey::from(&config);

        if config.use_cache {
            if self.state.entry().is_none() {
                self.state = project_cache::load_cache_state(&self.cache_path);
                if self.state == CacheState::Stale {
                    self.delete_cache_file();
                }
            }

            self.state = std::mem::take(&mut self.state).revalidate(&key);
            if self.state.lookup(&key).is_some() {
                log::debug!("Using cached project list ({} projects)", self.projects().len());
                return Ok(self.projects());
            }
        }

        self.scan_and_record(&config, key);
        Ok(self.projects())
    }

    /// Forgets every cached result, deletes the cache file and scans again.
    pub fn refresh_projects(&mut self) -> Result<&[PathBuf], ConfigError> {
        self.state = std::mem::take(&mut self.state).invalidate();
        self.delete_cache_file();

        let config = self.source.load_scan_config()?;
        let key = CacheKey::from(&config);
        self.scan_and_record(&config, key);
        Ok(self.projects())
    }

    fn scan_and_record(&mut self, config: &ScanConfig, key: CacheKey) {
        let base_folders = paths::expand_base_folders(&config.base_folders);
        let ignore = IgnoreMatcher::new(&config.ignore_patterns);
        let found = scan_base_folders(&base_folders, &ignore, config.max_depth);
        log::info!(
            "Found {} projects under {} base folders",
            found.len(),
            base_folders.len()
        );

        let entry = key.into_entry(found);
        if let Err(e) = project_cache::write_cache_file(&self.cache_path, &entry) {
            log::warn!(
                "Could not write project cache '{}': {}",
                self.cache_path.display(),
                e
            );
        }
        self.state = std::mem::take(&mut self.state).record_scan(entry);
    }

    fn delete_cache_file(&self) {
        if let Err(e) = project_cache::remove_cache_file(&self.cache_path) {
            log::warn!(
                "Could not delete project cache '{}': {}",
                self.cache_path.display(),
                e
            );
        }
    }
}

/// Walks every base folder depth-first and returns the directories that
/// directly contain the project marker file.
///
/// Missing base folders and unreadable directories are skipped. The result
/// is de-duplicated and sorted case-insensitively.
pub fn scan_base_folders(
    base_folders: &[PathBuf],
    ignore: &IgnoreMatcher,
    max_depth: usize,
) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut found = Vec::new();

    for base in base_folders {
        if !base.is_dir() {
            log::debug!("Skipping missing base folder '{}'", base.display());
            continue;
        }
        log::debug!("Scanning '{}'", base.display());

        let mut walker = WalkDir::new(base).follow_links(false);
        if max_depth > 0 {
            walker = walker.max_depth(max_depth);
        }

        let directories = walker
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || !ignore.is_ignored(&entry.file_name().to_string_lossy())
            })
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_dir());

        for entry in directories {
            if entry.path().join(PROJECT_MARKER_FILENAME).is_file() {
                let normalized = normalize_project_path(entry.path());
                if seen.insert(normalized.clone()) {
                    found.push(normalized);
                }
            }
        }
    }

    sort_projects(&mut found);
    found
}

fn normalize_project_path(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Sorts paths with the Unicode root collation at secondary strength, which
/// ignores case but keeps accents, so `ё` sorts with `е` rather than after `я`.
/// Ties fall back to plain string order.
fn sort_projects(paths: &mut [PathBuf]) {
    let mut options = CollatorOptions::default();
    options.strength = Some(Strength::Secondary);

    match Collator::try_new(Default::default(), options) {
        Ok(collator) => paths.sort_by(|a, b| {
            let a_str = a.to_string_lossy();
            let b_str = b.to_string_lossy();
            collator
                .compare(&a_str, &b_str)
                .then_with(|| a_str.cmp(&b_str))
        }),
        Err(e) => {
            log::warn!("Collation data unavailable, sorting by lowercase: {}", e);
            paths.sort_by(|a, b| compare_lowercase(a, b));
        }
    }
}

fn compare_lowercase(a: &Path, b: &Path) -> Ordering {
    let a_str = a.to_string_lossy();
    let b_str = b.to_string_lossy();
    a_str
        .to_lowercase()
        .cmp(&b_str.to_lowercase())
        .then_with(|| a_str.cmp(&b_str))
}
