// src/core/project_cache.rs

//! The project discovery cache.
//!
//! The cache is modelled as a [`CacheState`] whose transitions are pure
//! methods; the file helpers at the bottom are the only code touching disk.

use crate::models::{ProjectCacheEntry, ScanConfig};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors raised while writing or deleting the cache file.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Filesystem failure.
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    /// The entry could not be serialized.
    #[error("Failed to serialize project cache: {0}")]
    Json(#[from] serde_json::Error),
    /// The temporary file could not replace the cache file.
    #[error("Error with temporary file: {0}")]
    TempFile(#[from] tempfile::PersistError),
}

/// The part of the configuration a cache entry is only valid for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    /// Base folders as configured, before expansion.
    pub base_folders: Vec<String>,
    /// Ignore patterns as configured.
    pub ignore_patterns: Vec<String>,
}

impl CacheKey {
    /// `true` when the entry was produced under exactly this key.
    pub fn matches(&self, entry: &ProjectCacheEntry) -> bool {
        self.base_folders == entry.base_folders && self.ignore_patterns == entry.ignore_patterns
    }

    /// Tags a scan result with this key.
    pub fn into_entry(self, paths: Vec<std::path::PathBuf>) -> ProjectCacheEntry {
        ProjectCacheEntry {
            paths,
            base_folders: self.base_folders,
            ignore_patterns: self.ignore_patterns,
        }
    }
}

impl From<&ScanConfig> for CacheKey {
    fn from(config: &ScanConfig) -> Self {
        Self {
            base_folders: config.base_folders.clone(),
            ignore_patterns: config.ignore_patterns.clone(),
        }
    }
}

/// What is known about the cached scan result.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CacheState {
    /// Nothing cached.
    #[default]
    Empty,
    /// A usable entry.
    Valid(ProjectCacheEntry),
    /// An entry exists but must not be used and should be deleted.
    Stale,
}

impl CacheState {
    /// Interprets raw cache file contents. Absent → `Empty`, unparseable → `Stale`.
    pub fn from_disk(raw: Option<&str>) -> Self {
        match raw {
            None => Self::Empty,
            Some(content) => match serde_json::from_str::<ProjectCacheEntry>(content) {
                Ok(entry) => Self::Valid(entry),
                Err(e) => {
                    log::debug!("Project cache is unreadable: {}", e);
                    Self::Stale
                }
            },
        }
    }

    /// Checks a valid entry against the current configuration.
    pub fn revalidate(self, key: &CacheKey) -> Self {
        match self {
            Self::Valid(entry) if !key.matches(&entry) => {
                log::debug!("Project cache was built for a different configuration");
                Self::Stale
            }
            other => other,
        }
    }

    /// A scan just finished.
    pub fn record_scan(self, entry: ProjectCacheEntry) -> Self {
        Self::Valid(entry)
    }

    /// The user asked to forget everything.
    pub fn invalidate(self) -> Self {
        Self::Empty
    }

    /// The cached entry, if it is valid for `key`.
    pub fn lookup(&self, key: &CacheKey) -> Option<&ProjectCacheEntry> {
        match self {
            Self::Valid(entry) if key.matches(entry) => Some(entry),
            _ => None,
        }
    }

    /// The held entry, valid or not for the current key.
    pub fn entry(&self) -> Option<&ProjectCacheEntry> {
        match self {
            Self::Valid(entry) => Some(entry),
            _ => None,
        }
    }
}

// --- File helpers ---

/// Reads the cache file into a state. Read failures other than "not found"
/// yield `Stale` so the caller deletes the file.
pub fn load_cache_state(path: &Path) -> CacheState {
    match fs::read_to_string(path) {
        Ok(content) => CacheState::from_disk(Some(&content)),
        Err(e) if e.kind() == ErrorKind::NotFound => CacheState::Empty,
        Err(e) => {
            log::debug!("Could not read project cache '{}': {}", path.display(), e);
            CacheState::Stale
        }
    }
}

/// Writes the entry as indented JSON, replacing the file in one step.
pub fn write_cache_file(path: &Path, entry: &ProjectCacheEntry) -> Result<(), CacheError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut temp = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut temp, entry)?;
    temp.flush()?;
    temp.persist(path)?;
    Ok(())
}

/// Deletes the cache file. A missing file is not an error.
pub fn remove_cache_file(path: &Path) -> Result<(), CacheError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn key(folders: &[&str]) -> CacheKey {
        CacheKey {
            base_folders: folders.iter().map(|s| s.to_string()).collect(),
            ignore_patterns: vec!["node_modules".into()],
        }
    }

    fn entry_for(key: &CacheKey) -> ProjectCacheEntry {
        key.clone().into_entry(vec![PathBuf::from("/x/proj")])
    }

    #[test]
    fn test_from_disk_states() {
        assert_eq!(CacheState::from_disk(None), CacheState::Empty);
        assert_eq!(CacheState::from_disk(Some("{ not json")), CacheState::Stale);

        let valid = r#"{"paths":["/a"],"baseFolders":["/"],"ignorePatterns":[]}"#;
        assert!(matches!(CacheState::from_disk(Some(valid)), CacheState::Valid(_)));
    }

    #[test]
    fn test_missing_or_mistyped_arrays_are_stale() {
        let missing = r#"{"paths":["/a"],"baseFolders":["/"]}"#;
        assert_eq!(CacheState::from_disk(Some(missing)), CacheState::Stale);

        let not_array = r#"{"paths":"/a","baseFolders":["/"],"ignorePatterns":[]}"#;
        assert_eq!(CacheState::from_disk(Some(not_array)), CacheState::Stale);
    }

    #[test]
    fn test_revalidate_requires_exact_key() {
        let x = key(&["X"]);
        let xy = key(&["X", "Y"]);
        let state = CacheState::Empty.record_scan(entry_for(&x));

        assert_eq!(state.clone().revalidate(&x), state);
        assert_eq!(state.clone().revalidate(&xy), CacheState::Stale);
        assert!(state.lookup(&x).is_some());
        assert!(state.lookup(&xy).is_none());

        let reordered = key(&["Y", "X"]);
        assert!(state.lookup(&reordered).is_none());
    }

    #[test]
    fn test_revalidate_leaves_empty_and_stale_alone() {
        let k = key(&["X"]);
        assert_eq!(CacheState::Empty.revalidate(&k), CacheState::Empty);
        assert_eq!(CacheState::Stale.revalidate(&k), CacheState::Stale);
    }

    #[test]
    fn test_invalidate_always_empties() {
        let k = key(&["X"]);
        let state = CacheState::Empty.record_scan(entry_for(&k));
        assert_eq!(state.invalidate(), CacheState::Empty);
        assert_eq!(CacheState::Stale.invalidate(), CacheState::Empty);
    }

    #[test]
    fn test_file_round_trip_and_removal() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("storage").join("projects_cache_1c.json");
        let k = key(&["X"]);
        let entry = entry_for(&k);

        assert_eq!(load_cache_state(&path), CacheState::Empty);

        write_cache_file(&path, &entry).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains('\n'), "cache should be indented");
        assert_eq!(load_cache_state(&path), CacheState::Valid(entry));

        remove_cache_file(&path).unwrap();
        assert!(!path.exists());
        remove_cache_file(&path).unwrap();
    }

    #[test]
    fn test_corrupt_file_loads_as_stale() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("projects_cache_1c.json");
        fs::write(&path, "[]").unwrap();
        assert_eq!(load_cache_state(&path), CacheState::Stale);
    }
}
