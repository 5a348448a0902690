// src/core/paths.rs

use crate::constants::{
    APP_DIR_NAME, CONFIG_DIR_ENV, DATA_DIR_ENV, PROJECT_CACHE_FILENAME, SETTINGS_FILENAME,
};
use globset::GlobBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use walkdir::WalkDir;

static CONFIG_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);
static STORAGE_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);

/// Errors raised while resolving the application directories.
#[derive(Error, Debug)]
pub enum PathError {
    /// The platform has no such directory (`config` or `data`).
    #[error("Could not find system {0} directory.")]
    SystemDirNotFound(&'static str),
    /// The directory could not be created.
    #[error("Could not create directory at '{path}': {source}")]
    DirCreation {
        /// The directory that was being created.
        path: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Returns the directory holding `settings.toml` (`~/.config/onec-kit` on Linux).
/// Honors `ONEC_KIT_CONFIG_DIR`. Created if missing; memoized.
pub fn get_config_dir() -> Result<PathBuf, PathError> {
    memoized_dir(&CONFIG_DIR, CONFIG_DIR_ENV, "config", dirs::config_dir)
}

/// Returns the per-installation storage directory that holds the project cache.
/// Honors `ONEC_KIT_DATA_DIR`. Created if missing; memoized.
pub fn get_storage_dir() -> Result<PathBuf, PathError> {
    memoized_dir(&STORAGE_DIR, DATA_DIR_ENV, "data", dirs::data_local_dir)
}

/// `settings.toml` inside the config directory.
pub fn get_settings_path() -> Result<PathBuf, PathError> {
    get_config_dir().map(|dir| dir.join(SETTINGS_FILENAME))
}

/// The project cache file inside the storage directory.
pub fn get_project_cache_path() -> Result<PathBuf, PathError> {
    get_storage_dir().map(|dir| dir.join(PROJECT_CACHE_FILENAME))
}

fn memoized_dir(
    slot: &Mutex<Option<PathBuf>>,
    override_var: &str,
    kind: &'static str,
    system_dir: fn() -> Option<PathBuf>,
) -> Result<PathBuf, PathError> {
    let mut cached = slot.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(path) = &*cached {
        return Ok(path.clone());
    }

    let dir = match std::env::var_os(override_var) {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => system_dir()
            .ok_or(PathError::SystemDirNotFound(kind))?
            .join(APP_DIR_NAME),
    };

    if !dir.exists() {
        fs::create_dir_all(&dir).map_err(|e| PathError::DirCreation {
            path: dir.display().to_string(),
            source: e,
        })?;
    }

    *cached = Some(dir.clone());
    Ok(dir)
}

/// Expands every configured base folder into concrete directories.
///
/// Each entry goes through `~`/`$VAR` expansion and, when it contains glob
/// syntax, is matched against the filesystem. Entries that do not exist are
/// kept; the scanner skips them.
pub fn expand_base_folders(raw_folders: &[String]) -> Vec<PathBuf> {
    let mut expanded = Vec::new();
    for raw in raw_folders {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        let with_home = expand_home_and_vars(trimmed);
        if has_glob_syntax(&with_home) {
            expanded.extend(expand_glob(&with_home));
        } else {
            expanded.push(make_absolute(Path::new(&with_home)));
        }
    }
    expanded
}

fn expand_home_and_vars(raw: &str) -> String {
    match shellexpand::full(raw) {
        Ok(value) => value.into_owned(),
        Err(e) => {
            log::debug!("Could not expand variables in '{}': {}", raw, e);
            shellexpand::tilde(raw).into_owned()
        }
    }
}

fn has_glob_syntax(path: &str) -> bool {
    path.contains(['*', '?', '[', '{'])
}

fn make_absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn to_slash(path: &str) -> String {
    if cfg!(target_os = "windows") {
        path.replace('\\', "/")
    } else {
        path.to_string()
    }
}

/// Finds directories matching a glob such as `~/work/*/src` or `/srv/**/repos`.
///
/// The walk starts at the longest literal prefix of the pattern and is
/// bounded by the number of remaining segments unless `**` is present.
fn expand_glob(pattern: &str) -> Vec<PathBuf> {
    let pattern = to_slash(pattern);
    let segments: Vec<&str> = pattern.trim_end_matches('/').split('/').collect();
    let literal_len = segments
        .iter()
        .position(|segment| has_glob_syntax(segment))
        .unwrap_or(segments.len());

    let prefix = segments
        .iter()
        .take(literal_len)
        .copied()
        .collect::<Vec<_>>()
        .join("/");
    let root = match prefix.as_str() {
        "" if pattern.starts_with('/') => PathBuf::from("/"),
        "" => make_absolute(Path::new(".")),
        p if p.ends_with(':') => PathBuf::from(format!("{}/", p)),
        p => make_absolute(Path::new(p)),
    };
    let root_slash = to_slash(&root.to_string_lossy());
    let root_slash = root_slash.trim_end_matches('/');

    let rest: Vec<&str> = segments
        .iter()
        .skip(literal_len)
        .copied()
        .filter(|segment| !segment.is_empty())
        .collect();
    let full_pattern = format!("{}/{}", root_slash, rest.join("/"));

    let matcher = match GlobBuilder::new(&full_pattern)
        .literal_separator(true)
        .case_insensitive(cfg!(target_os = "windows"))
        .build()
    {
        Ok(glob) => glob.compile_matcher(),
        Err(e) => {
            log::warn!("Ignoring invalid base folder pattern '{}': {}", pattern, e);
            return Vec::new();
        }
    };

    let mut walker = WalkDir::new(&root).min_depth(1);
    if !rest.contains(&"**") {
        walker = walker.max_depth(rest.len());
    }

    let mut matches: Vec<PathBuf> = walker
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_dir())
        .filter(|entry| matcher.is_match(to_slash(&entry.path().to_string_lossy())))
        .map(|entry| entry.into_path())
        .collect();
    matches.sort();
    log::debug!(
        "Base folder pattern '{}' matched {} directories",
        pattern,
        matches.len()
    );
    matches
}
