// src/core/config_loader.rs

use crate::core::paths::{self, PathError};
use crate::models::{ScanConfig, Settings};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading or creating the settings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading or writing the file failed.
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    /// The config directory could not be resolved.
    #[error("Path error: {0}")]
    Path(#[from] PathError),
    /// The file is not valid TOML or does not match the settings schema.
    #[error("Failed to parse '{path}': {source}")]
    TomlParse {
        /// The settings file.
        path: PathBuf,
        /// The parser error.
        #[source]
        source: toml::de::Error,
    },
    /// The default settings could not be rendered.
    #[error("Failed to serialize settings to TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Supplies the scan configuration. Called once per `locate_projects`.
pub trait ScanConfigSource {
    /// Returns the current configuration.
    fn load_scan_config(&self) -> Result<ScanConfig, ConfigError>;
}

/// A fixed configuration.
impl ScanConfigSource for ScanConfig {
    fn load_scan_config(&self) -> Result<ScanConfig, ConfigError> {
        Ok(self.clone())
    }
}

/// The user's `settings.toml`, re-read on every call.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    /// Wraps a settings file at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The settings file in the user's config directory.
    pub fn default_location() -> Result<Self, ConfigError> {
        Ok(Self::new(paths::get_settings_path()?))
    }

    /// Where the file lives.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the file. A missing file is written with defaults
    /// first so the user has something to edit.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
                path: self.path.clone(),
                source,
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let defaults = Settings::default();
                if let Some(parent) = self.path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&self.path, toml::to_string_pretty(&defaults)?)?;
                log::debug!("Default settings written to '{}'", self.path.display());
                Ok(defaults)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl ScanConfigSource for SettingsFile {
    fn load_scan_config(&self) -> Result<ScanConfig, ConfigError> {
        Ok(self.load()?.projects.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShellDialect;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let tmp = TempDir::new().unwrap();
        let file = SettingsFile::new(tmp.path().join("nested").join("settings.toml"));

        let settings = file.load().unwrap();
        assert_eq!(settings, Settings::default());
        assert!(file.path().is_file());

        // The written file parses back to the same settings.
        assert_eq!(file.load().unwrap(), settings);
    }

    #[test]
    fn test_projects_table_becomes_scan_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.toml");
        fs::write(
            &path,
            r#"
            [projects]
            base_folders = ["~/src", "/work/*"]
            ignore_patterns = ["vendor"]
            max_depth = 4
            cache = false

            [shell]
            dialect = "pwsh"
            "#,
        )
        .unwrap();

        let file = SettingsFile::new(&path);
        let config = file.load_scan_config().unwrap();
        assert_eq!(config.base_folders, vec!["~/src", "/work/*"]);
        assert_eq!(config.ignore_patterns, vec!["vendor"]);
        assert_eq!(config.max_depth, 4);
        assert!(!config.use_cache);
        assert_eq!(
            file.load().unwrap().shell.dialect,
            Some(ShellDialect::WindowsPowerShell)
        );
    }

    #[test]
    fn test_malformed_file_is_a_configuration_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.toml");
        fs::write(&path, "[projects\nmax_depth = ").unwrap();

        let err = SettingsFile::new(&path).load_scan_config().unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse { .. }));
    }

    #[test]
    fn test_unknown_dialect_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.toml");
        fs::write(&path, "[shell]\ndialect = \"fish\"\n").unwrap();
        assert!(SettingsFile::new(&path).load().is_err());
    }
}
