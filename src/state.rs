// src/state.rs

use crate::core::config_loader::{ConfigError, SettingsFile};
use crate::core::paths;
use crate::core::project_locator::ProjectLocator;
use crate::models::{HostOs, Settings, ShellDialect};
use crate::system::shell::{CurrentShellHint, EnvSnapshot, Fixed, FromEditorState, FromEnvironment};
use std::path::PathBuf;

/// Everything the handlers need, built once in `main` and passed down.
#[derive(Debug, Clone)]
pub struct AppContext {
    /// The OS commands are composed for.
    pub host: HostOs,
    /// The user's settings file.
    pub settings_file: SettingsFile,
    /// Where the project discovery cache lives.
    pub cache_path: PathBuf,
    /// The process environment, captured at startup.
    pub env: EnvSnapshot,
}

/// Per-invocation overrides for shell detection, usually from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct ShellOverrides {
    /// Pins the dialect.
    pub dialect: Option<ShellDialect>,
    /// Name of the focused terminal.
    pub terminal: Option<String>,
    /// Default terminal profile for the current OS.
    pub profile: Option<String>,
}

impl AppContext {
    /// Resolves the system directories and captures the environment.
    pub fn from_system() -> Result<Self, ConfigError> {
        Ok(Self {
            host: HostOs::current(),
            settings_file: SettingsFile::default_location()?,
            cache_path: paths::get_project_cache_path()?,
            env: EnvSnapshot::capture(),
        })
    }

    /// Reads `settings.toml` fresh.
    pub fn load_settings(&self) -> Result<Settings, ConfigError> {
        self.settings_file.load()
    }

    /// A locator that re-reads `settings.toml` before every scan.
    pub fn project_locator(&self) -> ProjectLocator<SettingsFile> {
        ProjectLocator::new(self.settings_file.clone(), self.cache_path.clone())
    }

    /// Picks the hint source: a pinned dialect, else editor-like state from
    /// flags and settings, else the bare environment.
    pub fn shell_hint(
        &self,
        settings: &Settings,
        overrides: &ShellOverrides,
    ) -> Box<dyn CurrentShellHint> {
        if let Some(dialect) = overrides.dialect.or(settings.shell.dialect) {
            return Box::new(Fixed(dialect));
        }

        let mut state = FromEditorState::from_settings(&settings.shell, self.env.clone());
        if let Some(terminal) = &overrides.terminal {
            state = state.with_terminal(terminal.clone());
        }
        if let Some(profile) = &overrides.profile {
            state = state.with_profile(self.host, profile.clone());
        }

        if state.terminal_name.is_none() && state.profiles.is_empty() {
            Box::new(FromEnvironment::with_env(self.env.clone()))
        } else {
            Box::new(state)
        }
    }
}
