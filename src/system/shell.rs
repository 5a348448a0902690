// src/system/shell.rs

//! Shell dialect detection.
//!
//! The fallback chain is a pure function of the host OS and a
//! [`CurrentShellHint`] source. Hint sources decide where the signals come
//! from (editor state, the process environment, or a pinned value).

use crate::models::{HostOs, ShellDialect, ShellSettings};
use std::collections::HashMap;
use std::env;
use std::path::Path;

/// A source of signals about which shell is in use.
///
/// Only `env_var` is required; sources that know nothing about terminals or
/// profiles simply keep the default `None`.
pub trait CurrentShellHint {
    /// A dialect that short-circuits detection entirely.
    fn forced_dialect(&self) -> Option<ShellDialect> {
        None
    }

    /// The name or label of the focused terminal session.
    fn active_terminal_name(&self) -> Option<String> {
        None
    }

    /// The editor-level default shell profile configured for `host`.
    fn default_profile(&self, _host: HostOs) -> Option<String> {
        None
    }

    /// Looks up an environment variable.
    fn env_var(&self, key: &str) -> Option<String>;
}

/// A frozen copy of environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    /// Captures the environment of the running process.
    pub fn capture() -> Self {
        Self {
            vars: env::vars().collect(),
        }
    }

    /// Builds a snapshot from explicit pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns the value of `key`. Lookup is case-insensitive, like on Windows.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str).or_else(|| {
            self.vars
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v.as_str())
        })
    }
}

/// Reads only the environment.
#[derive(Debug, Clone, Default)]
pub struct FromEnvironment {
    env: EnvSnapshot,
}

impl FromEnvironment {
    /// Uses the environment of the running process.
    pub fn capture() -> Self {
        Self {
            env: EnvSnapshot::capture(),
        }
    }

    /// Uses the given snapshot.
    pub fn with_env(env: EnvSnapshot) -> Self {
        Self { env }
    }
}

impl CurrentShellHint for FromEnvironment {
    fn env_var(&self, key: &str) -> Option<String> {
        self.env.get(key).map(str::to_string)
    }
}

/// Reads the terminal/profile state an editor exposes, then the environment.
#[derive(Debug, Clone, Default)]
pub struct FromEditorState {
    /// Label of the focused terminal.
    pub terminal_name: Option<String>,
    /// Default profile per OS family, as configured in the editor.
    pub profiles: HashMap<HostOs, String>,
    env: EnvSnapshot,
}

impl FromEditorState {
    /// An empty editor state backed by the given environment.
    pub fn new(env: EnvSnapshot) -> Self {
        Self {
            terminal_name: None,
            profiles: HashMap::new(),
            env,
        }
    }

    /// Builds the editor state from the `[shell]` settings table.
    pub fn from_settings(settings: &ShellSettings, env: EnvSnapshot) -> Self {
        let mut state = Self::new(env);
        state.terminal_name = settings.terminal.clone();
        for host in [HostOs::Windows, HostOs::Linux, HostOs::MacOs] {
            if let Some(profile) = settings.default_profile(host) {
                state.profiles.insert(host, profile.to_string());
            }
        }
        state
    }

    /// Sets the focused terminal's label.
    pub fn with_terminal(mut self, name: impl Into<String>) -> Self {
        self.terminal_name = Some(name.into());
        self
    }

    /// Sets the default profile for one OS family.
    pub fn with_profile(mut self, host: HostOs, profile: impl Into<String>) -> Self {
        self.profiles.insert(host, profile.into());
        self
    }
}

impl CurrentShellHint for FromEditorState {
    fn active_terminal_name(&self) -> Option<String> {
        self.terminal_name.clone()
    }

    fn default_profile(&self, host: HostOs) -> Option<String> {
        self.profiles.get(&host).cloned()
    }

    fn env_var(&self, key: &str) -> Option<String> {
        self.env.get(key).map(str::to_string)
    }
}

/// Always yields the same dialect.
#[derive(Debug, Clone, Copy)]
pub struct Fixed(pub ShellDialect);

impl CurrentShellHint for Fixed {
    fn forced_dialect(&self) -> Option<ShellDialect> {
        Some(self.0)
    }

    fn env_var(&self, _key: &str) -> Option<String> {
        None
    }
}

impl<T: CurrentShellHint + ?Sized> CurrentShellHint for &T {
    fn forced_dialect(&self) -> Option<ShellDialect> {
        (**self).forced_dialect()
    }

    fn active_terminal_name(&self) -> Option<String> {
        (**self).active_terminal_name()
    }

    fn default_profile(&self, host: HostOs) -> Option<String> {
        (**self).default_profile(host)
    }

    fn env_var(&self, key: &str) -> Option<String> {
        (**self).env_var(key)
    }
}

impl<T: CurrentShellHint + ?Sized> CurrentShellHint for Box<T> {
    fn forced_dialect(&self) -> Option<ShellDialect> {
        (**self).forced_dialect()
    }

    fn active_terminal_name(&self) -> Option<String> {
        (**self).active_terminal_name()
    }

    fn default_profile(&self, host: HostOs) -> Option<String> {
        (**self).default_profile(host)
    }

    fn env_var(&self, key: &str) -> Option<String> {
        (**self).env_var(key)
    }
}

/// Decides which dialect is in use. Never fails.
///
/// On Windows the chain is: active terminal name, default profile,
/// environment (`PSModulePath`, `SHELL`, `ComSpec`), then PowerShell.
/// Elsewhere: default profile, then the `SHELL` executable name, then `sh`.
pub fn detect_dialect(host: HostOs, hint: &impl CurrentShellHint) -> ShellDialect {
    if let Some(dialect) = hint.forced_dialect() {
        log::debug!("Shell dialect pinned to {}", dialect);
        return dialect;
    }

    if host.is_windows() {
        detect_on_windows(hint)
    } else {
        detect_on_posix(host, hint)
    }
}

fn detect_on_windows(hint: &impl CurrentShellHint) -> ShellDialect {
    if let Some(dialect) = hint
        .active_terminal_name()
        .and_then(|name| windows_dialect_from_label(&name))
    {
        log::debug!("Shell dialect {} detected from active terminal", dialect);
        return dialect;
    }

    if let Some(dialect) = hint
        .default_profile(HostOs::Windows)
        .and_then(|profile| windows_dialect_from_label(&profile))
    {
        log::debug!("Shell dialect {} detected from default profile", dialect);
        return dialect;
    }

    if hint.env_var("PSModulePath").is_some() {
        log::debug!("PSModulePath is set, assuming PowerShell");
        return ShellDialect::WindowsPowerShell;
    }

    if let Some(shell) = hint.env_var("SHELL").map(|s| s.to_lowercase()) {
        if shell.contains("zsh") {
            return ShellDialect::PosixZsh;
        }
        if shell.contains("bash") {
            return ShellDialect::PosixBash;
        }
    }

    if let Some(comspec) = hint.env_var("ComSpec").map(|s| s.to_lowercase()) {
        if comspec.contains("cmd.exe") {
            return ShellDialect::WindowsCmd;
        }
        if comspec.contains("powershell") || comspec.contains("pwsh") {
            return ShellDialect::WindowsPowerShell;
        }
    }

    ShellDialect::WindowsPowerShell
}

fn detect_on_posix(host: HostOs, hint: &impl CurrentShellHint) -> ShellDialect {
    if let Some(dialect) = hint
        .default_profile(host)
        .and_then(|profile| posix_dialect_from_label(&profile))
    {
        log::debug!("Shell dialect {} detected from default profile", dialect);
        return dialect;
    }

    let dialect = hint
        .env_var("SHELL")
        .map(|shell| {
            let name = Path::new(&shell)
                .file_name()
                .map(|n| n.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            if name.ends_with("zsh") {
                ShellDialect::PosixZsh
            } else if name.ends_with("bash") {
                ShellDialect::PosixBash
            } else {
                ShellDialect::PosixSh
            }
        })
        .unwrap_or(ShellDialect::PosixSh);
    log::debug!("Shell dialect {} detected from SHELL", dialect);
    dialect
}

/// Maps a terminal or profile label to a dialect on Windows.
///
/// Keywords are checked in the order PowerShell, cmd, bash.
fn windows_dialect_from_label(label: &str) -> Option<ShellDialect> {
    let label = label.to_lowercase();
    if label.contains("powershell") || label.contains("pwsh") {
        Some(ShellDialect::WindowsPowerShell)
    } else if label.contains("cmd") || label.contains("command prompt") {
        Some(ShellDialect::WindowsCmd)
    } else if label.contains("bash") {
        Some(ShellDialect::PosixBash)
    } else {
        None
    }
}

fn posix_dialect_from_label(label: &str) -> Option<ShellDialect> {
    let label = label.to_lowercase();
    if label.contains("zsh") {
        Some(ShellDialect::PosixZsh)
    } else if label.contains("bash") {
        Some(ShellDialect::PosixBash)
    } else if label == "sh" || label.ends_with("/sh") {
        Some(ShellDialect::PosixSh)
    } else {
        None
    }
}
