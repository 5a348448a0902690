// src/models.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::constants::DEFAULT_IGNORE_PATTERNS;

// --- SHELL MODELS ---

/// One of the shell command-line syntaxes a command string can be composed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ShellDialect {
    /// Plain POSIX `sh`.
    PosixSh,
    /// GNU bash (including Git Bash on Windows).
    PosixBash,
    /// Z shell.
    PosixZsh,
    /// Windows `cmd.exe`.
    WindowsCmd,
    /// Windows PowerShell or PowerShell Core.
    WindowsPowerShell,
}

impl ShellDialect {
    /// Every dialect, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::PosixSh,
        Self::PosixBash,
        Self::PosixZsh,
        Self::WindowsCmd,
        Self::WindowsPowerShell,
    ];

    /// `true` for the sh/bash/zsh family.
    pub fn is_posix(self) -> bool {
        matches!(self, Self::PosixSh | Self::PosixBash | Self::PosixZsh)
    }

    /// `true` for the two shells that ship with Windows.
    pub fn is_windows_native(self) -> bool {
        !self.is_posix()
    }

    /// The canonical name, as shown to users and accepted back by `FromStr`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PosixSh => "posix-sh",
            Self::PosixBash => "posix-bash",
            Self::PosixZsh => "posix-zsh",
            Self::WindowsCmd => "windows-cmd",
            Self::WindowsPowerShell => "windows-powershell",
        }
    }
}

impl fmt::Display for ShellDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a dialect name is not recognized.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown shell dialect '{0}'. Expected one of: sh, bash, zsh, cmd, powershell.")]
pub struct ParseDialectError(pub String);

impl FromStr for ShellDialect {
    type Err = ParseDialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "posix-sh" | "sh" => Ok(Self::PosixSh),
            "posix-bash" | "bash" => Ok(Self::PosixBash),
            "posix-zsh" | "zsh" => Ok(Self::PosixZsh),
            "windows-cmd" | "cmd" => Ok(Self::WindowsCmd),
            "windows-powershell" | "powershell" | "pwsh" => Ok(Self::WindowsPowerShell),
            _ => Err(ParseDialectError(s.to_string())),
        }
    }
}

impl TryFrom<String> for ShellDialect {
    type Error = ParseDialectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ShellDialect> for String {
    fn from(value: ShellDialect) -> Self {
        value.as_str().to_string()
    }
}

/// The operating system family the composed commands will run on.
///
/// Passed explicitly everywhere so that Windows-only rules can be exercised
/// from any host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostOs {
    /// Any Windows version.
    Windows,
    /// Linux and other non-Apple unixes.
    Linux,
    /// macOS.
    MacOs,
}

impl HostOs {
    /// The family of the running process.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Linux
        }
    }

    /// Shorthand for `self == HostOs::Windows`.
    pub fn is_windows(self) -> bool {
        self == Self::Windows
    }
}

// --- PROJECT DISCOVERY MODELS ---

/// The persisted result of a project scan, tagged with the configuration it
/// was produced from.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCacheEntry {
    /// Discovered project roots, sorted case-insensitively.
    pub paths: Vec<PathBuf>,
    /// Base folders exactly as configured when the scan ran.
    pub base_folders: Vec<String>,
    /// Ignore patterns exactly as configured when the scan ran.
    pub ignore_patterns: Vec<String>,
}

/// Everything that drives one project scan. Read fresh before every scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Scan roots. May start with `~`, reference `$VARS` or contain glob patterns.
    pub base_folders: Vec<String>,
    /// Globs matched against bare directory names.
    pub ignore_patterns: Vec<String>,
    /// Maximum recursion depth below a base folder; `0` means unlimited.
    pub max_depth: usize,
    /// Reuse results across calls and sessions while the configuration is unchanged.
    pub use_cache: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            base_folders: Vec::new(),
            ignore_patterns: DEFAULT_IGNORE_PATTERNS
                .iter()
                .map(|p| (*p).to_string())
                .collect(),
            max_depth: 0,
            use_cache: true,
        }
    }
}

// --- `settings.toml` MODELS ---

/// The deserialized structure of the user's `settings.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Project discovery.
    #[serde(default)]
    pub projects: ProjectsSettings,
    /// Shell detection.
    #[serde(default)]
    pub shell: ShellSettings,
}

/// The `[projects]` table.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ProjectsSettings {
    /// See [`ScanConfig::base_folders`].
    #[serde(default)]
    pub base_folders: Vec<String>,
    /// See [`ScanConfig::ignore_patterns`].
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,
    /// See [`ScanConfig::max_depth`].
    #[serde(default)]
    pub max_depth: usize,
    /// See [`ScanConfig::use_cache`].
    #[serde(default = "default_true")]
    pub cache: bool,
}

impl Default for ProjectsSettings {
    fn default() -> Self {
        Self {
            base_folders: Vec::new(),
            ignore_patterns: default_ignore_patterns(),
            max_depth: 0,
            cache: true,
        }
    }
}

impl From<ProjectsSettings> for ScanConfig {
    fn from(value: ProjectsSettings) -> Self {
        Self {
            base_folders: value.base_folders,
            ignore_patterns: value.ignore_patterns,
            max_depth: value.max_depth,
            use_cache: value.cache,
        }
    }
}

/// The `[shell]` table. Mirrors the signals an editor would expose.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellSettings {
    /// Pins the dialect and disables detection.
    pub dialect: Option<ShellDialect>,
    /// Name of the terminal session commands are sent to.
    pub terminal: Option<String>,
    /// Default terminal profile on Windows.
    pub default_profile_windows: Option<String>,
    /// Default terminal profile on Linux.
    pub default_profile_linux: Option<String>,
    /// Default terminal profile on macOS.
    pub default_profile_osx: Option<String>,
}

impl ShellSettings {
    /// The configured default profile for the given OS family.
    pub fn default_profile(&self, host: HostOs) -> Option<&str> {
        match host {
            HostOs::Windows => self.default_profile_windows.as_deref(),
            HostOs::Linux => self.default_profile_linux.as_deref(),
            HostOs::MacOs => self.default_profile_osx.as_deref(),
        }
    }
}

fn default_ignore_patterns() -> Vec<String> {
    ScanConfig::default().ignore_patterns
}

fn default_true() -> bool {
    true
}
