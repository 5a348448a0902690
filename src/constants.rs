// src/constants.rs

/// The file whose presence directly inside a directory marks it as a project root.
pub const PROJECT_MARKER_FILENAME: &str = "packagedef";

/// The name of the on-disk project discovery cache (in the storage directory).
pub const PROJECT_CACHE_FILENAME: &str = "projects_cache_1c.json";

/// The name of the application directory under the system config/data directories.
pub const APP_DIR_NAME: &str = "onec-kit";

/// The name of the user settings file (in the config directory).
pub const SETTINGS_FILENAME: &str = "settings.toml";

/// Environment variable that overrides the config directory.
pub const CONFIG_DIR_ENV: &str = "ONEC_KIT_CONFIG_DIR";

/// Environment variable that overrides the storage (cache) directory.
pub const DATA_DIR_ENV: &str = "ONEC_KIT_DATA_DIR";

/// Directory names skipped during project discovery when the settings file
/// does not configure its own list.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    "node_modules",
    ".git",
    ".svn",
    ".hg",
    ".vscode",
    ".idea",
    "oscript_modules",
    "out",
    "build",
    "dist",
];
