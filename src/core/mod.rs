// src/core/mod.rs

//! Project discovery, its configuration and cache, and path grouping.

/// Loading `settings.toml`.
pub mod config_loader;
/// Directory-name ignore patterns.
pub mod ignore;
pub mod path_grouper;
/// Config and storage locations and base-folder expansion.
pub mod paths;
/// The on-disk project cache and its states.
pub mod project_cache;
/// Scanning base folders for project roots.
pub mod project_locator;
