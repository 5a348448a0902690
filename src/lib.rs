//! Project discovery and shell-command synthesis for 1C:Enterprise tooling.
//!
//! - [`system`] detects the active shell dialect and composes escaped
//!   command lines for it.
//! - [`core`] finds project roots on disk, caches the result and splits
//!   file lists by group base directory.

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

/// Command-line front end.
pub mod cli;
/// Fixed file names, directory names and defaults.
pub mod constants;
pub mod core;
/// Data types shared across modules.
pub mod models;
/// The application context passed to every handler.
pub mod state;
pub mod system;
