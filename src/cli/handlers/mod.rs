// src/cli/handlers/mod.rs

// One module per CLI command.

/// `group`: split a path list by base directory.
pub mod group;
/// `projects`: list discovered project roots.
pub mod projects;
/// `shell`: detect the dialect and compose command lines.
pub mod shell;
