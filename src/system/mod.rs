//! # System Interaction Layer
//!
//! Everything that depends on which shell the user runs.
//!
//! ## Modules
//!
//! - **`shell`**: Decides which shell dialect is in use from injected hint
//!   sources (editor state, environment, or a pinned value).
//! - **`command_builder`**: Normalizes paths, escapes arguments and assembles
//!   complete command lines, including UTF-8 prologues and sequencing.

pub mod command_builder;
pub mod shell;
