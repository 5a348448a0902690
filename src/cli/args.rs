// src/cli/args.rs
use crate::models::ShellDialect;
use crate::state::ShellOverrides;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Flags that steer shell detection. Shared by every `shell` subcommand.
#[derive(Args, Debug, Default, Clone)]
pub struct ShellHintArgs {
    /// Skip detection and use this dialect (sh, bash, zsh, cmd, powershell).
    #[arg(long, short, global = true)]
    pub dialect: Option<ShellDialect>,

    /// Name of the terminal session the command will be sent to.
    #[arg(long, global = true)]
    pub terminal: Option<String>,

    /// Default shell profile configured for this OS.
    #[arg(long, global = true)]
    pub profile: Option<String>,
}

impl From<&ShellHintArgs> for ShellOverrides {
    fn from(value: &ShellHintArgs) -> Self {
        Self {
            dialect: value.dialect,
            terminal: value.terminal.clone(),
            profile: value.profile.clone(),
        }
    }
}

/// Arguments of the `shell` command.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, about = "Detects the shell dialect and composes command lines.")]
pub struct ShellArgs {
    /// Overrides for dialect detection.
    #[command(flatten)]
    pub hints: ShellHintArgs,

    /// What to print.
    #[command(subcommand)]
    pub command: ShellCommand,
}

/// Subcommands of `shell`.
#[derive(Subcommand, Debug)]
pub enum ShellCommand {
    /// Prints the detected dialect.
    Detect,
    /// Prints a ready-to-send command line.
    Build {
        /// Executable path.
        executable: String,
        /// Arguments, passed through untouched until escaping.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Joins already-built command lines for sequential execution.
    Join {
        /// The command lines, in execution order.
        #[arg(required = true)]
        commands: Vec<String>,
    },
}

/// Arguments of the `projects` command.
#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Lists project roots under the configured base folders.")]
pub struct ProjectsArgs {
    /// Delete the cache and scan again.
    #[arg(long, short)]
    pub refresh: bool,

    /// Print the result as a JSON array.
    #[arg(long)]
    pub json: bool,
}

/// Arguments of the `group` command.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, about = "Splits a path list by group base directory.")]
pub struct GroupArgs {
    /// Newline-delimited list of paths.
    #[arg(long, short)]
    pub list: PathBuf,

    /// A group and its base directory, as `ID=DIR`. Repeatable.
    #[arg(long = "group", short = 'g', value_name = "ID=DIR", required = true)]
    pub groups: Vec<String>,

    /// Root for relative paths. Defaults to the current directory.
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Write one `<ID>.txt` list per group into this directory.
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}
