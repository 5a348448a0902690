use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::args::{ShellArgs, ShellCommand},
    state::{AppContext, ShellOverrides},
    system::command_builder::ShellCommandBuilder,
};

/// Main entry point for the 'shell' command.
/// Output goes to stdout without decoration so it can be piped into a terminal.
pub fn handle(args: Vec<String>, context: &AppContext) -> Result<()> {
    let shell_args = ShellArgs::try_parse_from(&args)?;

    let settings = context
        .load_settings()
        .context("Could not load settings for shell detection")?;
    let overrides = ShellOverrides::from(&shell_args.hints);
    let builder =
        ShellCommandBuilder::for_host(context.host, context.shell_hint(&settings, &overrides));

    let output = match shell_args.command {
        ShellCommand::Detect => builder.detect_shell().to_string(),
        ShellCommand::Build { executable, args } => builder.build_command(&executable, &args),
        ShellCommand::Join { commands } => builder.join_commands(&commands),
    };
    println!("{}", output);
    Ok(())
}
