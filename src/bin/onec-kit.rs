// src/bin/onec-kit.rs

//! The `onec-kit` command-line tool.

use anyhow::Result;
use clap::Parser;
use colored::*;
use onec_kit::{
    cli::{Cli, dispatcher},
    state::AppContext,
};

/// Sets up logging, builds the application context, dispatches the command
/// and reports any error in one place.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        // Handler argument errors (including `--help`) are rendered by clap itself.
        if let Some(clap_err) = e.downcast_ref::<clap::Error>() {
            clap_err.exit();
        }
        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);
    let context = AppContext::from_system()?;
    dispatcher::dispatch(cli.args, &context)
}
