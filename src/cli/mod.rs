use clap::Parser;

/// Per-command argument definitions.
pub mod args;
/// Routes a command name to its handler.
pub mod dispatcher;
/// One handler per command.
pub mod handlers;

/// Builds the color-aware help string at runtime.
fn build_help_string() -> &'static str {
    let use_colors = colored::control::SHOULD_COLORIZE.should_colorize();

    let template = t!("cli.help.template");

    let title = if use_colors { "\x1b[1;33m" } else { "" }; // Bold Yellow
    let cmd = if use_colors { "\x1b[36m" } else { "" }; // Cyan
    let group = if use_colors { "\x1b[1;32m" } else { "" }; // Bold Green
    let dim = if use_colors { "\x1b[2m" } else { "" };
    let reset = if use_colors { "\x1b[0m" } else { "" };

    let formatted_string = template
        .replace("<title>", title)
        .replace("</title>", reset)
        .replace("<cmd>", cmd)
        .replace("</cmd>", reset)
        .replace("<group>", group)
        .replace("</group>", reset)
        .replace("<dim>", dim)
        .replace("</dim>", reset);

    Box::leak(formatted_string.into_boxed_str())
}

/// onec-kit: project discovery and shell-command synthesis for 1C development.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    help_template = { build_help_string() },
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
#[command(trailing_var_arg = true)]
pub struct Cli {
    /// The command name followed by its own arguments.
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,
}
