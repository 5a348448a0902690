use anyhow::{Result, anyhow};

use crate::{cli::handlers, state::AppContext};

/// A command, its aliases and its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>, &AppContext) -> Result<()>,
}

/// Every command the binary understands.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "group",
        aliases: &["split"],
        handler: handlers::group::handle,
    },
    CommandDefinition {
        name: "projects",
        aliases: &["ls"],
        handler: handlers::projects::handle,
    },
    CommandDefinition {
        name: "shell",
        aliases: &["sh"],
        handler: handlers::shell::handle,
    },
];

fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Routes `[command, args...]` to its handler.
pub fn dispatch(mut args: Vec<String>, context: &AppContext) -> Result<()> {
    if args.is_empty() {
        return Err(anyhow!(t!("cli.error.missing_command")));
    }
    let name = args.remove(0);
    log::debug!("Dispatching '{}' with {:?}", name, args);

    let command = find_command(&name)
        .ok_or_else(|| anyhow!(format!(t!("cli.error.unknown_command"), name = name)))?;
    (command.handler)(args, context)
}
