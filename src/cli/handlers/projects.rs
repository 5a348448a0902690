use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use crate::{cli::args::ProjectsArgs, state::AppContext};

/// Entry point for the `projects` command.
pub fn handle(args: Vec<String>, context: &AppContext) -> Result<()> {
    let projects_args = ProjectsArgs::try_parse_from(&args)?;
    let mut locator = context.project_locator();

    let projects = if projects_args.refresh {
        locator.refresh_projects()
    } else {
        locator.locate_projects()
    }
    .with_context(|| {
        format!(
            "Could not read project settings from '{}'",
            context.settings_file.path().display()
        )
    })?;

    if projects_args.json {
        println!("{}", serde_json::to_string_pretty(projects)?);
        return Ok(());
    }

    if projects.is_empty() {
        println!(
            "{}",
            format!(
                t!("projects.info.none"),
                path = context.settings_file.path().display()
            )
            .yellow()
        );
        return Ok(());
    }

    println!(
        "\n{}",
        format!(t!("projects.header"), count = projects.len()).bold()
    );
    for project in projects {
        let name = project
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!(
            "  {} {}",
            name.cyan(),
            project.display().to_string().dimmed()
        );
    }
    if projects_args.refresh {
        println!("\n{}", t!("projects.info.refreshed").green());
    }
    Ok(())
}
