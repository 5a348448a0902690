use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::{
    cli::args::GroupArgs,
    core::path_grouper::{self, PathGroups},
    state::AppContext,
};

/// Main entry point for the 'group' command.
pub fn handle(args: Vec<String>, context: &AppContext) -> Result<()> {
    let group_args = GroupArgs::try_parse_from(&args)?;

    let groups = parse_group_mappings(&group_args.groups)?;
    let root = match group_args.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };

    let paths = path_grouper::read_path_list(&group_args.list)?;
    let grouped = path_grouper::group_paths(&paths, &groups, &root, context.host);

    if grouped.values().all(Vec::is_empty) {
        println!("{}", t!("group.info.nothing").yellow());
        return Ok(());
    }

    match &group_args.out {
        Some(dir) => {
            for (_, written) in path_grouper::write_group_lists(&grouped, dir)? {
                println!(
                    "{}",
                    format!(t!("group.info.written"), path = written.display()).green()
                );
            }
        }
        None => print_groups(&grouped),
    }
    Ok(())
}

/// Parses `ID=DIR` pairs. Later duplicates replace earlier ones.
fn parse_group_mappings(raw: &[String]) -> Result<BTreeMap<String, PathBuf>> {
    raw.iter()
        .map(|value| {
            value
                .split_once('=')
                .map(|(id, dir)| (id.trim(), dir.trim()))
                .filter(|(id, dir)| !id.is_empty() && !dir.is_empty())
                .map(|(id, dir)| (id.to_string(), PathBuf::from(dir)))
                .ok_or_else(|| anyhow!(format!(t!("group.error.bad_mapping"), value = value)))
        })
        .collect()
}

fn print_groups(grouped: &PathGroups) {
    for (id, paths) in grouped {
        println!(
            "\n{}",
            format!(t!("group.header"), id = id.cyan().bold(), count = paths.len())
        );
        for path in paths {
            println!("  {}", path);
        }
    }
}
