//! Import a CSV asset inventory into a local snapshot

use clap::Args;
use std::path::PathBuf;

use super::Context;
use crate::error::{CliError, CliResult};
use crate::formats::csv::{import_assets_csv, merge_into};
use crate::output::{print_success, print_warning};
use crate::snapshot::write_team;

/// Arguments for the import command
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Team whose local snapshot receives the assets
    pub team: String,

    /// CSV file with columns target,type,rolfp,alias,groups
    pub file: PathBuf,
}

pub async fn execute(args: ImportArgs, ctx: &Context) -> CliResult<()> {
    let content = std::fs::read_to_string(&args.file).map_err(|e| {
        CliError::Io(format!("Failed to read {}: {}", args.file.display(), e))
    })?;
    let result = import_assets_csv(&content);

    for (line, error) in &result.errors {
        print_warning(&format!("{}:{}: {}", args.file.display(), line, error));
    }
    if result.assets.is_empty() && !result.errors.is_empty() {
        return Err(CliError::Validation(format!(
            "no valid rows in {}",
            args.file.display()
        )));
    }

    let mut team = ctx.load_local(&args.team)?;
    let summary = merge_into(&mut team, result.assets);
    write_team(&ctx.team_dir(&args.team), &team)?;

    print_success(&format!(
        "Imported into '{}': {} added, {} updated, {} group membership(s), {} row(s) skipped",
        args.team,
        summary.added,
        summary.updated,
        summary.memberships,
        result.errors.len()
    ));
    Ok(())
}
