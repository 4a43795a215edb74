//! Report inventory inconsistencies

use clap::Args;

use super::Context;
use crate::error::CliResult;
use crate::output::{print_header, print_json, print_key_value, print_success, print_warning};
use crate::snapshot::{classify, ConsistencyReport};

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Team to check
    pub team: String,

    /// Check the remote state instead of the local snapshot
    #[arg(long)]
    pub remote: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: CheckArgs, ctx: &Context) -> CliResult<()> {
    let team = if args.remote {
        let local = ctx.load_local(&args.team)?;
        ctx.fetch_remote(&local).await?
    } else {
        ctx.require_local(&args.team)?
    };
    let report = classify(&team);

    if args.json {
        return print_json(&report);
    }
    print_consistency(&team.name, &report);
    Ok(())
}

fn print_consistency(team: &str, report: &ConsistencyReport) {
    print_header(&format!("Consistency of '{team}'"));
    if report.is_clean() {
        print_success("No orphan, foreign or duplicate assets");
        return;
    }

    print_key_value("Orphans", &report.orphans.len().to_string());
    for asset in &report.orphans {
        println!("    {}", asset.target);
    }
    print_key_value("Foreign", &report.foreign.len().to_string());
    for foreign in &report.foreign {
        println!("    {} (group '{}')", foreign.asset.target, foreign.group);
    }
    print_key_value("Duplicates", &report.duplicates.len().to_string());
    for duplicate in &report.duplicates {
        let ids: Vec<String> = duplicate.ids.iter().map(ToString::to_string).collect();
        println!("    {}: {}", duplicate.key, ids.join(", "));
    }
    if !report.orphans.is_empty() {
        println!();
        print_warning(&format!(
            "Orphaned assets can be removed with 'vulcan prune {team} --force'"
        ));
    }
}
