//! Pull remote team state into local snapshots

use clap::Args;

use super::Context;
use crate::error::{CliError, CliResult};
use crate::output::print_success;
use crate::snapshot::{fetch_team, list_team_dirs, resolve_team, write_team};

/// Arguments for the pull command
#[derive(Args, Debug)]
pub struct PullArgs {
    /// Teams to pull (defaults to every team under the data directory)
    pub teams: Vec<String>,

    /// Pull every team visible to the API token
    #[arg(long, conflicts_with = "teams")]
    pub all: bool,
}

pub async fn execute(args: PullArgs, ctx: &Context) -> CliResult<()> {
    if args.all {
        let teams = ctx.remote().list_teams().await?;
        for team in &teams {
            let snapshot = fetch_team(ctx.remote(), team).await?;
            let dir = ctx.team_dir(&team.name);
            write_team(&dir, &snapshot)?;
            print_success(&format!("Pulled team '{}' into {}", team.name, dir.display()));
        }
        return Ok(());
    }

    let names = if args.teams.is_empty() {
        local_team_names(ctx)?
    } else {
        args.teams
    };
    if names.is_empty() {
        return Err(CliError::Validation(format!(
            "no team given and no snapshots found under {}",
            ctx.config.data_dir.display()
        )));
    }

    for name in names {
        let local = ctx.load_local(&name)?;
        let summary = resolve_team(ctx.remote(), local.id, &local.name).await?;
        let snapshot = fetch_team(ctx.remote(), &summary).await?;
        let dir = ctx.team_dir(&name);
        write_team(&dir, &snapshot)?;
        print_success(&format!("Pulled team '{}' into {}", summary.name, dir.display()));
    }
    Ok(())
}

fn local_team_names(ctx: &Context) -> CliResult<Vec<String>> {
    Ok(list_team_dirs(&ctx.config.data_dir)?
        .into_iter()
        .filter_map(|dir| dir.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect())
}
