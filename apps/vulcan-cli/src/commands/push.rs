//! Reconcile a local snapshot into the remote state

use clap::Args;
use serde::Serialize;

use super::{print_plan, print_report, Context};
use crate::error::CliResult;
use crate::output::{print_json, print_success};
use crate::plan::{self, ExecutionReport, Plan};
use crate::snapshot::write_team;

/// Arguments for the push command
#[derive(Args, Debug)]
pub struct PushArgs {
    /// Team to push
    pub team: String,

    /// Apply the plan (default is a dry run)
    #[arg(long)]
    pub force: bool,

    /// Output the plan (and report) as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output of push and prune
#[derive(Serialize)]
pub(crate) struct PlanOutput<'a> {
    pub plan: &'a Plan,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<&'a ExecutionReport>,
}

pub async fn execute(args: PushArgs, ctx: &Context) -> CliResult<()> {
    let local = ctx.require_local(&args.team)?;
    let remote = ctx.fetch_remote(&local).await?;
    let plan = plan::plan(&local, &remote, &ctx.resolver()).await?;

    apply_and_refresh(plan, args.force, args.json, ctx, &args.team).await
}

/// Print `plan`, and with `force` run it and write the refreshed remote
/// snapshot back to the team directory.
pub(crate) async fn apply_and_refresh(
    plan: Plan,
    force: bool,
    json: bool,
    ctx: &Context,
    team: &str,
) -> CliResult<()> {
    if !force || plan.is_empty() {
        if json {
            print_json(&PlanOutput {
                plan: &plan,
                report: None,
            })?;
        } else {
            print_plan(&plan, true);
        }
        return Ok(());
    }

    if !json {
        print_plan(&plan, false);
    }
    let report = plan::execute(&plan, ctx.remote()).await;
    if json {
        print_json(&PlanOutput {
            plan: &plan,
            report: Some(&report),
        })?;
    } else {
        print_report(&report);
    }
    let report = report.into_result()?;

    let local = ctx.load_local(team)?;
    let refreshed = ctx.fetch_remote(&local).await?;
    write_team(&ctx.team_dir(team), &refreshed)?;
    if !json {
        print_success(&format!(
            "Applied {} operation(s) and refreshed local snapshot of '{}'",
            report.applied.len(),
            plan.team_name
        ));
    }
    Ok(())
}
