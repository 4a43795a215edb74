//! Delete remote assets that belong to no group

use clap::Args;

use super::push::apply_and_refresh;
use super::Context;
use crate::error::CliResult;
use crate::plan::plan_prune;

/// Arguments for the prune command
#[derive(Args, Debug)]
pub struct PruneArgs {
    /// Team to prune
    pub team: String,

    /// Delete the orphaned assets (default is a dry run)
    #[arg(long)]
    pub force: bool,

    /// Output the plan (and report) as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: PruneArgs, ctx: &Context) -> CliResult<()> {
    let local = ctx.load_local(&args.team)?;
    let remote = ctx.fetch_remote(&local).await?;
    let plan = plan_prune(&remote)?;

    apply_and_refresh(plan, args.force, args.json, ctx, &args.team).await
}
