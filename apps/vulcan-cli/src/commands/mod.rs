//! CLI command implementations

pub mod check;
pub mod import;
pub mod prune;
pub mod pull;
pub mod push;

use std::path::PathBuf;
use std::sync::Arc;
use vulcan_core::{AssetResolver, SystemNameResolver};

use crate::api::{ApiClient, Remote};
use crate::config::{Config, ConfigPaths};
use crate::error::{CliError, CliResult};
use crate::output::printer::use_color;
use crate::output::print_warning;
use crate::plan::{ExecutionReport, Plan};
use crate::snapshot::{self, Team};

/// Everything a command needs: configuration and the API client.
pub struct Context {
    pub config: Config,
    pub client: Arc<ApiClient>,
}

impl Context {
    /// Load configuration and apply command-line overrides
    pub fn load(api_url: Option<String>, data_dir: Option<PathBuf>) -> CliResult<Self> {
        let paths = ConfigPaths::new()?;
        let mut config = Config::load(&paths)?;
        if let Some(url) = api_url {
            config.api_url = url;
        }
        if let Some(dir) = data_dir {
            config.data_dir = dir;
        }
        Self::new(config)
    }

    pub fn new(config: Config) -> CliResult<Self> {
        let client = Arc::new(ApiClient::new(config.clone())?);
        Ok(Self { config, client })
    }

    pub fn remote(&self) -> &dyn Remote {
        self.client.as_ref()
    }

    /// Asset resolver using system DNS and the API account lookup
    pub fn resolver(&self) -> AssetResolver {
        AssetResolver::new(Arc::new(SystemNameResolver), self.client.clone())
    }

    pub fn team_dir(&self, team: &str) -> PathBuf {
        snapshot::team_dir(&self.config.data_dir, team)
    }

    /// Read the local snapshot of `team`, or an empty one when none exists
    pub fn load_local(&self, team: &str) -> CliResult<Team> {
        let dir = self.team_dir(team);
        if dir.exists() {
            snapshot::read_team(&dir)
        } else {
            Ok(Team::new(team))
        }
    }

    /// Read the local snapshot of `team`, failing when none exists
    pub fn require_local(&self, team: &str) -> CliResult<Team> {
        let dir = self.team_dir(team);
        if !dir.exists() {
            return Err(CliError::NotFound(format!(
                "no local snapshot for team '{}' in {}; run 'vulcan pull {}' first",
                team,
                self.config.data_dir.display(),
                team
            )));
        }
        snapshot::read_team(&dir)
    }

    /// Fetch the remote snapshot matching `local`
    pub async fn fetch_remote(&self, local: &Team) -> CliResult<Team> {
        let summary = snapshot::resolve_team(self.remote(), local.id, &local.name).await?;
        snapshot::fetch_team(self.remote(), &summary).await
    }
}

/// Print planned operations with a summary
pub fn print_plan(plan: &Plan, dry_run: bool) {
    for warning in &plan.warnings {
        print_warning(warning);
    }

    if plan.is_empty() {
        println!("Team '{}' is up to date.", plan.team_name);
        return;
    }

    if dry_run {
        println!("Dry run - no changes will be made.");
        println!();
        println!("Would apply to team '{}':", plan.team_name);
    } else {
        println!("Applying to team '{}':", plan.team_name);
    }

    let color = use_color();
    for (stage, operations) in &plan.stages {
        println!();
        println!("  {stage}:");
        for operation in operations {
            let action = operation.action();
            if color {
                println!(
                    "    {}{}\x1b[0m {} {}",
                    action.color(),
                    action.symbol(),
                    action.display(),
                    operation.describe()
                );
            } else {
                println!(
                    "    {} {} {}",
                    action.symbol(),
                    action.display(),
                    operation.describe()
                );
            }
        }
    }

    let summary = plan.summary();
    println!();
    println!(
        "Plan: {} to create, {} to update, {} to delete, {} to associate, {} to deassociate.",
        summary.create, summary.update, summary.delete, summary.associate, summary.deassociate
    );
    if dry_run {
        println!("Run again with --force to apply.");
    }
}

/// Print the outcome of an executed plan
pub fn print_report(report: &ExecutionReport) {
    println!();
    println!("Applied {} operation(s).", report.applied.len());
    if let Some(failed) = &report.failed {
        println!("Failed: {} ({})", failed.operation, failed.error);
    }
}
