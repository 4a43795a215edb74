//! vulcan CLI - Declarative team synchronization for the vulcan platform
//!
//! This CLI enables security teams to:
//! - Pull teams, members, assets, groups, policies and programs to disk
//! - Review the plan that converges the remote state to the local files
//! - Push that plan, prune orphaned assets and import CSV inventories

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use vulcan_cli::commands::{self, Context};
use vulcan_cli::error::CliResult;
use vulcan_cli::logging::init_logging;

/// vulcan CLI - Team reconciliation
#[derive(Parser)]
#[command(name = "vulcan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// API base URL (overrides config.json and VULCAN_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory holding team snapshots (overrides config.json and VULCAN_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the remote state of teams to their local snapshots
    Pull(commands::pull::PullArgs),

    /// Plan (and with --force apply) the changes from a local snapshot
    Push(commands::push::PushArgs),

    /// Plan (and with --force apply) deletion of assets in no group
    Prune(commands::prune::PruneArgs),

    /// Merge a CSV asset inventory into a local snapshot
    Import(commands::import::ImportArgs),

    /// Report orphan, foreign and duplicate assets
    Check(commands::check::CheckArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let ctx = Context::load(cli.api_url, cli.data_dir)?;
    match cli.command {
        Commands::Pull(args) => commands::pull::execute(args, &ctx).await,
        Commands::Push(args) => commands::push::execute(args, &ctx).await,
        Commands::Prune(args) => commands::prune::execute(args, &ctx).await,
        Commands::Import(args) => commands::import::execute(args, &ctx).await,
        Commands::Check(args) => commands::check::execute(args, &ctx).await,
    }
}
