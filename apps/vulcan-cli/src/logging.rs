//! Tracing subscriber setup for the CLI.
//!
//! Diagnostics go to stderr so stdout stays reserved for plans and JSON.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Map `-v`/`-q` flags to a default filter directive.
pub fn filter_directive(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbosity {
        0 => "warn",
        1 => "vulcan_cli=info,vulcan_core=info,warn",
        2 => "vulcan_cli=debug,vulcan_core=debug,info",
        _ => "trace",
    }
}

/// Initialize logging.
///
/// `VULCAN_LOG` wins over `RUST_LOG`, which wins over the flags.
pub fn init_logging(verbosity: u8, quiet: bool) {
    let filter = std::env::var("VULCAN_LOG")
        .ok()
        .and_then(|v| EnvFilter::try_new(v).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(filter_directive(verbosity, quiet)));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}
