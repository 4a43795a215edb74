//! vulcan CLI library
//!
//! Declarative synchronization of vulcan teams: a team is pulled into a
//! directory of plain-text records, edited locally, and pushed back as an
//! ordered plan of API operations.
//!
//! # Modules
//!
//! - [`snapshot`] - Team model, on-disk codec, matcher and consistency report
//! - [`plan`] - Diff planner, operations and executor
//! - [`api`] - HTTP client and the [`api::Remote`] abstraction
//! - [`formats`] - CSV inventory import
//! - [`commands`] - pull, push, prune, import and check

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod formats;
pub mod logging;
pub mod output;
pub mod plan;
pub mod snapshot;

pub use error::{CliError, CliResult};
