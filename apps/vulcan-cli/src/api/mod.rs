//! API client for the vulcan remote API

mod accounts;
mod assets;
mod client;
pub mod models;
mod programs;
pub mod remote;
mod teams;

pub use client::ApiClient;
pub use remote::{GroupSummary, Remote, TeamSummary};
