//! Router and state for the discovery merge API.

use axum::{
    routing::{get, put},
    Extension, Router,
};
use std::sync::Arc;

use crate::handlers;
use crate::services::locks::MergeLocks;
use crate::store::DiscoveryStore;

/// Shared state for discovery routes.
#[derive(Clone)]
pub struct DiscoveryState {
    /// Backing store for assets, groups and jobs.
    pub store: Arc<dyn DiscoveryStore>,
    /// Teams with a merge in flight.
    pub locks: MergeLocks,
}

impl DiscoveryState {
    pub fn new(store: Arc<dyn DiscoveryStore>) -> Self {
        Self {
            store,
            locks: MergeLocks::new(),
        }
    }
}

/// Create the discovery router.
///
/// - PUT /teams/:team_id/assets/discovery: Merge discovered assets (202 + job)
/// - GET /teams/:team_id/jobs: List jobs
/// - GET /teams/:team_id/jobs/:job_id: Get job
pub fn discovery_router(state: DiscoveryState) -> Router {
    Router::new()
        .route(
            "/teams/:team_id/assets/discovery",
            put(handlers::discovery::merge_discovered_assets),
        )
        .route("/teams/:team_id/jobs", get(handlers::jobs::list_jobs))
        .route("/teams/:team_id/jobs/:job_id", get(handlers::jobs::get_job))
        .layer(Extension(state))
}
