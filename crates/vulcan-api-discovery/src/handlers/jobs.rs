//! Job handlers.
//!
//! - GET /teams/:team_id/jobs: List jobs
//! - GET /teams/:team_id/jobs/:job_id: Get job status

use axum::{extract::Path, Extension, Json};
use vulcan_core::{JobId, TeamId};

use crate::error::DiscoveryError;
use crate::models::{Job, JobListResponse};
use crate::router::DiscoveryState;

pub async fn list_jobs(
    Extension(state): Extension<DiscoveryState>,
    Path(team_id): Path<TeamId>,
) -> Result<Json<JobListResponse>, DiscoveryError> {
    let items = state.store.list_jobs(team_id).await?;
    let total = items.len();
    Ok(Json(JobListResponse { items, total }))
}

pub async fn get_job(
    Extension(state): Extension<DiscoveryState>,
    Path((team_id, job_id)): Path<(TeamId, JobId)>,
) -> Result<Json<Job>, DiscoveryError> {
    state
        .store
        .get_job(team_id, job_id)
        .await?
        .map(Json)
        .ok_or(DiscoveryError::JobNotFound)
}
