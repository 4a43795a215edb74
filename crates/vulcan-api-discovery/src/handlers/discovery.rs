//! PUT /teams/:team_id/assets/discovery

use axum::{extract::Path, http::StatusCode, Extension, Json};
use vulcan_core::TeamId;

use crate::error::DiscoveryError;
use crate::models::{DiscoveryRequest, Job, MERGE_DISCOVERED_ASSETS};
use crate::router::DiscoveryState;
use crate::services::{job_processor, merge};

/// Accept a discovered asset list and merge it into the target group.
///
/// The merge runs in the background; the response carries the pending job
/// to poll.
pub async fn merge_discovered_assets(
    Extension(state): Extension<DiscoveryState>,
    Path(team_id): Path<TeamId>,
    Json(request): Json<DiscoveryRequest>,
) -> Result<(StatusCode, Json<Job>), DiscoveryError> {
    merge::validate_group_name(&request.group_name)?;

    if !state.store.team_exists(team_id).await? {
        return Err(DiscoveryError::TeamNotFound);
    }

    let guard = state
        .locks
        .try_acquire(team_id)
        .ok_or(DiscoveryError::ConcurrentMerge)?;

    let job = Job::pending(team_id, MERGE_DISCOVERED_ASSETS);
    state.store.create_job(&job).await?;

    tracing::info!(
        job_id = %job.id,
        team_id = %team_id,
        group = %request.group_name,
        "Discovery merge job created"
    );

    let bg_store = state.store.clone();
    let bg_job = job.clone();
    tokio::spawn(async move {
        job_processor::process_job(bg_store, guard, bg_job, request).await;
    });

    Ok((StatusCode::ACCEPTED, Json(job)))
}
