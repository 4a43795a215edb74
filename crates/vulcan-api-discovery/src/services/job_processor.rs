//! Background processor for discovery merge jobs.

use std::sync::Arc;
use vulcan_core::TeamId;

use crate::error::DiscoveryError;
use crate::models::{DiscoveryRequest, Job, JobResult, MergeCounters};
use crate::services::locks::MergeGuard;
use crate::services::merge::plan_merge;
use crate::store::{AssetMergeOperations, DiscoveryStore};

/// Process a merge job in the background.
///
/// This function runs on a spawned Tokio task. It:
/// 1. Marks the job as RUNNING
/// 2. Plans the merge against the current inventory
/// 3. Applies it as one unit of work
/// 4. Marks the job as DONE, with `result.error` set on failure
///
/// The team lock is held until the job is DONE.
pub async fn process_job(
    store: Arc<dyn DiscoveryStore>,
    guard: MergeGuard,
    mut job: Job,
    request: DiscoveryRequest,
) {
    let _guard = guard;

    job.mark_running();
    if let Err(e) = store.update_job(&job).await {
        tracing::error!(job_id = %job.id, error = %e, "Failed to mark job as running");
        return;
    }

    tracing::info!(
        job_id = %job.id,
        team_id = %job.team_id,
        group = %request.group_name,
        declared = request.assets.len(),
        "Starting discovery merge"
    );

    let result = match run_merge(store.as_ref(), job.team_id, &request).await {
        Ok(counters) => {
            tracing::info!(
                job_id = %job.id,
                created = counters.created,
                associated = counters.associated,
                updated = counters.updated,
                deassociated = counters.deassociated,
                deleted = counters.deleted,
                "Discovery merge completed"
            );
            JobResult {
                error: None,
                counters,
            }
        }
        Err(e) => {
            tracing::warn!(job_id = %job.id, error = %e, "Discovery merge failed");
            JobResult {
                error: Some(e.to_string()),
                counters: MergeCounters::default(),
            }
        }
    };

    job.mark_done(result);
    if let Err(e) = store.update_job(&job).await {
        tracing::error!(job_id = %job.id, error = %e, "Failed to mark job as done");
    }
}

async fn run_merge(
    store: &dyn DiscoveryStore,
    team_id: TeamId,
    request: &DiscoveryRequest,
) -> Result<MergeCounters, DiscoveryError> {
    let ops = plan_merge(store, team_id, request).await?;
    if !ops.is_empty() {
        store.apply_merge(&ops).await?;
    }
    Ok(counters(&ops))
}

fn counters(ops: &AssetMergeOperations) -> MergeCounters {
    MergeCounters {
        created: ops.create.len(),
        associated: ops.assoc.len(),
        updated: ops.update.len(),
        deassociated: ops.deassoc.len(),
        deleted: ops.del.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DiscoveredAsset, JobStatus, MERGE_DISCOVERED_ASSETS};
    use crate::services::locks::MergeLocks;
    use crate::store::MemoryStore;
    use std::collections::BTreeMap;
    use vulcan_core::AssetType;

    fn ip(identifier: &str, scannable: bool) -> DiscoveredAsset {
        DiscoveredAsset {
            identifier: identifier.to_string(),
            asset_type: AssetType::Ip,
            rolfp: None,
            alias: None,
            scannable,
            annotations: BTreeMap::new(),
        }
    }

    async fn run(store: Arc<MemoryStore>, team: TeamId, assets: Vec<DiscoveredAsset>) -> Job {
        let locks = MergeLocks::new();
        let guard = locks.try_acquire(team).unwrap();
        let job = Job::pending(team, MERGE_DISCOVERED_ASSETS);
        store.create_job(&job).await.unwrap();
        let request = DiscoveryRequest {
            group_name: "scanner-discovered-assets".to_string(),
            assets,
        };
        process_job(store.clone(), guard, job.clone(), request).await;
        assert!(!locks.is_locked(team));
        store.get_job(team, job.id).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_successful_job_records_counters() {
        let store = Arc::new(MemoryStore::new());
        let team = TeamId::new();
        store.add_team(team).await;

        let job = run(store.clone(), team, vec![ip("10.0.0.1", true), ip("10.0.0.2", true)]).await;

        assert_eq!(job.status, JobStatus::Done);
        let result = job.result.unwrap();
        assert!(result.error.is_none());
        assert_eq!(result.counters.created, 2);
        assert_eq!(result.counters.associated, 2);
        assert_eq!(store.list_assets(team).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_conflicting_duplicates_fail_without_mutation() {
        let store = Arc::new(MemoryStore::new());
        let team = TeamId::new();
        store.add_team(team).await;

        let job = run(
            store.clone(),
            team,
            vec![ip("10.0.0.1", true), ip("10.0.0.1", false)],
        )
        .await;

        assert_eq!(job.status, JobStatus::Done);
        let result = job.result.unwrap();
        assert!(result.error.unwrap().contains("10.0.0.1"));
        assert_eq!(result.counters, MergeCounters::default());
        assert!(store.list_assets(team).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_second_run_is_a_no_op() {
        let store = Arc::new(MemoryStore::new());
        let team = TeamId::new();
        store.add_team(team).await;

        run(store.clone(), team, vec![ip("10.0.0.1", true)]).await;
        let job = run(store.clone(), team, vec![ip("10.0.0.1", true)]).await;

        assert_eq!(job.result.unwrap().counters, MergeCounters::default());
    }
}
