//! Persistence boundary for the discovery merge.
//!
//! The merge reads a team's inventory through [`DiscoveryStore`] and hands
//! back one [`AssetMergeOperations`] that the store must apply as a single
//! unit of work.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use vulcan_core::{AssetId, AssetType, GroupId, JobId, Rolfp, TeamId};

use crate::error::DiscoveryError;
use crate::models::Job;

/// Asset as stored in a team inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredAsset {
    pub id: AssetId,
    pub team_id: TeamId,
    pub identifier: String,
    pub asset_type: AssetType,
    pub rolfp: Rolfp,
    pub alias: String,
    pub scannable: bool,
    pub annotations: BTreeMap<String, String>,
}

/// Asset group as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredGroup {
    pub id: GroupId,
    pub team_id: TeamId,
    pub name: String,
}

/// Target group of a merge; `exists` is false when the merge creates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeGroup {
    pub id: GroupId,
    pub name: String,
    pub exists: bool,
}

/// Everything a discovery merge changes, scoped to one team and one group.
///
/// Assets in `create` are also listed in `assoc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetMergeOperations {
    pub team_id: TeamId,
    pub group: MergeGroup,
    pub create: Vec<StoredAsset>,
    pub assoc: Vec<AssetId>,
    pub update: Vec<StoredAsset>,
    pub deassoc: Vec<AssetId>,
    pub del: Vec<AssetId>,
}

impl AssetMergeOperations {
    pub fn new(team_id: TeamId, group: MergeGroup) -> Self {
        Self {
            team_id,
            group,
            create: Vec::new(),
            assoc: Vec::new(),
            update: Vec::new(),
            deassoc: Vec::new(),
            del: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.group.exists
            && self.create.is_empty()
            && self.assoc.is_empty()
            && self.update.is_empty()
            && self.deassoc.is_empty()
            && self.del.is_empty()
    }
}

/// Storage operations the discovery merge depends on.
#[async_trait]
pub trait DiscoveryStore: Send + Sync {
    async fn team_exists(&self, team_id: TeamId) -> Result<bool, DiscoveryError>;

    async fn find_group_by_name(
        &self,
        team_id: TeamId,
        name: &str,
    ) -> Result<Option<StoredGroup>, DiscoveryError>;

    /// Full team inventory.
    async fn list_assets(&self, team_id: TeamId) -> Result<Vec<StoredAsset>, DiscoveryError>;

    /// Assets associated with `group_id`.
    async fn list_group_assets(
        &self,
        team_id: TeamId,
        group_id: GroupId,
    ) -> Result<Vec<StoredAsset>, DiscoveryError>;

    /// Every group `asset_id` belongs to.
    async fn asset_groups(
        &self,
        team_id: TeamId,
        asset_id: AssetId,
    ) -> Result<Vec<GroupId>, DiscoveryError>;

    /// Apply all of `ops` or none of them.
    async fn apply_merge(&self, ops: &AssetMergeOperations) -> Result<(), DiscoveryError>;

    async fn create_job(&self, job: &Job) -> Result<(), DiscoveryError>;

    async fn update_job(&self, job: &Job) -> Result<(), DiscoveryError>;

    async fn get_job(&self, team_id: TeamId, job_id: JobId)
        -> Result<Option<Job>, DiscoveryError>;

    /// Jobs of a team, newest first.
    async fn list_jobs(&self, team_id: TeamId) -> Result<Vec<Job>, DiscoveryError>;
}
