//! In-memory [`DiscoveryStore`].
//!
//! `apply_merge` works on a copy of the state and swaps it in only when
//! every operation succeeded, so a failing merge leaves nothing behind.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tokio::sync::RwLock;
use vulcan_core::{AssetId, GroupId, JobId, TeamId};

use super::{AssetMergeOperations, DiscoveryStore, StoredAsset, StoredGroup};
use crate::error::DiscoveryError;
use crate::models::Job;

#[derive(Debug, Clone, Default)]
struct State {
    teams: HashSet<TeamId>,
    groups: BTreeMap<GroupId, StoredGroup>,
    assets: BTreeMap<AssetId, StoredAsset>,
    memberships: BTreeSet<(GroupId, AssetId)>,
    jobs: HashMap<JobId, Job>,
}

impl State {
    fn apply(&mut self, ops: &AssetMergeOperations) -> Result<(), DiscoveryError> {
        let team_id = ops.team_id;
        if !self.teams.contains(&team_id) {
            return Err(DiscoveryError::TeamNotFound);
        }

        let group_id = ops.group.id;
        if ops.group.exists {
            if !self.groups.contains_key(&group_id) {
                return Err(store_error(format!("group {group_id} does not exist")));
            }
        } else {
            if self
                .groups
                .values()
                .any(|g| g.team_id == team_id && g.name == ops.group.name)
            {
                return Err(store_error(format!(
                    "group '{}' already exists",
                    ops.group.name
                )));
            }
            self.groups.insert(
                group_id,
                StoredGroup {
                    id: group_id,
                    team_id,
                    name: ops.group.name.clone(),
                },
            );
        }

        for asset in &ops.create {
            if self.assets.contains_key(&asset.id) {
                return Err(store_error(format!("asset {} already exists", asset.id)));
            }
            self.assets.insert(asset.id, asset.clone());
        }

        for asset_id in &ops.assoc {
            self.team_asset(team_id, *asset_id)?;
            self.memberships.insert((group_id, *asset_id));
        }

        for asset in &ops.update {
            self.team_asset(team_id, asset.id)?;
            self.assets.insert(asset.id, asset.clone());
        }

        for asset_id in &ops.deassoc {
            if !self.memberships.remove(&(group_id, *asset_id)) {
                return Err(store_error(format!(
                    "asset {asset_id} is not in group {group_id}"
                )));
            }
        }

        for asset_id in &ops.del {
            self.team_asset(team_id, *asset_id)?;
            self.assets.remove(asset_id);
            self.memberships.retain(|(_, a)| a != asset_id);
        }

        Ok(())
    }

    fn team_asset(&self, team_id: TeamId, asset_id: AssetId) -> Result<&StoredAsset, DiscoveryError> {
        self.assets
            .get(&asset_id)
            .filter(|a| a.team_id == team_id)
            .ok_or_else(|| store_error(format!("asset {asset_id} does not exist")))
    }
}

fn store_error(message: String) -> DiscoveryError {
    DiscoveryError::Store(message)
}

/// [`DiscoveryStore`] kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_team(&self, team_id: TeamId) {
        self.state.write().await.teams.insert(team_id);
    }

    pub async fn add_group(&self, team_id: TeamId, name: &str) -> StoredGroup {
        let group = StoredGroup {
            id: GroupId::new(),
            team_id,
            name: name.to_string(),
        };
        self.state
            .write()
            .await
            .groups
            .insert(group.id, group.clone());
        group
    }

    pub async fn add_asset(&self, asset: StoredAsset) {
        self.state.write().await.assets.insert(asset.id, asset);
    }

    pub async fn associate(&self, group_id: GroupId, asset_id: AssetId) {
        self.state
            .write()
            .await
            .memberships
            .insert((group_id, asset_id));
    }

    pub async fn asset(&self, asset_id: AssetId) -> Option<StoredAsset> {
        self.state.read().await.assets.get(&asset_id).cloned()
    }
}

#[async_trait]
impl DiscoveryStore for MemoryStore {
    async fn team_exists(&self, team_id: TeamId) -> Result<bool, DiscoveryError> {
        Ok(self.state.read().await.teams.contains(&team_id))
    }

    async fn find_group_by_name(
        &self,
        team_id: TeamId,
        name: &str,
    ) -> Result<Option<StoredGroup>, DiscoveryError> {
        Ok(self
            .state
            .read()
            .await
            .groups
            .values()
            .find(|g| g.team_id == team_id && g.name == name)
            .cloned())
    }

    async fn list_assets(&self, team_id: TeamId) -> Result<Vec<StoredAsset>, DiscoveryError> {
        Ok(self
            .state
            .read()
            .await
            .assets
            .values()
            .filter(|a| a.team_id == team_id)
            .cloned()
            .collect())
    }

    async fn list_group_assets(
        &self,
        team_id: TeamId,
        group_id: GroupId,
    ) -> Result<Vec<StoredAsset>, DiscoveryError> {
        let state = self.state.read().await;
        Ok(state
            .memberships
            .iter()
            .filter(|(g, _)| *g == group_id)
            .filter_map(|(_, a)| state.assets.get(a))
            .filter(|a| a.team_id == team_id)
            .cloned()
            .collect())
    }

    async fn asset_groups(
        &self,
        _team_id: TeamId,
        asset_id: AssetId,
    ) -> Result<Vec<GroupId>, DiscoveryError> {
        Ok(self
            .state
            .read()
            .await
            .memberships
            .iter()
            .filter(|(_, a)| *a == asset_id)
            .map(|(g, _)| *g)
            .collect())
    }

    async fn apply_merge(&self, ops: &AssetMergeOperations) -> Result<(), DiscoveryError> {
        let mut state = self.state.write().await;
        let mut next = state.clone();
        next.apply(ops)?;
        *state = next;
        Ok(())
    }

    async fn create_job(&self, job: &Job) -> Result<(), DiscoveryError> {
        self.state.write().await.jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn update_job(&self, job: &Job) -> Result<(), DiscoveryError> {
        let mut state = self.state.write().await;
        match state.jobs.get_mut(&job.id) {
            Some(slot) => {
                *slot = job.clone();
                Ok(())
            }
            None => Err(DiscoveryError::JobNotFound),
        }
    }

    async fn get_job(
        &self,
        team_id: TeamId,
        job_id: JobId,
    ) -> Result<Option<Job>, DiscoveryError> {
        Ok(self
            .state
            .read()
            .await
            .jobs
            .get(&job_id)
            .filter(|j| j.team_id == team_id)
            .cloned())
    }

    async fn list_jobs(&self, team_id: TeamId) -> Result<Vec<Job>, DiscoveryError> {
        let mut jobs: Vec<Job> = self
            .state
            .read()
            .await
            .jobs
            .values()
            .filter(|j| j.team_id == team_id)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MergeGroup;
    use vulcan_core::{AssetType, Rolfp};

    fn asset(team_id: TeamId, identifier: &str) -> StoredAsset {
        StoredAsset {
            id: AssetId::new(),
            team_id,
            identifier: identifier.to_string(),
            asset_type: AssetType::Hostname,
            rolfp: Rolfp::Empty,
            alias: String::new(),
            scannable: true,
            annotations: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn test_apply_merge_creates_group_and_assets() {
        let store = MemoryStore::new();
        let team = TeamId::new();
        store.add_team(team).await;

        let group_id = GroupId::new();
        let mut ops = AssetMergeOperations::new(
            team,
            MergeGroup {
                id: group_id,
                name: "scan-discovered-assets".to_string(),
                exists: false,
            },
        );
        let new = asset(team, "a.example.com");
        ops.assoc.push(new.id);
        ops.create.push(new);

        store.apply_merge(&ops).await.unwrap();

        let group = store
            .find_group_by_name(team, "scan-discovered-assets")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(group.id, group_id);
        assert_eq!(store.list_group_assets(team, group_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_apply_merge_is_all_or_nothing() {
        let store = MemoryStore::new();
        let team = TeamId::new();
        store.add_team(team).await;
        let group = store.add_group(team, "scan-discovered-assets").await;

        let mut ops = AssetMergeOperations::new(
            team,
            MergeGroup {
                id: group.id,
                name: group.name.clone(),
                exists: true,
            },
        );
        let new = asset(team, "a.example.com");
        ops.assoc.push(new.id);
        ops.create.push(new);
        // Deleting an unknown asset fails after the create was applied.
        ops.del.push(AssetId::new());

        assert!(store.apply_merge(&ops).await.is_err());
        assert!(store.list_assets(team).await.unwrap().is_empty());
        assert!(store.list_group_assets(team, group.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_memberships() {
        let store = MemoryStore::new();
        let team = TeamId::new();
        store.add_team(team).await;
        let group = store.add_group(team, "scan-discovered-assets").await;
        let existing = asset(team, "old.example.com");
        store.add_asset(existing.clone()).await;
        store.associate(group.id, existing.id).await;

        let mut ops = AssetMergeOperations::new(
            team,
            MergeGroup {
                id: group.id,
                name: group.name.clone(),
                exists: true,
            },
        );
        ops.del.push(existing.id);
        store.apply_merge(&ops).await.unwrap();

        assert!(store.asset(existing.id).await.is_none());
        assert!(store.asset_groups(team, existing.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_jobs_are_scoped_to_team() {
        let store = MemoryStore::new();
        let team = TeamId::new();
        let job = Job::pending(team, "MergeDiscoveredAssets");
        store.create_job(&job).await.unwrap();

        assert!(store.get_job(team, job.id).await.unwrap().is_some());
        assert!(store.get_job(TeamId::new(), job.id).await.unwrap().is_none());
        assert_eq!(store.list_jobs(team).await.unwrap().len(), 1);
    }
}
