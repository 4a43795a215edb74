//! API request/response models for the discovery merge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vulcan_core::{AssetType, JobId, Rolfp, TeamId};

/// Operation name recorded on discovery merge jobs.
pub const MERGE_DISCOVERED_ASSETS: &str = "MergeDiscoveredAssets";

/// Body of `PUT /teams/:team_id/assets/discovery`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DiscoveryRequest {
    /// Target group; must end with the discovery suffix.
    pub group_name: String,
    pub assets: Vec<DiscoveredAsset>,
}

/// One asset reported by a discovery integration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DiscoveredAsset {
    pub identifier: String,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rolfp: Option<Rolfp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default = "default_scannable")]
    pub scannable: bool,
    /// Keys are stored under the group's discovery namespace.
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

fn default_scannable() -> bool {
    true
}

/// Lifecycle of an asynchronous job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Running,
    Done,
}

/// Per-set counts of an applied merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeCounters {
    pub created: usize,
    pub associated: usize,
    pub updated: usize,
    pub deassociated: usize,
    pub deleted: usize,
}

/// Outcome of a finished job. `error` is set when the merge failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub counters: MergeCounters,
}

/// Job resource returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub team_id: TeamId,
    pub operation: String,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JobResult>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// A new pending job for `operation`.
    #[must_use]
    pub fn pending(team_id: TeamId, operation: &str) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            team_id,
            operation: operation.to_string(),
            status: JobStatus::Pending,
            result: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn mark_running(&mut self) {
        self.status = JobStatus::Running;
        self.updated_at = Utc::now();
    }

    pub fn mark_done(&mut self, result: JobResult) {
        self.status = JobStatus::Done;
        self.result = Some(result);
        self.updated_at = Utc::now();
    }
}

/// Response of `GET /teams/:team_id/jobs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobListResponse {
    pub items: Vec<Job>,
    pub total: usize,
}
