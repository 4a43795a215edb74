//! Per-team merge locks.
//!
//! At most one discovery merge runs per team. The guard is moved into the
//! background task and released when the job finishes.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use vulcan_core::TeamId;

/// Set of teams with a merge in flight.
#[derive(Debug, Clone, Default)]
pub struct MergeLocks {
    held: Arc<Mutex<HashSet<TeamId>>>,
}

impl MergeLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the lock for `team_id`, or `None` when a merge is already running.
    pub fn try_acquire(&self, team_id: TeamId) -> Option<MergeGuard> {
        let mut held = self.held.lock().unwrap_or_else(|e| e.into_inner());
        if held.insert(team_id) {
            Some(MergeGuard {
                team_id,
                held: Arc::clone(&self.held),
            })
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_locked(&self, team_id: TeamId) -> bool {
        self.held
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&team_id)
    }
}

/// Releases the team lock on drop.
#[derive(Debug)]
pub struct MergeGuard {
    team_id: TeamId,
    held: Arc<Mutex<HashSet<TeamId>>>,
}

impl MergeGuard {
    #[must_use]
    pub fn team_id(&self) -> TeamId {
        self.team_id
    }
}

impl Drop for MergeGuard {
    fn drop(&mut self) {
        self.held
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.team_id);
    }
}
