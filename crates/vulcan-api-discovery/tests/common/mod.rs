//! Integration test helpers for vulcan-api-discovery.

#![allow(dead_code)]

use std::sync::{Arc, Once};
use vulcan_api_discovery::{DiscoveryState, MemoryStore};
use vulcan_core::TeamId;

static INIT: Once = Once::new();

/// Initialize logging for tests (once).
pub fn init_test_logging() {
    INIT.call_once(|| {
        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::fmt()
                .with_test_writer()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .try_init()
                .ok();
        }
    });
}

/// A memory store seeded with one team, plus router state over it.
pub async fn create_test_state() -> (DiscoveryState, Arc<MemoryStore>, TeamId) {
    init_test_logging();
    let store = Arc::new(MemoryStore::new());
    let team_id = TeamId::new();
    store.add_team(team_id).await;
    let state = DiscoveryState::new(store.clone());
    (state, store, team_id)
}

/// JSON body of a discovery request.
pub fn discovery_body(group_name: &str, identifiers: &[&str]) -> String {
    let assets: Vec<serde_json::Value> = identifiers
        .iter()
        .map(|id| serde_json::json!({ "identifier": id, "type": "IP" }))
        .collect();
    serde_json::json!({ "group_name": group_name, "assets": assets }).to_string()
}
