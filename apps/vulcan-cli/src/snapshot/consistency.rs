//! Inventory consistency diagnostics.
//!
//! - Orphan: inventory asset that belongs to no group
//! - Foreign: group member missing from the inventory
//! - Duplicate: two or more assets with the same `(target, type)` and
//!   distinct IDs

use serde::Serialize;
use std::collections::BTreeMap;
use vulcan_core::AssetId;

use super::model::{Asset, AssetKey, Team};

/// A group member that is not in the inventory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForeignAsset {
    pub group: String,
    pub asset: Asset,
}

/// Assets sharing one `(target, type)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateAssets {
    pub key: AssetKey,
    pub ids: Vec<AssetId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConsistencyReport {
    pub orphans: Vec<Asset>,
    pub foreign: Vec<ForeignAsset>,
    pub duplicates: Vec<DuplicateAssets>,
}

impl ConsistencyReport {
    pub fn is_clean(&self) -> bool {
        self.orphans.is_empty() && self.foreign.is_empty() && self.duplicates.is_empty()
    }
}

/// Two references denote the same asset when their IDs match, or, when
/// either side has no ID yet, when target and type match.
fn same_asset(a: &Asset, b: &Asset) -> bool {
    match (a.id, b.id) {
        (Some(x), Some(y)) => x == y,
        _ => a.target == b.target && a.asset_type == b.asset_type,
    }
}

pub fn classify(team: &Team) -> ConsistencyReport {
    let mut report = ConsistencyReport::default();

    for asset in &team.assets {
        let grouped = team
            .groups
            .iter()
            .any(|g| g.assets.iter().any(|member| same_asset(member, asset)));
        if !grouped {
            report.orphans.push(asset.clone());
        }
    }

    for group in &team.groups {
        for member in &group.assets {
            if !team.assets.iter().any(|asset| same_asset(asset, member)) {
                report.foreign.push(ForeignAsset {
                    group: group.name.clone(),
                    asset: member.clone(),
                });
            }
        }
    }

    let mut by_key: BTreeMap<AssetKey, Vec<AssetId>> = BTreeMap::new();
    for asset in &team.assets {
        if let (Some(key), Some(id)) = (asset.key(), asset.id) {
            let ids = by_key.entry(key).or_default();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    report.duplicates = by_key
        .into_iter()
        .filter(|(_, ids)| ids.len() > 1)
        .map(|(key, ids)| DuplicateAssets { key, ids })
        .collect();

    tracing::debug!(
        team = %team.name,
        orphans = report.orphans.len(),
        foreign = report.foreign.len(),
        duplicates = report.duplicates.len(),
        "Classified inventory"
    );
    report
}
