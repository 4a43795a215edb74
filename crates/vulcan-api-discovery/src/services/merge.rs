//! Discovery merge planning.
//!
//! Compares the assets declared by a discovery integration with the team
//! inventory and the current members of the target group, producing the
//! [`AssetMergeOperations`] that converge the group to the declared list.

use std::collections::{BTreeMap, HashMap, HashSet};
use vulcan_core::{AssetId, AssetType, GroupId, Rolfp, TeamId, DISCOVERY_GROUP_SUFFIX};

use crate::error::DiscoveryError;
use crate::models::{DiscoveredAsset, DiscoveryRequest};
use crate::store::{AssetMergeOperations, DiscoveryStore, MergeGroup, StoredAsset};

/// Root of the annotation namespace owned by discovery integrations.
const ANNOTATION_ROOT: &str = "autodiscovery";

/// Reject group names that could collide with manually managed groups.
pub fn validate_group_name(name: &str) -> Result<(), DiscoveryError> {
    match name.strip_suffix(DISCOVERY_GROUP_SUFFIX) {
        Some(base) if !base.is_empty() => Ok(()),
        _ => Err(DiscoveryError::InvalidGroupName(format!(
            "'{name}' must be a non-empty name ending with '{DISCOVERY_GROUP_SUFFIX}'"
        ))),
    }
}

/// Annotation key prefix owned by the discovery group `group_name`.
#[must_use]
pub fn annotation_prefix(group_name: &str) -> String {
    let base = group_name
        .strip_suffix(DISCOVERY_GROUP_SUFFIX)
        .unwrap_or(group_name);
    format!("{ANNOTATION_ROOT}/{base}/")
}

/// Coalesce identical entries; conflicting entries for the same asset abort.
pub fn dedupe(assets: &[DiscoveredAsset]) -> Result<Vec<&DiscoveredAsset>, DiscoveryError> {
    let mut seen: HashMap<(&str, AssetType), &DiscoveredAsset> = HashMap::new();
    let mut unique = Vec::with_capacity(assets.len());
    for asset in assets {
        let key = (asset.identifier.as_str(), asset.asset_type);
        match seen.get(&key) {
            Some(first) if *first == asset => {}
            Some(_) => {
                return Err(DiscoveryError::ConflictingDuplicate(format!(
                    "{} ({}) is declared more than once with different attributes",
                    asset.identifier, asset.asset_type
                )));
            }
            None => {
                seen.insert(key, asset);
                unique.push(asset);
            }
        }
    }
    Ok(unique)
}

fn validate_asset(asset: &DiscoveredAsset) -> Result<(), DiscoveryError> {
    if asset.identifier.trim().is_empty() {
        return Err(DiscoveryError::Validation(
            "asset identifier must not be empty".to_string(),
        ));
    }
    if !asset.asset_type.matches_format(&asset.identifier) {
        return Err(DiscoveryError::Validation(format!(
            "'{}' is not a valid {}",
            asset.identifier, asset.asset_type
        )));
    }
    Ok(())
}

fn namespaced(prefix: &str, annotations: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    annotations
        .iter()
        .map(|(k, v)| (format!("{prefix}{k}"), v.clone()))
        .collect()
}

fn owned_annotations<'a>(
    prefix: &str,
    annotations: &'a BTreeMap<String, String>,
) -> BTreeMap<&'a String, &'a String> {
    annotations
        .iter()
        .filter(|(k, _)| k.starts_with(prefix))
        .collect()
}

/// The updated asset when `scannable` or the group's annotations changed.
fn updated_asset(
    existing: &StoredAsset,
    declared: &DiscoveredAsset,
    prefix: &str,
    incoming: &BTreeMap<String, String>,
) -> Option<StoredAsset> {
    let current = owned_annotations(prefix, &existing.annotations);
    let wanted: BTreeMap<&String, &String> = incoming.iter().collect();
    if existing.scannable == declared.scannable && current == wanted {
        return None;
    }

    let mut updated = existing.clone();
    updated.scannable = declared.scannable;
    updated.annotations.retain(|k, _| !k.starts_with(prefix));
    updated
        .annotations
        .extend(incoming.iter().map(|(k, v)| (k.clone(), v.clone())));
    Some(updated)
}

/// Compute the merge of `request` into the team's inventory.
///
/// Nothing is mutated; the caller applies the result through
/// [`DiscoveryStore::apply_merge`].
pub async fn plan_merge(
    store: &dyn DiscoveryStore,
    team_id: TeamId,
    request: &DiscoveryRequest,
) -> Result<AssetMergeOperations, DiscoveryError> {
    validate_group_name(&request.group_name)?;
    let declared = dedupe(&request.assets)?;
    for asset in &declared {
        validate_asset(asset)?;
    }
    let prefix = annotation_prefix(&request.group_name);

    let group = match store.find_group_by_name(team_id, &request.group_name).await? {
        Some(g) => MergeGroup {
            id: g.id,
            name: g.name,
            exists: true,
        },
        None => MergeGroup {
            id: GroupId::new(),
            name: request.group_name.clone(),
            exists: false,
        },
    };

    let inventory = store.list_assets(team_id).await?;
    let mut by_key: HashMap<(&str, AssetType), &StoredAsset> = HashMap::new();
    for asset in &inventory {
        by_key
            .entry((asset.identifier.as_str(), asset.asset_type))
            .or_insert(asset);
    }

    let group_assets = if group.exists {
        store.list_group_assets(team_id, group.id).await?
    } else {
        Vec::new()
    };
    let in_group: HashSet<AssetId> = group_assets.iter().map(|a| a.id).collect();

    let mut ops = AssetMergeOperations::new(team_id, group);
    let mut declared_ids = HashSet::new();

    for asset in declared {
        let annotations = namespaced(&prefix, &asset.annotations);
        match by_key.get(&(asset.identifier.as_str(), asset.asset_type)) {
            None => {
                let created = StoredAsset {
                    id: AssetId::new(),
                    team_id,
                    identifier: asset.identifier.clone(),
                    asset_type: asset.asset_type,
                    rolfp: asset
                        .rolfp
                        .unwrap_or(Rolfp::Vector(Rolfp::DEFAULT_VECTOR)),
                    alias: asset.alias.clone().unwrap_or_default(),
                    scannable: asset.scannable,
                    annotations,
                };
                ops.assoc.push(created.id);
                ops.create.push(created);
            }
            Some(existing) => {
                declared_ids.insert(existing.id);
                if !in_group.contains(&existing.id) {
                    ops.assoc.push(existing.id);
                }
                if let Some(updated) = updated_asset(existing, asset, &prefix, &annotations) {
                    ops.update.push(updated);
                }
            }
        }
    }

    for asset in &group_assets {
        if declared_ids.contains(&asset.id) {
            continue;
        }
        let groups = store.asset_groups(team_id, asset.id).await?;
        if groups.iter().any(|g| *g != ops.group.id) {
            ops.deassoc.push(asset.id);
        } else {
            ops.del.push(asset.id);
        }
    }

    tracing::debug!(
        team_id = %team_id,
        group = %ops.group.name,
        create = ops.create.len(),
        assoc = ops.assoc.len(),
        update = ops.update.len(),
        deassoc = ops.deassoc.len(),
        del = ops.del.len(),
        "Planned discovery merge"
    );

    Ok(ops)
}
