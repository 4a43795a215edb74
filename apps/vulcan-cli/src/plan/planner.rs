//! Diff planner.
//!
//! Compares a local (desired) snapshot against the remote (actual) one and
//! emits the operations that converge them. Planning never mutates
//! anything; the only I/O is asset type resolution and validation through
//! the [`AssetResolver`].

use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use vulcan_core::{
    AssetId, AssetResolver, AssetType, Rolfp, VulcanError, DEFAULT_GROUP, DISCOVERY_GROUP_SUFFIX,
};

use super::operation::{AssetRef, GroupRef, Operation, Plan};
use crate::error::{CliError, CliResult};
use crate::snapshot::{classify, Asset, AssetKey, Team};

/// Whether the CLI reconciles a group's existence and membership. `Default`
/// is owned by the platform and discovery groups by their integration.
pub fn is_managed_group(name: &str) -> bool {
    name != DEFAULT_GROUP && !name.ends_with(DISCOVERY_GROUP_SUFFIX)
}

/// Compute the operations that make `remote` look like `local`.
pub async fn plan(local: &Team, remote: &Team, resolver: &AssetResolver) -> CliResult<Plan> {
    let team_id = remote_id(remote.id, "team", &remote.name)?;
    if let Some(local_id) = local.id {
        if local_id != team_id {
            return Err(identity_conflict("team", &local.name, local_id, team_id));
        }
    }

    let mut plan = Plan::new(team_id, remote.name.clone());

    if local.info != remote.info {
        plan.push(Operation::UpdateTeamInfo {
            info: local.info.clone(),
        });
    }
    if local.recipients != remote.recipients {
        plan.push(Operation::UpdateRecipients {
            emails: local.recipients.clone(),
        });
    }

    plan_members(local, remote, &mut plan)?;
    plan_groups(local, remote, &mut plan)?;
    AssetPlanner::new(remote, resolver)
        .plan(local, &mut plan)
        .await?;
    plan_programs(local, remote, &mut plan)?;

    tracing::info!(
        team = %plan.team_name,
        operations = plan.len(),
        warnings = plan.warnings.len(),
        "Computed plan"
    );
    Ok(plan)
}

/// Delete every remote asset that belongs to no group.
pub fn plan_prune(remote: &Team) -> CliResult<Plan> {
    let team_id = remote_id(remote.id, "team", &remote.name)?;
    let mut plan = Plan::new(team_id, remote.name.clone());
    for orphan in classify(remote).orphans {
        let id = remote_id(orphan.id, "asset", &orphan.target)?;
        plan.push(Operation::DeleteAsset {
            id,
            target: orphan.target,
        });
    }
    Ok(plan)
}

fn plan_members(local: &Team, remote: &Team, plan: &mut Plan) -> CliResult<()> {
    for member in &local.members {
        match remote.find_member_by_email(&member.email) {
            Some(current) => {
                let id = remote_id(current.id, "member", &current.email)?;
                if let Some(local_id) = member.id {
                    if local_id != id {
                        return Err(identity_conflict("member", &member.email, local_id, id));
                    }
                }
                if current.role != member.role {
                    plan.push(Operation::UpdateMember {
                        id,
                        email: member.email.clone(),
                        role: member.role,
                    });
                }
            }
            None => plan.push(Operation::CreateMember {
                email: member.email.clone(),
                role: member.role,
            }),
        }
    }

    for current in &remote.members {
        if local.find_member_by_email(&current.email).is_none() {
            plan.push(Operation::DeleteMember {
                id: remote_id(current.id, "member", &current.email)?,
                email: current.email.clone(),
            });
        }
    }
    Ok(())
}

fn plan_groups(local: &Team, remote: &Team, plan: &mut Plan) -> CliResult<()> {
    for group in &local.groups {
        let existing = remote.find_group_by_name(&group.name);
        if !is_managed_group(&group.name) {
            if existing.is_none() && group.name != DEFAULT_GROUP {
                plan.warn(format!(
                    "group '{}' is owned by a discovery integration and is not created here",
                    group.name
                ));
            }
            continue;
        }
        match existing {
            Some(current) => {
                let id = remote_id(current.id, "group", &current.name)?;
                if let Some(local_id) = group.id {
                    if local_id != id {
                        return Err(identity_conflict("group", &group.name, local_id, id));
                    }
                }
            }
            None => plan.push(Operation::CreateGroup {
                name: group.name.clone(),
            }),
        }
    }
    Ok(())
}

fn plan_programs(local: &Team, remote: &Team, plan: &mut Plan) -> CliResult<()> {
    for program in &local.programs {
        match program.id.and_then(|id| remote.find_program_by_id(id)) {
            Some(current) => {
                if current.cron != program.cron {
                    plan.push(Operation::UpdateProgram {
                        id: remote_id(current.id, "program", &current.name)?,
                        name: current.name.clone(),
                        cron: program.cron.clone(),
                    });
                }
            }
            None => plan.warn(format!(
                "program '{}' has no remote match: program creation is not supported",
                program.name
            )),
        }
    }
    Ok(())
}

/// Local identity of an asset line, used to resolve each line only once.
type LocalAssetKey = (String, Option<AssetType>, Option<AssetId>);

struct AssetPlanner<'a> {
    remote: &'a Team,
    resolver: &'a AssetResolver,
    resolved: HashMap<LocalAssetKey, Vec<AssetRef>>,
    created: HashSet<AssetKey>,
    updated: HashSet<AssetId>,
}

impl<'a> AssetPlanner<'a> {
    fn new(remote: &'a Team, resolver: &'a AssetResolver) -> Self {
        Self {
            remote,
            resolver,
            resolved: HashMap::new(),
            created: HashSet::new(),
            updated: HashSet::new(),
        }
    }

    async fn plan(mut self, local: &Team, plan: &mut Plan) -> CliResult<()> {
        let remote = self.remote;
        for asset in &local.assets {
            self.refs_for(asset, plan).await?;
        }

        for group in local.groups.iter().filter(|g| is_managed_group(&g.name)) {
            let current = remote.find_group_by_name(&group.name);
            let group_ref = match current {
                Some(g) => GroupRef::Existing(remote_id(g.id, "group", &g.name)?),
                None => GroupRef::Pending(group.name.clone()),
            };

            let mut desired: Vec<(AssetRef, String)> = Vec::new();
            for member in &group.assets {
                for asset_ref in self.refs_for(member, plan).await? {
                    if !desired.iter().any(|(r, _)| *r == asset_ref) {
                        let target = self.target_of(&asset_ref, member);
                        desired.push((asset_ref, target));
                    }
                }
            }

            for (asset_ref, target) in &desired {
                let present = match (current, asset_ref) {
                    (Some(g), AssetRef::Existing(id)) => g.contains_asset(*id),
                    _ => false,
                };
                if !present {
                    plan.push(Operation::AssociateAsset {
                        group_name: group.name.clone(),
                        group: group_ref.clone(),
                        target: target.clone(),
                        asset: asset_ref.clone(),
                    });
                }
            }

            if let (Some(g), GroupRef::Existing(group_id)) = (current, &group_ref) {
                for member in &g.assets {
                    let Some(id) = member.id else { continue };
                    if !desired.iter().any(|(r, _)| *r == AssetRef::Existing(id)) {
                        plan.push(Operation::DeassociateAsset {
                            group_name: group.name.clone(),
                            group: *group_id,
                            target: member.target.clone(),
                            asset: id,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Remote references a local asset line stands for. Lines that cannot be
    /// created are skipped with a warning and yield no reference.
    async fn refs_for(&mut self, asset: &Asset, plan: &mut Plan) -> CliResult<Vec<AssetRef>> {
        let cache_key = (asset.target.clone(), asset.asset_type, asset.id);
        if let Some(refs) = self.resolved.get(&cache_key) {
            return Ok(refs.clone());
        }

        let refs = match (asset.id, asset.asset_type) {
            (Some(id), _) => vec![self.existing(asset, id, plan)?],
            (None, Some(asset_type)) => {
                let key = AssetKey::new(asset.target.as_str(), asset_type);
                self.bind_or_create(key, asset.rolfp, &asset.alias, plan)
                    .await?
                    .into_iter()
                    .collect()
            }
            (None, None) => match self.resolver.resolve(&asset.target).await {
                Ok(candidates) => {
                    let mut refs = Vec::new();
                    for candidate in candidates {
                        let key = AssetKey::new(candidate.identifier, candidate.asset_type);
                        if let Some(r) = self
                            .bind_or_create(key, asset.rolfp, &asset.alias, plan)
                            .await?
                        {
                            refs.push(r);
                        }
                    }
                    refs
                }
                Err(e) => {
                    plan.warn(format!("skipping asset '{}': {}", asset.target, e));
                    Vec::new()
                }
            },
        };

        self.resolved.insert(cache_key, refs.clone());
        Ok(refs)
    }

    /// An asset that already carries an ID: it must exist remotely under the
    /// same target and type; only ROLFP and alias may change.
    fn existing(&mut self, asset: &Asset, id: AssetId, plan: &mut Plan) -> CliResult<AssetRef> {
        let remote = self.remote;
        let current = remote.find_asset_by_id(id).ok_or_else(|| {
            CliError::Validation(format!(
                "asset '{}' has id {} which does not exist remotely; remove the id to create it",
                asset.target, id
            ))
        })?;

        let type_changed = asset.asset_type.is_some() && asset.asset_type != current.asset_type;
        if current.target != asset.target || type_changed {
            return Err(CliError::Validation(format!(
                "asset {} cannot change from '{}' to '{}': target and type are immutable",
                id, current.target, asset.target
            )));
        }

        if (current.rolfp != asset.rolfp || current.alias != asset.alias) && self.updated.insert(id)
        {
            plan.push(Operation::UpdateAsset {
                id,
                target: asset.target.clone(),
                rolfp: asset.rolfp,
                alias: asset.alias.clone(),
            });
        }
        Ok(AssetRef::Existing(id))
    }

    /// A new asset: bind it to the remote asset with the same `(target,
    /// type)` or plan its creation after validating it.
    async fn bind_or_create(
        &mut self,
        key: AssetKey,
        rolfp: Rolfp,
        alias: &str,
        plan: &mut Plan,
    ) -> CliResult<Option<AssetRef>> {
        let remote = self.remote;
        if let Some(current) = remote.find_asset_by_key(&key.target, key.asset_type) {
            let id = remote_id(current.id, "asset", &current.target)?;
            // Unset local values never override the remote ones.
            let rolfp_changed = !rolfp.is_empty() && rolfp != current.rolfp;
            let alias_changed = !alias.is_empty() && alias != current.alias;
            if (rolfp_changed || alias_changed) && self.updated.insert(id) {
                plan.push(Operation::UpdateAsset {
                    id,
                    target: key.target.clone(),
                    rolfp: if rolfp.is_empty() { current.rolfp } else { rolfp },
                    alias: if alias.is_empty() {
                        current.alias.clone()
                    } else {
                        alias.to_string()
                    },
                });
            }
            return Ok(Some(AssetRef::Existing(id)));
        }

        if let Err(e) = self.resolver.validate(&key.target, key.asset_type).await {
            plan.warn(format!("skipping asset {key}: {e}"));
            return Ok(None);
        }

        if self.created.insert(key.clone()) {
            let alias = self
                .resolver
                .resolve_alias(&key.target, key.asset_type, alias)
                .await;
            plan.push(Operation::CreateAsset {
                key: key.clone(),
                rolfp,
                alias,
            });
        }
        Ok(Some(AssetRef::Pending(key)))
    }

    fn target_of(&self, asset_ref: &AssetRef, line: &Asset) -> String {
        match asset_ref {
            AssetRef::Pending(key) => key.target.clone(),
            AssetRef::Existing(id) => self
                .remote
                .find_asset_by_id(*id)
                .map(|a| a.target.clone())
                .unwrap_or_else(|| line.target.clone()),
        }
    }
}

fn remote_id<T>(id: Option<T>, entity: &str, key: &str) -> CliResult<T> {
    id.ok_or_else(|| {
        CliError::Validation(format!("remote {entity} '{key}' has no id"))
    })
}

fn identity_conflict(entity: &str, key: &str, local: impl Display, remote: impl Display) -> CliError {
    VulcanError::IdentityConflict {
        entity: entity.to_string(),
        key: key.to_string(),
        local: local.to_string(),
        remote: remote.to_string(),
    }
    .into()
}
