//! Planned mutations of the remote state.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::{Display, Formatter};
use vulcan_core::{AssetId, GroupId, MemberId, ProgramId, Rolfp, TeamId};

use crate::api::Remote;
use crate::error::{CliError, CliResult};
use crate::snapshot::{AssetKey, Role, TeamInfo};

/// Execution stages, in the order the executor runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    TeamInfo,
    Recipients,
    CreateMembers,
    DeleteMembers,
    UpdateMembers,
    CreateGroups,
    CreateAssets,
    AssociateAssets,
    DeassociateAssets,
    DeleteAssets,
    UpdateAssets,
    UpdatePrograms,
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::TeamInfo => "team info",
            Stage::Recipients => "recipients",
            Stage::CreateMembers => "create members",
            Stage::DeleteMembers => "delete members",
            Stage::UpdateMembers => "update members",
            Stage::CreateGroups => "create groups",
            Stage::CreateAssets => "create assets",
            Stage::AssociateAssets => "associate assets",
            Stage::DeassociateAssets => "deassociate assets",
            Stage::DeleteAssets => "delete assets",
            Stage::UpdateAssets => "update assets",
            Stage::UpdatePrograms => "update programs",
        };
        f.write_str(name)
    }
}

/// Kind of change an operation makes, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanAction {
    Create,
    Update,
    Delete,
    Associate,
    Deassociate,
}

impl PlanAction {
    /// Returns the symbol for this action
    pub fn symbol(&self) -> &'static str {
        match self {
            PlanAction::Create => "+",
            PlanAction::Update => "~",
            PlanAction::Delete => "-",
            PlanAction::Associate => ">",
            PlanAction::Deassociate => "<",
        }
    }

    /// Returns the display name for this action
    pub fn display(&self) -> &'static str {
        match self {
            PlanAction::Create => "Create",
            PlanAction::Update => "Update",
            PlanAction::Delete => "Delete",
            PlanAction::Associate => "Associate",
            PlanAction::Deassociate => "Deassociate",
        }
    }

    /// Returns the color code for this action
    pub fn color(&self) -> &'static str {
        match self {
            PlanAction::Create => "\x1b[32m",      // Green
            PlanAction::Update => "\x1b[33m",      // Yellow
            PlanAction::Delete => "\x1b[31m",      // Red
            PlanAction::Associate => "\x1b[36m",   // Cyan
            PlanAction::Deassociate => "\x1b[35m", // Magenta
        }
    }
}

/// A group that exists remotely, or one created earlier in the same run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum GroupRef {
    Existing(GroupId),
    Pending(String),
}

/// An asset that exists remotely, or one created earlier in the same run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AssetRef {
    Existing(AssetId),
    Pending(AssetKey),
}

/// IDs assigned by the remote while a plan runs. Create operations record
/// them; later stages resolve `Pending` references through them.
#[derive(Debug, Default)]
pub struct Bindings {
    groups: HashMap<String, GroupId>,
    assets: HashMap<AssetKey, AssetId>,
}

impl Bindings {
    pub fn group(&self, group: &GroupRef) -> CliResult<GroupId> {
        match group {
            GroupRef::Existing(id) => Ok(*id),
            GroupRef::Pending(name) => self.groups.get(name).copied().ok_or_else(|| {
                CliError::NotFound(format!("group '{name}' was not created by this run"))
            }),
        }
    }

    pub fn asset(&self, asset: &AssetRef) -> CliResult<AssetId> {
        match asset {
            AssetRef::Existing(id) => Ok(*id),
            AssetRef::Pending(key) => self.assets.get(key).copied().ok_or_else(|| {
                CliError::NotFound(format!("asset {key} was not created by this run"))
            }),
        }
    }
}

/// One remote mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    UpdateTeamInfo {
        info: TeamInfo,
    },
    UpdateRecipients {
        emails: BTreeSet<String>,
    },
    CreateMember {
        email: String,
        role: Role,
    },
    DeleteMember {
        id: MemberId,
        email: String,
    },
    UpdateMember {
        id: MemberId,
        email: String,
        role: Role,
    },
    CreateGroup {
        name: String,
    },
    CreateAsset {
        key: AssetKey,
        rolfp: Rolfp,
        alias: String,
    },
    AssociateAsset {
        group_name: String,
        group: GroupRef,
        target: String,
        asset: AssetRef,
    },
    DeassociateAsset {
        group_name: String,
        group: GroupId,
        target: String,
        asset: AssetId,
    },
    DeleteAsset {
        id: AssetId,
        target: String,
    },
    UpdateAsset {
        id: AssetId,
        target: String,
        rolfp: Rolfp,
        alias: String,
    },
    UpdateProgram {
        id: ProgramId,
        name: String,
        cron: String,
    },
}

impl Operation {
    pub fn stage(&self) -> Stage {
        match self {
            Operation::UpdateTeamInfo { .. } => Stage::TeamInfo,
            Operation::UpdateRecipients { .. } => Stage::Recipients,
            Operation::CreateMember { .. } => Stage::CreateMembers,
            Operation::DeleteMember { .. } => Stage::DeleteMembers,
            Operation::UpdateMember { .. } => Stage::UpdateMembers,
            Operation::CreateGroup { .. } => Stage::CreateGroups,
            Operation::CreateAsset { .. } => Stage::CreateAssets,
            Operation::AssociateAsset { .. } => Stage::AssociateAssets,
            Operation::DeassociateAsset { .. } => Stage::DeassociateAssets,
            Operation::DeleteAsset { .. } => Stage::DeleteAssets,
            Operation::UpdateAsset { .. } => Stage::UpdateAssets,
            Operation::UpdateProgram { .. } => Stage::UpdatePrograms,
        }
    }

    pub fn action(&self) -> PlanAction {
        match self {
            Operation::CreateMember { .. }
            | Operation::CreateGroup { .. }
            | Operation::CreateAsset { .. } => PlanAction::Create,
            Operation::DeleteMember { .. } | Operation::DeleteAsset { .. } => PlanAction::Delete,
            Operation::AssociateAsset { .. } => PlanAction::Associate,
            Operation::DeassociateAsset { .. } => PlanAction::Deassociate,
            Operation::UpdateTeamInfo { .. }
            | Operation::UpdateRecipients { .. }
            | Operation::UpdateMember { .. }
            | Operation::UpdateAsset { .. }
            | Operation::UpdateProgram { .. } => PlanAction::Update,
        }
    }

    /// Human-readable one-liner.
    pub fn describe(&self) -> String {
        match self {
            Operation::UpdateTeamInfo { info } => format!(
                "team info: description '{}', tag '{}'",
                info.description, info.tag
            ),
            Operation::UpdateRecipients { emails } => format!(
                "recipients: [{}]",
                emails.iter().cloned().collect::<Vec<_>>().join(", ")
            ),
            Operation::CreateMember { email, role } => format!("member {email} as {role}"),
            Operation::DeleteMember { email, .. } => format!("member {email}"),
            Operation::UpdateMember { email, role, .. } => format!("member {email} role to {role}"),
            Operation::CreateGroup { name } => format!("group '{name}'"),
            Operation::CreateAsset { key, rolfp, alias } => {
                let mut text = format!("asset {key}");
                if !rolfp.is_empty() {
                    text.push_str(&format!(" rolfp {rolfp}"));
                }
                if !alias.is_empty() {
                    text.push_str(&format!(" alias '{alias}'"));
                }
                text
            }
            Operation::AssociateAsset {
                group_name, target, ..
            } => format!("asset {target} to group '{group_name}'"),
            Operation::DeassociateAsset {
                group_name, target, ..
            } => format!("asset {target} from group '{group_name}'"),
            Operation::DeleteAsset { id, target } => format!("asset {target} ({id})"),
            Operation::UpdateAsset {
                target,
                rolfp,
                alias,
                ..
            } => format!("asset {target}: rolfp '{rolfp}', alias '{alias}'"),
            Operation::UpdateProgram { name, cron, .. } => {
                format!("program '{name}' schedule to '{cron}'")
            }
        }
    }

    /// Perform the mutation against `remote`.
    pub async fn apply(
        &self,
        remote: &dyn Remote,
        team_id: TeamId,
        bindings: &mut Bindings,
    ) -> CliResult<()> {
        match self {
            Operation::UpdateTeamInfo { info } => remote.update_team_info(team_id, info).await,
            Operation::UpdateRecipients { emails } => {
                remote.update_recipients(team_id, emails).await
            }
            Operation::CreateMember { email, role } => {
                remote.create_member(team_id, email, *role).await.map(|_| ())
            }
            Operation::DeleteMember { id, .. } => remote.delete_member(team_id, *id).await,
            Operation::UpdateMember { id, role, .. } => {
                remote.update_member(team_id, *id, *role).await
            }
            Operation::CreateGroup { name } => {
                let id = remote.create_group(team_id, name).await?;
                bindings.groups.insert(name.clone(), id);
                Ok(())
            }
            Operation::CreateAsset { key, rolfp, alias } => {
                let id = remote.create_asset(team_id, key, *rolfp, alias).await?;
                bindings.assets.insert(key.clone(), id);
                Ok(())
            }
            Operation::AssociateAsset { group, asset, .. } => {
                let group_id = bindings.group(group)?;
                let asset_id = bindings.asset(asset)?;
                remote.associate_asset(team_id, group_id, asset_id).await
            }
            Operation::DeassociateAsset { group, asset, .. } => {
                remote.deassociate_asset(team_id, *group, *asset).await
            }
            Operation::DeleteAsset { id, .. } => remote.delete_asset(team_id, *id).await,
            Operation::UpdateAsset {
                id, rolfp, alias, ..
            } => remote.update_asset(team_id, *id, *rolfp, alias).await,
            Operation::UpdateProgram { id, cron, .. } => {
                remote.update_program(team_id, *id, cron).await
            }
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.action().display(), self.describe())
    }
}

/// Operations bucketed by stage, plus the non-fatal findings of planning.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub team_id: TeamId,
    pub team_name: String,
    pub stages: BTreeMap<Stage, Vec<Operation>>,
    pub warnings: Vec<String>,
}

/// Per-action operation counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub create: usize,
    pub update: usize,
    pub delete: usize,
    pub associate: usize,
    pub deassociate: usize,
}

impl Plan {
    pub fn new(team_id: TeamId, team_name: impl Into<String>) -> Self {
        Self {
            team_id,
            team_name: team_name.into(),
            stages: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }

    /// Append to the operation's stage, keeping emission order.
    pub fn push(&mut self, operation: Operation) {
        self.stages
            .entry(operation.stage())
            .or_default()
            .push(operation);
    }

    pub fn warn(&mut self, warning: impl Into<String>) {
        let warning = warning.into();
        tracing::warn!(team = %self.team_name, "{}", warning);
        self.warnings.push(warning);
    }

    /// Every operation in execution order.
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.stages.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.stages.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn summary(&self) -> PlanSummary {
        let mut summary = PlanSummary::default();
        for operation in self.operations() {
            match operation.action() {
                PlanAction::Create => summary.create += 1,
                PlanAction::Update => summary.update += 1,
                PlanAction::Delete => summary.delete += 1,
                PlanAction::Associate => summary.associate += 1,
                PlanAction::Deassociate => summary.deassociate += 1,
            }
        }
        summary
    }
}
