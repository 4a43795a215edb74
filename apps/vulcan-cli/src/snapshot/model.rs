//! Team aggregate.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use vulcan_core::{
    AssetId, AssetType, GroupId, MemberId, PolicyId, ProgramId, Rolfp, SettingId, TeamId,
    VulcanError,
};

/// A team and everything it owns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Team {
    /// Remote ID; unknown until the team has been pulled once.
    pub id: Option<TeamId>,
    pub name: String,
    pub info: TeamInfo,
    /// Emails receiving the team's reports.
    pub recipients: BTreeSet<String>,
    pub members: Vec<Member>,
    pub groups: Vec<Group>,
    /// Flat inventory of every asset the team owns.
    pub assets: Vec<Asset>,
    pub policies: Vec<Policy>,
    pub programs: Vec<Program>,
}

impl Team {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Order every collection canonically so that two snapshots of the same
    /// remote state serialize identically.
    pub fn sort(&mut self) {
        self.members.sort_by(|a, b| a.email.cmp(&b.email));
        self.groups.sort_by(|a, b| a.name.cmp(&b.name));
        for group in &mut self.groups {
            group.assets.sort_by(Asset::canonical_cmp);
        }
        self.assets.sort_by(Asset::canonical_cmp);
        self.policies.sort_by(|a, b| a.name.cmp(&b.name));
        self.programs.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeamInfo {
    pub description: String,
    pub tag: String,
}

/// Membership role within a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Member => "member",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = VulcanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Role::Owner),
            "member" => Ok(Role::Member),
            other => Err(VulcanError::validation(
                "role",
                format!("unknown role '{other}', expected 'owner' or 'member'"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub id: Option<MemberId>,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub id: Option<GroupId>,
    pub name: String,
    pub assets: Vec<Asset>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            assets: Vec::new(),
        }
    }
}

/// Declared identity of an asset before the remote assigns it an ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AssetKey {
    pub target: String,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
}

impl AssetKey {
    pub fn new(target: impl Into<String>, asset_type: AssetType) -> Self {
        Self {
            target: target.into(),
            asset_type,
        }
    }
}

impl Display for AssetKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.target, self.asset_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Asset {
    pub id: Option<AssetId>,
    pub target: String,
    /// `None` asks the planner to detect the type from the target.
    #[serde(rename = "type")]
    pub asset_type: Option<AssetType>,
    pub rolfp: Rolfp,
    pub alias: String,
}

impl Asset {
    pub fn new(target: impl Into<String>, asset_type: Option<AssetType>) -> Self {
        Self {
            id: None,
            target: target.into(),
            asset_type,
            rolfp: Rolfp::Empty,
            alias: String::new(),
        }
    }

    /// `(target, type)` when the type is known.
    pub fn key(&self) -> Option<AssetKey> {
        self.asset_type
            .map(|asset_type| AssetKey::new(self.target.as_str(), asset_type))
    }

    fn canonical_cmp(a: &Asset, b: &Asset) -> std::cmp::Ordering {
        a.target
            .cmp(&b.target)
            .then(a.asset_type.cmp(&b.asset_type))
            .then(a.id.cmp(&b.id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Policy {
    pub id: Option<PolicyId>,
    pub name: String,
    pub description: String,
    pub settings: Vec<PolicySetting>,
}

/// One check enabled by a policy. `options` is kept as raw JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicySetting {
    pub id: Option<SettingId>,
    pub check_type: String,
    pub options: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Program {
    pub id: Option<ProgramId>,
    pub name: String,
    pub cron: String,
    pub disabled: bool,
}
