//! Natural-key lookups used to pair local and remote entities.
//!
//! All matches are exact and case-sensitive.

use vulcan_core::{AssetId, AssetType, ProgramId};

use super::model::{Asset, Group, Member, Policy, Program, Team};

impl Team {
    pub fn find_member_by_email(&self, email: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.email == email)
    }

    pub fn find_group_by_name(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn find_asset_by_id(&self, id: AssetId) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == Some(id))
    }

    pub fn find_asset_by_key(&self, target: &str, asset_type: AssetType) -> Option<&Asset> {
        self.assets
            .iter()
            .find(|a| a.target == target && a.asset_type == Some(asset_type))
    }

    pub fn find_program_by_id(&self, id: ProgramId) -> Option<&Program> {
        self.programs.iter().find(|p| p.id == Some(id))
    }

    pub fn find_policy_by_name(&self, name: &str) -> Option<&Policy> {
        self.policies.iter().find(|p| p.name == name)
    }
}

impl Group {
    /// Whether the group references the asset with `id`.
    pub fn contains_asset(&self, id: AssetId) -> bool {
        self.assets.iter().any(|a| a.id == Some(id))
    }
}
