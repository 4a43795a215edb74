//! The remote side of a reconciliation.
//!
//! [`Remote`] speaks in snapshot types so the planner, the executor and the
//! fetcher never see wire DTOs. [`ApiClient`] is the production
//! implementation; tests use an in-memory fake.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeSet;
use vulcan_core::{AssetId, GroupId, MemberId, ProgramId, Rolfp, TeamId};

use super::models::{
    AssetResponse, CreateAssetRequest, CreateGroupRequest, CreateMemberRequest, RecipientsBody,
    UpdateAssetRequest, UpdateMemberRequest, UpdateProgramRequest, UpdateTeamRequest,
};
use super::ApiClient;
use crate::error::CliResult;
use crate::snapshot::{Asset, AssetKey, Member, Policy, PolicySetting, Program, Role, TeamInfo};

/// Team identity and info as listed by the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamSummary {
    pub id: TeamId,
    pub name: String,
    pub info: TeamInfo,
}

/// Group identity without its members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    pub id: GroupId,
    pub name: String,
}

#[async_trait]
pub trait Remote: Send + Sync {
    async fn list_teams(&self) -> CliResult<Vec<TeamSummary>>;
    async fn get_team(&self, team_id: TeamId) -> CliResult<TeamSummary>;
    async fn update_team_info(&self, team_id: TeamId, info: &TeamInfo) -> CliResult<()>;

    async fn list_recipients(&self, team_id: TeamId) -> CliResult<BTreeSet<String>>;
    async fn update_recipients(&self, team_id: TeamId, emails: &BTreeSet<String>) -> CliResult<()>;

    async fn list_members(&self, team_id: TeamId) -> CliResult<Vec<Member>>;
    async fn create_member(&self, team_id: TeamId, email: &str, role: Role) -> CliResult<MemberId>;
    async fn update_member(&self, team_id: TeamId, member_id: MemberId, role: Role) -> CliResult<()>;
    async fn delete_member(&self, team_id: TeamId, member_id: MemberId) -> CliResult<()>;

    async fn list_groups(&self, team_id: TeamId) -> CliResult<Vec<GroupSummary>>;
    async fn create_group(&self, team_id: TeamId, name: &str) -> CliResult<GroupId>;
    async fn list_group_assets(&self, team_id: TeamId, group_id: GroupId) -> CliResult<Vec<Asset>>;
    async fn associate_asset(&self, team_id: TeamId, group_id: GroupId, asset_id: AssetId) -> CliResult<()>;
    async fn deassociate_asset(&self, team_id: TeamId, group_id: GroupId, asset_id: AssetId) -> CliResult<()>;

    async fn list_assets(&self, team_id: TeamId) -> CliResult<Vec<Asset>>;
    async fn create_asset(&self, team_id: TeamId, key: &AssetKey, rolfp: Rolfp, alias: &str) -> CliResult<AssetId>;
    async fn update_asset(&self, team_id: TeamId, asset_id: AssetId, rolfp: Rolfp, alias: &str) -> CliResult<()>;
    async fn delete_asset(&self, team_id: TeamId, asset_id: AssetId) -> CliResult<()>;

    async fn list_policies(&self, team_id: TeamId) -> CliResult<Vec<Policy>>;

    async fn list_programs(&self, team_id: TeamId) -> CliResult<Vec<Program>>;
    async fn update_program(&self, team_id: TeamId, program_id: ProgramId, cron: &str) -> CliResult<()>;
}

impl From<AssetResponse> for Asset {
    fn from(asset: AssetResponse) -> Self {
        Self {
            id: Some(asset.id),
            target: asset.identifier,
            asset_type: Some(asset.asset_type),
            rolfp: asset.rolfp,
            alias: asset.alias,
        }
    }
}

#[async_trait]
impl Remote for ApiClient {
    async fn list_teams(&self) -> CliResult<Vec<TeamSummary>> {
        Ok(self
            .fetch_teams()
            .await?
            .into_iter()
            .map(|t| TeamSummary {
                id: t.id,
                name: t.name,
                info: TeamInfo {
                    description: t.description,
                    tag: t.tag,
                },
            })
            .collect())
    }

    async fn get_team(&self, team_id: TeamId) -> CliResult<TeamSummary> {
        let t = self.fetch_team(team_id).await?;
        Ok(TeamSummary {
            id: t.id,
            name: t.name,
            info: TeamInfo {
                description: t.description,
                tag: t.tag,
            },
        })
    }

    async fn update_team_info(&self, team_id: TeamId, info: &TeamInfo) -> CliResult<()> {
        self.patch_team(
            team_id,
            &UpdateTeamRequest {
                description: info.description.clone(),
                tag: info.tag.clone(),
            },
        )
        .await
    }

    async fn list_recipients(&self, team_id: TeamId) -> CliResult<BTreeSet<String>> {
        Ok(self.fetch_recipients(team_id).await?.emails.into_iter().collect())
    }

    async fn update_recipients(&self, team_id: TeamId, emails: &BTreeSet<String>) -> CliResult<()> {
        self.put_recipients(
            team_id,
            &RecipientsBody {
                emails: emails.iter().cloned().collect(),
            },
        )
        .await
    }

    async fn list_members(&self, team_id: TeamId) -> CliResult<Vec<Member>> {
        Ok(self
            .fetch_members(team_id)
            .await?
            .into_iter()
            .map(|m| Member {
                id: Some(m.id),
                email: m.email,
                role: m.role,
            })
            .collect())
    }

    async fn create_member(&self, team_id: TeamId, email: &str, role: Role) -> CliResult<MemberId> {
        self.post_member(
            team_id,
            &CreateMemberRequest {
                email: email.to_string(),
                role,
            },
        )
        .await
    }

    async fn update_member(&self, team_id: TeamId, member_id: MemberId, role: Role) -> CliResult<()> {
        self.patch_member(team_id, member_id, &UpdateMemberRequest { role })
            .await
    }

    async fn delete_member(&self, team_id: TeamId, member_id: MemberId) -> CliResult<()> {
        self.remove_member(team_id, member_id).await
    }

    async fn list_groups(&self, team_id: TeamId) -> CliResult<Vec<GroupSummary>> {
        Ok(self
            .fetch_groups(team_id)
            .await?
            .into_iter()
            .map(|g| GroupSummary {
                id: g.id,
                name: g.name,
            })
            .collect())
    }

    async fn create_group(&self, team_id: TeamId, name: &str) -> CliResult<GroupId> {
        self.post_group(
            team_id,
            &CreateGroupRequest {
                name: name.to_string(),
            },
        )
        .await
    }

    async fn list_group_assets(&self, team_id: TeamId, group_id: GroupId) -> CliResult<Vec<Asset>> {
        Ok(self
            .fetch_group_assets(team_id, group_id)
            .await?
            .into_iter()
            .map(Asset::from)
            .collect())
    }

    async fn associate_asset(&self, team_id: TeamId, group_id: GroupId, asset_id: AssetId) -> CliResult<()> {
        self.put_group_asset(team_id, group_id, asset_id).await
    }

    async fn deassociate_asset(&self, team_id: TeamId, group_id: GroupId, asset_id: AssetId) -> CliResult<()> {
        self.remove_group_asset(team_id, group_id, asset_id).await
    }

    async fn list_assets(&self, team_id: TeamId) -> CliResult<Vec<Asset>> {
        Ok(self
            .fetch_assets(team_id)
            .await?
            .into_iter()
            .map(Asset::from)
            .collect())
    }

    async fn create_asset(&self, team_id: TeamId, key: &AssetKey, rolfp: Rolfp, alias: &str) -> CliResult<AssetId> {
        self.post_asset(
            team_id,
            &CreateAssetRequest {
                identifier: key.target.clone(),
                asset_type: key.asset_type,
                rolfp,
                alias: alias.to_string(),
            },
        )
        .await
    }

    async fn update_asset(&self, team_id: TeamId, asset_id: AssetId, rolfp: Rolfp, alias: &str) -> CliResult<()> {
        self.patch_asset(
            team_id,
            asset_id,
            &UpdateAssetRequest {
                rolfp,
                alias: alias.to_string(),
            },
        )
        .await
    }

    async fn delete_asset(&self, team_id: TeamId, asset_id: AssetId) -> CliResult<()> {
        self.remove_asset(team_id, asset_id).await
    }

    async fn list_policies(&self, team_id: TeamId) -> CliResult<Vec<Policy>> {
        Ok(self
            .fetch_policies(team_id)
            .await?
            .into_iter()
            .map(|p| Policy {
                id: Some(p.id),
                name: p.name,
                description: p.description,
                settings: p
                    .settings
                    .into_iter()
                    .map(|s| PolicySetting {
                        id: Some(s.id),
                        check_type: s.check_type,
                        options: s.options.to_string(),
                    })
                    .collect(),
            })
            .collect())
    }

    async fn list_programs(&self, team_id: TeamId) -> CliResult<Vec<Program>> {
        Ok(self
            .fetch_programs(team_id)
            .await?
            .into_iter()
            .map(|p| Program {
                id: Some(p.id),
                name: p.name,
                cron: p.cron,
                disabled: p.disabled,
            })
            .collect())
    }

    async fn update_program(&self, team_id: TeamId, program_id: ProgramId, cron: &str) -> CliResult<()> {
        self.patch_program(
            team_id,
            program_id,
            &UpdateProgramRequest {
                cron: cron.to_string(),
            },
        )
        .await
    }
}
