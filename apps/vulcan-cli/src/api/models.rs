//! Wire types of the vulcan REST API

use serde::{Deserialize, Serialize};
use vulcan_core::{
    AssetId, AssetType, GroupId, MemberId, PolicyId, ProgramId, Rolfp, SettingId, TeamId,
};

use crate::snapshot::Role;

/// Envelope of every list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamResponse {
    pub id: TeamId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tag: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTeamRequest {
    pub description: String,
    pub tag: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipientsBody {
    pub emails: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberResponse {
    pub id: MemberId,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMemberRequest {
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMemberRequest {
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupResponse {
    pub id: GroupId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetResponse {
    pub id: AssetId,
    pub identifier: String,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    #[serde(default)]
    pub rolfp: Rolfp,
    #[serde(default)]
    pub alias: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAssetRequest {
    pub identifier: String,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    pub rolfp: Rolfp,
    pub alias: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAssetRequest {
    pub rolfp: Rolfp,
    pub alias: String,
}

/// Response of every create endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse<I> {
    pub id: I,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyResponse {
    pub id: PolicyId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub settings: Vec<PolicySettingResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicySettingResponse {
    pub id: SettingId,
    pub check_type: String,
    #[serde(default)]
    pub options: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramResponse {
    pub id: ProgramId,
    pub name: String,
    #[serde(default)]
    pub cron: String,
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProgramRequest {
    pub cron: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountNameResponse {
    pub name: String,
}
