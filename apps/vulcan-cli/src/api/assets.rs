//! Asset and group API client methods

use reqwest::Method;
use vulcan_core::{AssetId, GroupId, TeamId};

use super::models::{
    AssetResponse, CreateAssetRequest, CreateGroupRequest, CreatedResponse, GroupResponse,
    ListResponse, UpdateAssetRequest,
};
use super::ApiClient;
use crate::error::CliResult;

impl ApiClient {
    pub async fn fetch_assets(&self, team_id: TeamId) -> CliResult<Vec<AssetResponse>> {
        let list: ListResponse<AssetResponse> = self
            .get_json(&format!("/v1/teams/{team_id}/assets"))
            .await?;
        Ok(list.items)
    }

    pub async fn post_asset(
        &self,
        team_id: TeamId,
        request: &CreateAssetRequest,
    ) -> CliResult<AssetId> {
        let created: CreatedResponse<AssetId> = self
            .send_json(Method::POST, &format!("/v1/teams/{team_id}/assets"), request)
            .await?;
        Ok(created.id)
    }

    pub async fn patch_asset(
        &self,
        team_id: TeamId,
        asset_id: AssetId,
        request: &UpdateAssetRequest,
    ) -> CliResult<()> {
        self.send_no_content(
            Method::PATCH,
            &format!("/v1/teams/{team_id}/assets/{asset_id}"),
            Some(request),
        )
        .await
    }

    pub async fn remove_asset(&self, team_id: TeamId, asset_id: AssetId) -> CliResult<()> {
        self.send_no_content::<()>(
            Method::DELETE,
            &format!("/v1/teams/{team_id}/assets/{asset_id}"),
            None,
        )
        .await
    }

    pub async fn fetch_groups(&self, team_id: TeamId) -> CliResult<Vec<GroupResponse>> {
        let list: ListResponse<GroupResponse> = self
            .get_json(&format!("/v1/teams/{team_id}/groups"))
            .await?;
        Ok(list.items)
    }

    pub async fn post_group(&self, team_id: TeamId, request: &CreateGroupRequest) -> CliResult<GroupId> {
        let created: CreatedResponse<GroupId> = self
            .send_json(Method::POST, &format!("/v1/teams/{team_id}/groups"), request)
            .await?;
        Ok(created.id)
    }

    pub async fn fetch_group_assets(
        &self,
        team_id: TeamId,
        group_id: GroupId,
    ) -> CliResult<Vec<AssetResponse>> {
        let list: ListResponse<AssetResponse> = self
            .get_json(&format!("/v1/teams/{team_id}/groups/{group_id}/assets"))
            .await?;
        Ok(list.items)
    }

    /// Add an asset to a group
    pub async fn put_group_asset(
        &self,
        team_id: TeamId,
        group_id: GroupId,
        asset_id: AssetId,
    ) -> CliResult<()> {
        self.send_no_content::<()>(
            Method::PUT,
            &format!("/v1/teams/{team_id}/groups/{group_id}/assets/{asset_id}"),
            None,
        )
        .await
    }

    /// Remove an asset from a group (the asset itself is kept)
    pub async fn remove_group_asset(
        &self,
        team_id: TeamId,
        group_id: GroupId,
        asset_id: AssetId,
    ) -> CliResult<()> {
        self.send_no_content::<()>(
            Method::DELETE,
            &format!("/v1/teams/{team_id}/groups/{group_id}/assets/{asset_id}"),
            None,
        )
        .await
    }
}
