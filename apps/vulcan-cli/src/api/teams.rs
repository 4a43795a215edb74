//! Team, recipient and member API client methods

use reqwest::Method;
use vulcan_core::{MemberId, TeamId};

use super::models::{
    CreateMemberRequest, CreatedResponse, ListResponse, MemberResponse, RecipientsBody,
    TeamResponse, UpdateMemberRequest, UpdateTeamRequest,
};
use super::ApiClient;
use crate::error::CliResult;

impl ApiClient {
    /// List every team visible to the caller
    pub async fn fetch_teams(&self) -> CliResult<Vec<TeamResponse>> {
        let list: ListResponse<TeamResponse> = self.get_json("/v1/teams").await?;
        Ok(list.items)
    }

    /// Get a single team
    pub async fn fetch_team(&self, team_id: TeamId) -> CliResult<TeamResponse> {
        self.get_json(&format!("/v1/teams/{team_id}")).await
    }

    /// Update team description and tag
    pub async fn patch_team(&self, team_id: TeamId, request: &UpdateTeamRequest) -> CliResult<()> {
        self.send_no_content(Method::PATCH, &format!("/v1/teams/{team_id}"), Some(request))
            .await
    }

    pub async fn fetch_recipients(&self, team_id: TeamId) -> CliResult<RecipientsBody> {
        self.get_json(&format!("/v1/teams/{team_id}/recipients"))
            .await
    }

    /// Replace the recipient list
    pub async fn put_recipients(&self, team_id: TeamId, body: &RecipientsBody) -> CliResult<()> {
        self.send_no_content(
            Method::PUT,
            &format!("/v1/teams/{team_id}/recipients"),
            Some(body),
        )
        .await
    }

    pub async fn fetch_members(&self, team_id: TeamId) -> CliResult<Vec<MemberResponse>> {
        let list: ListResponse<MemberResponse> = self
            .get_json(&format!("/v1/teams/{team_id}/members"))
            .await?;
        Ok(list.items)
    }

    pub async fn post_member(
        &self,
        team_id: TeamId,
        request: &CreateMemberRequest,
    ) -> CliResult<MemberId> {
        let created: CreatedResponse<MemberId> = self
            .send_json(
                Method::POST,
                &format!("/v1/teams/{team_id}/members"),
                request,
            )
            .await?;
        Ok(created.id)
    }

    pub async fn patch_member(
        &self,
        team_id: TeamId,
        member_id: MemberId,
        request: &UpdateMemberRequest,
    ) -> CliResult<()> {
        self.send_no_content(
            Method::PATCH,
            &format!("/v1/teams/{team_id}/members/{member_id}"),
            Some(request),
        )
        .await
    }

    pub async fn remove_member(&self, team_id: TeamId, member_id: MemberId) -> CliResult<()> {
        self.send_no_content::<()>(
            Method::DELETE,
            &format!("/v1/teams/{team_id}/members/{member_id}"),
            None,
        )
        .await
    }
}
