//! Policy and program API client methods

use reqwest::Method;
use vulcan_core::{ProgramId, TeamId};

use super::models::{ListResponse, PolicyResponse, ProgramResponse, UpdateProgramRequest};
use super::ApiClient;
use crate::error::CliResult;

impl ApiClient {
    /// List policies including their settings
    pub async fn fetch_policies(&self, team_id: TeamId) -> CliResult<Vec<PolicyResponse>> {
        let list: ListResponse<PolicyResponse> = self
            .get_json(&format!("/v1/teams/{team_id}/policies"))
            .await?;
        Ok(list.items)
    }

    pub async fn fetch_programs(&self, team_id: TeamId) -> CliResult<Vec<ProgramResponse>> {
        let list: ListResponse<ProgramResponse> = self
            .get_json(&format!("/v1/teams/{team_id}/programs"))
            .await?;
        Ok(list.items)
    }

    pub async fn patch_program(
        &self,
        team_id: TeamId,
        program_id: ProgramId,
        request: &UpdateProgramRequest,
    ) -> CliResult<()> {
        self.send_no_content(
            Method::PATCH,
            &format!("/v1/teams/{team_id}/programs/{program_id}"),
            Some(request),
        )
        .await
    }
}
