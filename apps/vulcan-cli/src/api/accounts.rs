//! Cloud account name lookup

use async_trait::async_trait;
use vulcan_core::{AccountNameLookup, AssetType, VulcanError};

use super::models::AccountNameResponse;
use super::ApiClient;

#[async_trait]
impl AccountNameLookup for ApiClient {
    async fn account_name(&self, asset_type: AssetType, identifier: &str) -> vulcan_core::Result<String> {
        let response: AccountNameResponse = self
            .get_json_with_query(
                "/v1/accounts/lookup",
                &[("type", asset_type.as_str()), ("identifier", identifier)],
            )
            .await
            .map_err(|e| VulcanError::Collaborator {
                collaborator: "account name lookup".to_string(),
                message: e.to_string(),
            })?;
        Ok(response.name)
    }
}
