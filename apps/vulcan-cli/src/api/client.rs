//! HTTP client wrapper for the vulcan API

use crate::config::Config;
use crate::error::{CliError, CliResult};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// API client for making authenticated requests
pub struct ApiClient {
    client: Client,
    config: Config,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(config: Config) -> CliResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CliError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Get a reference to the config
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.config.api_base(), path);
        tracing::debug!(method = %method, url = %url, "API request");
        let request = self.client.request(method, url);
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Make a GET request and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> CliResult<T> {
        let response = self.request(Method::GET, path).send().await?;
        Self::check(response).await?.json().await.map_err(Into::into)
    }

    /// Make a GET request with query parameters and decode the JSON body
    pub async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> CliResult<T> {
        let response = self.request(Method::GET, path).query(query).send().await?;
        Self::check(response).await?.json().await.map_err(Into::into)
    }

    /// Send a JSON body and decode the JSON response
    pub async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> CliResult<T> {
        let response = self.request(method, path).json(body).send().await?;
        Self::check(response).await?.json().await.map_err(Into::into)
    }

    /// Send a request whose response body is ignored
    pub async fn send_no_content<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> CliResult<()> {
        let mut request = self.request(method, path);
        if let Some(body) = body {
            request = request.json(body);
        }
        Self::check(request.send().await?).await?;
        Ok(())
    }

    /// Turn a non-success status into `CliError::Api`
    async fn check(response: Response) -> CliResult<Response> {
        let status = response.status();
        tracing::debug!(status = status.as_u16(), "API response");
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(CliError::Api {
                status: status.as_u16(),
                message: body,
            })
        }
    }
}
