//! Error types for the discovery merge API.
//!
//! Uses RFC 7807 Problem Details for HTTP APIs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vulcan_core::VulcanError;

/// Base URL for error type URIs.
const ERROR_BASE_URL: &str = "https://vulcan.dev/errors/discovery";

/// RFC 7807 Problem Details structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI identifying the problem type.
    #[serde(rename = "type")]
    pub error_type: String,

    /// Short human-readable summary.
    pub title: String,

    /// HTTP status code.
    pub status: u16,

    /// Human-readable explanation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ProblemDetails {
    #[must_use]
    pub fn new(error_type: &str, title: &str, status: StatusCode) -> Self {
        Self {
            error_type: format!("{ERROR_BASE_URL}/{error_type}"),
            title: title.to_string(),
            status: status.as_u16(),
            detail: None,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Discovery API errors.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Target group does not carry the discovery suffix.
    #[error("Invalid group name: {0}")]
    InvalidGroupName(String),

    /// A declared asset failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The same asset was declared twice with different attributes.
    #[error("Conflicting duplicate asset: {0}")]
    ConflictingDuplicate(String),

    /// Another merge is already running for this team.
    #[error("Concurrent merge in progress")]
    ConcurrentMerge,

    /// Team not found.
    #[error("Team not found")]
    TeamNotFound,

    /// Job not found.
    #[error("Job not found")]
    JobNotFound,

    /// The backing store failed.
    #[error("Store error: {0}")]
    Store(String),
}

impl DiscoveryError {
    /// Convert to `ProblemDetails`.
    pub fn to_problem_details(&self) -> ProblemDetails {
        let status = self.status_code();
        match self {
            DiscoveryError::InvalidGroupName(msg) => {
                ProblemDetails::new("invalid-group-name", "Invalid Group Name", status)
                    .with_detail(msg.clone())
            }

            DiscoveryError::Validation(msg) => {
                ProblemDetails::new("validation-error", "Validation Error", status)
                    .with_detail(msg.clone())
            }

            DiscoveryError::ConflictingDuplicate(msg) => {
                ProblemDetails::new("conflicting-duplicate", "Conflicting Duplicate", status)
                    .with_detail(msg.clone())
            }

            DiscoveryError::ConcurrentMerge => {
                ProblemDetails::new("concurrent-merge", "Concurrent Merge", status).with_detail(
                    "Another discovery merge is already running for this team. Poll its job and retry.",
                )
            }

            DiscoveryError::TeamNotFound => {
                ProblemDetails::new("team-not-found", "Team Not Found", status)
                    .with_detail("The requested team was not found.")
            }

            DiscoveryError::JobNotFound => {
                ProblemDetails::new("job-not-found", "Job Not Found", status)
                    .with_detail("The requested job was not found.")
            }

            DiscoveryError::Store(msg) => {
                tracing::error!(error = %msg, "Store error in discovery merge");
                ProblemDetails::new("store-error", "Store Error", status)
                    .with_detail("A storage error occurred. Please try again later.")
            }
        }
    }

    /// Get the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            DiscoveryError::InvalidGroupName(_)
            | DiscoveryError::Validation(_)
            | DiscoveryError::ConflictingDuplicate(_) => StatusCode::BAD_REQUEST,
            DiscoveryError::ConcurrentMerge => StatusCode::CONFLICT,
            DiscoveryError::TeamNotFound | DiscoveryError::JobNotFound => StatusCode::NOT_FOUND,
            DiscoveryError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<VulcanError> for DiscoveryError {
    fn from(err: VulcanError) -> Self {
        match err {
            VulcanError::Validation { .. } | VulcanError::IdentityConflict { .. } => {
                DiscoveryError::Validation(err.to_string())
            }
            VulcanError::NotFound { .. } | VulcanError::Collaborator { .. } => {
                DiscoveryError::Store(err.to_string())
            }
        }
    }
}

impl IntoResponse for DiscoveryError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let problem = self.to_problem_details();

        let mut response = (status, Json(problem)).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concurrent_merge_is_conflict() {
        let err = DiscoveryError::ConcurrentMerge;
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        let problem = err.to_problem_details();
        assert_eq!(problem.status, 409);
        assert!(problem.error_type.ends_with("/concurrent-merge"));
    }

    #[test]
    fn test_validation_from_core_error() {
        let err: DiscoveryError = VulcanError::validation("10.0.0.0/8", "not a valid IP").into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("not a valid IP"));
    }

    #[test]
    fn test_store_error_hides_detail() {
        let problem = DiscoveryError::Store("connection reset".to_string()).to_problem_details();
        assert_eq!(problem.status, 500);
        assert!(!problem.detail.unwrap_or_default().contains("connection reset"));
    }
}
