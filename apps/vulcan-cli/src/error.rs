//! CLI error types and exit codes

use thiserror::Error;
use vulcan_core::VulcanError;

/// Exit codes for the CLI
/// - 0: Success
/// - 1: General error
/// - 2: Authentication required
/// - 3: Network error
/// - 4: Validation error
/// - 5: Server error
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Connection failed: {0}\n\nTroubleshooting:\n  - Check your internet connection\n  - Verify the API endpoint is correct\n  - Try again in a few moments")]
    ConnectionFailed(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Identity conflict: {0}")]
    IdentityConflict(String),

    #[error("Invalid local snapshot {path}: {message}")]
    Snapshot { path: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Push aborted after {applied} operation(s): '{operation}' failed: {message}")]
    ApplyFailed {
        applied: usize,
        operation: String,
        message: String,
    },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Network(_) | CliError::ConnectionFailed(_) => 3,
            CliError::Validation(_)
            | CliError::IdentityConflict(_)
            | CliError::Snapshot { .. }
            | CliError::NotFound(_) => 4,
            CliError::Api { status, .. } => {
                if *status >= 500 {
                    5
                } else if *status == 401 || *status == 403 {
                    2
                } else {
                    4
                }
            }
            CliError::Config(_) | CliError::Io(_) | CliError::ApplyFailed { .. } => 1,
        }
    }

    /// Print the error to stderr with appropriate formatting
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {}", self);
        } else {
            eprintln!("Error: {}", self);
        }

        if let Some(suggestion) = self.suggestion() {
            if use_color {
                eprintln!("\n\x1b[33mSuggestion:\x1b[0m {}", suggestion);
            } else {
                eprintln!("\nSuggestion: {}", suggestion);
            }
        }
    }

    /// Get a suggested action for this error
    fn suggestion(&self) -> Option<&'static str> {
        match self {
            CliError::ConnectionFailed(_) => Some("Check your network connection and try again."),
            CliError::IdentityConflict(_) => Some(
                "The local snapshot and the remote state disagree on an ID. Run 'vulcan pull' and re-apply your edits.",
            ),
            CliError::ApplyFailed { .. } => Some(
                "Operations already applied remain applied. Fix the cause and run 'vulcan push' again.",
            ),
            CliError::Api { status: 401, .. } | CliError::Api { status: 403, .. } => {
                Some("Set VULCAN_TOKEN to a valid API token.")
            }
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CliError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            CliError::ConnectionFailed(e.to_string())
        } else if e.is_timeout() {
            CliError::Network("Request timed out".to_string())
        } else {
            CliError::Network(e.to_string())
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Config(format!("JSON error: {}", e))
    }
}

impl From<csv::Error> for CliError {
    fn from(e: csv::Error) -> Self {
        CliError::Validation(format!("CSV error: {}", e))
    }
}

impl From<VulcanError> for CliError {
    fn from(e: VulcanError) -> Self {
        match e {
            VulcanError::Validation { .. } => CliError::Validation(e.to_string()),
            VulcanError::IdentityConflict { .. } => CliError::IdentityConflict(e.to_string()),
            VulcanError::NotFound { .. } => CliError::NotFound(e.to_string()),
            VulcanError::Collaborator { .. } => CliError::Network(e.to_string()),
        }
    }
}
