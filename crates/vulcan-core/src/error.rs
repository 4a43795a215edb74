//! Error Types
//!
//! Domain errors shared by the CLI reconciler and the discovery service.
//!
//! # Example
//!
//! ```
//! use vulcan_core::{Result, VulcanError};
//!
//! fn require_target(target: &str) -> Result<&str> {
//!     if target.is_empty() {
//!         return Err(VulcanError::validation("target", "must not be empty"));
//!     }
//!     Ok(target)
//! }
//!
//! assert!(require_target("").is_err());
//! ```

use serde::Serialize;
use thiserror::Error;

/// Standardized error type for vulcan domain logic.
///
/// - `Validation` - malformed identifiers, invalid asset types, missing fields
/// - `IdentityConflict` - a local ID disagrees with the remote ID for the
///   same natural key; never resolved by preferring one side
/// - `NotFound` - a referenced entity does not exist
/// - `Collaborator` - an external collaborator (API, store, lookup) failed
#[derive(Debug, Clone, Error, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VulcanError {
    /// Input validation failure.
    #[error("Validation error on field '{field}': {message}")]
    Validation {
        /// The field (or entity) that failed validation
        field: String,
        /// Description of the validation failure
        message: String,
    },

    /// Local and remote identities disagree for the same natural key.
    #[error("Identity conflict for {entity} '{key}': local id {local}, remote id {remote}")]
    IdentityConflict {
        /// Entity category (e.g. "member")
        entity: String,
        /// Natural key (e.g. the member email)
        key: String,
        /// ID found in the local snapshot
        local: String,
        /// ID found in the remote snapshot
        remote: String,
    },

    /// Requested resource was not found.
    #[error("{resource} not found{}", id.as_ref().map(|i| format!(": {i}")).unwrap_or_default())]
    NotFound {
        /// The type of resource that was not found
        resource: String,
        /// Optional identifier of the resource
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },

    /// An external collaborator failed.
    #[error("{collaborator} failed: {message}")]
    Collaborator {
        /// Name of the collaborator
        collaborator: String,
        /// Failure description
        message: String,
    },
}

impl VulcanError {
    /// Shorthand for a `Validation` error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a `NotFound` error with an identifier.
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: Some(id.into()),
        }
    }

    /// Returns true for validation failures.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

/// Type alias for Results using `VulcanError`.
pub type Result<T> = std::result::Result<T, VulcanError>;
