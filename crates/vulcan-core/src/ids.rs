//! Strongly Typed Identifiers
//!
//! Every entity the remote API assigns an ID to gets its own newtype so a
//! group ID can never be passed where an asset ID is expected.
//!
//! # Example
//!
//! ```
//! use vulcan_core::{AssetId, TeamId};
//!
//! let team = TeamId::new();
//! let asset: AssetId = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
//!
//! fn requires_team(id: TeamId) -> String {
//!     id.to_string()
//! }
//!
//! requires_team(team);
//! // requires_team(asset); // This would not compile!
//! # let _ = asset;
//! ```

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Error type for ID parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    /// The type of ID that failed to parse
    pub id_type: &'static str,
    /// The underlying UUID parse error message
    pub message: String,
}

impl Display for ParseIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to parse {}: {}", self.id_type, self.message)
    }
}

impl std::error::Error for ParseIdError {}

/// Macro to define a strongly-typed ID type
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random ID using UUID v4.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns a reference to the underlying UUID.
            #[must_use]
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|e| ParseIdError {
                        id_type: stringify!($name),
                        message: e.to_string(),
                    })
            }
        }
    };
}

define_id!(
    /// Identifier of a team, the unit that owns members, assets and groups.
    TeamId
);

define_id!(
    /// Identifier of a team membership (not of the user behind it).
    MemberId
);

define_id!(
    /// Identifier of an asset group.
    GroupId
);

define_id!(
    /// Identifier of an asset in a team inventory.
    AssetId
);

define_id!(
    /// Identifier of a scan policy.
    PolicyId
);

define_id!(
    /// Identifier of a single setting (check type + options) inside a policy.
    SettingId
);

define_id!(
    /// Identifier of a scan program.
    ProgramId
);

define_id!(
    /// Identifier of an asynchronous job.
    JobId
);

/// Parse an optional ID column where the empty string means "not assigned".
pub fn parse_optional<T>(raw: &str) -> Result<Option<T>, ParseIdError>
where
    T: FromStr<Err = ParseIdError>,
{
    let raw = raw.trim();
    if raw.is_empty() {
        Ok(None)
    } else {
        raw.parse().map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_returns_uuid_string() {
        let uuid = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let id = AssetId::from_uuid(uuid);
        assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let uuid = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let id = TeamId::from_uuid(uuid);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"550e8400-e29b-41d4-a716-446655440000\"");
    }

    #[test]
    fn test_from_str_invalid_names_the_type() {
        let err = "not-a-uuid".parse::<GroupId>().unwrap_err();
        assert_eq!(err.id_type, "GroupId");
        assert!(err.to_string().contains("GroupId"));
    }

    #[test]
    fn test_parse_optional_empty_is_none() {
        let id: Option<MemberId> = parse_optional("").unwrap();
        assert!(id.is_none());
        let id: Option<MemberId> = parse_optional("   ").unwrap();
        assert!(id.is_none());
    }

    #[test]
    fn test_parse_optional_value() {
        let id: Option<ProgramId> =
            parse_optional("123e4567-e89b-12d3-a456-426614174000").unwrap();
        assert_eq!(
            id.unwrap().to_string(),
            "123e4567-e89b-12d3-a456-426614174000"
        );
        assert!(parse_optional::<ProgramId>("nope").is_err());
    }
}
