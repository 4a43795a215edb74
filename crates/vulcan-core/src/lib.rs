//! vulcan Core Library
//!
//! Domain types shared by the team reconciler CLI and the discovery service.
//!
//! # Modules
//!
//! - [`ids`] - Strongly typed identifiers (TeamId, AssetId, GroupId, ...)
//! - [`error`] - Standardized error type (VulcanError)
//! - [`rolfp`] - ROLFP impact vectors and their criticality level
//! - [`asset_type`] - Asset types and identifier format predicates
//! - [`resolver`] - Asset type cascade for untyped identifiers
//!
//! # Example
//!
//! ```
//! use vulcan_core::{AssetType, Rolfp};
//!
//! let rolfp: Rolfp = "R:1/O:0/L:0/F:0/P:0+S:1".parse().unwrap();
//! assert_eq!(rolfp.level(), 1);
//! assert_eq!("IPRange".parse::<AssetType>().unwrap(), AssetType::IpRange);
//! ```

pub mod asset_type;
pub mod error;
pub mod ids;
pub mod resolver;
pub mod rolfp;

// Re-export main types for convenient access
pub use asset_type::AssetType;
pub use error::{Result, VulcanError};
pub use ids::{
    parse_optional, AssetId, GroupId, JobId, MemberId, ParseIdError, PolicyId, ProgramId,
    SettingId, TeamId,
};
pub use resolver::{
    AccountNameLookup, AssetCandidate, AssetResolver, NameResolver, SystemNameResolver,
};
pub use rolfp::{Rolfp, RolfpVector};

/// Name of the group every team owns and no reconciliation may touch.
pub const DEFAULT_GROUP: &str = "Default";

/// Suffix reserved for groups owned by a discovery integration.
pub const DISCOVERY_GROUP_SUFFIX: &str = "-discovered-assets";
