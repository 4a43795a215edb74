//! Discovered Asset Merge API.
//!
//! This crate provides REST API endpoints for:
//! - Merging an externally discovered asset list into one discovery group
//! - Tracking the asynchronous merge jobs
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vulcan_api_discovery::{discovery_router, DiscoveryState, MemoryStore};
//! use axum::Router;
//!
//! let state = DiscoveryState::new(Arc::new(MemoryStore::new()));
//! let app = Router::new().merge(discovery_router(state));
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod store;

// Re-export public API
pub use error::DiscoveryError;
pub use router::{discovery_router, DiscoveryState};
pub use store::{AssetMergeOperations, DiscoveryStore, MemoryStore};
