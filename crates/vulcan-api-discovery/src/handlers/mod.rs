//! HTTP handlers.

pub mod discovery;
pub mod jobs;
