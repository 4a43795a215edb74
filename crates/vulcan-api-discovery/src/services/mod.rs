//! Business logic for the discovery merge.

pub mod job_processor;
pub mod locks;
pub mod merge;
