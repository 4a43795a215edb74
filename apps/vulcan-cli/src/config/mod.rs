//! Configuration management for the vulcan CLI

mod paths;
mod settings;

pub use paths::ConfigPaths;
pub use settings::Config;

/// Default API endpoint used when neither config.json nor the environment set one
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Default root directory for team snapshots, relative to the working directory
pub const DEFAULT_DATA_DIR: &str = "teams";
