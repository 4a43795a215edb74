//! User settings loaded from config.json and the environment

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::{ConfigPaths, DEFAULT_API_URL, DEFAULT_DATA_DIR};
use crate::error::{CliError, CliResult};

/// CLI configuration.
///
/// Precedence, lowest first: built-in defaults, `config.json`, environment
/// (`VULCAN_API_URL`, `VULCAN_TOKEN`, `VULCAN_DATA_DIR`), command-line flags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Base URL of the vulcan API
    pub api_url: String,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
    /// Root directory holding one sub-directory per team
    pub data_dir: PathBuf,
    /// Bearer token; only ever read from the environment
    #[serde(skip)]
    pub token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 30,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            token: None,
        }
    }
}

impl Config {
    /// Load config.json (if present) and apply environment overrides
    pub fn load(paths: &ConfigPaths) -> CliResult<Self> {
        let mut config = if paths.config_file.exists() {
            let content = std::fs::read_to_string(&paths.config_file)?;
            serde_json::from_str(&content).map_err(|e| {
                CliError::Config(format!(
                    "Invalid {}: {}",
                    paths.config_file.display(),
                    e
                ))
            })?
        } else {
            Config::default()
        };

        config.apply_env();
        tracing::debug!(
            api_url = %config.api_url,
            data_dir = %config.data_dir.display(),
            "Loaded configuration"
        );
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("VULCAN_API_URL") {
            self.api_url = url;
        }
        if let Ok(dir) = std::env::var("VULCAN_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        self.token = std::env::var("VULCAN_TOKEN").ok().filter(|t| !t.is_empty());
    }

    /// API base URL without a trailing slash
    pub fn api_base(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }
}
