//! Platform-specific configuration paths

use crate::error::{CliError, CliResult};
use std::path::PathBuf;

/// Configuration paths for the vulcan CLI
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Base configuration directory
    pub config_dir: PathBuf,
    /// Path to config.json
    pub config_file: PathBuf,
}

impl ConfigPaths {
    /// Get configuration paths for the current platform
    ///
    /// Paths:
    /// - Linux: ~/.config/vulcan/
    /// - macOS: ~/Library/Application Support/vulcan/
    /// - Windows: %APPDATA%\vulcan\
    pub fn new() -> CliResult<Self> {
        Ok(Self::from_dir(Self::get_config_dir()?))
    }

    /// Build paths rooted at an explicit directory
    pub fn from_dir(config_dir: PathBuf) -> Self {
        Self {
            config_file: config_dir.join("config.json"),
            config_dir,
        }
    }

    /// Get the configuration directory, respecting VULCAN_CONFIG_DIR env var
    fn get_config_dir() -> CliResult<PathBuf> {
        if let Ok(dir) = std::env::var("VULCAN_CONFIG_DIR") {
            return Ok(PathBuf::from(dir));
        }

        let base_dir = dirs::config_dir().ok_or_else(|| {
            CliError::Config("Could not determine configuration directory".to_string())
        })?;

        Ok(base_dir.join("vulcan"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dir() {
        let paths = ConfigPaths::from_dir(PathBuf::from("/tmp/vulcan-paths"));
        assert_eq!(paths.config_dir, PathBuf::from("/tmp/vulcan-paths"));
        assert!(paths.config_file.ends_with("config.json"));
    }

    #[test]
    fn test_config_dir_override() {
        std::env::set_var("VULCAN_CONFIG_DIR", "/tmp/vulcan-test");
        let paths = ConfigPaths::new().unwrap();
        assert_eq!(paths.config_dir, PathBuf::from("/tmp/vulcan-test"));
        std::env::remove_var("VULCAN_CONFIG_DIR");
    }
}
