//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::AppConfig;

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// No config path was supplied.
    MissingPath,
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingPath => write!(f, "No configuration file specified"),
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::MissingPath => None,
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

/// Load configuration from a TOML file.
///
/// Only structural decoding happens here; see `validation` for the
/// non-fatal checks run afterwards.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::MissingPath);
    }
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

/// Decode configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    toml::from_str(content).map_err(ConfigError::Parse)
}
