//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files,
//! either from an explicit path or from a `bytefield.toml` in the working
//! directory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info};
use thiserror::Error;

use bytefield::{AppConfig, BytefieldError};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {}", .0.display())]
    MissingFile(PathBuf),
}

impl From<ConfigError> for BytefieldError {
    fn from(err: ConfigError) -> Self {
        BytefieldError::Io(std::io::Error::other(err.to_string()))
    }
}

/// Find and load configuration.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. `bytefield.toml` in the working directory
/// 3. Default config if none found
///
/// # Errors
///
/// Returns an error if an explicit path is provided but the file doesn't
/// exist, or if a config file exists but cannot be parsed.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, BytefieldError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("bytefield.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load configuration from a TOML file
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, BytefieldError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    Ok(config)
}
