//! Configuration loading utilities
//!
//! This module handles loading configuration from various sources with proper
//! precedence and validation.

use super::*;
use crate::core::error::{Error, Result};
use std::env;
use std::fs;
use std::path::Path;

/// Load configuration from environment variables on top of the defaults
pub fn load_from_env() -> Result<ServiceConfig> {
    let mut config = ServiceConfig::default();
    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Overwrite fields of `config` with any environment variables that are set
pub fn apply_env_overrides(config: &mut ServiceConfig) -> Result<()> {
    if let Ok(path) = env::var("INCIDENTS_DATA_PATH") {
        config.data.path = path;
    }

    if let Ok(column) = env::var("INCIDENTS_TIMESTAMP_COLUMN") {
        config.data.timestamp_column = column;
    }

    if let Ok(host) = env::var("INCIDENTS_HOST") {
        config.server.host = host;
    }

    if let Ok(port) = env::var("INCIDENTS_PORT") {
        config.server.port = port
            .parse()
            .map_err(|e| Error::ConfigurationError(format!("Invalid INCIDENTS_PORT: {}", e)))?;
    }

    if let Ok(log_level) = env::var("INCIDENTS_LOG_LEVEL") {
        config.logging.level = log_level;
    }

    Ok(())
}

/// Load configuration from a file (YAML or TOML based on extension)
pub fn load_from_file(path: &Path) -> Result<ServiceConfig> {
    if !path.exists() {
        return Err(Error::ConfigurationError(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        Error::ConfigurationError(format!(
            "Failed to read config file {}: {}",
            path.display(),
            e
        ))
    })?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => load_from_yaml(&contents),
        Some("toml") => load_from_toml(&contents),
        Some(ext) => Err(Error::ConfigurationError(format!(
            "Unsupported config file format: {}",
            ext
        ))),
        None => load_from_yaml(&contents).or_else(|_| load_from_toml(&contents)),
    }
}

/// Load configuration from YAML string
pub fn load_from_yaml(yaml: &str) -> Result<ServiceConfig> {
    serde_yaml::from_str(yaml)
        .map_err(|e| Error::ConfigurationError(format!("Failed to parse YAML config: {}", e)))
}

/// Load configuration from TOML string
pub fn load_from_toml(toml: &str) -> Result<ServiceConfig> {
    toml::from_str(toml)
        .map_err(|e| Error::ConfigurationError(format!("Failed to parse TOML config: {}", e)))
}

/// Layer defaults -> file -> environment without validating, so callers can
/// apply further overrides (command-line flags) before checking the result
pub fn load_layered<P: AsRef<Path>>(config_file: Option<P>) -> Result<ServiceConfig> {
    let mut config = match config_file {
        Some(file_path) => load_from_file(file_path.as_ref())?,
        None => ServiceConfig::default(),
    };

    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Load configuration with precedence: defaults -> file -> environment
pub fn load_with_precedence<P: AsRef<Path>>(config_file: Option<P>) -> Result<ServiceConfig> {
    let config = load_layered(config_file)?;
    config.validate()?;

    Ok(config)
}
