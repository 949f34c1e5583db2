//! Configuration validation

use super::*;
use crate::core::error::{Error, Result};

const VALID_LOG_LEVELS: [&str; 6] = ["off", "trace", "debug", "info", "warn", "error"];

/// Validate the whole configuration
pub fn validate_config(config: &ServiceConfig) -> Result<()> {
    validate_data_config(&config.data)?;
    validate_server_config(&config.server)?;
    validate_logging_config(&config.logging)?;

    Ok(())
}

/// Validate dataset settings
pub fn validate_data_config(config: &DataConfig) -> Result<()> {
    if config.path.trim().is_empty() {
        return Err(Error::ConfigurationError(
            "data.path must not be empty".to_string(),
        ));
    }

    for (field, value) in [
        ("data.timestamp_column", &config.timestamp_column),
        ("data.issue_column", &config.issue_column),
    ] {
        if value.trim().is_empty() {
            return Err(Error::ConfigurationError(format!(
                "{} must not be empty",
                field
            )));
        }
    }

    Ok(())
}

/// Validate listener settings
pub fn validate_server_config(config: &ServerConfig) -> Result<()> {
    if config.host.trim().is_empty() {
        return Err(Error::ConfigurationError(
            "server.host must not be empty".to_string(),
        ));
    }

    if config.port == 0 {
        return Err(Error::ConfigurationError(
            "server.port must be between 1 and 65535".to_string(),
        ));
    }

    if config.default_head_count == 0 {
        return Err(Error::ConfigurationError(
            "server.default_head_count must be at least 1".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging settings
pub fn validate_logging_config(config: &LoggingConfig) -> Result<()> {
    if !VALID_LOG_LEVELS.contains(&config.level.to_lowercase().as_str()) {
        return Err(Error::ConfigurationError(format!(
            "Invalid log level '{}'. Valid levels: {}",
            config.level,
            VALID_LOG_LEVELS.join(", ")
        )));
    }

    Ok(())
}
