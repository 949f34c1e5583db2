//! Configuration management
//!
//! Settings come from built-in defaults, an optional TOML/YAML file and
//! environment variables, in increasing order of precedence.

use crate::core::error::{Error, Result};
use crate::io::csv::{LoadOptions, DEFAULT_TIMESTAMP_COLUMN, DEFAULT_TIMESTAMP_FORMATS};
use crate::query::ISSUE_COLUMN;
use serde::{Deserialize, Serialize};

pub mod loader;
pub mod validation;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Dataset location and typing
    pub data: DataConfig,
    /// Listener settings
    pub server: ServerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Dataset configuration section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Path of the CSV snapshot loaded at startup
    pub path: String,
    /// Column parsed as a timestamp to derive `Year` and `Hour`
    pub timestamp_column: String,
    /// Column searched by the hazard count
    pub issue_column: String,
    /// chrono formats tried after RFC 3339
    pub timestamp_formats: Vec<String>,
}

/// Server configuration section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Rows returned by `/head` when no count is given
    pub default_head_count: usize,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: "traffic_incidents.csv".to_string(),
            timestamp_column: DEFAULT_TIMESTAMP_COLUMN.to_string(),
            issue_column: ISSUE_COLUMN.to_string(),
            timestamp_formats: DEFAULT_TIMESTAMP_FORMATS
                .iter()
                .map(|f| f.to_string())
                .collect(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8031,
            default_head_count: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl DataConfig {
    /// Loader options described by this section
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            timestamp_column: self.timestamp_column.clone(),
            timestamp_formats: self.timestamp_formats.clone(),
        }
    }
}

impl ServiceConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            Error::ConfigurationError(format!("Failed to serialize config to YAML: {}", e))
        })
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| {
            Error::ConfigurationError(format!("Failed to serialize config to TOML: {}", e))
        })
    }

    /// Socket address string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
