//! Engine configuration
//!
//! Loaded from a JSON file. Every field has a default, so `{}` is a valid configuration.
//!
//! ```json
//! {
//!   "name_pattern": "[A-Za-z][A-Za-z0-9_]*(\\.[A-Za-z][A-Za-z0-9_]*)+",
//!   "log_severity": "INFO"
//! }
//! ```

use std::fs;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::{log_event_with_fields, Event, Logger, Severity};
use crate::registry::DEFAULT_NAME_PATTERN;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid name_pattern '{pattern}': {reason}")]
    InvalidNamePattern { pattern: String, reason: String },

    #[error("Invalid log_severity: {0}")]
    InvalidSeverity(String),
}

/// Engine configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Pattern every registered query name must match in full
    #[serde(default = "default_name_pattern")]
    pub name_pattern: String,

    /// Minimum severity written by the logger
    #[serde(default = "default_log_severity")]
    pub log_severity: String,
}

fn default_name_pattern() -> String {
    DEFAULT_NAME_PATTERN.to_string()
}

fn default_log_severity() -> String {
    "INFO".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name_pattern: default_name_pattern(),
            log_severity: default_log_severity(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: EngineConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        Regex::new(&self.name_pattern).map_err(|e| ConfigError::InvalidNamePattern {
            pattern: self.name_pattern.clone(),
            reason: e.to_string(),
        })?;
        self.severity()?;
        Ok(())
    }

    /// Parsed `log_severity`
    pub fn severity(&self) -> ConfigResult<Severity> {
        self.log_severity
            .parse()
            .map_err(ConfigError::InvalidSeverity)
    }

    /// Applies the logging settings to the process
    pub fn apply(&self) -> ConfigResult<()> {
        Logger::set_min_severity(self.severity()?);
        log_event_with_fields(
            Event::ConfigLoaded,
            &[
                ("log_severity", self.log_severity.as_str()),
                ("name_pattern", self.name_pattern.as_str()),
            ],
        );
        Ok(())
    }
}
