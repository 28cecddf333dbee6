//! Configuration management
//!
//! Defaults, overridden by a TOML file and/or `CONTACTBOOK_<SECTION>_<KEY>`
//! environment variables. Every loader validates before returning.

use crate::core_directory::ConsistencyPolicy;
use crate::logging::{LogConfig, LogLevel};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

mod error;

pub use error::ConfigError;

const ENV_PREFIX: &str = "CONTACTBOOK";
const MAX_RETRY_LIMIT: u32 = 64;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub directory: DirectoryConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

/// Service identity and collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Name of the service identity owning the shared records
    pub name: String,

    /// Local node state file; `~` and `$VARS` are expanded by the CLI
    pub state_file: PathBuf,
}

/// Directory store behaviour
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    pub consistency: ConsistencyPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub json_format: bool,
    pub with_timestamp: bool,
    pub with_target: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Describe metrics on startup
    pub enabled: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "contactbook".to_string(),
            state_file: PathBuf::from("~/.contactbook/state.json"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            json_format: false,
            with_timestamp: true,
            with_target: true,
        }
    }
}

impl LoggingConfig {
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig::new(self.level)
            .json_format(self.json_format)
            .with_timestamp(self.with_timestamp)
            .with_target(self.with_target)
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|e| ConfigError::env(key, e))
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Variables follow the pattern `CONTACTBOOK_<SECTION>_<KEY>`, e.g.
    /// `CONTACTBOOK_DIRECTORY_CONSISTENCY=last_writer_wins`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().merge_env(|key| env::var(key).ok())
    }

    /// Apply overrides from `lookup` on top of `self`, then validate
    pub fn merge_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| {
            let key = format!("{}_{}", ENV_PREFIX, suffix);
            lookup(&key).map(|value| (key, value))
        };

        // Service
        if let Some((_, name)) = var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Some((_, path)) = var("SERVICE_STATE_FILE") {
            self.service.state_file = PathBuf::from(path);
        }

        // Directory
        if let Some((key, mode)) = var("DIRECTORY_CONSISTENCY") {
            self.directory.consistency = match mode.trim() {
                "optimistic" => match self.directory.consistency {
                    current @ ConsistencyPolicy::Optimistic { .. } => current,
                    ConsistencyPolicy::LastWriterWins => ConsistencyPolicy::default(),
                },
                "last_writer_wins" => ConsistencyPolicy::LastWriterWins,
                other => {
                    return Err(ConfigError::env(&key, format!("unknown mode '{}'", other)));
                }
            };
        }
        if let Some((key, retries)) = var("DIRECTORY_MAX_RETRIES") {
            let max_retries: u32 = retries
                .trim()
                .parse()
                .map_err(|e| ConfigError::env(&key, e))?;
            match self.directory.consistency {
                ConsistencyPolicy::Optimistic { .. } => {
                    self.directory.consistency = ConsistencyPolicy::Optimistic { max_retries };
                }
                ConsistencyPolicy::LastWriterWins => {
                    return Err(ConfigError::env(&key, "no effect under last_writer_wins"));
                }
            }
        }

        // Logging
        if let Some((key, level)) = var("LOG_LEVEL") {
            self.logging.level = level
                .parse()
                .map_err(|e| ConfigError::env(&key, e))?;
        }
        if let Some((key, json)) = var("LOG_JSON") {
            self.logging.json_format = parse_flag(&key, &json)?;
        }

        // Metrics
        if let Some((key, enabled)) = var("METRICS_ENABLED") {
            self.metrics.enabled = parse_flag(&key, &enabled)?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Load configuration from a TOML file; missing keys take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read { path: path.to_path_buf(), reason: e.to_string() })?;

        let config: Self = toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse { path: path.to_path_buf(), reason: e.to_string() })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service.name.trim().is_empty() {
            return Err(ConfigError::Invalid("service.name must not be empty".to_string()));
        }

        if let ConsistencyPolicy::Optimistic { max_retries } = self.directory.consistency {
            if max_retries > MAX_RETRY_LIMIT {
                return Err(ConfigError::Invalid(format!(
                    "directory.consistency.max_retries must be at most {}",
                    MAX_RETRY_LIMIT
                )));
            }
        }

        Ok(())
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = toml::to_string_pretty(self).map_err(|e| ConfigError::Encode(e.to_string()))?;

        std::fs::write(path, contents)
            .map_err(|e| ConfigError::Write { path: path.to_path_buf(), reason: e.to_string() })?;

        Ok(())
    }
}
