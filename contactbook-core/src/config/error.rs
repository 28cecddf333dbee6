//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("cannot read {}: {reason}", .path.display())]
    Read { path: PathBuf, reason: String },

    #[error("cannot write {}: {reason}", .path.display())]
    Write { path: PathBuf, reason: String },

    #[error("malformed configuration in {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("cannot encode configuration: {0}")]
    Encode(String),

    /// An environment override could not be applied
    #[error("{key}: {reason}")]
    Env { key: String, reason: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub(crate) fn env(key: &str, reason: impl ToString) -> Self {
        ConfigError::Env { key: key.to_string(), reason: reason.to_string() }
    }
}
