//! Logging errors

use std::fmt;

/// Errors raised while setting up the subscriber
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingError {
    /// A global subscriber is already installed, or the filter was rejected
    InitializationFailed(String),
    /// Unparseable level or filter directive
    InvalidConfiguration(String),
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoggingError::InitializationFailed(msg) => write!(f, "Failed to initialize logging: {}", msg),
            LoggingError::InvalidConfiguration(msg) => write!(f, "Invalid logging configuration: {}", msg),
        }
    }
}

impl std::error::Error for LoggingError {}
