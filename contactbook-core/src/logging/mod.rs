//! Logging setup
//!
//! The library only emits `tracing` events. Binaries call
//! [`init_logging_with_config`] once to install a subscriber; `RUST_LOG`
//! overrides the configured level when set. Events go to stderr so that
//! command output on stdout stays machine-readable.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod error;
mod level;

pub use error::LoggingError;
pub use level::LogLevel;

/// Subscriber settings
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: LogLevel,
    pub with_timestamp: bool,
    pub with_target: bool,
    pub json_format: bool,
    /// Extra `EnvFilter` directives appended after the level, e.g. `contactbook_core::core_directory=trace`
    pub directives: Vec<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            with_timestamp: true,
            with_target: true,
            json_format: false,
            directives: Vec::new(),
        }
    }
}

impl LogConfig {
    pub fn new(level: LogLevel) -> Self {
        Self { level, ..Default::default() }
    }

    pub fn with_timestamp(mut self, enabled: bool) -> Self {
        self.with_timestamp = enabled;
        self
    }

    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    pub fn json_format(mut self, enabled: bool) -> Self {
        self.json_format = enabled;
        self
    }

    pub fn directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    /// Filter string handed to `EnvFilter` when `RUST_LOG` is unset
    pub fn filter_spec(&self) -> String {
        std::iter::once(self.level.as_str().to_string())
            .chain(self.directives.iter().cloned())
            .collect::<Vec<_>>()
            .join(",")
    }

    fn env_filter(&self) -> Result<EnvFilter, LoggingError> {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
        EnvFilter::try_new(self.filter_spec()).map_err(|e| LoggingError::InvalidConfiguration(e.to_string()))
    }
}

/// Install the default subscriber (info, plain text)
pub fn init_logging() -> Result<(), LoggingError> {
    init_logging_with_config(LogConfig::default())
}

/// Install a subscriber built from `config`
///
/// # Example
/// ```
/// use contactbook_core::logging::{init_logging_with_config, LogConfig, LogLevel};
///
/// let config = LogConfig::new(LogLevel::Debug).with_target(false);
/// init_logging_with_config(config).expect("Failed to initialize logging");
/// ```
pub fn init_logging_with_config(config: LogConfig) -> Result<(), LoggingError> {
    let env_filter = config.env_filter()?;
    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match (config.json_format, config.with_timestamp) {
        (true, true) => registry
            .with(fmt::layer().json().with_target(config.with_target).with_writer(std::io::stderr))
            .try_init(),
        (true, false) => registry
            .with(
                fmt::layer()
                    .json()
                    .without_time()
                    .with_target(config.with_target)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        (false, true) => registry
            .with(fmt::layer().with_target(config.with_target).with_writer(std::io::stderr))
            .try_init(),
        (false, false) => registry
            .with(
                fmt::layer()
                    .without_time()
                    .with_target(config.with_target)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    result.map_err(|e| LoggingError::InitializationFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_default() {
        let config = LogConfig::default();
        assert_eq!(config.level, LogLevel::Info);
        assert!(config.with_timestamp);
        assert!(config.with_target);
        assert!(!config.json_format);
        assert_eq!(config.filter_spec(), "info");
    }

    #[test]
    fn test_log_config_builder() {
        let config = LogConfig::new(LogLevel::Debug)
            .with_timestamp(false)
            .with_target(false)
            .json_format(true)
            .directive("contactbook_core::core_directory=trace");

        assert_eq!(config.level, LogLevel::Debug);
        assert!(!config.with_timestamp);
        assert!(!config.with_target);
        assert!(config.json_format);
        assert_eq!(config.filter_spec(), "debug,contactbook_core::core_directory=trace");
    }

    #[test]
    fn test_second_init_fails() {
        // Whichever test installs first wins; a later install must report it
        let _ = init_logging_with_config(LogConfig::new(LogLevel::Warn).with_timestamp(false));
        let second = init_logging();
        assert!(matches!(second, Err(LoggingError::InitializationFailed(_))));
    }
}
