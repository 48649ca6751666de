//! Configuration types for pushq.
//!
//! A [`PushqConfig`] is built once at startup and handed to
//! [`PushQueue`](crate::core::PushQueue) by value. The dispatcher reads its own
//! copy on every iteration, so changing a config after `start()` has no effect
//! on a running dispatcher.

use crate::error::{PushqError, PushqResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Host used when none (or an empty one) is configured.
pub const DEFAULT_TARGET_HOST: &str = "localhost";

/// Port used when none (or port 0) is configured.
pub const DEFAULT_TARGET_PORT: u16 = 8080;

/// Delay before an empty queue is checked again.
pub const DEFAULT_IDLE_POLL_INTERVAL_MS: u64 = 500;

/// Main configuration for pushq.
///
/// # Examples
///
/// ```rust
/// use pushq::config::{DispatchConfig, PushqConfig};
///
/// let config = PushqConfig {
///     dispatch: DispatchConfig::configure("api.local", 9090, 1),
///     ..Default::default()
/// };
/// assert_eq!(config.dispatch.base_url(), "http://api.local:9090");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PushqConfig {
    /// Dispatch target and retry budget
    pub dispatch: DispatchConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Where and how queued tasks are delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Host every task is delivered to; tasks only carry a path
    pub target_host: String,

    /// Port every task is delivered to
    pub target_port: u16,

    /// Retries after the first attempt; total attempts = max_retries + 1
    pub max_retries: u32,

    /// How long the dispatcher sleeps after finding the queue empty (in milliseconds)
    pub idle_poll_interval_ms: u64,

    /// Optional timeout for a single delivery (in milliseconds). None waits forever.
    pub request_timeout_ms: Option<u64>,

    /// Time to wait for the dispatcher to finish on stop (in seconds)
    pub shutdown_timeout_secs: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            target_host: DEFAULT_TARGET_HOST.to_string(),
            target_port: DEFAULT_TARGET_PORT,
            max_retries: 0,
            idle_poll_interval_ms: DEFAULT_IDLE_POLL_INTERVAL_MS,
            request_timeout_ms: None,
            shutdown_timeout_secs: 30,
        }
    }
}

impl DispatchConfig {
    /// Build a dispatch target the way the bootstrap call does.
    ///
    /// An empty host falls back to `localhost` and port 0 falls back to 8080.
    pub fn configure(host: impl Into<String>, port: u16, max_retries: u32) -> Self {
        Self::default().with_target(host, port).with_max_retries(max_retries)
    }

    /// Set the target host and port.
    pub fn with_target(mut self, host: impl Into<String>, port: u16) -> Self {
        let host = host.into();
        self.target_host = if host.is_empty() {
            DEFAULT_TARGET_HOST.to_string()
        } else {
            host
        };
        self.target_port = if port == 0 { DEFAULT_TARGET_PORT } else { port };
        self
    }

    /// Set the retry budget.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the idle poll interval.
    pub fn with_idle_poll_interval(mut self, interval_ms: u64) -> Self {
        self.idle_poll_interval_ms = interval_ms;
        self
    }

    /// Bound every delivery attempt by a timeout.
    pub fn with_request_timeout(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = Some(timeout_ms);
        self
    }

    /// `http://{host}:{port}`, without a trailing slash.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.target_host, self.target_port)
    }

    /// Total delivery attempts a task gets.
    pub fn total_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    pub fn idle_poll_interval(&self) -> Duration {
        self.idle_poll_interval_ms.millis()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(|ms| ms.millis())
    }

    pub fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout_secs.secs()
    }

    /// Validate the dispatch settings and return any errors.
    ///
    /// A zero idle interval is rejected: the dispatcher would poll an empty
    /// queue without ever sleeping.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.target_host.trim().is_empty() {
            errors.push("Target host must not be empty".to_string());
        }

        if self.target_port == 0 {
            errors.push("Target port must be greater than 0".to_string());
        }

        if self.idle_poll_interval_ms == 0 {
            errors.push("Idle poll interval must be greater than 0".to_string());
        }

        if self.request_timeout_ms == Some(0) {
            errors.push("Request timeout must be greater than 0 when set".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub(crate) fn ensure_valid(&self) -> PushqResult<()> {
        self.validate()
            .map_err(|errors| PushqError::config(errors.join("; ")))
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter, overridden by `RUST_LOG` when set
    pub level: LogLevel,

    /// Enable structured JSON logging
    pub json_format: bool,

    /// Enable colored output (ignored if json_format is true)
    pub colored: bool,

    /// Include target module in logs
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            json_format: false,
            colored: true,
            include_targets: false,
        }
    }
}

/// Log level enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level
    Trace,
    /// Debug level
    Debug,
    /// Info level
    Info,
    /// Warn level
    Warn,
    /// Error level
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Helper trait for converting durations in configuration.
pub trait DurationExt {
    /// Convert seconds to Duration
    fn secs(self) -> Duration;
    /// Convert milliseconds to Duration
    fn millis(self) -> Duration;
}

impl DurationExt for u64 {
    fn secs(self) -> Duration {
        Duration::from_secs(self)
    }

    fn millis(self) -> Duration {
        Duration::from_millis(self)
    }
}

impl PushqConfig {
    /// Create a configuration for a local development server.
    pub fn development() -> Self {
        Self {
            dispatch: DispatchConfig::default(),
            logging: LoggingConfig {
                level: LogLevel::Debug,
                colored: true,
                include_targets: true,
                ..Default::default()
            },
        }
    }

    /// Create a configuration for testing: fast idle polling, short shutdown.
    pub fn testing() -> Self {
        Self {
            dispatch: DispatchConfig {
                idle_poll_interval_ms: 10,
                shutdown_timeout_secs: 5,
                ..Default::default()
            },
            logging: LoggingConfig {
                level: LogLevel::Debug,
                colored: false,
                include_targets: true,
                ..Default::default()
            },
        }
    }

    /// Load a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> PushqResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.ensure_valid()?;
        Ok(config)
    }

    /// Validate the configuration and return any errors.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        self.dispatch.validate()
    }

    pub(crate) fn ensure_valid(&self) -> PushqResult<()> {
        self.dispatch.ensure_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PushqConfig::default();
        assert_eq!(config.dispatch.target_host, "localhost");
        assert_eq!(config.dispatch.target_port, 8080);
        assert_eq!(config.dispatch.max_retries, 0);
        assert_eq!(config.dispatch.idle_poll_interval_ms, 500);
        assert_eq!(config.dispatch.request_timeout_ms, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_configure_falls_back_on_empty_values() {
        let dispatch = DispatchConfig::configure("", 0, 0);
        assert_eq!(dispatch.target_host, "localhost");
        assert_eq!(dispatch.target_port, 8080);

        let dispatch = DispatchConfig::configure("api.local", 9090, 2);
        assert_eq!(dispatch.base_url(), "http://api.local:9090");
        assert_eq!(dispatch.total_attempts(), 3);
    }

    #[test]
    fn test_presets_are_valid() {
        let development = PushqConfig::development();
        assert!(matches!(development.logging.level, LogLevel::Debug));
        assert!(development.validate().is_ok());

        let testing = PushqConfig::testing();
        assert_eq!(testing.dispatch.idle_poll_interval_ms, 10);
        assert!(testing.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = PushqConfig::default();
        config.dispatch.idle_poll_interval_ms = 0;
        config.dispatch.request_timeout_ms = Some(0);

        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.contains("Idle poll interval")));
        assert!(errors.iter().any(|e| e.contains("Request timeout")));
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = PushqConfig::from_json_str(
            r#"{"dispatch": {"target_host": "api.local", "max_retries": 4}, "logging": {"level": "warn"}}"#,
        )
        .unwrap();

        assert_eq!(config.dispatch.target_host, "api.local");
        assert_eq!(config.dispatch.target_port, 8080);
        assert_eq!(config.dispatch.max_retries, 4);
        assert_eq!(config.logging.level, LogLevel::Warn);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        let err = PushqConfig::from_json_str(r#"{"dispatch": {"target_host": ""}}"#).unwrap_err();
        assert!(matches!(err, PushqError::Config { .. }));

        let err = PushqConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, PushqError::Serialization(_)));
    }

    #[test]
    fn test_builders() {
        let dispatch = DispatchConfig::default()
            .with_target("example.test", 81)
            .with_max_retries(3)
            .with_idle_poll_interval(250)
            .with_request_timeout(1500);

        assert_eq!(dispatch.base_url(), "http://example.test:81");
        assert_eq!(dispatch.total_attempts(), 4);
        assert_eq!(dispatch.idle_poll_interval(), Duration::from_millis(250));
        assert_eq!(dispatch.request_timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_log_level_maps_to_tracing_level() {
        assert_eq!(tracing::Level::from(LogLevel::Trace), tracing::Level::TRACE);
        assert_eq!(tracing::Level::from(LogLevel::Warn), tracing::Level::WARN);
        assert_eq!(tracing::Level::from(LogLevel::Error), tracing::Level::ERROR);
    }

    #[test]
    fn test_duration_ext() {
        assert_eq!(5u64.secs(), Duration::from_secs(5));
        assert_eq!(1500u64.millis(), Duration::from_millis(1500));
    }
}
