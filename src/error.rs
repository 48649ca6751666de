//! Error types for pushq operations.

use thiserror::Error;

/// Result type used throughout pushq.
pub type PushqResult<T> = Result<T, PushqError>;

/// Main error type for pushq operations.
///
/// Enqueueing never fails, so nothing here describes an acceptance error.
/// Delivery errors are resolved inside the dispatcher and only ever surface
/// as diagnostics.
#[derive(Error, Debug)]
pub enum PushqError {
    /// No response was obtained from the target host
    #[error("Transport error: {message}")]
    Transport {
        /// Error message
        message: String,
        /// Optional underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// HTTP method outside of get/post/head/put/delete
    #[error("Unsupported task method '{method}'")]
    InvalidMethod {
        /// The method as given by the caller
        method: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Logging subscriber could not be installed
    #[error("Logging error: {message}")]
    Logging {
        /// Error message
        message: String,
    },

    /// Dispatcher is already running
    #[error("Dispatcher is already running")]
    AlreadyRunning,

    /// Dispatcher is not running
    #[error("Dispatcher is not running")]
    NotRunning,
}

impl PushqError {
    /// Create a new transport error
    pub fn transport<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error means the request never got a response.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

impl From<reqwest::Error> for PushqError {
    fn from(error: reqwest::Error) -> Self {
        Self::transport(error.to_string(), error)
    }
}
