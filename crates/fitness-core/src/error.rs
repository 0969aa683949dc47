//! Error types for the fitness core.
//!
//! Most operations in this crate degrade to a default value instead of
//! failing, so these errors mostly travel between internal layers and end up
//! logged. The shell promotes exactly one condition, missing content, to a
//! user-visible failure.

use crate::config::NetworkConfig;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the fitness core.
#[derive(Debug, Error)]
pub enum FitnessError {
    // Network errors
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("Request timeout after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Rate limited by {service}, retry after {retry_after_secs:?} seconds")]
    RateLimited {
        service: String,
        retry_after_secs: Option<u64>,
    },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Storage errors
    #[error("Storage backend {backend} failed: {message}")]
    Storage { backend: String, message: String },

    // Host bridge errors
    #[error("Host bridge unavailable: {0}")]
    HostUnavailable(String),

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    // Content errors
    #[error("Content unavailable: {message}")]
    ContentUnavailable { message: String },

    // Generic errors
    #[error("{0}")]
    Other(String),
}

/// Result type alias for fitness core operations.
pub type Result<T> = std::result::Result<T, FitnessError>;

impl From<std::io::Error> for FitnessError {
    fn from(err: std::io::Error) -> Self {
        FitnessError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for FitnessError {
    fn from(err: serde_json::Error) -> Self {
        FitnessError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<reqwest::Error> for FitnessError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FitnessError::Timeout(NetworkConfig::REQUEST_TIMEOUT)
        } else {
            FitnessError::Network {
                message: err.to_string(),
                source: Some(err),
            }
        }
    }
}

impl FitnessError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        FitnessError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Create a storage error for the named backend.
    pub fn storage(backend: &str, message: impl Into<String>) -> Self {
        FitnessError::Storage {
            backend: backend.to_string(),
            message: message.into(),
        }
    }

    /// Whether a later attempt could plausibly succeed.
    ///
    /// Nothing in this crate retries on its own; embedders use this to decide
    /// whether a retry button is worth offering.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FitnessError::Network { .. }
                | FitnessError::Timeout(_)
                | FitnessError::RateLimited { .. }
                | FitnessError::ContentUnavailable { .. }
        )
    }
}
