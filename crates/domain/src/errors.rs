//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for transtat
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail")]
pub enum ReportError {
    /// Transport-level failure: timeout, connection refused, DNS, TLS.
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered with a non-success status code.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ReportError {
    /// Whether this failure is worth retrying.
    ///
    /// Transport failures and server-side statuses (5xx, plus 429) are
    /// transient; any other API status is a permanent client error, and
    /// everything else is a programming or environment problem that a
    /// retry cannot fix.
    pub fn is_transient(&self) -> bool {
        match self {
            ReportError::Network(_) => true,
            ReportError::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

/// Result type alias for transtat operations
pub type Result<T> = std::result::Result<T, ReportError>;
