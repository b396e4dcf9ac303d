//! Error types for monitors and reporters.

use thiserror::Error;

/// Errors that can occur while building a reporter or reporting a run.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The monitor type tag does not name a supported backend.
    #[error("unknown monitor type: '{0}'")]
    UnknownType(String),

    /// One or more required settings are missing or empty.
    #[error("{backend} configuration is missing required fields ({})", .missing.join(", "))]
    IncompleteConfig {
        backend: &'static str,
        missing: Vec<&'static str>,
    },

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Connection or health check failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The target bucket does not exist or could not be looked up.
    #[error("bucket '{bucket}' validation failed: {reason}")]
    Bucket { bucket: String, reason: String },

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// The backend rejected a write.
    #[error("write rejected with status {status}: {message}")]
    Write { status: u16, message: String },

    /// The reporter was already closed.
    #[error("reporter is closed")]
    Closed,
}

impl From<reqwest::Error> for MonitorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MonitorError::Timeout
        } else if err.is_connect() {
            MonitorError::Connection(err.to_string())
        } else {
            MonitorError::Http(err.to_string())
        }
    }
}
