//! Error types for video-dl
//!
//! This module provides the error taxonomy shared by the remote gateway, the
//! reconciliation engine and the client facade:
//! - [`RemoteError`] - failures reported by (or while talking to) the worker API
//! - [`Error`] - the crate-wide error, wrapping remote, configuration and local
//!   validation failures
//! - Machine-readable error codes for surfacing messages to a UI

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::TaskId;

/// Result type alias for video-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Classification of a remote failure
///
/// The code decides how a failure propagates: `InvalidInput` is shown to the
/// user and never retried, `Unavailable` is transient (the next poll tick is
/// the implicit retry for status refreshes), and `RemoteRejected` is a
/// definitive answer from the server for a specific action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Bad URL, unsupported service or any other 4xx answer to a request
    InvalidInput,
    /// Network failure, timeout or unreachable server
    Unavailable,
    /// The server returned a definitive error for an action
    RemoteRejected,
}

impl ErrorCode {
    /// Stable string form of the code
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidInput => "invalid_input",
            ErrorCode::Unavailable => "unavailable",
            ErrorCode::RemoteRejected => "remote_rejected",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a remote gateway operation
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct RemoteError {
    /// Failure classification
    pub code: ErrorCode,
    /// Human-readable message (taken from the server's error body when present)
    pub message: String,
    /// HTTP status of the response, if one was received
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl RemoteError {
    /// Create a new remote error without an HTTP status
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
        }
    }

    /// Create an `InvalidInput` error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Create an `Unavailable` error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unavailable, message)
    }

    /// Create a `RemoteRejected` error
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RemoteRejected, message)
    }

    /// Attach the HTTP status the error was derived from
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Whether the server answered "not found" for the requested resource
    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }

    /// Whether the failure is transient (network, timeout)
    pub fn is_transient(&self) -> bool {
        self.code == ErrorCode::Unavailable
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(error: reqwest::Error) -> Self {
        // A decode failure means the server answered, just not with what we expected
        if error.is_decode() {
            return RemoteError::rejected(format!("malformed response: {}", error));
        }
        let message = if error.is_timeout() {
            format!("request timed out: {}", error)
        } else {
            format!("network error: {}", error)
        };
        let remote = RemoteError::unavailable(message);
        match error.status() {
            Some(status) => remote.with_status(status.as_u16()),
            None => remote,
        }
    }
}

/// Main error type for video-dl
#[derive(Debug, Error)]
pub enum Error {
    /// The worker API failed or rejected the request
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "api.base_url")
        key: Option<String>,
    },

    /// Input rejected locally before any request was made
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Task is not tracked by the engine
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Machine-readable error code, suitable for programmatic handling by a UI
    pub fn error_code(&self) -> &str {
        match self {
            Error::Remote(e) => e.code.as_str(),
            Error::Config { .. } => "config_error",
            Error::InvalidInput(_) => "invalid_input",
            Error::NotFound(_) => "not_found",
            Error::Other(_) => "internal_error",
        }
    }

    /// The remote failure, if this error came from the worker API
    pub fn as_remote(&self) -> Option<&RemoteError> {
        match self {
            Error::Remote(e) => Some(e),
            _ => None,
        }
    }
}
