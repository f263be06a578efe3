//! The unified error type for client and harness operations.

use super::category::ErrorCategory;
use thiserror::Error;

/// Errors raised by the API client and the server harness.
///
/// SSE parsing never produces one of these; see [`crate::sse`].
#[derive(Debug, Error)]
pub enum ProbeError {
    /// HTTP transport failure (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not deserialize
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Local filesystem or process I/O failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Server returned a non-success status
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Server did not answer its health check in time
    #[error("Server at {url} not ready within {timeout_secs}s")]
    StartupTimeout { url: String, timeout_secs: u64 },

    /// Server process exited before becoming healthy
    #[error("Server process exited during startup ({status})")]
    ServerExited { status: String },

    /// Server command could not be spawned
    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// One-time build step failed
    #[error("Build command `{command}` failed ({status})")]
    Build { command: String, status: String },

    /// Empty or unusable command line
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Operation needs a running server
    #[error("Server not started")]
    NotStarted,
}

impl ProbeError {
    /// Build a `ServerError` from a status and raw body.
    ///
    /// Bodies shaped like `{"error": "..."}` are unwrapped to the message.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or_else(|| {
                if body.is_empty() {
                    "Unknown error".to_string()
                } else {
                    body.to_string()
                }
            });
        ProbeError::ServerError { status, message }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ProbeError::Http(e) if e.is_decode() => ErrorCategory::Client,
            ProbeError::Http(_) => ErrorCategory::Network,
            ProbeError::Json(_) => ErrorCategory::Client,
            ProbeError::Io(_) | ProbeError::Spawn { .. } | ProbeError::Build { .. } => {
                ErrorCategory::System
            }
            ProbeError::ServerError { status, .. } => {
                if *status >= 500 || *status == 408 || *status == 429 {
                    ErrorCategory::Server
                } else {
                    ErrorCategory::Client
                }
            }
            ProbeError::StartupTimeout { .. } | ProbeError::ServerExited { .. } => {
                ErrorCategory::Lifecycle
            }
            ProbeError::InvalidCommand(_) | ProbeError::NotStarted => {
                ErrorCategory::Configuration
            }
        }
    }

    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }

    /// HTTP status of a server error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProbeError::ServerError { status, .. } => Some(*status),
            ProbeError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Type alias for Results using ProbeError.
pub type ProbeResult<T> = Result<T, ProbeError>;
