//! Error category classification.
//!
//! Categories let harness code decide whether a failure is worth retrying
//! (a server still booting) or should fail the test run outright.

use std::fmt;

/// High-level categorization of probe errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connection refused, reset, DNS or request timeout.
    /// Generally transient and retryable.
    Network,

    /// The dashboard server answered with a 5xx, 408 or 429.
    /// Generally transient and retryable after delay.
    Server,

    /// The server rejected the request (other 4xx) or sent an unexpected
    /// body. Not retryable.
    Client,

    /// Local process or filesystem failure (spawn, temp dirs, build).
    System,

    /// The harness configuration cannot work (empty command, bad URL).
    Configuration,

    /// The server under test never became healthy or died early.
    Lifecycle,
}

impl ErrorCategory {
    /// Returns true if errors in this category are generally transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Server => "server",
            ErrorCategory::Client => "client",
            ErrorCategory::System => "system",
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::Lifecycle => "lifecycle",
        }
    }

    /// Returns suggested recovery actions for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check that the dashboard server is reachable",
            ErrorCategory::Server => "The server may still be starting. Retry after a short delay",
            ErrorCategory::Client => "Check the request payload against the API",
            ErrorCategory::System => "Check file permissions and that the server command exists",
            ErrorCategory::Configuration => "Check the DASHBOARD_* environment variables",
            ErrorCategory::Lifecycle => "Inspect the server output logged above",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
