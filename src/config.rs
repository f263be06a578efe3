//! Harness configuration.
//!
//! Use the builder methods to customize how the server under test is found
//! or started, or load everything from `DASHBOARD_*` environment variables.
//!
//! ```ignore
//! use dashboard_probe::config::HarnessConfig;
//!
//! let config = HarnessConfig::from_env()
//!     .with_startup_timeout_secs(90)
//!     .with_worker_id("w1");
//! ```

use std::time::Duration;

pub const DEFAULT_TEST_MODEL: &str = "anthropic/claude-3-5-haiku-20241022";
pub const DEFAULT_SERVER_COMMAND: &str = "npm run dev";
pub const DEFAULT_HEALTH_PATH: &str = "/api/workspaces";
pub const DEFAULT_STARTUP_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_WORKER_ID: &str = "main";

/// Configuration for locating or launching the dashboard server.
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    /// Existing server to attach to; when set nothing is spawned
    pub base_url: Option<String>,
    /// Program and arguments that start the server
    pub server_command: Vec<String>,
    /// Optional command run once per process before the first spawn
    pub build_command: Option<Vec<String>>,
    /// Extra environment for the spawned server
    pub env: Vec<(String, String)>,
    /// Path polled until the server responds
    pub health_path: String,
    pub startup_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Model id used by fixtures
    pub test_model: String,
    /// Identifier of this test worker, used to isolate temp folders
    pub worker_id: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            server_command: split_command(DEFAULT_SERVER_COMMAND),
            build_command: None,
            env: Vec::new(),
            health_path: DEFAULT_HEALTH_PATH.to_string(),
            startup_timeout_secs: DEFAULT_STARTUP_TIMEOUT_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            test_model: DEFAULT_TEST_MODEL.to_string(),
            worker_id: DEFAULT_WORKER_ID.to_string(),
        }
    }
}

impl HarnessConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach to an already-running server instead of spawning one.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into().trim_end_matches('/').to_string());
        self
    }

    /// Set the server command from a whitespace-separated command line.
    pub fn with_server_command(mut self, command: &str) -> Self {
        self.server_command = split_command(command);
        self
    }

    /// Set the server program and arguments explicitly.
    pub fn with_server_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.server_command = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_build_command(mut self, command: &str) -> Self {
        let parts = split_command(command);
        self.build_command = (!parts.is_empty()).then_some(parts);
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn with_health_path(mut self, path: impl Into<String>) -> Self {
        self.health_path = path.into();
        self
    }

    pub fn with_startup_timeout_secs(mut self, secs: u64) -> Self {
        self.startup_timeout_secs = secs;
        self
    }

    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    pub fn with_test_model(mut self, model: impl Into<String>) -> Self {
        self.test_model = model.into();
        self
    }

    pub fn with_worker_id(mut self, worker_id: impl Into<String>) -> Self {
        self.worker_id = worker_id.into();
        self
    }

    pub fn startup_timeout(&self) -> Duration {
        Duration::from_secs(self.startup_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Create config from `DASHBOARD_*` environment variables.
    ///
    /// Unset variables keep their defaults. Unparseable numbers are logged
    /// and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(url) = non_empty_var("DASHBOARD_BASE_URL") {
            config = config.with_base_url(url);
        }
        if let Some(cmd) = non_empty_var("DASHBOARD_SERVER_CMD") {
            config = config.with_server_command(&cmd);
        }
        if let Some(cmd) = non_empty_var("DASHBOARD_BUILD_CMD") {
            config = config.with_build_command(&cmd);
        }
        if let Some(model) = non_empty_var("DASHBOARD_TEST_MODEL") {
            config.test_model = model;
        }
        if let Some(secs) = secs_var("DASHBOARD_STARTUP_TIMEOUT_SECS") {
            config.startup_timeout_secs = secs;
        }
        if let Some(secs) = secs_var("DASHBOARD_REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = secs;
        }
        if let Some(worker) =
            non_empty_var("DASHBOARD_WORKER_ID").or_else(|| non_empty_var("PROBE_WORKER_ID"))
        {
            config.worker_id = worker;
        }

        config
    }
}

/// Split a command line on whitespace. No quoting support.
pub fn split_command(command: &str) -> Vec<String> {
    command.split_whitespace().map(String::from).collect()
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn secs_var(key: &str) -> Option<u64> {
    let raw = non_empty_var(key)?;
    match raw.trim().parse::<u64>() {
        Ok(secs) => Some(secs),
        Err(e) => {
            tracing::warn!("Ignoring {}={:?}: {}", key, raw, e);
            None
        }
    }
}
