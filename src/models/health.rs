//! Types for `GET /api/health/processes`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OverallStatus {
    pub status: String,
    pub total_workspaces: u64,
    pub healthy_processes: u64,
    pub orphaned_processes: u64,
    #[serde(default)]
    pub status_counts: Map<String, Value>,
}

/// Which shutdown/cleanup hooks the server has installed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CleanupStatus {
    pub shutdown_manager_initialized: bool,
    pub process_cleanup_initialized: bool,
    pub signal_handlers_initialized: bool,
    pub exception_handlers_initialized: bool,
    pub is_shutting_down: bool,
}

impl CleanupStatus {
    /// All hooks installed and not shutting down.
    pub fn is_ready(&self) -> bool {
        self.shutdown_manager_initialized
            && self.process_cleanup_initialized
            && self.signal_handlers_initialized
            && self.exception_handlers_initialized
            && !self.is_shutting_down
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthConfiguration {
    pub enable_process_monitoring: Value,
    pub workspace_cleanup_timeout: Value,
    pub workspace_retry_attempts: Value,
    pub enable_verbose_logging: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceHealth {
    pub id: String,
    pub folder: String,
    pub model: String,
    pub status: String,
    pub session_count: u64,
    pub has_process: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessHealthReport {
    pub timestamp: Value,
    pub overall: OverallStatus,
    pub cleanup: CleanupStatus,
    pub configuration: HealthConfiguration,
    pub workspaces: Vec<WorkspaceHealth>,
}

impl ProcessHealthReport {
    pub fn workspace(&self, id: &str) -> Option<&WorkspaceHealth> {
        self.workspaces.iter().find(|w| w.id == id)
    }
}
