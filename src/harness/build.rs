//! One-time build step before the first server spawn.

use crate::error::{ProbeError, ProbeResult};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::process::Stdio;
use tokio::sync::Mutex;

/// Outcome of every build that ran, keyed by its command line. A failed
/// build keeps its exit status.
static BUILD_OUTCOMES: Lazy<Mutex<HashMap<Vec<String>, Result<(), String>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Run `command` the first time it is requested in this process.
///
/// Concurrent callers wait on the lock; everyone observes the first run's
/// outcome, including its failure. A command that could not be spawned is
/// not recorded, so the next caller tries again.
pub async fn run_build_once(command: &[String]) -> ProbeResult<()> {
    let mut outcomes = BUILD_OUTCOMES.lock().await;
    if !outcomes.contains_key(command) {
        let outcome = run_build(command).await?;
        outcomes.insert(command.to_vec(), outcome);
    }

    match outcomes.get_key_value(command) {
        Some((ran, Err(status))) => Err(ProbeError::Build {
            command: ran.join(" "),
            status: status.clone(),
        }),
        _ => Ok(()),
    }
}

/// Run the build; `Ok(Err(status))` is a build that ran and failed.
async fn run_build(command: &[String]) -> ProbeResult<Result<(), String>> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| ProbeError::InvalidCommand("empty build command".to_string()))?;

    tracing::info!(command = %command.join(" "), "Running build");
    let output = tokio::process::Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|source| ProbeError::Spawn {
            command: command.join(" "),
            source,
        })?;

    if output.status.success() {
        tracing::info!("Build finished");
        Ok(Ok(()))
    } else {
        tracing::warn!(
            status = %output.status,
            stderr = %String::from_utf8_lossy(&output.stderr),
            "Build failed"
        );
        Ok(Err(output.status.to_string()))
    }
}
