//! One server per test binary, started on first use.

use super::server::TestServer;
use crate::config::HarnessConfig;
use crate::error::{ProbeError, ProbeResult};
use std::sync::Arc;
use tokio::sync::OnceCell;

static SHARED: OnceCell<Arc<TestServer>> = OnceCell::const_new();

/// Return the process-wide server, starting (or attaching) it on first call.
///
/// Later calls ignore `config`. Build a fresh `DashboardClient` per test
/// rather than sharing one, since each `#[tokio::test]` has its own runtime.
///
/// Fails with [`ProbeError::NotStarted`] once [`shutdown_shared`] stopped it;
/// the shared server is never restarted.
pub async fn shared_server(config: &HarnessConfig) -> ProbeResult<Arc<TestServer>> {
    let server = SHARED
        .get_or_try_init(|| async {
            let server = TestServer::from_config(config).await?;
            tracing::info!(base_url = server.base_url(), "Shared server ready");
            Ok::<_, ProbeError>(Arc::new(server))
        })
        .await?;
    if server.is_stopped() {
        return Err(ProbeError::NotStarted);
    }
    Ok(Arc::clone(server))
}

/// Stop the shared server if one was started.
///
/// Statics are never dropped, so call this from a final test or the server
/// process outlives the test binary.
pub async fn shutdown_shared() -> ProbeResult<()> {
    match SHARED.get() {
        Some(server) => server.stop().await,
        None => Ok(()),
    }
}
