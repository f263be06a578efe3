//! Workspaces and sessions created for one test and removed afterwards.
//!
//! ```ignore
//! let ws = WorkspaceFixture::create(&client, &server, &config).await?;
//! let session = SessionFixture::create(&client, &ws.workspace.id, &config.test_model).await?;
//! // ...
//! ws.cleanup().await;
//! ```

use super::server::TestServer;
use crate::client::DashboardClient;
use crate::config::HarnessConfig;
use crate::error::ProbeResult;
use crate::models::{Session, Workspace};
use std::path::PathBuf;

/// A workspace rooted at a fresh test folder.
pub struct WorkspaceFixture {
    pub workspace: Workspace,
    pub folder: PathBuf,
    client: DashboardClient,
}

impl WorkspaceFixture {
    /// Create a test folder with a README and a workspace on it.
    pub async fn create(
        client: &DashboardClient,
        server: &TestServer,
        config: &HarnessConfig,
    ) -> ProbeResult<Self> {
        let name = format!("test_project_{}", uuid::Uuid::new_v4().simple());
        let folder = server.test_folder(&name)?;
        let workspace = client
            .create_workspace(&folder.to_string_lossy(), &config.test_model)
            .await?;
        tracing::debug!(workspace_id = %workspace.id, folder = %folder.display(), "Workspace fixture created");

        Ok(Self {
            workspace,
            folder,
            client: client.clone(),
        })
    }

    pub fn id(&self) -> &str {
        &self.workspace.id
    }

    /// Stop the workspace. Failures are logged, never raised.
    pub async fn cleanup(self) {
        match self.client.stop_workspace(&self.workspace.id).await {
            Ok(resp) if resp.is_success() || resp.status == 404 => {}
            Ok(resp) => tracing::warn!(
                workspace_id = %self.workspace.id,
                status = resp.status,
                "Workspace cleanup returned an error"
            ),
            Err(e) => tracing::warn!(workspace_id = %self.workspace.id, error = %e, "Workspace cleanup failed"),
        }
    }
}

/// A session inside an existing workspace.
///
/// Sessions go away with their workspace, so there is no cleanup.
pub struct SessionFixture {
    pub session: Session,
}

impl SessionFixture {
    pub async fn create(
        client: &DashboardClient,
        workspace_id: &str,
        model: &str,
    ) -> ProbeResult<Self> {
        let session = client.create_session(workspace_id, model).await?;
        Ok(Self { session })
    }

    pub fn id(&self) -> &str {
        &self.session.id
    }

    pub fn workspace_id(&self) -> &str {
        &self.session.workspace_id
    }
}
