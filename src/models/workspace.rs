use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body for `POST /api/workspaces`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateWorkspaceRequest {
    pub folder: String,
    pub model: String,
}

impl CreateWorkspaceRequest {
    pub fn new(folder: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            model: model.into(),
        }
    }
}

/// A workspace as returned by the dashboard server.
///
/// One workspace owns one assistant process (on `port`) rooted at `folder`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: String,
    pub folder: String,
    pub model: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub sessions: Vec<Session>,
    /// Fields not modelled here
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body for `POST /api/workspaces/{id}/sessions`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateSessionRequest {
    pub model: String,
}

/// A chat session inside a workspace
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub workspace_id: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub created_at: Option<Value>,
    #[serde(default)]
    pub last_activity: Option<Value>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of `GET /api/folders`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FolderEntry {
    pub name: String,
    pub path: String,
}

/// Response of `GET /api/folders[?path=]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FolderListing {
    pub current_path: String,
    #[serde(default)]
    pub parent_path: Option<String>,
    pub folders: Vec<FolderEntry>,
}

/// Response of `GET /api/models?folder=`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelList {
    pub models: Vec<String>,
    pub folder: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_workspace_deserializes_with_extra_fields() {
        let ws: Workspace = serde_json::from_value(json!({
            "id": "ws-1",
            "folder": "/tmp/project",
            "model": "anthropic/claude-3-5-haiku-20241022",
            "port": 4100,
            "status": "running",
            "sessions": [],
            "createdAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(ws.id, "ws-1");
        assert_eq!(ws.port, Some(4100));
        assert!(ws.sessions.is_empty());
        assert_eq!(ws.extra["createdAt"], json!("2024-01-01T00:00:00Z"));
    }

    #[test]
    fn test_session_camel_case() {
        let session: Session = serde_json::from_value(json!({
            "id": "s-1",
            "workspaceId": "ws-1",
            "model": "m",
            "port": 4100,
            "createdAt": 1700000000000u64,
            "lastActivity": "2024-01-01T00:00:00Z",
            "status": "active"
        }))
        .unwrap();

        assert_eq!(session.workspace_id, "ws-1");
        assert_eq!(session.created_at, Some(json!(1700000000000u64)));
        assert!(session.extra.is_empty());
    }

    #[test]
    fn test_folder_listing() {
        let listing: FolderListing = serde_json::from_value(json!({
            "currentPath": "/home",
            "folders": [{"name": "a", "path": "/home/a"}]
        }))
        .unwrap();
        assert_eq!(listing.current_path, "/home");
        assert_eq!(listing.parent_path, None);
        assert_eq!(listing.folders[0].path, "/home/a");
    }

    #[test]
    fn test_create_request_serializes() {
        let req = CreateWorkspaceRequest::new("/tmp/x", "m");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"folder": "/tmp/x", "model": "m"})
        );
    }
}
