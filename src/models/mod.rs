//! Wire types for the dashboard server API. Field names are camelCase on
//! the wire.

mod chat;
mod health;
mod response;
mod workspace;

pub use chat::{
    ChatHistory, ChatMessage, ChatRequest, ChatResponse, ChatRole, PlanRequest, PlanResponse,
};
pub use health::{
    CleanupStatus, HealthConfiguration, OverallStatus, ProcessHealthReport, WorkspaceHealth,
};
pub use response::ApiResponse;
pub use workspace::{
    CreateSessionRequest, CreateWorkspaceRequest, FolderEntry, FolderListing, ModelList, Session,
    Workspace,
};
