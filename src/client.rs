//! HTTP client for the dashboard server API.
//!
//! Raw methods (`get`, `post_json`, `delete`, ...) return an [`ApiResponse`]
//! for every status code so tests can assert on 4xx/5xx bodies. Typed
//! methods deserialize 2xx bodies and turn anything else into
//! [`ProbeError::ServerError`].

use crate::config::HarnessConfig;
use crate::error::{ProbeError, ProbeResult};
use crate::models::{
    ApiResponse, ChatHistory, ChatMessage, ChatRequest, ChatResponse, CreateSessionRequest,
    CreateWorkspaceRequest, FolderListing, ModelList, PlanRequest, PlanResponse,
    ProcessHealthReport, Session, Workspace,
};
use crate::sse::{collect_from_many, parse_streaming_deltas, SseData, StreamingDeltas};
use bytes::{Bytes, BytesMut};
use futures_util::stream::{self, Stream};
use futures_util::StreamExt;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use std::pin::Pin;
use std::time::Duration;

/// Stream of decoded `text/event-stream` chunks.
pub type ChunkStream = Pin<Box<dyn Stream<Item = ProbeResult<String>> + Send>>;

/// Everything read from one streaming chat response.
#[derive(Debug, Clone, Default)]
pub struct StreamCapture {
    /// Text chunks in arrival order
    pub chunks: Vec<String>,
    /// Every event across all chunks
    pub events: Vec<SseData>,
    /// OpenAI-style deltas across all chunks
    pub deltas: StreamingDeltas,
}

impl StreamCapture {
    pub fn from_chunks(chunks: Vec<String>) -> Self {
        let events = collect_from_many(&chunks);
        let mut deltas = StreamingDeltas::default();
        for chunk in &chunks {
            deltas.merge(parse_streaming_deltas(chunk));
        }
        Self {
            chunks,
            events,
            deltas,
        }
    }

    /// The whole body as received.
    pub fn body(&self) -> String {
        self.chunks.concat()
    }
}

/// Client for one dashboard server.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    /// Base URL without trailing slash
    pub base_url: String,
    client: Client,
}

impl DashboardClient {
    /// Create a client with reqwest's default settings.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize(base_url.into()),
            client: Client::new(),
        }
    }

    /// Create a client with a per-request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> ProbeResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: normalize(base_url.into()),
            client,
        })
    }

    /// Create a client from harness configuration.
    ///
    /// Fails with `NotStarted` when the configuration names no server.
    pub fn from_config(config: &HarnessConfig) -> ProbeResult<Self> {
        let base_url = config.base_url.clone().ok_or(ProbeError::NotStarted)?;
        Self::with_timeout(base_url, config.request_timeout())
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    // ---- raw requests -------------------------------------------------

    pub async fn get(&self, path: &str) -> ProbeResult<ApiResponse> {
        self.send(self.client.get(self.url(path))).await
    }

    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ProbeResult<ApiResponse> {
        self.send(self.client.post(self.url(path)).json(body)).await
    }

    /// POST an arbitrary body, e.g. malformed JSON.
    pub async fn post_raw(
        &self,
        path: &str,
        content_type: &str,
        body: impl Into<String>,
    ) -> ProbeResult<ApiResponse> {
        let request = self
            .client
            .post(self.url(path))
            .header("Content-Type", content_type)
            .body(body.into());
        self.send(request).await
    }

    pub async fn delete(&self, path: &str) -> ProbeResult<ApiResponse> {
        self.send(self.client.delete(self.url(path))).await
    }

    async fn send(&self, request: RequestBuilder) -> ProbeResult<ApiResponse> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let content_type = content_type(&response);
        let text = response.text().await?;
        tracing::debug!(status, bytes = text.len(), "API response");
        Ok(ApiResponse::new(status, content_type, text))
    }

    // ---- workspaces ---------------------------------------------------

    pub async fn list_workspaces(&self) -> ProbeResult<Vec<Workspace>> {
        self.get("/api/workspaces").await?.into_result()
    }

    pub async fn create_workspace(&self, folder: &str, model: &str) -> ProbeResult<Workspace> {
        let body = CreateWorkspaceRequest::new(folder, model);
        self.post_json("/api/workspaces", &body)
            .await?
            .into_result()
    }

    pub async fn get_workspace(&self, workspace_id: &str) -> ProbeResult<Workspace> {
        self.get(&format!("/api/workspaces/{}", workspace_id))
            .await?
            .into_result()
    }

    /// `DELETE /api/workspaces/{id}`
    pub async fn delete_workspace(&self, workspace_id: &str) -> ProbeResult<ApiResponse> {
        self.delete(&format!("/api/workspaces/{}", workspace_id))
            .await
    }

    /// `DELETE /api/workspaces?id=` stops the workspace's process.
    pub async fn stop_workspace(&self, workspace_id: &str) -> ProbeResult<ApiResponse> {
        self.delete(&format!(
            "/api/workspaces?id={}",
            urlencoding::encode(workspace_id)
        ))
        .await
    }

    // ---- sessions -----------------------------------------------------

    pub async fn list_sessions(&self, workspace_id: &str) -> ProbeResult<Vec<Session>> {
        self.get(&format!("/api/workspaces/{}/sessions", workspace_id))
            .await?
            .into_result()
    }

    pub async fn create_session(&self, workspace_id: &str, model: &str) -> ProbeResult<Session> {
        let body = CreateSessionRequest {
            model: model.to_string(),
        };
        self.post_json(&format!("/api/workspaces/{}/sessions", workspace_id), &body)
            .await?
            .into_result()
    }

    pub async fn get_session(&self, workspace_id: &str, session_id: &str) -> ProbeResult<Session> {
        self.get(&session_path(workspace_id, session_id))
            .await?
            .into_result()
    }

    // ---- chat ---------------------------------------------------------

    pub async fn send_chat(
        &self,
        workspace_id: &str,
        session_id: &str,
        messages: Vec<ChatMessage>,
    ) -> ProbeResult<ChatResponse> {
        let body = ChatRequest::new(messages);
        self.post_json(&chat_path(workspace_id, session_id), &body)
            .await?
            .into_result()
    }

    pub async fn chat_history(
        &self,
        workspace_id: &str,
        session_id: &str,
    ) -> ProbeResult<ChatHistory> {
        self.get(&chat_path(workspace_id, session_id))
            .await?
            .into_result()
    }

    /// Send a streaming chat request and return the body as text chunks.
    ///
    /// Each yielded chunk ends on a line boundary, so a `data:` line is never
    /// split across two items.
    pub async fn chat_stream(
        &self,
        workspace_id: &str,
        session_id: &str,
        messages: Vec<ChatMessage>,
    ) -> ProbeResult<ChunkStream> {
        let request = self
            .client
            .post(self.url(&chat_path(workspace_id, session_id)))
            .header("Accept", "text/event-stream")
            .json(&ChatRequest::streaming(messages));
        self.open_stream(request).await
    }

    /// Run a streaming chat to completion.
    pub async fn collect_chat_stream(
        &self,
        workspace_id: &str,
        session_id: &str,
        messages: Vec<ChatMessage>,
    ) -> ProbeResult<StreamCapture> {
        let stream = self.chat_stream(workspace_id, session_id, messages).await?;
        let chunks = collect_chunks(stream).await?;
        Ok(StreamCapture::from_chunks(chunks))
    }

    /// Open any `GET` event-stream endpoint.
    pub async fn event_stream(&self, path: &str) -> ProbeResult<ChunkStream> {
        let request = self
            .client
            .get(self.url(path))
            .header("Accept", "text/event-stream");
        self.open_stream(request).await
    }

    async fn open_stream(&self, request: RequestBuilder) -> ProbeResult<ChunkStream> {
        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProbeError::from_response(status, &body));
        }

        tracing::debug!(content_type = ?content_type(&response), "Event stream opened");
        Ok(line_chunks(response.bytes_stream()))
    }

    // ---- misc ---------------------------------------------------------

    pub async fn list_models(&self, folder: &str) -> ProbeResult<ModelList> {
        self.get(&format!("/api/models?folder={}", urlencoding::encode(folder)))
            .await?
            .into_result()
    }

    /// List sub-folders of `path`, or of the server's default root.
    pub async fn list_folders(&self, path: Option<&str>) -> ProbeResult<FolderListing> {
        let route = match path {
            Some(p) => format!("/api/folders?path={}", urlencoding::encode(p)),
            None => "/api/folders".to_string(),
        };
        self.get(&route).await?.into_result()
    }

    pub async fn process_health(&self) -> ProbeResult<ProcessHealthReport> {
        self.get("/api/health/processes").await?.into_result()
    }

    pub async fn plan(&self, request: &PlanRequest) -> ProbeResult<PlanResponse> {
        self.post_json("/api/agent/plan", request)
            .await?
            .into_result()
    }
}

/// Drain a chunk stream, stopping at the first error.
pub async fn collect_chunks(mut stream: ChunkStream) -> ProbeResult<Vec<String>> {
    let mut chunks = Vec::new();
    while let Some(chunk) = stream.next().await {
        chunks.push(chunk?);
    }
    Ok(chunks)
}

/// Re-chunk a byte stream on line boundaries.
///
/// Bytes after the last `\n` are held back until more data arrives, which
/// also keeps multi-byte UTF-8 sequences whole. The tail is flushed (lossily)
/// when the body ends.
fn line_chunks<S>(bytes_stream: S) -> ChunkStream
where
    S: Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
{
    let chunks = stream::unfold(
        (Box::pin(bytes_stream), BytesMut::new(), false),
        |(mut bytes_stream, mut buffer, done)| async move {
            if done {
                return None;
            }
            loop {
                match bytes_stream.next().await {
                    Some(Ok(bytes)) => {
                        buffer.extend_from_slice(&bytes);
                        if let Some(pos) = buffer.iter().rposition(|b| *b == b'\n') {
                            let complete = buffer.split_to(pos + 1);
                            let text = String::from_utf8_lossy(&complete).into_owned();
                            return Some((Ok(text), (bytes_stream, buffer, false)));
                        }
                    }
                    Some(Err(e)) => {
                        return Some((Err(ProbeError::Http(e)), (bytes_stream, buffer, true)));
                    }
                    None => {
                        if buffer.is_empty() {
                            return None;
                        }
                        let text = String::from_utf8_lossy(&buffer).into_owned();
                        buffer.clear();
                        return Some((Ok(text), (bytes_stream, buffer, true)));
                    }
                }
            }
        },
    );
    Box::pin(chunks)
}

fn normalize(mut base_url: String) -> String {
    while base_url.ends_with('/') {
        base_url.pop();
    }
    base_url
}

fn content_type(response: &Response) -> Option<String> {
    response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

fn session_path(workspace_id: &str, session_id: &str) -> String {
    format!("/api/workspaces/{}/sessions/{}", workspace_id, session_id)
}

fn chat_path(workspace_id: &str, session_id: &str) -> String {
    format!("{}/chat", session_path(workspace_id, session_id))
}
