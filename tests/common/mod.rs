//! Common test utilities for integration tests.
//!
//! SSE body builders and canned dashboard API responses for wiremock.

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::ResponseTemplate;

pub const WORKSPACE_ID: &str = "ws-test-1";
pub const SESSION_ID: &str = "session-test-1";
pub const MODEL: &str = "anthropic/claude-3-5-haiku-20241022";

/// One `data: ` line followed by the blank line that ends an SSE event.
pub fn sse_event(payload: &Value) -> String {
    format!("data: {}\n\n", payload)
}

/// An SSE body made of the given payloads.
pub fn sse_body(payloads: &[Value]) -> String {
    payloads.iter().map(sse_event).collect()
}

/// An OpenAI-style content delta event.
pub fn content_delta(text: &str) -> Value {
    json!({"choices": [{"delta": {"content": text}}]})
}

/// An OpenAI-style tool-call delta event.
pub fn tool_call_delta(index: u64, id: Option<&str>, name: Option<&str>, args: &str) -> Value {
    let mut function = json!({"arguments": args});
    if let Some(name) = name {
        function["name"] = json!(name);
    }
    let mut call = json!({"index": index, "function": function});
    if let Some(id) = id {
        call["id"] = json!(id);
    }
    json!({"choices": [{"delta": {"tool_calls": [call]}}]})
}

pub fn sse_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/event-stream")
        .set_body_string(body)
}

pub fn workspace_json(folder: &str) -> Value {
    json!({
        "id": WORKSPACE_ID,
        "folder": folder,
        "model": MODEL,
        "port": 4100,
        "status": "running",
        "sessions": []
    })
}

pub fn session_json() -> Value {
    json!({
        "id": SESSION_ID,
        "workspaceId": WORKSPACE_ID,
        "model": MODEL,
        "port": 4100,
        "createdAt": "2024-01-01T00:00:00Z",
        "lastActivity": "2024-01-01T00:00:00Z",
        "status": "active"
    })
}

pub fn error_json(message: &str) -> Value {
    json!({"error": message})
}
