use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Role of a chat message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

/// A single message in a chat request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Body for `POST /api/workspaces/{ws}/sessions/{session}/chat`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

impl ChatRequest {
    /// Non-streaming request
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            stream: false,
        }
    }

    /// Streaming (`text/event-stream`) request
    pub fn streaming(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            stream: true,
        }
    }
}

/// Non-streaming chat reply.
///
/// `message` is the assistant message exactly as the server sent it; its
/// `parts` carry text and tool invocations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub message: Value,
    pub session_id: String,
    pub workspace_id: String,
    #[serde(default)]
    pub timestamp: Option<Value>,
}

impl ChatResponse {
    /// Message parts, or an empty slice when absent.
    pub fn parts(&self) -> &[Value] {
        self.message
            .get("parts")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Parts of type `tool`.
    pub fn tool_parts(&self) -> Vec<&Value> {
        self.parts()
            .iter()
            .filter(|part| part.get("type").and_then(Value::as_str) == Some("tool"))
            .collect()
    }
}

/// Response of `GET .../chat` (history)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatHistory {
    pub workspace_id: String,
    pub session_id: String,
    pub messages: Vec<Value>,
    #[serde(default)]
    pub timestamp: Option<Value>,
}

/// Body for `POST /api/agent/plan`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub prompt: String,
    pub planning_model: String,
    pub workspace_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanResponse {
    pub plan: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_request_shape() {
        let req = ChatRequest::streaming(vec![ChatMessage::user("hi")]);
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"messages": [{"role": "user", "content": "hi"}], "stream": true})
        );
        assert!(!ChatRequest::new(vec![]).stream);
    }

    #[test]
    fn test_chat_response_tool_parts() {
        let resp: ChatResponse = serde_json::from_value(json!({
            "message": {"parts": [
                {"type": "text", "text": "Listing files"},
                {"type": "tool", "tool": "list", "state": {"input": {"path": "."}}}
            ]},
            "sessionId": "s",
            "workspaceId": "w",
            "timestamp": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(resp.parts().len(), 2);
        let tools = resp.tool_parts();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["tool"], json!("list"));
    }

    #[test]
    fn test_chat_response_without_parts() {
        let resp: ChatResponse = serde_json::from_value(json!({
            "message": "plain",
            "sessionId": "s",
            "workspaceId": "w"
        }))
        .unwrap();
        assert!(resp.parts().is_empty());
        assert!(resp.tool_parts().is_empty());
    }

    #[test]
    fn test_plan_request_camel_case() {
        let req = PlanRequest {
            prompt: "p".to_string(),
            planning_model: "m".to_string(),
            workspace_id: "w".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"prompt": "p", "planningModel": "m", "workspaceId": "w"})
        );
    }
}
