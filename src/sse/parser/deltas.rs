//! Reducer for OpenAI-style `choices[].delta` streaming payloads.

use super::parse_chunk;
use crate::sse::events::SseData;
use serde_json::Value;

/// Deltas extracted from one or more streaming chunks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamingDeltas {
    /// Elements of every `delta.tool_calls` array, in arrival order
    pub tool_call_deltas: Vec<Value>,
    /// Every non-empty `delta.content` string, in arrival order
    pub content_deltas: Vec<String>,
    /// All parsed events, whether or not they had the delta shape
    pub raw_events: Vec<SseData>,
}

impl StreamingDeltas {
    /// Concatenated content deltas.
    pub fn content(&self) -> String {
        self.content_deltas.concat()
    }

    /// Append the deltas of a later chunk.
    pub fn merge(&mut self, other: StreamingDeltas) {
        self.tool_call_deltas.extend(other.tool_call_deltas);
        self.content_deltas.extend(other.content_deltas);
        self.raw_events.extend(other.raw_events);
    }

    pub fn is_empty(&self) -> bool {
        self.tool_call_deltas.is_empty() && self.content_deltas.is_empty()
    }
}

/// Parse a chunk and pull out tool-call and content deltas.
///
/// Events lacking `choices`, choices lacking an object `delta`, and deltas
/// with neither field only contribute to `raw_events`.
pub fn parse_streaming_deltas(chunk: &str) -> StreamingDeltas {
    let raw_events = parse_chunk(chunk);
    let mut tool_call_deltas = Vec::new();
    let mut content_deltas = Vec::new();

    let deltas = raw_events
        .iter()
        .filter_map(|event| event.get("choices").and_then(Value::as_array))
        .flatten()
        .filter_map(|choice| choice.get("delta").and_then(Value::as_object));

    for delta in deltas {
        if let Some(calls) = delta.get("tool_calls").and_then(Value::as_array) {
            tool_call_deltas.extend(calls.iter().cloned());
        }

        match delta.get("content").and_then(Value::as_str) {
            Some(text) if !text.is_empty() => content_deltas.push(text.to_string()),
            _ => {}
        }
    }

    StreamingDeltas {
        tool_call_deltas,
        content_deltas,
        raw_events,
    }
}
