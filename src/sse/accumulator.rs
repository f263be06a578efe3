//! Accumulation of streamed tool-call deltas into complete calls.
//!
//! A streamed tool call arrives as a series of fragments sharing an `index`:
//! the first usually carries `id` and `function.name`, later ones append to
//! `function.arguments`.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// A tool call reassembled from its deltas
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AccumulatedToolCall {
    pub index: u64,
    pub id: Option<String>,
    pub name: Option<String>,
    /// Concatenated `function.arguments` fragments
    pub arguments: String,
}

impl AccumulatedToolCall {
    /// Decode the accumulated arguments as JSON.
    pub fn arguments_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.arguments)
    }
}

/// Merges tool-call deltas by index, in arrival order.
#[derive(Debug, Default)]
pub struct ToolCallAccumulator {
    calls: BTreeMap<u64, AccumulatedToolCall>,
}

impl ToolCallAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a single delta. Deltas without a numeric `index` are ignored.
    pub fn push(&mut self, delta: &Value) {
        let Some(index) = delta.get("index").and_then(Value::as_u64) else {
            tracing::trace!(?delta, "tool call delta without index");
            return;
        };

        let call = self.calls.entry(index).or_insert_with(|| AccumulatedToolCall {
            index,
            ..Default::default()
        });

        if call.id.is_none() {
            call.id = delta.get("id").and_then(Value::as_str).map(String::from);
        }

        if let Some(function) = delta.get("function") {
            if call.name.is_none() {
                call.name = function.get("name").and_then(Value::as_str).map(String::from);
            }
            if let Some(fragment) = function.get("arguments").and_then(Value::as_str) {
                call.arguments.push_str(fragment);
            }
        }
    }

    /// Feed a batch of deltas, e.g. `StreamingDeltas::tool_call_deltas`.
    pub fn extend<'a, I>(&mut self, deltas: I)
    where
        I: IntoIterator<Item = &'a Value>,
    {
        for delta in deltas {
            self.push(delta);
        }
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Completed calls sorted by index.
    pub fn finish(self) -> Vec<AccumulatedToolCall> {
        self.calls.into_values().collect()
    }
}
