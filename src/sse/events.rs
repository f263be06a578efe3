//! SSE line and event type definitions
//!
//! Contains the SseLine classification used by the chunk parser and the
//! generic event payload type returned to callers.

use serde_json::{Map, Value};

/// Prefix that marks an event payload line. Exactly six characters; a bare
/// `data:` without the space is treated as other framing.
pub const DATA_PREFIX: &str = "data: ";

/// A parsed event payload: the JSON object carried on a `data: ` line.
///
/// Payloads are kept schema-free. Most carry a string `type` field, but
/// nothing beyond "is a JSON object" is guaranteed.
pub type SseData = Map<String, Value>;

/// Represents one classified line of an SSE chunk
#[derive(Debug, Clone, PartialEq)]
pub enum SseLine<'a> {
    /// Payload line, prefix already stripped (e.g. `data: {"type":"ping"}`)
    Data(&'a str),
    /// Event type declaration (e.g. `event: message`)
    Event(&'a str),
    /// Last-event-id declaration
    Id(&'a str),
    /// Comment / keep-alive line (starts with ':')
    Comment(&'a str),
    /// Blank line - ends an event on the wire
    Empty,
    /// Anything else, including `data:` without the trailing space
    Other(&'a str),
}

/// Classify a single SSE line.
///
/// A trailing `\r` is removed first so CRLF-framed streams classify the
/// same way as LF-framed ones.
pub fn classify_line(line: &str) -> SseLine<'_> {
    let line = line.strip_suffix('\r').unwrap_or(line);

    if line.trim().is_empty() {
        return SseLine::Empty;
    }

    if let Some(rest) = line.strip_prefix(DATA_PREFIX) {
        return SseLine::Data(rest);
    }

    if let Some(rest) = line.strip_prefix(':') {
        return SseLine::Comment(rest.trim());
    }

    if let Some(rest) = line.strip_prefix("event:") {
        return SseLine::Event(rest.trim());
    }

    if let Some(rest) = line.strip_prefix("id:") {
        return SseLine::Id(rest.trim());
    }

    SseLine::Other(line)
}

/// Returns the `type` field of an event when it is a string.
pub fn event_type(event: &SseData) -> Option<&str> {
    event.get("type").and_then(Value::as_str)
}
