//! SSE chunk parsing logic
//!
//! Turns raw `text/event-stream` chunks into JSON object payloads. Parsing is
//! lenient: a malformed `data:` line is dropped and the rest of the chunk is
//! still parsed. Callers that need to know how much was dropped use
//! [`parse_chunk_report`].

mod deltas;

pub use deltas::{parse_streaming_deltas, StreamingDeltas};

use crate::sse::events::{classify_line, event_type, SseData, SseLine};
use serde_json::Value;

/// Reason a `data:` line produced no event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Nothing but whitespace after the prefix
    Blank,
    /// Payload is not valid JSON
    Malformed,
    /// Payload is valid JSON but not an object
    NotAnObject,
}

/// Events parsed from a chunk plus counts of what was dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkReport {
    /// Parsed events in line order
    pub events: Vec<SseData>,
    /// Number of `data: ` lines encountered
    pub data_lines: usize,
    /// Number of `data: ` lines that produced no event
    pub skipped: usize,
}

impl ChunkReport {
    /// True when every `data: ` line yielded an event.
    pub fn is_clean(&self) -> bool {
        self.skipped == 0
    }
}

/// Decode the payload of a single `data: ` line.
fn decode_payload(payload: &str) -> Result<SseData, SkipReason> {
    if payload.trim().is_empty() {
        return Err(SkipReason::Blank);
    }

    match serde_json::from_str::<Value>(payload) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(SkipReason::NotAnObject),
        Err(_) => Err(SkipReason::Malformed),
    }
}

/// Parse a chunk and count the `data:` lines that were dropped.
pub fn parse_chunk_report(chunk: &str) -> ChunkReport {
    let mut report = ChunkReport::default();

    let chunk = chunk.trim();
    if chunk.is_empty() {
        return report;
    }

    for (line_no, line) in chunk.split('\n').enumerate() {
        let SseLine::Data(payload) = classify_line(line) else {
            continue;
        };
        report.data_lines += 1;

        match decode_payload(payload) {
            Ok(event) => report.events.push(event),
            Err(reason) => {
                report.skipped += 1;
                tracing::trace!(line_no, ?reason, "skipping SSE data line");
            }
        }
    }

    report
}

/// Parse an SSE chunk into the JSON objects carried on its `data: ` lines.
///
/// Lines that are blank after the prefix, are not JSON, or are JSON but not
/// an object are skipped. Empty or whitespace-only input yields an empty
/// vector.
pub fn parse_chunk(chunk: &str) -> Vec<SseData> {
    parse_chunk_report(chunk).events
}

/// Parse a chunk and keep only events whose `type` equals `event_type`.
///
/// Events without a string `type` never match.
pub fn extract_by_type(chunk: &str, wanted: &str) -> Vec<SseData> {
    parse_chunk(chunk)
        .into_iter()
        .filter(|event| event_type(event) == Some(wanted))
        .collect()
}

/// Return the first event in a chunk, optionally constrained to a type.
///
/// `None` means no matching event was present, which callers should treat
/// as an ordinary outcome.
pub fn find_first(chunk: &str, wanted: Option<&str>) -> Option<SseData> {
    match wanted {
        Some(t) => extract_by_type(chunk, t).into_iter().next(),
        None => parse_chunk(chunk).into_iter().next(),
    }
}

/// Parse several chunks and concatenate their events in input order.
pub fn collect_from_many<I, S>(chunks: I) -> Vec<SseData>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    chunks
        .into_iter()
        .flat_map(|chunk| parse_chunk(chunk.as_ref()))
        .collect()
}
