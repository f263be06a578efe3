//! SSE (Server-Sent Events) chunk parser
//!
//! Parses `text/event-stream` chunks read from the dashboard server.
//! Only lines prefixed exactly by `data: ` carry events; their payload must
//! be a JSON object. Everything else on the wire is framing:
//! - `event: <type>` / `id: <id>` - ignored
//! - Lines starting with `:` - comments / keep-alives (ignored)
//! - Empty line - end of event (ignored, events are per line here)
//!
//! Parsing is stateless and never fails; a dropped line shows up only as a
//! missing event.
//!
//! # Module structure
//! - `events` - Line classification and the `SseData` payload type
//! - `parser` - Chunk parsing, type filters and the streaming-delta reducer
//! - `accumulator` - Reassembly of tool calls from streamed deltas

mod accumulator;
mod events;
mod parser;

pub use accumulator::{AccumulatedToolCall, ToolCallAccumulator};
pub use events::{classify_line, event_type, SseData, SseLine, DATA_PREFIX};
pub use parser::{
    collect_from_many, extract_by_type, find_first, parse_chunk, parse_chunk_report,
    parse_streaming_deltas, ChunkReport, SkipReason, StreamingDeltas,
};
