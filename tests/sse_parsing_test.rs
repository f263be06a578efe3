//! SSE chunk parsing tests against realistic stream captures.

mod common;

use common::{content_delta, sse_body, tool_call_delta};
use dashboard_probe::sse::{
    collect_from_many, extract_by_type, find_first, parse_chunk, parse_chunk_report,
    parse_streaming_deltas, ToolCallAccumulator,
};
use serde_json::{json, Value};

#[test]
fn test_events_parse_in_line_order() {
    let body = sse_body(&[
        json!({"type": "start", "n": 1}),
        json!({"type": "delta", "n": 2}),
        json!({"type": "end", "n": 3}),
    ]);
    let events = parse_chunk(&body);
    let order: Vec<i64> = events.iter().map(|e| e["n"].as_i64().unwrap()).collect();
    assert_eq!(order, vec![1, 2, 3]);
}

#[test]
fn test_framing_lines_are_ignored() {
    let chunk = "event: message\nid: 7\n: keep-alive\nretry: 1000\ndata: {\"type\":\"x\"}\n\n";
    let events = parse_chunk(chunk);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["type"], json!("x"));
}

#[test]
fn test_malformed_line_does_not_poison_chunk() {
    let chunk = "data: {\"type\":\"a\"}\ndata: {not json\ndata: [1,2]\ndata: \ndata: {\"type\":\"b\"}";
    let report = parse_chunk_report(chunk);
    assert_eq!(report.data_lines, 5);
    assert_eq!(report.skipped, 3);
    assert!(!report.is_clean());
    assert_eq!(parse_chunk(chunk).len(), 2);
}

#[test]
fn test_prefix_must_include_space() {
    assert!(parse_chunk("data:{\"type\":\"x\"}").is_empty());
    assert!(parse_chunk("DATA: {\"type\":\"x\"}").is_empty());
}

#[test]
fn test_crlf_line_endings() {
    let chunk = "data: {\"type\":\"a\"}\r\n\r\ndata: {\"type\":\"b\"}\r\n";
    let types: Vec<Value> = parse_chunk(chunk).iter().map(|e| e["type"].clone()).collect();
    assert_eq!(types, vec![json!("a"), json!("b")]);
}

#[test]
fn test_empty_and_whitespace_chunks() {
    assert!(parse_chunk("").is_empty());
    assert!(parse_chunk("  \n\n\t").is_empty());
    assert!(find_first("", None).is_none());
}

#[test]
fn test_extract_and_find_are_consistent() {
    let body = sse_body(&[
        json!({"type": "tool", "tool": "read"}),
        json!({"type": "text", "text": "hi"}),
        json!({"type": "tool", "tool": "list"}),
        json!({"kind": "untyped"}),
    ]);

    let tools = extract_by_type(&body, "tool");
    assert_eq!(tools.len(), 2);
    assert_eq!(find_first(&body, Some("tool")), tools.first().cloned());
    assert_eq!(find_first(&body, None).unwrap()["tool"], json!("read"));
    assert!(extract_by_type(&body, "missing").is_empty());
    assert!(find_first(&body, Some("missing")).is_none());
}

#[test]
fn test_collect_from_many_equals_parse_of_concatenation() {
    let chunks = vec![
        sse_body(&[json!({"i": 0})]),
        "data: oops\n\n".to_string(),
        sse_body(&[json!({"i": 1}), json!({"i": 2})]),
    ];
    let collected = collect_from_many(&chunks);
    assert_eq!(collected, parse_chunk(&chunks.concat()));
    assert_eq!(collected.len(), 3);
    assert!(collect_from_many(Vec::<String>::new()).is_empty());
}

#[test]
fn test_streamed_tool_call_reassembles() {
    let body = sse_body(&[
        tool_call_delta(0, Some("call_1"), Some("read_file"), ""),
        tool_call_delta(0, None, None, "{\"path\":"),
        content_delta("Reading"),
        tool_call_delta(1, Some("call_2"), Some("list"), "{}"),
        tool_call_delta(0, None, None, "\"README.md\"}"),
        content_delta(" the file"),
        json!({"choices": [{"delta": {"content": ""}, "finish_reason": "tool_calls"}]}),
    ]);

    let deltas = parse_streaming_deltas(&body);
    assert_eq!(deltas.raw_events.len(), 7);
    assert_eq!(deltas.tool_call_deltas.len(), 4);
    assert_eq!(deltas.content(), "Reading the file");

    let mut acc = ToolCallAccumulator::new();
    acc.extend(&deltas.tool_call_deltas);
    let calls = acc.finish();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].id.as_deref(), Some("call_1"));
    assert_eq!(calls[0].name.as_deref(), Some("read_file"));
    assert_eq!(
        calls[0].arguments_json().unwrap(),
        json!({"path": "README.md"})
    );
    assert_eq!(calls[1].name.as_deref(), Some("list"));
}

#[test]
fn test_deltas_ignore_non_openai_events() {
    let body = sse_body(&[
        json!({"type": "message.part.updated", "part": {"type": "text"}}),
        json!({"choices": "not-an-array"}),
        json!({"choices": [{"delta": "not-an-object"}]}),
    ]);
    let deltas = parse_streaming_deltas(&body);
    assert_eq!(deltas.raw_events.len(), 3);
    assert!(deltas.tool_call_deltas.is_empty());
    assert!(deltas.content_deltas.is_empty());
}
