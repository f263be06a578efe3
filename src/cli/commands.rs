//! Handlers for the CLI subcommands.
//!
//! Each handler writes to the given writers so tests can capture output.

use super::args::Input;
use crate::client::DashboardClient;
use crate::sse::{parse_chunk_report, parse_streaming_deltas, ToolCallAccumulator};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use serde_json::json;
use std::io::{Read, Write};

pub const USAGE: &str = "\
Usage: dashboard-probe <command>

Commands:
  parse <file|->     Print each SSE event as a JSON line
  deltas <file|->    Reassemble streamed tool calls and content
  health <base_url>  Show process health of a running dashboard server
  -V, --version      Print version";

pub fn read_input(input: &Input) -> Result<String> {
    match input {
        Input::Stdin => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .wrap_err("Failed to read stdin")?;
            Ok(text)
        }
        Input::File(path) => std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read {}", path.display())),
    }
}

/// `parse`: one JSON line per event on `out`, a summary on `err`.
pub fn run_parse(text: &str, out: &mut impl Write, err: &mut impl Write) -> Result<()> {
    let report = parse_chunk_report(text);
    for event in &report.events {
        writeln!(out, "{}", serde_json::to_string(event)?)?;
    }
    writeln!(
        err,
        "{} events from {} data lines ({} skipped)",
        report.events.len(),
        report.data_lines,
        report.skipped
    )?;
    Ok(())
}

/// `deltas`: tool calls and joined content as one JSON document.
pub fn run_deltas(text: &str, out: &mut impl Write) -> Result<()> {
    let deltas = parse_streaming_deltas(text);
    let mut calls = ToolCallAccumulator::new();
    calls.extend(&deltas.tool_call_deltas);

    let summary = json!({
        "content": deltas.content(),
        "tool_calls": calls.finish(),
        "events": deltas.raw_events.len(),
    });
    writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
    Ok(())
}

/// `health`: overall status and one line per workspace.
pub async fn run_health(base_url: &str, out: &mut impl Write) -> Result<()> {
    let client = DashboardClient::with_base_url(base_url);
    let report = client
        .process_health()
        .await
        .wrap_err_with(|| format!("Health check against {} failed", base_url))?;

    let overall = &report.overall;
    writeln!(
        out,
        "{}: {} workspaces, {} healthy, {} orphaned",
        overall.status,
        overall.total_workspaces,
        overall.healthy_processes,
        overall.orphaned_processes
    )?;
    for ws in &report.workspaces {
        writeln!(
            out,
            "  {} [{}] {} sessions={} process={}",
            ws.id, ws.status, ws.folder, ws.session_count, ws.has_process
        )?;
    }
    if !report.cleanup.is_ready() {
        writeln!(out, "warning: cleanup handlers not fully initialized")?;
    }
    Ok(())
}
