use std::io::Write;
use std::process::{Command, Stdio};

fn binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_dashboard-probe"))
}

#[test]
fn test_version_flag() {
    let output = binary()
        .arg("--version")
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success(), "Version flag should exit with code 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let version = stdout.trim().strip_prefix("dashboard-probe ").unwrap_or("");
    assert_eq!(version, env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_no_args_prints_usage() {
    let output = binary().output().expect("Failed to execute binary");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage: dashboard-probe"), "stderr: {}", stderr);
}

#[test]
fn test_unknown_command_exits_2() {
    let output = binary()
        .arg("frobnicate")
        .output()
        .expect("Failed to execute binary");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown command `frobnicate`"));
}

#[test]
fn test_parse_from_stdin() {
    let mut child = binary()
        .args(["parse", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute binary");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"data: {\"type\":\"a\"}\n\ndata: broken\n\ndata: {\"type\":\"b\"}\n\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 2);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("(1 skipped)"), "stderr: {}", stderr);
}

#[test]
fn test_deltas_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let capture = dir.path().join("capture.sse");
    std::fs::write(
        &capture,
        "data: {\"choices\":[{\"delta\":{\"content\":\"Hi \"}}]}\n\n\
         data: {\"choices\":[{\"delta\":{\"content\":\"there\"}}]}\n\n",
    )
    .unwrap();

    let output = binary()
        .arg("deltas")
        .arg(&capture)
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["content"], "Hi there");
    assert_eq!(summary["tool_calls"], serde_json::json!([]));
}

#[test]
fn test_missing_file_fails() {
    let output = binary()
        .args(["parse", "/nonexistent/capture.sse"])
        .output()
        .expect("Failed to execute binary");

    assert!(!output.status.success());
}
