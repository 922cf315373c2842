use std::{
    ffi::OsStr,
    fs,
    path::PathBuf,
    process::{Command, Output},
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn run(args: &[&OsStr]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_scroll_replay"))
        .args(args)
        .output()
        .expect("failed to spawn scroll_replay")
}

fn verdict_rows(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .skip(1)
        .map(str::to_owned)
        .collect()
}

#[test]
fn mixed_feed_matches_expected_verdicts() {
    let trace = fixture("mixed_feed.csv");
    let expect = fixture("mixed_feed.expect");
    let output = run(&[trace.as_os_str(), OsStr::new("--expect"), expect.as_os_str()]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let rows = verdict_rows(&output);
    assert_eq!(rows.len(), 3);
    assert!(rows[0].starts_with("verdict,380,1,up,net_distance,linger,60,"));
    assert!(rows[1].starts_with("verdict,1012,2,down,"));
    assert!(rows[1].contains(",fast_flick,"));
    assert!(rows[2].starts_with("verdict,"));
    assert!(rows[2].contains(",3,unknown,insufficient,quiet,"));
}

#[test]
fn lock_verdict_survives_reversal() {
    let trace = fixture("reversal.csv");
    let expect = fixture("reversal.expect");
    let output = run(&[trace.as_os_str(), OsStr::new("--expect"), expect.as_os_str()]);

    assert!(output.status.success());
    let rows = verdict_rows(&output);
    assert_eq!(rows.len(), 1);
    assert!(rows[0].contains(",5,up,lock,linger,"));
}

#[test]
fn mismatched_expectation_fails_with_both_sequences() {
    let dir = tempfile::tempdir().expect("tempdir");
    let expect = dir.path().join("wrong.expect");
    fs::write(&expect, "down\n").expect("write expect file");

    let trace = fixture("reversal.csv");
    let output = run(&[trace.as_os_str(), OsStr::new("--expect"), expect.as_os_str()]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("expected verdicts: down"), "stderr: {stderr}");
    assert!(stderr.contains("actual verdicts:   up"), "stderr: {stderr}");
    assert!(stderr.contains("verdict sequence mismatch"), "stderr: {stderr}");
}

#[test]
fn json_log_captures_engine_events() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log_path = dir.path().join("logs").join("replay.jsonl");

    let trace = fixture("mixed_feed.csv");
    let output = run(&[trace.as_os_str(), OsStr::new("--log-json"), log_path.as_os_str()]);
    assert!(output.status.success());

    let contents = fs::read_to_string(&log_path).expect("json log written");
    let entries: Vec<serde_json::Value> = contents
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();
    assert!(!entries.is_empty());
    assert!(entries.iter().all(|entry| entry["ts_ms"].is_u64()));
    assert!(entries.iter().any(|entry| {
        entry["msg"]
            .as_str()
            .is_some_and(|msg| msg.starts_with("scroll: verdict"))
    }));
}

#[test]
fn missing_trace_reports_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("absent.csv");
    let output = run(&[missing.as_os_str()]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("absent.csv"), "stderr: {stderr}");
}
