use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("framescope"))
}

fn arp_frame(op: u16, spa: [u8; 4], tpa: [u8; 4]) -> Vec<u8> {
    let sha = [0x02, 0, 0, 0, 0, op as u8];
    let mut frame = Vec::new();
    frame.extend_from_slice(&[0xff; 6]);
    frame.extend_from_slice(&sha);
    frame.extend_from_slice(&[0x08, 0x06]);
    frame.extend_from_slice(&[0x00, 0x01, 0x08, 0x00, 6, 4]);
    frame.extend_from_slice(&op.to_be_bytes());
    frame.extend_from_slice(&sha);
    frame.extend_from_slice(&spa);
    frame.extend_from_slice(&[0; 6]);
    frame.extend_from_slice(&tpa);
    frame
}

/// Legacy pcap holding one ARP request and its reply.
fn write_capture(dir: &Path, name: &str) -> PathBuf {
    let mut out = Vec::new();
    out.extend_from_slice(&[0xd4, 0xc3, 0xb2, 0xa1, 2, 0, 4, 0]);
    out.extend_from_slice(&[0; 8]);
    out.extend_from_slice(&65535u32.to_le_bytes());
    out.extend_from_slice(&1u32.to_le_bytes());
    let frames = [
        (100u32, arp_frame(1, [10, 0, 0, 1], [10, 0, 0, 2])),
        (101u32, arp_frame(2, [10, 0, 0, 1], [10, 0, 0, 2])),
    ];
    for (secs, frame) in frames {
        out.extend_from_slice(&secs.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        out.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        out.extend_from_slice(&frame);
    }
    let path = dir.join(name);
    std::fs::write(&path, out).expect("write capture");
    path
}

fn stdout_json(output: &std::process::Output) -> Value {
    let stdout = String::from_utf8(output.stdout.clone()).expect("utf8 stdout");
    serde_json::from_str(&stdout).expect("valid json")
}

#[test]
fn help_supports_analyse_and_analyze() {
    cmd()
        .args(["capture", "analyse", "--help"])
        .assert()
        .success()
        .stdout(contains("--burst-cap"));
    cmd()
        .args(["capture", "analyze", "--help"])
        .assert()
        .success();
}

#[test]
fn missing_input_shows_error_and_hint() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("missing.pcapng");
    let report = temp.path().join("report.json");

    cmd()
        .args(["capture", "analyze"])
        .arg(missing)
        .arg("-o")
        .arg(report)
        .assert()
        .code(2)
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn stdout_outputs_report() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_capture(temp.path(), "arp.pcap");
    let assert = cmd()
        .args(["capture", "analyse"])
        .arg(&input)
        .arg("--stdout")
        .assert()
        .success();
    let json = stdout_json(assert.get_output());

    assert_eq!(json["report_version"], 1);
    assert_eq!(json["tool"]["name"], "framescope");
    assert_eq!(json["capture_summary"]["format"], "pcap");
    assert_eq!(json["capture_summary"]["frames_total"], 2);
    assert_eq!(json["generated_at"], "1970-01-01T00:01:41Z");
    assert!(json.get("frames").is_none());

    let exchange = &json["exchanges"][0];
    assert_eq!(exchange["protocol"], "arp");
    assert_eq!(exchange["status"], "complete");
    assert_eq!(exchange["request"]["frame_indices"], serde_json::json!([1]));
    assert_eq!(
        exchange["response"]["frame_indices"],
        serde_json::json!([2])
    );
    assert_eq!(exchange["rtt_ms"], 1000.0);
}

#[test]
fn frames_flag_includes_rows() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_capture(temp.path(), "arp.pcap");
    let assert = cmd()
        .args(["capture", "analyse"])
        .arg(&input)
        .args(["--stdout", "--frames"])
        .assert()
        .success();
    let json = stdout_json(assert.get_output());
    let frames = json["frames"].as_array().expect("frames array");
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0]["protocol"], "ARP");
    assert_eq!(frames[1]["transaction"]["key"], "ARP|10.0.0.1|10.0.0.2");
    assert_eq!(frames[1]["transaction"]["role"], "reply");
}

#[test]
fn report_file_is_written() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_capture(temp.path(), "arp.pcap");
    let report = temp.path().join("out").join("report.json");

    cmd()
        .args(["capture", "analyse"])
        .arg(&input)
        .arg("-o")
        .arg(&report)
        .arg("--pretty")
        .assert()
        .success()
        .stderr(contains("OK: report written"));

    let text = std::fs::read_to_string(&report).expect("report written");
    assert!(text.contains('\n'));
    let json: Value = serde_json::from_str(&text).expect("valid json");
    assert_eq!(json["exchange_groups"][0]["count"], 1);
}

#[test]
fn stdout_and_report_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_capture(temp.path(), "arp.pcap");
    let report = temp.path().join("report.json");

    cmd()
        .args(["capture", "analyze"])
        .arg(input)
        .arg("--stdout")
        .arg("-o")
        .arg(report)
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn pretty_and_compact_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_capture(temp.path(), "arp.pcap");
    let report = temp.path().join("report.json");

    cmd()
        .args(["capture", "analyze"])
        .arg(input)
        .arg("-o")
        .arg(report)
        .args(["--pretty", "--compact"])
        .assert()
        .code(2)
        .stderr(contains("error:").and(contains("cannot be used with")));
}

#[test]
fn quiet_suppresses_ok_message() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_capture(temp.path(), "arp.pcap");
    let report = temp.path().join("report.json");

    cmd()
        .args(["capture", "analyze"])
        .arg(input)
        .arg("-o")
        .arg(report)
        .args(["--quiet", "--list-exchanges"])
        .assert()
        .success()
        .stderr(contains("OK:").not().and(contains("Exchanges").not()));
}

#[test]
fn list_exchanges_outputs_ids() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_capture(temp.path(), "arp.pcap");

    cmd()
        .args(["capture", "analyze"])
        .arg(input)
        .args(["--stdout", "--list-exchanges"])
        .assert()
        .success()
        .stderr(
            contains("Exchanges (1):").and(contains("arp complete arp:ARP|10.0.0.1|10.0.0.2#1")),
        );
}

#[test]
fn non_capture_input_gets_format_hint() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("notes.pcap");
    std::fs::write(&input, b"definitely not a capture").expect("write input");

    cmd()
        .args(["capture", "analyse"])
        .arg(input)
        .arg("--stdout")
        .assert()
        .code(2)
        .stderr(contains("error:").and(contains("hint: input must be a pcap or pcapng capture")));
}

#[test]
fn report_must_differ_from_input() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_capture(temp.path(), "arp.pcap");

    cmd()
        .args(["capture", "analyse"])
        .arg(&input)
        .arg("-o")
        .arg(&input)
        .assert()
        .code(2)
        .stderr(contains("report path must differ from input"));
}

#[test]
fn glob_must_match_exactly_one_file() {
    let temp = TempDir::new().expect("tempdir");
    write_capture(temp.path(), "a.pcap");
    let single = temp.path().join("a*.pcap");
    cmd()
        .args(["capture", "analyse"])
        .arg(&single)
        .arg("--stdout")
        .assert()
        .success();

    write_capture(temp.path(), "ab.pcap");
    cmd()
        .args(["capture", "analyse"])
        .arg(&single)
        .arg("--stdout")
        .assert()
        .code(2)
        .stderr(contains("multiple files match pattern"));
}

#[test]
fn debug_logs_go_to_stderr() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_capture(temp.path(), "arp.pcap");
    let assert = cmd()
        .args(["-vv", "capture", "analyse"])
        .arg(&input)
        .arg("--stdout")
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stderr(contains("capture analysed"));
    stdout_json(assert.get_output());
}
