use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn temp_out_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("challan_cli_{label}_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp out dir");
    dir
}

fn run_batch(out_dir: &Path, extra: &[&str]) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_challan"))
        .arg("batch")
        .arg("--out-dir")
        .arg(out_dir)
        .args(extra)
        .output()
        .expect("run challan batch");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("utf8 stdout")
}

fn records_without_timestamps(dir: &Path) -> Vec<serde_json::Value> {
    let json = fs::read_to_string(dir.join("violations_sample.json")).expect("read json");
    let mut records: Vec<serde_json::Value> = serde_json::from_str(&json).expect("parse json");
    for record in &mut records {
        record
            .as_object_mut()
            .expect("record object")
            .remove("timestamp");
    }
    records
}

#[test]
fn seeded_batch_runs_match() {
    let dir_a = temp_out_dir("seed_a");
    let dir_b = temp_out_dir("seed_b");
    run_batch(&dir_a, &["--count", "5", "--seed", "42"]);
    run_batch(&dir_b, &["-n", "5", "-s", "42"]);

    let a = records_without_timestamps(&dir_a);
    let b = records_without_timestamps(&dir_b);
    assert_eq!(a.len(), 5);
    assert_eq!(a, b);
}

#[test]
fn default_batch_writes_both_files_and_summary() {
    let dir = temp_out_dir("defaults");
    let stdout = run_batch(&dir, &[]);

    assert!(stdout.contains("Generated 10 fake violation records"));
    assert!(stdout.contains("Saved JSON -> "));
    assert!(stdout.contains("Saved CSV  -> "));
    let csv = fs::read_to_string(dir.join("violations_sample.csv")).expect("read csv");
    assert_eq!(csv.lines().count(), 11);
}

#[test]
fn json_toggle_can_be_disabled() {
    let dir = temp_out_dir("no_json");
    let stdout = run_batch(&dir, &["--json", "false", "--count", "3"]);

    assert!(!stdout.contains("Saved JSON"));
    assert!(!dir.join("violations_sample.json").exists());
    assert!(dir.join("violations_sample.csv").exists());
}

#[test]
fn negative_window_is_rejected() {
    let dir = temp_out_dir("bad_window");
    let status = Command::new(env!("CARGO_BIN_EXE_challan"))
        .args(["batch", "--window-days", "-3", "--out-dir"])
        .arg(&dir)
        .status()
        .expect("run challan batch");
    assert!(!status.success());
}

#[test]
fn oversized_window_exits_with_usage_error() {
    let dir = temp_out_dir("huge_window");
    let output = Command::new(env!("CARGO_BIN_EXE_challan"))
        .args(["batch", "--window-days", "1e9", "--out-dir"])
        .arg(&dir)
        .output()
        .expect("run challan batch");
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(2), "stderr: {stderr}");
    assert!(!stderr.contains("panicked"), "stderr: {stderr}");
    assert!(stderr.contains("window must be between"), "stderr: {stderr}");
    assert!(!dir.join("violations_sample.json").exists());
}
