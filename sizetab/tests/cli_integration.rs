//! Integration tests for sizetab CLI

use std::path::Path;
use std::process::Command;

use serde_json::json;

fn run_sizetab(args: &[&str]) -> (String, String, bool) {
    let mut cmd_args = vec!["run", "-p", "sizetab", "--"];
    cmd_args.extend(args);

    let output = Command::new("cargo")
        .args(&cmd_args)
        .current_dir(env!("CARGO_MANIFEST_DIR").to_string() + "/..")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();

    (stdout, stderr, success)
}

fn write_report(dir: &Path, name: &str, report: &serde_json::Value) -> String {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(report).unwrap()).unwrap();
    path.to_string_lossy().to_string()
}

fn sample_report() -> serde_json::Value {
    json!({
        "data_sources": ["segments", "symbols"],
        "labels": [
            {"name": "main", "size": 1200, "parents": [".code"]},
            {"name": "memcpy", "size": 300, "parents": [".code"]},
            {"name": "heap", "size": 4096, "parents": [".bss"]},
        ]
    })
}

#[test]
fn test_cli_help() {
    let (stdout, _, success) = run_sizetab(&["--help"]);

    assert!(success);
    assert!(stdout.contains("sizetab"));
    assert!(stdout.contains("--diff"));
    assert!(stdout.contains("--max-width"));
    assert!(stdout.contains("--charset"));
    assert!(stdout.contains("--rst"));
}

#[test]
fn test_table_output() {
    let dir = tempfile::tempdir().unwrap();
    let report = write_report(dir.path(), "report.json", &sample_report());
    let (stdout, _, success) = run_sizetab(&[&report]);

    assert!(success);
    assert!(stdout.contains("segments"));
    assert!(stdout.contains("symbols"));
    assert!(stdout.contains("sizes"));
    assert!(stdout.contains(".code"));
    assert!(stdout.contains("memcpy"));
    // grand total of all leaves, comma-grouped
    assert!(stdout.contains("5,596"));
    assert!(stdout.contains("Total"));
}

#[test]
fn test_diff_output() {
    let dir = tempfile::tempdir().unwrap();
    let old = write_report(
        dir.path(),
        "base.json",
        &json!({
            "data_sources": ["segments", "symbols"],
            "labels": [
                {"name": "main", "size": 1200, "parents": [".code"]},
                {"name": "heap", "size": 4096, "parents": [".bss"]},
            ]
        }),
    );
    let new = write_report(
        dir.path(),
        "current.json",
        &json!({
            "data_sources": ["segments", "symbols"],
            "labels": [
                {"name": "main", "size": 1250, "parents": [".code"]},
                {"name": "heap", "size": 4096, "parents": [".bss"]},
            ]
        }),
    );
    let (stdout, _, success) = run_sizetab(&[&new, "--diff", &old]);

    assert!(success);
    assert!(stdout.contains("diff"));
    // grown symbol renders its delta, unchanged group collapses
    assert!(stdout.contains("+50"));
    assert!(stdout.contains("(SAME)"));
    assert!(!stdout.contains("heap"));
}

#[test]
fn test_line_charset_output() {
    let dir = tempfile::tempdir().unwrap();
    let report = write_report(dir.path(), "report.json", &sample_report());
    let (stdout, _, success) = run_sizetab(&[&report, "--charset", "line"]);

    assert!(success);
    assert!(stdout.contains('┌'));
    assert!(stdout.contains('│'));
    assert!(stdout.contains('═'));
}

#[test]
fn test_rst_output() {
    let dir = tempfile::tempdir().unwrap();
    let report = write_report(dir.path(), "report.json", &sample_report());
    let (stdout, _, success) = run_sizetab(&[&report, "--rst"]);

    assert!(success);
    assert!(stdout.contains("``main``"));
    assert!(stdout.ends_with("+\n"));
}

#[test]
fn test_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let report = write_report(dir.path(), "report.json", &sample_report());
    let out_path = dir.path().join("table.txt");
    let (_, _, success) = run_sizetab(&[&report, "-o", &out_path.to_string_lossy()]);

    assert!(success);
    let written = std::fs::read_to_string(&out_path).unwrap();
    assert!(written.contains("Total"));
    assert!(written.ends_with('\n'));
}

#[test]
fn test_malformed_report_fails() {
    let dir = tempfile::tempdir().unwrap();
    let report = write_report(
        dir.path(),
        "bad.json",
        &json!({
            "data_sources": ["segments", "symbols"],
            "labels": [
                {"name": "orphan", "size": 10, "parents": []},
            ]
        }),
    );
    let (_, stderr, success) = run_sizetab(&[&report]);

    assert!(!success);
    assert!(stderr.contains("invalid hierarchy"));
}
