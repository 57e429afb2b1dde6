//! End-to-end tests for the `oems` binary
//!
//! Each test prepares a scratch directory with an input file and config,
//! runs the binary there, and checks stdout and the exit status.

mod common;

use common::builders::RunDirBuilder;
use oems_rs::{InputFormat, OutputFormat};
use std::process::{Command, Output};

fn oems(dir: &common::builders::RunDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_oems"))
        .current_dir(dir.path())
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to launch oems")
}

#[test]
fn test_prints_echo_then_sorted_lines() {
    let run = RunDirBuilder::new().contents(b"53819274\n").build();
    let out = oems(&run, &[]);

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        String::from_utf8(out.stdout).unwrap(),
        "5 3 8 1 9 2 7 4\n1\n2\n3\n4\n5\n7\n8\n9\n"
    );
}

#[test]
fn test_byte_input_format() {
    let run = RunDirBuilder::new()
        .contents(&[200, 3, 255, 0, 17, 17, 128, 64])
        .format(InputFormat::Bytes)
        .build();
    let out = oems(&run, &[]);

    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "200 3 255 0 17 17 128 64");
    assert_eq!(&lines[1..], ["0", "3", "17", "17", "64", "128", "200", "255"]);
}

#[test]
fn test_json_output() {
    let run = RunDirBuilder::new()
        .contents(b"98765432")
        .output(OutputFormat::Json)
        .build();
    let out = oems(&run, &[]);

    assert!(out.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(parsed["sorted"], serde_json::json!([2, 3, 4, 5, 6, 7, 8, 9]));
    assert_eq!(parsed["traces"].as_array().unwrap().len(), 19);
}

#[test]
fn test_positional_input_overrides_config() {
    let run = RunDirBuilder::new().contents(b"00000000").build();
    let other = run.path().join("other");
    std::fs::write(&other, b"55119900").unwrap();

    let out = oems(&run, &["other"]);
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.starts_with("5 5 1 1 9 9 0 0\n"));
    assert!(stdout.ends_with("0\n0\n1\n1\n5\n5\n9\n9\n"));
}

#[test]
fn test_malformed_input_fails_without_output() {
    let run = RunDirBuilder::new().contents(b"1234").build();
    let out = oems(&run, &[]);

    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
    assert!(String::from_utf8_lossy(&out.stderr).contains("expected 8 values"));
}

#[test]
fn test_missing_input_fails() {
    let run = RunDirBuilder::new().build();
    std::fs::remove_file(&run.input).unwrap();
    let out = oems(&run, &[]);

    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
}

#[test]
fn test_wrong_worker_count_fails() {
    let run = RunDirBuilder::new().workers(8).build();
    let out = oems(&run, &[]);

    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
    assert!(String::from_utf8_lossy(&out.stderr).contains("workers"));
}

#[test]
fn test_explicit_config_path() {
    let run = RunDirBuilder::new()
        .contents(b"11111111")
        .output(OutputFormat::Json)
        .build();
    let elsewhere = tempfile::tempdir().unwrap();
    let config = run.config_path.to_string_lossy().into_owned();

    let out = Command::new(env!("CARGO_BIN_EXE_oems"))
        .current_dir(elsewhere.path())
        .args(["--config", &config])
        .output()
        .unwrap();

    assert!(out.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(parsed["sorted"], serde_json::json!([1, 1, 1, 1, 1, 1, 1, 1]));
}
