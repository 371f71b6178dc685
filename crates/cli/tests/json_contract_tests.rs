// Integration tests enforcing the --json stdout contract.
//
// These tests guarantee that stdout from `sharecount extract --json` is:
//   1. Valid JSON
//   2. Exactly one JSON value (no extra lines, no banners, no colors)
//   3. The correct shape, for resolved and unknown outcomes alike
//
// Run with: cargo test -p sharecount-cli --test json_contract_tests -- --nocapture

use std::io::Write;
use std::process::{Command, Stdio};

fn sharecount() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sharecount"));
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    cmd.env_remove("SHARECOUNT_CONFIG");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Assert stdout is a single, parseable JSON value with no extra lines.
fn assert_single_json(stdout: &str) -> serde_json::Value {
    let trimmed = stdout.trim();
    assert!(!trimmed.is_empty(), "stdout should not be empty");

    let val: serde_json::Value = serde_json::from_str(trimmed).unwrap_or_else(|e| {
        panic!(
            "stdout must be valid JSON.\nParse error: {}\nstdout:\n{}",
            e, trimmed
        )
    });

    let re_serialized = serde_json::to_string(&val).unwrap();
    let re_parsed: serde_json::Value = serde_json::from_str(&re_serialized).unwrap();
    assert_eq!(val, re_parsed, "JSON round-trip should be stable");

    val
}

fn run_stdin(args: &[&str], input: &str) -> std::process::Output {
    let mut child = sharecount()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn sharecount");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().expect("sharecount output")
}

// ===========================================================================
// sharecount extract --json
// ===========================================================================

#[test]
fn extract_json_resolved_shape() {
    let output = run_stdin(
        &["extract", "--json", "--isin", "US0378331005", "--price", "350.45", "--value", "35045"],
        "Apple Inc. US0378331005\nQuantity: 100 shares\n",
    );
    assert!(output.status.success(), "exit code: {:?}\nstderr: {}",
        output.status, String::from_utf8_lossy(&output.stderr));

    let val = assert_single_json(&String::from_utf8_lossy(&output.stdout));
    let obj = val.as_object().expect("should be JSON object");

    for key in ["meta", "resolution", "method", "discrepancy", "candidates"] {
        assert!(obj.contains_key(key), "must have '{key}' key");
    }
    assert_eq!(val["resolution"]["status"], "resolved");
    assert_eq!(val["resolution"]["quantity"], 100.0);
    assert_eq!(val["method"]["method"], "direct_match");
    assert_eq!(val["isin"], "US0378331005");
    assert_eq!(val["discrepancy"], false);

    let meta = val["meta"].as_object().expect("meta must be object");
    assert!(meta["engine_version"].is_string());
    assert!(meta["run_at"].is_string());
    assert!(!meta.contains_key("source"), "stdin input has no source path");

    let candidates = val["candidates"].as_array().expect("candidates must be array");
    assert!(!candidates.is_empty());
    for c in candidates {
        assert!(c["quantity"].is_number());
        assert!(c["confidence"].is_number());
        assert!(c["source"].is_string());
        assert!(c["provenance"]["kind"].is_string());
    }
}

#[test]
fn extract_json_unknown_is_still_single_value() {
    let output = run_stdin(&["extract", "--json"], "nothing numeric in here\n");
    assert_eq!(output.status.code(), Some(10));

    let val = assert_single_json(&String::from_utf8_lossy(&output.stdout));
    assert_eq!(val["resolution"]["status"], "unknown");
    assert_eq!(val["method"]["method"], "unknown");
    assert_eq!(val["candidates"].as_array().map(Vec::len), Some(0));
}

#[test]
fn extract_json_lot_size_match_carries_multiplier() {
    let output = run_stdin(
        &["extract", "--json", "--price", "420.55", "--value", "1051375"],
        "Holding: 25 shares\n",
    );
    assert!(output.status.success());

    let val = assert_single_json(&String::from_utf8_lossy(&output.stdout));
    assert_eq!(val["method"]["method"], "lot_size_match");
    assert_eq!(val["method"]["multiplier"], 100);
    assert_eq!(val["resolution"]["quantity"], 2500.0);
}

#[test]
fn extract_json_discrepancy_warns_on_stderr_only() {
    let mut cmd = sharecount();
    cmd.env("RUST_LOG", "warn");
    let mut child = cmd
        .args(["extract", "--json", "--price", "220", "--value", "22000"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn sharecount");
    child.stdin.take().unwrap().write_all(b"Quantity: 50 shares\n").unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let val = assert_single_json(&String::from_utf8_lossy(&output.stdout));
    assert_eq!(val["discrepancy"], true);
    assert_eq!(val["method"]["method"], "calculated_fallback");
    assert_eq!(val["calculated"], 100.0);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("disagree"), "stderr: {stderr}");
}
