//! Integration tests for `fieldbench` output.

use std::process::Command;

fn cargo_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO"));
    cmd.args(["run", "-q", "-p", "fieldbench-cli", "--bin", "fieldbench", "--"]);
    cmd
}

const QUICK: [&str; 8] = [
    "--warmup-ms",
    "0",
    "--max-ms",
    "20",
    "--min-iters",
    "2",
    "--max-iters",
    "20",
];

#[test]
fn test_compare_json_is_valid_json() {
    let output = cargo_bin()
        .args(["--json", "compare", "--elements", "32", "--seed", "7"])
        .args(QUICK)
        .output()
        .expect("Failed to run compare command");

    assert!(output.status.success(), "compare should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(
        stdout.trim().starts_with('{'),
        "stdout should begin with '{{': {stdout}"
    );

    let json: serde_json::Value =
        serde_json::from_str(&stdout).expect("stdout should be valid JSON");

    assert_eq!(
        json["bench_schema_version"].as_u64(),
        Some(1),
        "bench_schema_version should be 1"
    );

    let runtime = &json["runtime"];
    assert!(
        runtime.get("fieldbench_version").is_some(),
        "Missing runtime.fieldbench_version"
    );
    assert!(runtime.get("os").is_some(), "Missing runtime.os");
    assert!(runtime.get("arch").is_some(), "Missing runtime.arch");

    let params = &json["params"];
    assert_eq!(params["elements"].as_u64(), Some(32));
    assert_eq!(params["seed"].as_u64(), Some(7));
    assert_eq!(params["warmup_ms"].as_u64(), Some(0));
    assert_eq!(params["reset_each_iteration"].as_bool(), Some(false));

    let results = json["results"].as_array().expect("results should be array");
    assert_eq!(results.len(), 2, "Should have one result per strategy");
    assert_eq!(results[0]["name"].as_str(), Some("whole_element"));
    assert_eq!(results[1]["name"].as_str(), Some("single_field"));

    for result in results {
        let name = result["name"].as_str().unwrap();
        assert_eq!(result["unit"].as_str(), Some("ns/op"), "{name} unit");
        assert_eq!(result["elements"].as_u64(), Some(32), "{name} elements");
        assert!(result["samples"].as_u64().unwrap() >= 2, "{name} samples");

        let min = result["min_ns"].as_u64().unwrap();
        let median = result["median_ns"].as_u64().unwrap();
        let p95 = result["p95_ns"].as_u64().unwrap();
        let max = result["max_ns"].as_u64().unwrap();

        assert!(min <= median, "{name}: min ({min}) <= median ({median})");
        assert!(median <= p95, "{name}: median ({median}) <= p95 ({p95})");
        assert!(p95 <= max, "{name}: p95 ({p95}) <= max ({max})");
    }

    assert!(json["speedup"].as_f64().is_some(), "speedup should be set");
    assert!(
        json["warnings"].as_array().is_some(),
        "warnings should be an array"
    );
}

#[test]
fn test_compare_human_output() {
    let output = cargo_bin()
        .args(["compare", "--elements", "16"])
        .args(QUICK)
        .output()
        .expect("Failed to run compare command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(
        serde_json::from_str::<serde_json::Value>(&stdout).is_err(),
        "Human output should not be valid JSON"
    );
    assert!(stdout.contains("fieldbench compare"), "Missing header");
    assert!(stdout.contains("Params:"), "Missing Params line");
    assert!(
        stdout.contains("Whole-element write-back updated 16 elements in "),
        "Missing whole-element line: {stdout}"
    );
    assert!(
        stdout.contains("Single-field write-back updated 16 elements in "),
        "Missing single-field line: {stdout}"
    );
    assert!(stdout.contains("A speedup of "), "Missing speedup line");
}

#[test]
fn test_run_single_strategy() {
    let output = cargo_bin()
        .args(["--json", "run", "--strategy", "single", "--elements", "8"])
        .args(QUICK)
        .output()
        .expect("Failed to run run command");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("should be valid JSON");

    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["name"].as_str(), Some("single_field"));
    assert!(json["speedup"].is_null());
}

#[test]
fn test_run_unknown_strategy_fails() {
    let output = cargo_bin()
        .args(["run", "--strategy", "partial"])
        .args(QUICK)
        .output()
        .expect("Failed to run run command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("partial"), "stderr: {stderr}");
}

#[test]
fn test_no_pairs_warning() {
    let output = cargo_bin()
        .args(["--json", "compare", "--elements", "1"])
        .args(QUICK)
        .output()
        .expect("Failed to run compare command");

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("should be valid JSON");
    let warnings = json["warnings"].as_array().expect("warnings array");
    assert!(
        warnings
            .iter()
            .any(|w| w["code"].as_str() == Some("NO_PAIRS")),
        "Should warn that one element has no pairs"
    );
}

#[test]
fn test_verify_json() {
    let output = cargo_bin()
        .args(["--json", "verify", "--elements", "64", "--seed", "3"])
        .output()
        .expect("Failed to run verify command");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("should be valid JSON");
    assert_eq!(json["ok"].as_bool(), Some(true));
    assert_eq!(json["elements"].as_u64(), Some(64));
    assert!(json["first_mismatch"].is_null());
}
