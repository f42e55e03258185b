//! Integration test: shipped incomplete beta fixture suite.
//!
//! Validates that:
//! 1. The fixture JSON exists, parses, and covers every function.
//! 2. Every case passes against `betainv-core`.
//! 3. The CLI exits zero on the shipped suite and non-zero on a broken one.
//! 4. `eval` prints the documented scenario and reports domain failures.
//!
//! Run: cargo test -p betainv-harness --test fixture_suite_test

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Command;

use betainv_harness::{FixtureFunction, FixtureSet, verify_fixture_file};

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/incomplete_beta.v1.json")
}

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("betainv-harness-{tag}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn fixture_set_is_well_formed() {
    let set = FixtureSet::from_file(&fixture_path()).expect("fixture should load");
    assert_eq!(set.version, "1");
    assert_eq!(set.family, "incomplete_beta");

    let mut names = HashSet::new();
    for case in &set.cases {
        assert!(names.insert(case.name.as_str()), "duplicate case {}", case.name);
        assert!(
            case.expected.is_some() != case.expected_failure.is_some(),
            "{} must carry exactly one of expected / expected_failure",
            case.name
        );
        if case.expected.is_some() {
            assert!(case.rel_tol.is_some(), "{} lacks rel_tol", case.name);
        }
    }

    let functions: HashSet<FixtureFunction> = set.cases.iter().map(|c| c.function).collect();
    for function in [
        FixtureFunction::IbetaInv,
        FixtureFunction::IbetacInv,
        FixtureFunction::Ibeta,
        FixtureFunction::Ibetac,
    ] {
        assert!(functions.contains(&function), "no case for {}", function.as_str());
    }
    assert!(set.cases.iter().any(|c| c.expected_failure.is_some()));
}

#[test]
fn every_shipped_case_passes() {
    let report = verify_fixture_file(&fixture_path()).unwrap();
    let failures: Vec<_> = report.failures().collect();
    assert!(failures.is_empty(), "{failures:#?}");
    assert_eq!(report.total, report.passed);
    assert_eq!(report.source_sha256.len(), 64);
}

#[test]
fn digest_tracks_fixture_bytes() {
    let first = verify_fixture_file(&fixture_path()).unwrap();
    let second = verify_fixture_file(&fixture_path()).unwrap();
    assert_eq!(first.source_sha256, second.source_sha256);

    let dir = scratch_dir("digest");
    let copy = dir.join("copy.json");
    let mut text = std::fs::read_to_string(fixture_path()).unwrap();
    text.push('\n');
    std::fs::write(&copy, text).unwrap();
    let edited = verify_fixture_file(&copy).unwrap();
    assert_ne!(first.source_sha256, edited.source_sha256);
    assert_eq!(first.passed, edited.passed);
}

#[test]
fn cli_verify_passes_on_shipped_suite() {
    let dir = scratch_dir("cli-pass");
    let report = dir.join("report.json");
    let log = dir.join("verify.log.jsonl");
    let output = Command::new(env!("CARGO_BIN_EXE_betainv-harness"))
        .arg("verify")
        .arg("--fixture")
        .arg(fixture_path())
        .arg("--report")
        .arg(&report)
        .arg("--log")
        .arg(&log)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let reports: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(reports[0]["failed"], 0);

    let log_text = std::fs::read_to_string(&log).unwrap();
    let lines: Vec<serde_json::Value> = log_text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    let last = lines.last().unwrap();
    assert_eq!(last["event"], "fixture_set_verified");
    assert_eq!(last["outcome"], "pass");
    assert_eq!(last["level"], "info");
    assert!(lines.iter().all(|line| line["trace_id"].as_str().unwrap().starts_with("betainv-verify::")));
}

#[test]
fn cli_verify_fails_on_wrong_reference() {
    let dir = scratch_dir("cli-fail");
    let broken = dir.join("broken.json");
    std::fs::write(
        &broken,
        r#"{"version":"1","family":"incomplete_beta","cases":[
            {"name":"wrong_median","function":"ibeta_inv","a":2.0,"b":3.0,"arg":0.5,
             "expected":0.4,"rel_tol":1e-12}]}"#,
    )
    .unwrap();
    let log = dir.join("verify.log.jsonl");
    let output = Command::new(env!("CARGO_BIN_EXE_betainv-harness"))
        .args(["verify", "--fixture"])
        .arg(&broken)
        .arg("--log")
        .arg(&log)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("FAIL wrong_median"));

    let log_text = std::fs::read_to_string(&log).unwrap();
    let lines: Vec<serde_json::Value> = log_text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["level"], "error");
    assert_eq!(lines[0]["outcome"], "fail");
    assert_eq!(lines[1]["event"], "fixture_set_verified");
    assert_eq!(lines[1]["level"], "warn");
    assert_eq!(lines[1]["outcome"], "fail");
}

#[test]
fn cli_eval_reports_value_and_complement() {
    let output = Command::new(env!("CARGO_BIN_EXE_betainv-harness"))
        .args(["eval", "ibeta_inv", "2", "3", "0.5"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let out: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let value = out["value"].as_f64().unwrap();
    let complement = out["complement"].as_f64().unwrap();
    assert!((value - 0.385_727_568_132_39).abs() < 1e-12);
    assert!((value + complement - 1.0).abs() < 1e-15);
}

#[test]
fn cli_eval_reports_domain_failure() {
    let output = Command::new(env!("CARGO_BIN_EXE_betainv-harness"))
        .args(["eval", "ibetac_inv", "-1", "3", "0.5"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let out: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(out["error"]["kind"], "domain");
    assert!(out.get("value").is_none());
}
