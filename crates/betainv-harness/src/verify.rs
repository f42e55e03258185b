//! Fixture verification against `betainv-core`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::Digest;

use crate::error::HarnessError;
use crate::fixtures::{FixtureCase, FixtureSet};

/// Outcome of one fixture case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    pub name: String,
    pub function: String,
    pub passed: bool,
    pub expected: String,
    pub actual: String,
    /// Relative (or absolute, for a zero reference) error when both sides are values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<f64>,
}

/// Result of verifying one fixture set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub family: String,
    pub version: String,
    /// SHA-256 of the fixture source, lowercase hex.
    pub source_sha256: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub cases: Vec<CaseResult>,
}

impl VerificationReport {
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseResult> {
        self.cases.iter().filter(|case| !case.passed)
    }
}

/// Evaluate every case in `set`. `source` is the raw fixture text for the digest.
#[must_use]
pub fn verify_fixture_set(set: &FixtureSet, source: &[u8]) -> VerificationReport {
    let cases: Vec<CaseResult> = set.cases.iter().map(verify_case).collect();
    let passed = cases.iter().filter(|case| case.passed).count();
    VerificationReport {
        family: set.family.clone(),
        version: set.version.clone(),
        source_sha256: sha256_hex(source),
        total: cases.len(),
        passed,
        failed: cases.len() - passed,
        cases,
    }
}

/// Load and verify a fixture file.
pub fn verify_fixture_file(path: &Path) -> Result<VerificationReport, HarnessError> {
    let raw = std::fs::read(path).map_err(|err| HarnessError::io(path, err))?;
    let text = std::str::from_utf8(&raw).map_err(|err| {
        HarnessError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidData, err),
        )
    })?;
    let set = FixtureSet::from_json(text).map_err(|source| HarnessError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(verify_fixture_set(&set, &raw))
}

fn verify_case(case: &FixtureCase) -> CaseResult {
    let outcome = case.function.evaluate(case.a, case.b, case.arg);
    let actual = match &outcome {
        Ok(value) => format!("{value:e}"),
        Err(err) => format!("{}: {err}", err.kind().as_str()),
    };
    let mut result = CaseResult {
        name: case.name.clone(),
        function: case.function.as_str().to_string(),
        passed: false,
        expected: String::new(),
        actual,
        error: None,
    };

    match (case.expected_failure.as_deref(), case.expected, outcome) {
        (Some(kind), _, outcome) => {
            result.expected = format!("failure: {kind}");
            result.passed = matches!(outcome, Err(err) if err.kind().as_str() == kind);
        }
        (None, Some(expected), Ok(value)) => {
            let tol = case.rel_tol.unwrap_or(0.0);
            let err = relative_error(value, expected);
            result.expected = format!("{expected:e} (rel_tol {tol:e})");
            result.passed = err <= tol;
            result.error = Some(err);
        }
        (None, Some(expected), Err(_)) => {
            result.expected = format!("{expected:e}");
        }
        (None, None, _) => {
            result.expected = "malformed case: neither expected nor expected_failure".to_string();
        }
    }
    result
}

fn relative_error(actual: f64, expected: f64) -> f64 {
    if actual == expected {
        return 0.0;
    }
    let diff = (actual - expected).abs();
    if expected == 0.0 { diff } else { diff / expected.abs() }
}

fn hex_lower(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(&mut out, "{b:02x}");
    }
    out
}

pub(crate) fn sha256_hex(data: &[u8]) -> String {
    hex_lower(&sha2::Sha256::digest(data))
}
