//! Fixture loading and case evaluation.

use std::path::Path;

use betainv_core::BetaError;
use serde::{Deserialize, Serialize};

use crate::error::HarnessError;

/// Evaluator exercised by a fixture case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureFunction {
    IbetaInv,
    IbetacInv,
    Ibeta,
    Ibetac,
}

impl FixtureFunction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IbetaInv => "ibeta_inv",
            Self::IbetacInv => "ibetac_inv",
            Self::Ibeta => "ibeta",
            Self::Ibetac => "ibetac",
        }
    }

    /// Parse a function name as written in fixtures and on the CLI.
    pub fn parse(name: &str) -> Result<Self, HarnessError> {
        match name {
            "ibeta_inv" => Ok(Self::IbetaInv),
            "ibetac_inv" => Ok(Self::IbetacInv),
            "ibeta" => Ok(Self::Ibeta),
            "ibetac" => Ok(Self::Ibetac),
            other => Err(HarnessError::Usage(format!(
                "unknown function '{other}' (expected ibeta_inv, ibetac_inv, ibeta or ibetac)"
            ))),
        }
    }

    /// Primary result of the function at `(a, b, arg)`.
    ///
    /// For the inverses this is `x`; the complement is not compared.
    pub fn evaluate(self, a: f64, b: f64, arg: f64) -> Result<f64, BetaError> {
        match self {
            Self::IbetaInv => betainv_core::ibeta_inv(a, b, arg).map(|inv| inv.value),
            Self::IbetacInv => betainv_core::ibetac_inv(a, b, arg).map(|inv| inv.value),
            Self::Ibeta => betainv_core::ibeta(a, b, arg),
            Self::Ibetac => betainv_core::ibetac(a, b, arg),
        }
    }
}

/// A single fixture case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCase {
    /// Case identifier.
    pub name: String,
    pub function: FixtureFunction,
    pub a: f64,
    pub b: f64,
    /// `p`, `q` or `x` depending on `function`.
    pub arg: f64,
    /// Reference value; absent for failure cases.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<f64>,
    /// Relative tolerance against `expected` (absolute when `expected` is 0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel_tol: Option<f64>,
    /// Failure kind (`domain`, `convergence`, `evaluation`) the case must raise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_failure: Option<String>,
}

/// A collection of fixture cases for one function family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSet {
    /// Schema version.
    pub version: String,
    pub family: String,
    pub cases: Vec<FixtureCase>,
}

impl FixtureSet {
    /// Load fixture set from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize fixture set to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load fixture set from a file path.
    pub fn from_file(path: &Path) -> Result<Self, HarnessError> {
        let content = std::fs::read_to_string(path).map_err(|err| HarnessError::io(path, err))?;
        Self::from_json(&content).map_err(|source| HarnessError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}
