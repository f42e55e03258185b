//! Conformance harness for the betainv evaluators.
//!
//! This crate provides:
//! - Fixture sets: reference values for the inverse and forward functions
//! - Verification: evaluate every case through `betainv-core` and report
//! - Structured logging: JSONL records for each verification run

#![forbid(unsafe_code)]

pub mod error;
pub mod fixtures;
pub mod structured_log;
pub mod verify;

pub use error::HarnessError;
pub use fixtures::{FixtureCase, FixtureFunction, FixtureSet};
pub use verify::{CaseResult, VerificationReport, verify_fixture_file, verify_fixture_set};
