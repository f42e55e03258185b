// All extern "C" exports accept raw output pointers from C callers; the
// pointer contract is documented once here rather than per function.
#![allow(clippy::missing_safety_doc)]
//! # betainv-abi
//!
//! ABI-compatible extern "C" boundary over `betainv-core`.
//!
//! This crate produces a `cdylib` exposing `ibeta_inv` / `ibetac_inv` (and the
//! forward `ibeta` / `ibetac`) with a status-code calling convention:
//! `0` on success, `1` on failure, results written through caller-allocated
//! output pointers.
//!
//! # Architecture
//!
//! ```text
//! C caller -> ABI entry (beta_abi) -> boundary guard -> betainv-core -> status
//!                                          |
//!                                          +-> diagnostics (text | json | hook | off)
//! ```
//!
//! Nothing raised by the evaluator crosses the boundary: error values and
//! panics alike are rendered into a diagnostic and collapsed to status `1`.
//!
//! # Pointer contract
//!
//! - `res` must be null or valid for a write of one `f64`; null is reported
//!   as a failure.
//! - `y` may be null, in which case the complement is not written.
//! - Nothing is written on the failure path.

pub mod beta_abi;
pub mod boundary;
pub mod config;
pub mod diagnostics;

pub use boundary::{BoundaryFailure, STATUS_FAILED, STATUS_OK};
pub use config::{DiagnosticMode, diagnostic_mode, set_diagnostic_mode};
pub use diagnostics::{DiagnosticHook, DiagnosticKind};
