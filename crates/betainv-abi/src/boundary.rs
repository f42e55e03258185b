//! Failure translation at the C boundary.
//!
//! Every entry point runs the evaluator inside [`guard`], which turns both
//! `Err` values and panics into a [`BoundaryFailure`]. [`fail`] then emits
//! the diagnostic and yields the status code handed back to C.

use std::any::Any;
use std::ffi::c_int;
use std::panic::{UnwindSafe, catch_unwind};

use betainv_core::{BetaError, FailureKind};
use thiserror::Error;

use crate::diagnostics::{self, DiagnosticKind};

pub const STATUS_OK: c_int = 0;
pub const STATUS_FAILED: c_int = 1;

/// Anything that stops an entry point from producing a result.
#[derive(Debug, Error)]
pub enum BoundaryFailure {
    #[error(transparent)]
    Evaluator(#[from] BetaError),
    #[error("{symbol}: result pointer is null")]
    NullOutput { symbol: &'static str },
    #[error("{symbol}: evaluator panicked: {message}")]
    Panic {
        symbol: &'static str,
        message: String,
    },
}

impl BoundaryFailure {
    #[must_use]
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Self::Evaluator(err) => match err.kind() {
                FailureKind::Domain => DiagnosticKind::Domain,
                FailureKind::Convergence => DiagnosticKind::Convergence,
                FailureKind::Evaluation => DiagnosticKind::Evaluation,
            },
            Self::NullOutput { .. } => DiagnosticKind::NullOutput,
            Self::Panic { .. } => DiagnosticKind::Panic,
        }
    }
}

/// Run `eval`, folding error values and panics into [`BoundaryFailure`].
pub fn guard<T, F>(symbol: &'static str, eval: F) -> Result<T, BoundaryFailure>
where
    F: FnOnce() -> Result<T, BetaError> + UnwindSafe,
{
    match catch_unwind(eval) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(err.into()),
        Err(payload) => Err(BoundaryFailure::Panic {
            symbol,
            message: panic_message(payload.as_ref()),
        }),
    }
}

/// Report `failure` on the diagnostics channel and return the failure status.
pub fn fail(symbol: &'static str, inputs: [f64; 3], failure: &BoundaryFailure) -> c_int {
    diagnostics::emit(symbol, inputs, failure);
    STATUS_FAILED
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
