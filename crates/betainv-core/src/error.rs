//! Evaluator failure taxonomy.

use thiserror::Error;

/// Failure raised by an incomplete-beta evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BetaError {
    /// An argument lies outside the function's domain.
    #[error("{function}: {parameter} = {value} is outside the domain ({requirement})")]
    Domain {
        function: &'static str,
        parameter: &'static str,
        value: f64,
        requirement: &'static str,
    },
    /// An iteration hit its cap without settling.
    #[error("{function}: no convergence after {iterations} iterations")]
    NoConvergence {
        function: &'static str,
        iterations: usize,
    },
    /// An intermediate quantity was not finite.
    #[error("{function}: evaluation failed: {detail}")]
    Evaluation {
        function: &'static str,
        detail: &'static str,
    },
}

/// Coarse failure class, stable across releases for logs and C callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Domain,
    Convergence,
    Evaluation,
}

impl FailureKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Convergence => "convergence",
            Self::Evaluation => "evaluation",
        }
    }
}

impl BetaError {
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Domain { .. } => FailureKind::Domain,
            Self::NoConvergence { .. } => FailureKind::Convergence,
            Self::Evaluation { .. } => FailureKind::Evaluation,
        }
    }

    /// Name of the public function that raised the failure.
    #[must_use]
    pub const fn function(&self) -> &'static str {
        match self {
            Self::Domain { function, .. }
            | Self::NoConvergence { function, .. }
            | Self::Evaluation { function, .. } => function,
        }
    }
}

impl BetaError {
    /// Re-attribute the failure to a wrapper that delegated to `self.function()`.
    pub(crate) const fn raised_by(self, function: &'static str) -> Self {
        match self {
            Self::Domain {
                parameter,
                value,
                requirement,
                ..
            } => Self::Domain {
                function,
                parameter,
                value,
                requirement,
            },
            Self::NoConvergence { iterations, .. } => Self::NoConvergence {
                function,
                iterations,
            },
            Self::Evaluation { detail, .. } => Self::Evaluation { function, detail },
        }
    }
}

/// Reject non-finite or non-positive shape parameters.
pub(crate) fn check_shape(
    function: &'static str,
    parameter: &'static str,
    value: f64,
) -> Result<(), BetaError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(BetaError::Domain {
            function,
            parameter,
            value,
            requirement: "finite and > 0",
        })
    }
}

/// Reject arguments outside the closed unit interval (NaN included).
pub(crate) fn check_unit(
    function: &'static str,
    parameter: &'static str,
    value: f64,
) -> Result<(), BetaError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(BetaError::Domain {
            function,
            parameter,
            value,
            requirement: "0 <= value <= 1",
        })
    }
}
