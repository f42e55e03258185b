//! # betainv-core
//!
//! Safe Rust evaluator for the regularized incomplete beta function
//! `I_x(a, b)`, its complement, and the inverses of both, plus the exact
//! binomial confidence bounds built on the inverses.
//!
//! Every fallible entry point returns [`BetaError`] describing which argument
//! was rejected or which iteration failed to settle. No `unsafe` code is
//! permitted in this crate; the C boundary lives in `betainv-abi`.
//!
//! ```
//! let inv = betainv_core::ibeta_inv(2.0, 3.0, 0.5).unwrap();
//! assert!((inv.value - 0.385_727_568_132_39).abs() < 1e-12);
//! assert!((inv.value + inv.complement - 1.0).abs() < 1e-15);
//! ```

#![deny(unsafe_code)]

pub mod binomial;
pub mod error;
pub mod gamma;
pub mod incomplete;
pub mod inverse;

pub use binomial::{binom_param_lb, binom_param_ub};
pub use error::{BetaError, FailureKind};
pub use gamma::{lbeta, lgamma};
pub use incomplete::{ibeta, ibetac};
pub use inverse::{BetaInverse, ibeta_inv, ibetac_inv};
