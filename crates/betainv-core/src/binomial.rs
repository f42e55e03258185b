//! One-sided confidence bounds for a binomial success probability.
//!
//! After observing `k` successes in `n` trials, the exact (Clopper–Pearson)
//! bounds come from the beta inverses through
//! `P(X <= k | n, x) = 1 - I_x(k + 1, n - k)` and
//! `P(X >= k | n, x) = I_x(k, n - k + 1)`.

use crate::error::{BetaError, check_unit};
use crate::inverse::{ibeta_inv, ibetac_inv};

fn check_counts(function: &'static str, n: u64, k: u64) -> Result<(), BetaError> {
    if k <= n {
        Ok(())
    } else {
        Err(BetaError::Domain {
            function,
            parameter: "k",
            value: k as f64,
            requirement: "k <= n",
        })
    }
}

/// Upper bound on the success probability given `k` successes in `n` trials.
///
/// Returns the `x` at which `P(X <= k) = proba` for `X ~ Binomial(n, x)`, or
/// `1` when every trial succeeded. For `proba <= 0.5` the result is at least
/// `k / n`.
pub fn binom_param_ub(n: u64, k: u64, proba: f64) -> Result<f64, BetaError> {
    const NAME: &str = "binom_param_ub";
    check_counts(NAME, n, k)?;
    check_unit(NAME, "proba", proba)?;
    if k == n {
        return Ok(1.0);
    }
    let inv = ibetac_inv((k + 1) as f64, (n - k) as f64, proba).map_err(|e| e.raised_by(NAME))?;
    Ok(inv.value)
}

/// Lower bound on the success probability given `k` successes in `n` trials.
///
/// Returns the `x` at which `P(X >= k) = proba` for `X ~ Binomial(n, x)`, or
/// `0` when no trial succeeded. For `proba <= 0.5` the result is at most
/// `k / n`.
pub fn binom_param_lb(n: u64, k: u64, proba: f64) -> Result<f64, BetaError> {
    const NAME: &str = "binom_param_lb";
    check_counts(NAME, n, k)?;
    check_unit(NAME, "proba", proba)?;
    if k == 0 {
        return Ok(0.0);
    }
    let inv = ibeta_inv(k as f64, (n - k + 1) as f64, proba).map_err(|e| e.raised_by(NAME))?;
    Ok(inv.value)
}
