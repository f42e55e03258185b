//! Regularized incomplete beta function `I_x(a, b)` and its complement.
//!
//! Both tails are produced together: whichever tail the continued fraction
//! converges on is computed directly and the other is `1 - tail`, so the
//! small tail never comes from a cancelling subtraction.
//!
//! Two continued fractions are used. When both shapes exceed 1 the
//! DiDonato–Morris form is driven by `λ = a - (a+b)x`, which is formed from
//! whichever of `x` and `1 - x` is exact, so arguments sitting next to 1
//! keep their precision for very large shapes. Shapes at or below 1 use the
//! classical fraction under the modified Lentz method.

use crate::error::{BetaError, check_shape, check_unit};
use crate::gamma::{HALF_LN_2PI, STIRLING_MIN, lbeta, stirling_correction};

/// Iteration floor for both continued fractions.
pub(crate) const CF_MIN_ITER: usize = 1000;

const CF_TINY: f64 = 1e-300;

/// Lower and upper tail at a single point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Tails {
    /// `I_x(a, b)`
    pub lower: f64,
    /// `1 - I_x(a, b)`
    pub upper: f64,
}

/// Regularized incomplete beta function `I_x(a, b)`.
///
/// Domain: `a > 0`, `b > 0` (finite), `0 <= x <= 1`.
pub fn ibeta(a: f64, b: f64, x: f64) -> Result<f64, BetaError> {
    const NAME: &str = "ibeta";
    check_shape(NAME, "a", a)?;
    check_shape(NAME, "b", b)?;
    check_unit(NAME, "x", x)?;
    Ok(tails(NAME, a, b, x, lbeta(a, b))?.lower)
}

/// Complement of the regularized incomplete beta function, `1 - I_x(a, b)`.
pub fn ibetac(a: f64, b: f64, x: f64) -> Result<f64, BetaError> {
    const NAME: &str = "ibetac";
    check_shape(NAME, "a", a)?;
    check_shape(NAME, "b", b)?;
    check_unit(NAME, "x", x)?;
    Ok(tails(NAME, a, b, x, lbeta(a, b))?.upper)
}

/// Iteration cap for a fraction with shapes `a`, `b`.
///
/// Near the mean the number of terms grows with the spread of the
/// distribution, so the cap scales with `sqrt(ab / (a + b))`.
pub(crate) fn iteration_cap(a: f64, b: f64) -> usize {
    let spread = (a * b / (a + b)).sqrt();
    CF_MIN_ITER + (10.0 * spread).min(1e9) as usize
}

/// Evaluate both tails at `x`. Arguments are assumed validated; `x` is
/// taken as exact and `1 - x` is derived from it.
///
/// `ln_beta` is `ln B(a, b)`, hoisted out so root-finding loops compute it once.
pub(crate) fn tails(
    function: &'static str,
    a: f64,
    b: f64,
    x: f64,
    ln_beta: f64,
) -> Result<Tails, BetaError> {
    if x <= 0.0 {
        return Ok(Tails {
            lower: 0.0,
            upper: 1.0,
        });
    }
    if x >= 1.0 {
        return Ok(Tails {
            lower: 1.0,
            upper: 0.0,
        });
    }
    let y = 1.0 - x;

    if a > 1.0 && b > 1.0 {
        let lambda = if x < 0.5 {
            a - (a + b) * x
        } else {
            (a + b) * y - b
        };
        return if lambda >= 0.0 {
            let lower = power_terms(function, a, b, x, y, ln_beta)?
                * scaled_fraction(function, a, b, x, y, lambda)?;
            Ok(Tails {
                lower,
                upper: 1.0 - lower,
            })
        } else {
            let upper = power_terms(function, b, a, y, x, ln_beta)?
                * scaled_fraction(function, b, a, y, x, -lambda)?;
            Ok(Tails {
                lower: 1.0 - upper,
                upper,
            })
        };
    }

    if x <= (a + 1.0) / (a + b + 2.0) {
        let lower = power_terms(function, a, b, x, y, ln_beta)? / a
            * continued_fraction(function, a, b, x, y)?;
        Ok(Tails {
            lower,
            upper: 1.0 - lower,
        })
    } else {
        let upper = power_terms(function, b, a, y, x, ln_beta)? / b
            * continued_fraction(function, b, a, y, x)?;
        Ok(Tails {
            lower: 1.0 - upper,
            upper,
        })
    }
}

/// `x^a (1-x)^b / B(a, b)`, evaluated through logarithms.
///
/// With both shapes past `STIRLING_MIN` and `x` near the mean `a / (a + b)`
/// the exponent is expanded around the mean, where `a ln x` and `ln B`
/// would otherwise cancel to a tiny fraction of their size.
fn power_terms(
    function: &'static str,
    a: f64,
    b: f64,
    x: f64,
    y: f64,
    ln_beta: f64,
) -> Result<f64, BetaError> {
    let mut exponent = None;
    if a.min(b) >= STIRLING_MIN {
        let e = (a + b).mul_add(x, -a);
        let (ta, tb) = (e / a, -e / b);
        if ta.abs() <= 0.5 && tb.abs() <= 0.5 {
            let corr = stirling_correction(a) + stirling_correction(b) - stirling_correction(a + b);
            exponent = Some(
                a * ln_1p_mx(ta) + b * ln_1p_mx(tb) + 0.5 * (a.ln() + b.ln() - (a + b).ln())
                    - HALF_LN_2PI
                    - corr,
            );
        }
    }
    let exponent = exponent.unwrap_or_else(|| {
        let ln_x = if x <= 0.5 { x.ln() } else { (-y).ln_1p() };
        let ln_y = if x < 0.5 { (-x).ln_1p() } else { y.ln() };
        a * ln_x + b * ln_y - ln_beta
    });

    let value = exponent.exp();
    if value.is_finite() {
        Ok(value)
    } else {
        Err(BetaError::Evaluation {
            function,
            detail: "power prefix is not finite",
        })
    }
}

/// `ln(1 + t) - t`
#[inline]
fn ln_1p_mx(t: f64) -> f64 {
    t.ln_1p() - t
}

#[inline]
fn lentz_guard(v: f64) -> f64 {
    if v.abs() < CF_TINY { CF_TINY } else { v }
}

/// Continued fraction for `I_x(a, b)` (DLMF 8.17.22), modified Lentz method.
fn continued_fraction(
    function: &'static str,
    a: f64,
    b: f64,
    x: f64,
    y: f64,
) -> Result<f64, BetaError> {
    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;
    let cap = iteration_cap(a, b);

    // 1 - (a+b)x/(a+1), formed from the exact one of x and 1 - x.
    let first = if x > 0.5 {
        (qab * y - (b - 1.0)) / qap
    } else {
        (qap - qab * x) / qap
    };
    let mut c = 1.0;
    let mut d = 1.0 / lentz_guard(first);
    let mut f = d;

    for m in 1..=cap {
        let fm = m as f64;
        let m2 = 2.0 * fm;

        // Even step: m(b-m)x / ((a+2m-1)(a+2m))
        let even = fm * (b - fm) * x / ((qam + m2) * (a + m2));
        d = 1.0 / lentz_guard(1.0 + even * d);
        c = lentz_guard(1.0 + even / c);
        f *= d * c;

        // Odd step: -(a+m)(a+b+m)x / ((a+2m)(a+2m+1))
        let odd = -(a + fm) * (qab + fm) * x / ((a + m2) * (qap + m2));
        d = 1.0 / lentz_guard(1.0 + odd * d);
        c = lentz_guard(1.0 + odd / c);
        let delta = d * c;
        f *= delta;

        if !f.is_finite() {
            return Err(BetaError::Evaluation {
                function,
                detail: "continued fraction diverged",
            });
        }
        if (delta - 1.0).abs() < f64::EPSILON {
            return Ok(f);
        }
    }

    Err(BetaError::NoConvergence {
        function,
        iterations: cap,
    })
}

/// DiDonato–Morris continued fraction for `I_x(a, b) / (x^a (1-x)^b / B(a, b))`,
/// valid for `a, b > 1` and `lambda = a - (a+b)x >= 0`.
fn scaled_fraction(
    function: &'static str,
    a: f64,
    b: f64,
    x: f64,
    y: f64,
    lambda: f64,
) -> Result<f64, BetaError> {
    let cap = iteration_cap(a, b);
    let c = lambda + 1.0;
    let c0 = b / a;
    let c1 = 1.0 / a + 1.0;
    let yp1 = y + 1.0;

    let mut n = 0.0;
    let mut p = 1.0;
    let mut s = a + 1.0;
    let mut an = 0.0;
    let mut bn = 1.0;
    let mut anp1 = 1.0;
    let mut bnp1 = c / c1;
    let mut r = c1 / c;

    for _ in 0..cap {
        n += 1.0;
        let t = n / a;
        let w = n * (b - n) * x;
        let e = a / s;
        let alpha = p * (p + c0) * e * e * (w * x);
        let e = (t + 1.0) / (c1 + t + t);
        let beta = n + w / s + e * (c + n * yp1);
        p = t + 1.0;
        s += 2.0;

        let next_a = alpha * an + beta * anp1;
        an = anp1;
        anp1 = next_a;
        let next_b = alpha * bn + beta * bnp1;
        bn = bnp1;
        bnp1 = next_b;

        let r0 = r;
        r = anp1 / bnp1;
        if !r.is_finite() {
            return Err(BetaError::Evaluation {
                function,
                detail: "continued fraction diverged",
            });
        }
        if (r - r0).abs() <= f64::EPSILON * r {
            return Ok(r);
        }

        // Rescale to keep the recurrences in range.
        an /= bnp1;
        bn /= bnp1;
        anp1 = r;
        bnp1 = 1.0;
    }

    Err(BetaError::NoConvergence {
        function,
        iterations: cap,
    })
}
