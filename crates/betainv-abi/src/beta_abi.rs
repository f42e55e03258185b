//! ABI layer for the incomplete beta inverses.
//!
//! Each entry point validates its output pointer, runs the evaluator under
//! the boundary guard, and writes through the pointers only on success.

use std::ffi::c_int;

use betainv_core::{BetaError, BetaInverse};

use crate::boundary::{self, BoundaryFailure, STATUS_OK};
use crate::diagnostics::{self, DiagnosticHook};

type InverseFn = fn(f64, f64, f64) -> Result<BetaInverse, BetaError>;
type ForwardFn = fn(f64, f64, f64) -> Result<f64, BetaError>;

#[inline]
unsafe fn inverse_entry(
    symbol: &'static str,
    a: f64,
    b: f64,
    p: f64,
    res: *mut f64,
    y: *mut f64,
    f: InverseFn,
) -> c_int {
    let inputs = [a, b, p];
    if res.is_null() {
        return boundary::fail(symbol, inputs, &BoundaryFailure::NullOutput { symbol });
    }
    match boundary::guard(symbol, move || f(a, b, p)) {
        Ok(inv) => {
            // SAFETY: `res` is non-null and caller-provided for one f64; `y` is
            // written only when non-null.
            unsafe {
                *res = inv.value;
                if !y.is_null() {
                    *y = inv.complement;
                }
            }
            STATUS_OK
        }
        Err(failure) => boundary::fail(symbol, inputs, &failure),
    }
}

#[inline]
unsafe fn forward_entry(
    symbol: &'static str,
    a: f64,
    b: f64,
    x: f64,
    res: *mut f64,
    f: ForwardFn,
) -> c_int {
    let inputs = [a, b, x];
    if res.is_null() {
        return boundary::fail(symbol, inputs, &BoundaryFailure::NullOutput { symbol });
    }
    match boundary::guard(symbol, move || f(a, b, x)) {
        Ok(value) => {
            // SAFETY: `res` is non-null and caller-provided for one f64.
            unsafe { *res = value };
            STATUS_OK
        }
        Err(failure) => boundary::fail(symbol, inputs, &failure),
    }
}

/// `x` with `I_x(a, b) = p` into `*res`, `1 - x` into `*y`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ibeta_inv(a: f64, b: f64, p: f64, res: *mut f64, y: *mut f64) -> c_int {
    unsafe { inverse_entry("ibeta_inv", a, b, p, res, y, betainv_core::ibeta_inv) }
}

/// `x` with `1 - I_x(a, b) = q` into `*res`, `1 - x` into `*y`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ibetac_inv(a: f64, b: f64, q: f64, res: *mut f64, y: *mut f64) -> c_int {
    unsafe { inverse_entry("ibetac_inv", a, b, q, res, y, betainv_core::ibetac_inv) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn ibeta(a: f64, b: f64, x: f64, res: *mut f64) -> c_int {
    unsafe { forward_entry("ibeta", a, b, x, res, betainv_core::ibeta) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn ibetac(a: f64, b: f64, x: f64, res: *mut f64) -> c_int {
    unsafe { forward_entry("ibetac", a, b, x, res, betainv_core::ibetac) }
}

/// Route failure diagnostics to `hook` instead of stdout; null restores stdout.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn betainv_set_diagnostic_hook(hook: Option<DiagnosticHook>) {
    diagnostics::set_hook(hook);
}
