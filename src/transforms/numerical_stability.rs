//! Numerically stable scalar helpers for the squashing stage.
//!
//! The tanh bijection needs `log cosh(x)` and `atanh(y)`, both of which lose
//! precision or overflow in naïve form for large `|x|` or `|y| → 1`. The
//! helpers here use guarded formulas with an explicit cutoff (`x > 20.0`) to
//! keep `f64` arithmetic in a well-conditioned regime.
//!
//! # Provided items
//! - [`safe_softplus(x)`]: stable `ln(1 + exp(x))`.
//! - [`log_cosh(x)`]: stable `ln(cosh(x))` via softplus.
//! - [`safe_atanh(y)`]: `½·ln((1 + y)/(1 − y))` using `ln_1p` on both sides.

use std::f64::consts::LN_2;

/// Numerically stable softplus: `softplus(x) = ln(1 + exp(x))`.
///
/// - For `x > 20`, `softplus(x) ≈ x` to within `f64` precision.
/// - Otherwise falls back to `ln1p(exp(x))`, which is accurate for very
///   negative `x` where `exp(x)` underflows gracefully to zero.
pub fn safe_softplus(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp().ln_1p() }
}

/// `ln(cosh(x))` without overflow.
///
/// Uses `ln cosh(x) = |x| − ln 2 + softplus(−2|x|)`, which is exact in real
/// arithmetic and never evaluates `exp` of a positive argument.
pub fn log_cosh(x: f64) -> f64 {
    let a = x.abs();
    a - LN_2 + safe_softplus(-2.0 * a)
}

/// Inverse hyperbolic tangent on `(−1, 1)`.
///
/// Evaluated as `½·(ln1p(y) − ln1p(−y))` to avoid cancellation in
/// `(1 + y)/(1 − y)` near the boundary. Returns `±∞` at `y = ±1` and NaN
/// outside `[−1, 1]`; domain checks belong to the caller.
pub fn safe_atanh(y: f64) -> f64 {
    0.5 * (y.ln_1p() - (-y).ln_1p())
}
