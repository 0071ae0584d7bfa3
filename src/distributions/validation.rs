//! Validation helpers for LKJ construction parameters.
//!
//! Each helper checks one parameter in isolation and returns the matching
//! [`LKJError`] variant; nothing is clamped or coerced.
use crate::distributions::errors::{LKJError, LKJResult};

/// Validate the concentration **η**.
///
/// Returns
/// -------
/// `LKJResult<()>`
///   - `Ok(())` if `eta` is finite and strictly > 0.
///   - `Err(LKJError::InvalidEta)` otherwise.
///
/// Examples
/// --------
/// ```rust
/// # use lkj_cholesky::distributions::validation::validate_eta;
/// use lkj_cholesky::distributions::errors::LKJError;
///
/// assert!(validate_eta(0.5).is_ok());
/// assert!(matches!(validate_eta(0.0), Err(LKJError::InvalidEta { .. })));
/// ```
pub fn validate_eta(eta: f64) -> LKJResult<()> {
    if !eta.is_finite() {
        return Err(LKJError::InvalidEta { value: eta, reason: "must be finite" });
    }
    if eta <= 0.0 {
        return Err(LKJError::InvalidEta { value: eta, reason: "must be strictly positive" });
    }
    Ok(())
}

/// Validate the matrix order `dim ≥ 2`.
///
/// # Errors
/// `LKJError::InvalidDimension` for `dim < 2`.
pub fn validate_dim(dim: usize) -> LKJResult<()> {
    if dim < 2 {
        return Err(LKJError::InvalidDimension { dim, reason: "must be at least 2" });
    }
    Ok(())
}

/// Validate the row-norm tolerance used by support checks.
///
/// # Errors
/// `LKJError::InvalidSupportTol` when `tol` is NaN, ±∞, or ≤ 0.
pub fn validate_support_tol(tol: f64) -> LKJResult<()> {
    if tol <= 0.0 || !tol.is_finite() {
        return Err(LKJError::InvalidSupportTol { value: tol });
    }
    Ok(())
}
