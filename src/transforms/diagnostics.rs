//! transforms::diagnostics — numerical cross-checks for analytic log-Jacobians.
//!
//! Purpose
//! -------
//! Provide a dense finite-difference reference for the log-Jacobian of the
//! composed [`CorrCholeskyTransform`], so tests and callers can confirm the
//! analytic `log_abs_det_jacobian` at any point of the unconstrained domain.
//!
//! Key behaviors
//! -------------
//! - [`vec_tril_strict`] flattens the strictly-lower triangle of a square
//!   matrix in z order (column by column, top to bottom).
//! - [`numerical_log_abs_det_jacobian`] differentiates
//!   `u ↦ vec_tril_strict(forward(u))` with `finitediff`'s central Jacobian
//!   and takes `ln|det|` through an `nalgebra` LU factorization.
//! - [`jacobian_discrepancy`] reports `|analytic − numerical|`.
//!
//! Invariants & assumptions
//! ------------------------
//! - The composed forward map is square in the strictly-lower coordinates:
//!   `L` inputs produce `L` free outputs, so the Jacobian determinant is well
//!   defined.
//! - Any error raised by `forward` while finite differencing is captured in a
//!   `RefCell` and surfaced instead of the NaN-filled Jacobian.
//!
//! Testing notes
//! -------------
//! - These helpers are `O(L³)` and meant for validation, not inner loops.
use crate::transforms::{
    corr_cholesky::CorrCholeskyTransform,
    errors::{TransformError, TransformResult},
    traits::Transform,
};
use finitediff::FiniteDiff;
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};
use std::cell::RefCell;

/// Strictly-lower-triangular entries of `x`, column by column.
///
/// For a `D×D` input the result has length `D(D−1)/2` and, for any
/// `x = PartialCorrToCholesky::forward(z)`, lists `x[i, j]` in the same order
/// the vine consumed `z`.
pub fn vec_tril_strict(x: &Array2<f64>) -> Array1<f64> {
    let d = x.nrows().min(x.ncols());
    let mut out = Vec::with_capacity(d * d.saturating_sub(1) / 2);
    for j in 0..d {
        for i in (j + 1)..x.nrows() {
            out.push(x[[i, j]]);
        }
    }
    Array1::from(out)
}

/// numerical_log_abs_det_jacobian — `ln|det J|` by central differences.
///
/// Parameters
/// ----------
/// - `transform`: `&CorrCholeskyTransform`
///   Composed transform whose forward map is differentiated.
/// - `u`: `&Array1<f64>`
///   Unconstrained point of length `D(D−1)/2`.
///
/// Returns
/// -------
/// `TransformResult<f64>`
///   `ln|det ∂ vec_tril_strict(forward(u)) / ∂u|`.
///
/// Errors
/// ------
/// - Any error `transform.forward` raises at `u` or at a perturbed point.
///
/// Notes
/// -----
/// - An empty `u` (`D = 1`) yields `0.0`, the log-determinant of the empty
///   Jacobian.
pub fn numerical_log_abs_det_jacobian(
    transform: &CorrCholeskyTransform, u: &Array1<f64>,
) -> TransformResult<f64> {
    transform.forward(u)?;
    let n = u.len();
    if n == 0 {
        return Ok(0.0);
    }

    let closure_err: RefCell<Option<TransformError>> = RefCell::new(None);
    let f = |v: &Array1<f64>| match transform.forward(v) {
        Ok(x) => vec_tril_strict(&x),
        Err(e) => {
            closure_err.borrow_mut().get_or_insert(e);
            Array1::from_elem(n, f64::NAN)
        }
    };
    let jac = u.central_jacobian(&f);
    if let Some(err) = closure_err.take() {
        return Err(err);
    }

    let dense = DMatrix::<f64>::from_fn(n, n, |i, j| jac[[i, j]]);
    Ok(dense.lu().determinant().abs().ln())
}

/// `|analytic − numerical|` log-Jacobian gap at `u`.
///
/// # Errors
/// Any error from `forward`, `log_abs_det_jacobian`, or the numerical path.
pub fn jacobian_discrepancy(
    transform: &CorrCholeskyTransform, u: &Array1<f64>,
) -> TransformResult<f64> {
    let x = transform.forward(u)?;
    let analytic = transform.log_abs_det_jacobian(u, &x)?;
    let numerical = numerical_log_abs_det_jacobian(transform, u)?;
    Ok((analytic - numerical).abs())
}
