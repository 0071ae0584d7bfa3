//! constraints::corr_cholesky — support predicate for correlation-Cholesky factors.
//!
//! Purpose
//! -------
//! Decide whether a square matrix is the lower Cholesky factor of a valid
//! correlation matrix, and report *which* structural condition fails when it
//! is not. This is the support of [`LKJCholesky`](crate::distributions::lkj::LKJCholesky)
//! and the codomain of
//! [`CorrCholeskyTransform`](crate::transforms::corr_cholesky::CorrCholeskyTransform).
//!
//! Key behaviors
//! -------------
//! - [`is_corr_cholesky`] is a total boolean predicate: it never panics and
//!   returns `false` for non-square input.
//! - [`check_corr_cholesky`] runs the same checks and returns the first
//!   [`CorrCholeskyViolation`] encountered, so callers can surface a precise
//!   domain error.
//! - [`check_corr_cholesky_with_tol`] exposes the row-norm tolerance for
//!   configurable support checks.
//!
//! Invariants & assumptions
//! ------------------------
//! A matrix `x` of order `D` is accepted iff, element-wise and jointly:
//! - every entry strictly above the diagonal is exactly `0.0` (structural,
//!   not numeric),
//! - every diagonal entry is strictly positive,
//! - every row satisfies `|Σ_j x[i, j]² − 1| < tol` (default [`UNIT_NORM_TOL`]).
//!
//! Conventions
//! -----------
//! - Checks run in the order: shape, upper triangle, diagonal, row norms.
//!   Within each check, rows are scanned top to bottom.
//! - NaN entries fail every comparison and are therefore rejected.
use ndarray::ArrayView2;

/// Absolute tolerance on `Σ_j x[i, j]² − 1` for every row.
pub const UNIT_NORM_TOL: f64 = 1e-6;

/// First structural condition violated by a candidate correlation-Cholesky factor.
#[derive(Debug, Clone, PartialEq)]
pub enum CorrCholeskyViolation {
    /// The matrix is not square.
    NotSquare { rows: usize, cols: usize },

    /// An entry strictly above the diagonal is non-zero.
    UpperTriangleNonZero { row: usize, col: usize, value: f64 },

    /// A diagonal entry is not strictly positive.
    NonPositiveDiagonal { index: usize, value: f64 },

    /// A row's squared Euclidean norm is not within tolerance of 1.
    RowNormNotUnit { row: usize, sum_sq: f64, tol: f64 },
}

impl std::error::Error for CorrCholeskyViolation {}

impl std::fmt::Display for CorrCholeskyViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CorrCholeskyViolation::NotSquare { rows, cols } => {
                write!(f, "Matrix must be square; got shape ({rows}, {cols})")
            }
            CorrCholeskyViolation::UpperTriangleNonZero { row, col, value } => {
                write!(
                    f,
                    "Entry ({row}, {col}) above the diagonal must be zero; got {value}"
                )
            }
            CorrCholeskyViolation::NonPositiveDiagonal { index, value } => {
                write!(f, "Diagonal entry {index} must be strictly positive; got {value}")
            }
            CorrCholeskyViolation::RowNormNotUnit { row, sum_sq, tol } => {
                write!(
                    f,
                    "Row {row} must have unit Euclidean norm (tol {tol}); squared norm is {sum_sq}"
                )
            }
        }
    }
}

/// Return `true` iff `x` is a valid correlation-Cholesky factor.
///
/// Uses the default row-norm tolerance [`UNIT_NORM_TOL`]. Non-square input
/// returns `false`; this function never panics.
pub fn is_corr_cholesky(x: ArrayView2<f64>) -> bool {
    check_corr_cholesky(x).is_ok()
}

/// Check `x` against the correlation-Cholesky constraints with the default
/// tolerance and report the first violation.
///
/// # Errors
/// Returns the first [`CorrCholeskyViolation`] found, in the order
/// shape → upper triangle → diagonal → row norms.
pub fn check_corr_cholesky(x: ArrayView2<f64>) -> Result<(), CorrCholeskyViolation> {
    check_corr_cholesky_with_tol(x, UNIT_NORM_TOL)
}

/// Check `x` against the correlation-Cholesky constraints with a caller-supplied
/// row-norm tolerance.
///
/// Parameters
/// ----------
/// - `x`: `ArrayView2<f64>`
///   Candidate factor.
/// - `tol`: `f64`
///   Absolute tolerance on each row's squared norm. Callers are expected to
///   pass a finite, strictly positive value (see
///   [`LKJOptions`](crate::distributions::options::LKJOptions)).
///
/// Errors
/// ------
/// - `CorrCholeskyViolation::NotSquare` when `x` is not square.
/// - `CorrCholeskyViolation::UpperTriangleNonZero` for the first non-zero
///   entry strictly above the diagonal.
/// - `CorrCholeskyViolation::NonPositiveDiagonal` for the first diagonal entry
///   that is `≤ 0` or NaN.
/// - `CorrCholeskyViolation::RowNormNotUnit` for the first row whose squared
///   norm differs from 1 by `tol` or more.
pub fn check_corr_cholesky_with_tol(
    x: ArrayView2<f64>, tol: f64,
) -> Result<(), CorrCholeskyViolation> {
    let (rows, cols) = x.dim();
    if rows != cols {
        return Err(CorrCholeskyViolation::NotSquare { rows, cols });
    }

    for (i, row) in x.outer_iter().enumerate() {
        if let Some((j, &value)) = row.iter().enumerate().skip(i + 1).find(|&(_, &v)| v != 0.0) {
            return Err(CorrCholeskyViolation::UpperTriangleNonZero { row: i, col: j, value });
        }
    }

    for (index, &value) in x.diag().iter().enumerate() {
        // `!(v > 0)` so NaN is rejected too.
        if !(value > 0.0) {
            return Err(CorrCholeskyViolation::NonPositiveDiagonal { index, value });
        }
    }

    for (i, row) in x.outer_iter().enumerate() {
        let sum_sq = row.dot(&row);
        if !((sum_sq - 1.0).abs() < tol) {
            return Err(CorrCholeskyViolation::RowNormNotUnit { row: i, sum_sq, tol });
        }
    }

    Ok(())
}
