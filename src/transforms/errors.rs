//! transforms::errors — error surface for correlation-Cholesky bijections.
//!
//! Defines [`TransformError`], its result alias [`TransformResult`], and the
//! crate-wide [`ErrorKind`] classification (parameter / shape / domain) shared
//! with the distribution layer. All variants are deterministic validation
//! failures; none are retried or coerced.
//!
//! ## Conventions
//! - **Indices are 0-based** and refer to the flat z-vector order (column by
//!   column, top to bottom) unless a `(row, col)` pair is given.
//! - Shape errors carry the expected and found sizes; domain errors carry the
//!   offending value.
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

use crate::constraints::corr_cholesky::CorrCholeskyViolation;

/// Result alias for transform operations that may produce [`TransformError`].
pub type TransformResult<T> = Result<T, TransformError>;

/// Coarse classification of every error produced by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid construction parameter (η, dimension, options).
    Parameter,
    /// Array length or matrix order is inconsistent.
    Shape,
    /// Value lies outside the declared domain of an operation.
    Domain,
}

/// Errors raised by the tanh, vine and composed transforms.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformError {
    // ---- Shape ----
    /// Vector length is not `D(D−1)/2` for any integer `D ≥ 1`.
    NotTriangularLength { len: usize },

    /// Input length disagrees with the transform's dimension.
    LengthMismatch { expected: usize, actual: usize },

    /// Matrix order disagrees with the transform's dimension.
    OrderMismatch { expected: usize, found: (usize, usize) },

    // ---- Domain ----
    /// A coordinate is NaN or ±∞.
    NonFiniteInput { index: usize, value: f64 },

    /// A coordinate lies outside the open interval (−1, 1).
    OutsideUnitInterval { index: usize, value: f64 },

    /// Matrix is not a correlation-Cholesky factor.
    NotCorrCholesky(CorrCholeskyViolation),

    /// Residual norm² of `row` at column `col` is too small to carry a
    /// partial correlation strictly inside `(−1, 1)`: it underflowed to zero
    /// in `forward`, or rounds the inverse to `±1`.
    DegenerateRow { row: usize, col: usize, residual: f64 },

    /// Tangent and point have different lengths in a Jacobian–vector product.
    TangentLengthMismatch { expected: usize, actual: usize },
}

impl TransformError {
    /// Classify this error as a parameter, shape or domain failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransformError::NotTriangularLength { .. }
            | TransformError::LengthMismatch { .. }
            | TransformError::OrderMismatch { .. }
            | TransformError::TangentLengthMismatch { .. } => ErrorKind::Shape,
            TransformError::NotCorrCholesky(CorrCholeskyViolation::NotSquare { .. }) => {
                ErrorKind::Shape
            }
            TransformError::NonFiniteInput { .. }
            | TransformError::OutsideUnitInterval { .. }
            | TransformError::NotCorrCholesky(_)
            | TransformError::DegenerateRow { .. } => ErrorKind::Domain,
        }
    }
}

impl std::error::Error for TransformError {}

impl std::fmt::Display for TransformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Shape ----
            TransformError::NotTriangularLength { len } => {
                write!(
                    f,
                    "Correlation-Cholesky transforms require D(D-1)/2 inputs; got length {len}"
                )
            }
            TransformError::LengthMismatch { expected, actual } => {
                write!(f, "Input length mismatch: expected {expected}, got {actual}")
            }
            TransformError::OrderMismatch { expected, found } => {
                write!(
                    f,
                    "Matrix order mismatch: expected ({expected}, {expected}), found {found:?}"
                )
            }
            TransformError::TangentLengthMismatch { expected, actual } => {
                write!(f, "Tangent length mismatch: expected {expected}, got {actual}")
            }

            // ---- Domain ----
            TransformError::NonFiniteInput { index, value } => {
                write!(f, "Input at index {index} must be finite; got {value}")
            }
            TransformError::OutsideUnitInterval { index, value } => {
                write!(f, "Input at index {index} must lie in (-1, 1); got {value}")
            }
            TransformError::NotCorrCholesky(violation) => {
                write!(f, "Not a correlation-Cholesky factor: {violation}")
            }
            TransformError::DegenerateRow { row, col, residual } => {
                write!(
                    f,
                    "Row {row} has no usable residual norm at column {col} (residual = {residual})"
                )
            }
        }
    }
}

impl From<CorrCholeskyViolation> for TransformError {
    fn from(violation: CorrCholeskyViolation) -> Self {
        TransformError::NotCorrCholesky(violation)
    }
}

/// Convert a [`TransformError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl std::convert::From<TransformError> for PyErr {
    fn from(err: TransformError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
