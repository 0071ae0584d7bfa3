//! Errors for the LKJ Cholesky distribution (parameter checks, support and
//! shape failures, transform failures, and reparameterized sampling).
//!
//! This module defines [`LKJError`] and its result alias [`LKJResult`]. The
//! type implements `Display`/`Error`, classifies itself through
//! [`ErrorKind`], absorbs [`TransformError`] and [`CorrCholeskyViolation`]
//! via `From`, and converts to `PyErr` for PyO3.
//!
//! ## Conventions
//! - **Indices are 0-based**. Sample indices refer to the flat z-vector order.
//! - Parameters are never clamped: an invalid η or dimension is reported, not
//!   repaired.
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

use crate::{
    constraints::corr_cholesky::CorrCholeskyViolation,
    transforms::errors::{ErrorKind, TransformError},
};

/// Result alias for distribution operations that may produce [`LKJError`].
pub type LKJResult<T> = Result<T, LKJError>;

/// Unified error type for the LKJ Cholesky distribution.
#[derive(Debug, Clone, PartialEq)]
pub enum LKJError {
    // ---- Parameters ----
    /// Concentration η must be finite and strictly positive.
    InvalidEta { value: f64, reason: &'static str },

    /// Matrix order must be at least 2.
    InvalidDimension { dim: usize, reason: &'static str },

    /// Row-norm tolerance for support checks must be finite and > 0.
    InvalidSupportTol { value: f64 },

    /// A Beta marginal could not be built for the given concentration.
    InvalidBetaParam { index: usize, alpha: f64 },

    // ---- Shape ----
    /// Value's matrix order disagrees with the distribution's dimension.
    DimensionMismatch { expected: usize, found: (usize, usize) },

    // ---- Domain ----
    /// Value lies outside the correlation-Cholesky support.
    NotCorrCholesky(CorrCholeskyViolation),

    /// The pathwise derivative of a Beta draw does not exist (density zero
    /// or non-finite at the draw).
    NonDifferentiableSample { index: usize, draw: f64, density: f64 },

    // ---- Transforms ----
    /// Failure raised inside a transform.
    Transform(TransformError),
}

impl LKJError {
    /// Classify this error as a parameter, shape or domain failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LKJError::InvalidEta { .. }
            | LKJError::InvalidDimension { .. }
            | LKJError::InvalidSupportTol { .. }
            | LKJError::InvalidBetaParam { .. } => ErrorKind::Parameter,
            LKJError::DimensionMismatch { .. }
            | LKJError::NotCorrCholesky(CorrCholeskyViolation::NotSquare { .. }) => {
                ErrorKind::Shape
            }
            LKJError::NotCorrCholesky(_) | LKJError::NonDifferentiableSample { .. } => {
                ErrorKind::Domain
            }
            LKJError::Transform(err) => err.kind(),
        }
    }
}

impl std::error::Error for LKJError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LKJError::NotCorrCholesky(violation) => Some(violation),
            LKJError::Transform(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for LKJError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Parameters ----
            LKJError::InvalidEta { value, reason } => {
                write!(f, "Invalid concentration eta {value}: {reason}")
            }
            LKJError::InvalidDimension { dim, reason } => {
                write!(f, "Invalid dimension {dim}: {reason}")
            }
            LKJError::InvalidSupportTol { value } => {
                write!(f, "Support tolerance must be finite and > 0; got {value}")
            }
            LKJError::InvalidBetaParam { index, alpha } => {
                write!(f, "Beta marginal {index} rejected concentration {alpha}")
            }

            // ---- Shape ----
            LKJError::DimensionMismatch { expected, found } => {
                write!(
                    f,
                    "Value order mismatch: expected ({expected}, {expected}), found {found:?}"
                )
            }

            // ---- Domain ----
            LKJError::NotCorrCholesky(violation) => {
                write!(f, "Value is outside the LKJ support: {violation}")
            }
            LKJError::NonDifferentiableSample { index, draw, density } => {
                write!(
                    f,
                    "Draw {index} (b = {draw}) has Beta density {density}; no pathwise derivative"
                )
            }

            // ---- Transforms ----
            LKJError::Transform(err) => write!(f, "Transform failed: {err}"),
        }
    }
}

impl From<TransformError> for LKJError {
    fn from(err: TransformError) -> Self {
        match err {
            TransformError::NotCorrCholesky(violation) => LKJError::NotCorrCholesky(violation),
            other => LKJError::Transform(other),
        }
    }
}

impl From<CorrCholeskyViolation> for LKJError {
    fn from(violation: CorrCholeskyViolation) -> Self {
        LKJError::NotCorrCholesky(violation)
    }
}

/// Convert an [`LKJError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl std::convert::From<LKJError> for PyErr {
    fn from(err: LKJError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
