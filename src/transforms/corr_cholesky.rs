//! transforms::corr_cholesky — unconstrained vector ↔ correlation-Cholesky factor.
//!
//! Purpose
//! -------
//! Compose the element-wise [`TanhTransform`] with the vine
//! [`PartialCorrToCholesky`] bijection into a single map
//! `ℝ^{D(D−1)/2} → {D×D correlation-Cholesky factors}`. This is the canonical
//! unconstrained reparameterization for the LKJ support; callers construct it
//! directly for the dimension they need.
//!
//! Key behaviors
//! -------------
//! - `forward(u) = vine(tanh(u))`.
//! - `inverse(x) = atanh(vine⁻¹(x))`.
//! - `log|det J|(u) = Σ −2·ln cosh(u_k) + vine log-Jacobian at x`.
//!
//! Invariants & assumptions
//! ------------------------
//! - In exact arithmetic the domain is all of `ℝ^L`. In `f64`, `tanh(u)`
//!   rounds to `±1` once `|u| ≳ 19`, which the vine stage rejects as a
//!   domain error rather than emitting a degenerate factor.
use crate::transforms::{
    errors::TransformResult,
    tanh::TanhTransform,
    traits::Transform,
    vine::{PartialCorrToCholesky, dim_from_len, vec_len},
};
use ndarray::{Array1, Array2};

/// Composed `tanh` → vine bijection for factors of a fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrCholeskyTransform {
    squash: TanhTransform,
    vine: PartialCorrToCholesky,
}

impl CorrCholeskyTransform {
    /// Transform for `dim×dim` factors.
    pub const fn new(dim: usize) -> Self {
        CorrCholeskyTransform { squash: TanhTransform::new(), vine: PartialCorrToCholesky::new(dim) }
    }

    /// Transform matching an unconstrained vector of length `len`.
    ///
    /// # Errors
    /// [`TransformError::NotTriangularLength`](crate::transforms::errors::TransformError::NotTriangularLength)
    /// when `len ≠ D(D−1)/2`.
    pub fn from_len(len: usize) -> TransformResult<Self> {
        Ok(CorrCholeskyTransform::new(dim_from_len(len)?))
    }

    pub const fn dim(&self) -> usize {
        self.vine.dim()
    }

    pub const fn vec_len(&self) -> usize {
        vec_len(self.vine.dim())
    }

    /// The squashing stage.
    pub const fn squash(&self) -> &TanhTransform {
        &self.squash
    }

    /// The partial-correlation stage.
    pub const fn partial_corr(&self) -> &PartialCorrToCholesky {
        &self.vine
    }

    /// Forward map and its log-Jacobian in one pass.
    ///
    /// Equivalent to `forward(u)` followed by `log_abs_det_jacobian(u, x)`
    /// but squashes `u` only once.
    pub fn forward_with_log_det(&self, u: &Array1<f64>) -> TransformResult<(Array2<f64>, f64)> {
        let z = self.squash.forward(u)?;
        let x = self.vine.forward(&z)?;
        let log_det =
            self.squash.log_abs_det_jacobian(u, &z)? + self.vine.log_abs_det_jacobian(&z, &x)?;
        Ok((x, log_det))
    }
}

impl Transform for CorrCholeskyTransform {
    type Domain = Array1<f64>;
    type Codomain = Array2<f64>;

    fn forward(&self, u: &Array1<f64>) -> TransformResult<Array2<f64>> {
        let z = self.squash.forward(u)?;
        self.vine.forward(&z)
    }

    fn inverse(&self, x: &Array2<f64>) -> TransformResult<Array1<f64>> {
        let z = self.vine.inverse(x)?;
        self.squash.inverse(&z)
    }

    fn log_abs_det_jacobian(&self, u: &Array1<f64>, x: &Array2<f64>) -> TransformResult<f64> {
        let z = self.squash.forward(u)?;
        Ok(self.squash.log_abs_det_jacobian(u, &z)? + self.vine.log_abs_det_jacobian(&z, x)?)
    }
}
