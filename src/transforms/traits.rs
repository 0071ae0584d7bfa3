//! transforms::traits — the bijection contract shared by every transform.
//!
//! Purpose
//! -------
//! Replace duck-typed `forward` / `inverse` / `log_abs_det_jacobian` methods
//! with one explicit trait. The set of implementors is closed (sealed):
//! [`TanhTransform`](super::tanh::TanhTransform),
//! [`PartialCorrToCholesky`](super::vine::PartialCorrToCholesky) and
//! [`CorrCholeskyTransform`](super::corr_cholesky::CorrCholeskyTransform).
//!
//! Conventions
//! -----------
//! - `forward` maps the domain to the codomain, `inverse` the other way.
//! - `log_abs_det_jacobian(x, y)` is the log-absolute determinant of the
//!   forward map's Jacobian at `x`, where `y = forward(x)` is supplied so
//!   implementations can use whichever side is cheaper or more stable.
//!   Callers must pass a consistent pair.
//! - For matrix-valued codomains the Jacobian is taken with respect to the
//!   strictly-lower-triangular entries, flattened in z order.
use crate::transforms::errors::TransformResult;

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::super::tanh::TanhTransform {}
    impl Sealed for super::super::vine::PartialCorrToCholesky {}
    impl Sealed for super::super::corr_cholesky::CorrCholeskyTransform {}
}

/// A differentiable bijection with a tractable log-Jacobian.
pub trait Transform: sealed::Sealed {
    /// Domain element (e.g. `Array1<f64>`).
    type Domain;
    /// Codomain element (e.g. `Array2<f64>`).
    type Codomain;

    /// Apply the bijection.
    fn forward(&self, x: &Self::Domain) -> TransformResult<Self::Codomain>;

    /// Apply the inverse bijection.
    fn inverse(&self, y: &Self::Codomain) -> TransformResult<Self::Domain>;

    /// `log |det ∂forward/∂x|` evaluated at `x` with `y = forward(x)`.
    fn log_abs_det_jacobian(
        &self, x: &Self::Domain, y: &Self::Codomain,
    ) -> TransformResult<f64>;
}
