//! transforms — bijections between unconstrained space and the
//! correlation-Cholesky support.
//!
//! Purpose
//! -------
//! Collect the pieces of the unconstrained reparameterization used by the LKJ
//! distribution: an element-wise squashing stage, the vine / onion
//! partial-correlation construction, their composition, and numerical
//! diagnostics for the analytic log-Jacobians.
//!
//! Key behaviors
//! -------------
//! - [`TanhTransform`] maps `ℝ^L → (−1, 1)^L` element-wise.
//! - [`PartialCorrToCholesky`] maps `(−1, 1)^L` onto `D×D` correlation-Cholesky
//!   factors, `L = D(D−1)/2`, and offers a Jacobian–vector product for
//!   reparameterized sampling.
//! - [`CorrCholeskyTransform`] composes the two.
//! - Every transform implements the sealed [`Transform`] trait:
//!   `forward`, `inverse`, `log_abs_det_jacobian`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Forward outputs always satisfy
//!   [`is_corr_cholesky`](crate::constraints::corr_cholesky::is_corr_cholesky).
//! - Inverses validate their input against the support and return
//!   [`TransformError`] instead of producing NaNs.
//! - All routines are pure functions of their inputs; transforms carry only
//!   their dimension and are `Copy`.
//!
//! Conventions
//! -----------
//! - The flat z order is column-major over the strictly-lower triangle, top
//!   to bottom within a column ([`vec_tril_strict`]).
//! - Shape and domain failures share the crate-wide [`ErrorKind`].
//!
//! Downstream usage
//! ----------------
//! - `distributions::lkj` samples through the vine stage and carries a
//!   [`CorrCholeskyTransform`] as the canonical unconstrained bijection for
//!   its support.
//! - Python bindings expose [`CorrCholeskyTransform`] directly.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each transform; the composed log-Jacobian is
//!   cross-checked against [`numerical_log_abs_det_jacobian`] in
//!   [`diagnostics`].

pub mod corr_cholesky;
pub mod diagnostics;
pub mod errors;
pub mod numerical_stability;
pub mod tanh;
pub mod traits;
pub mod vine;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::corr_cholesky::CorrCholeskyTransform;
pub use self::diagnostics::{jacobian_discrepancy, numerical_log_abs_det_jacobian, vec_tril_strict};
pub use self::errors::{ErrorKind, TransformError, TransformResult};
pub use self::numerical_stability::{log_cosh, safe_atanh, safe_softplus};
pub use self::tanh::TanhTransform;
pub use self::traits::Transform;
pub use self::vine::{PartialCorrToCholesky, dim_from_len, vec_len};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use lkj_cholesky::transforms::prelude::*;
//
// to import the transform surface in a single line.

pub mod prelude {
    pub use super::corr_cholesky::CorrCholeskyTransform;
    pub use super::errors::{TransformError, TransformResult};
    pub use super::tanh::TanhTransform;
    pub use super::traits::Transform;
    pub use super::vine::PartialCorrToCholesky;
}
