//! distributions — probability distributions over correlation-Cholesky factors.
//!
//! Purpose
//! -------
//! Host the LKJ distribution on lower Cholesky factors of correlation
//! matrices together with its error type, configuration and parameter
//! validation.
//!
//! Key behaviors
//! -------------
//! - [`LKJCholesky`] samples via Beta-distributed partial correlations pushed
//!   through the vine construction, provides reparameterized draws with
//!   `∂x/∂η`, and evaluates the log-density with a cached normalizer.
//! - [`LKJOptions`] controls support tolerance, support validation in
//!   `log_prob`, and the seed for batch sampling.
//! - [`LKJError`] absorbs transform and support failures and classifies every
//!   error through [`ErrorKind`](crate::transforms::errors::ErrorKind).
//!
//! Invariants & assumptions
//! ------------------------
//! - A successfully constructed [`LKJCholesky`] has `D ≥ 2` and finite
//!   `η > 0`; no later operation re-validates them.
//! - Samples always satisfy
//!   [`is_corr_cholesky`](crate::constraints::corr_cholesky::is_corr_cholesky).
//!
//! Downstream usage
//! ----------------
//! - Rust callers construct [`LKJCholesky::new`] or
//!   [`LKJCholesky::with_options`] and pass their own `rand::Rng` to
//!   `sample` / `rsample`, or use `sample_n` for seeded batches.
//! - Python bindings wrap [`LKJCholesky`] one-to-one.
//!
//! Testing notes
//! -------------
//! - Statistical tests in [`lkj`] use seeded `StdRng` streams with tolerances
//!   several standard errors wide.

pub mod errors;
pub mod lkj;
pub mod options;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{LKJError, LKJResult};
pub use self::lkj::{LKJCholesky, ReparamSample, concentration_vector, lkj_log_normalizer};
pub use self::options::LKJOptions;
pub use self::validation::{validate_dim, validate_eta, validate_support_tol};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use lkj_cholesky::distributions::prelude::*;
//
// to import the distribution surface in a single line.

pub mod prelude {
    pub use super::errors::{LKJError, LKJResult};
    pub use super::lkj::{LKJCholesky, ReparamSample};
    pub use super::options::LKJOptions;
}
