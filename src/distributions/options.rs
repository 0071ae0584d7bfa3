//! LKJ options — configuration for support checks and sampling.
//!
//! Purpose
//! -------
//! Collect the knobs that change how an [`LKJCholesky`](super::lkj::LKJCholesky)
//! validates values and seeds its random draws, so call sites pass one
//! validated value instead of loose flags.
//!
//! Invariants & assumptions
//! ------------------------
//! - `support_tol` is finite and strictly positive once constructed through
//!   [`LKJOptions::new`]; [`LKJOptions::default`] uses
//!   [`UNIT_NORM_TOL`](crate::constraints::corr_cholesky::UNIT_NORM_TOL).
//! - `random_seed` only affects [`LKJCholesky::sample_n`](super::lkj::LKJCholesky::sample_n);
//!   draws through a caller-supplied RNG ignore it.
use crate::{
    constraints::corr_cholesky::UNIT_NORM_TOL,
    distributions::{errors::LKJResult, validation::validate_support_tol},
};

/// LKJOptions — support-check and sampling configuration.
///
/// Fields
/// ------
/// - `support_tol`: `f64`
///   Absolute tolerance on `Σ_j x[i, j]² − 1` used by `log_prob`.
/// - `validate_support`: `bool`
///   If `false`, `log_prob` skips the support check and only verifies the
///   matrix order. Intended for hot loops over values already known to come
///   from the transform.
/// - `random_seed`: `Option<u64>`
///   `Some(seed)` makes `sample_n` reproducible; `None` seeds from system
///   entropy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LKJOptions {
    pub support_tol: f64,
    pub validate_support: bool,
    pub random_seed: Option<u64>,
}

impl LKJOptions {
    /// Construct validated options.
    ///
    /// # Errors
    /// `LKJError::InvalidSupportTol` when `support_tol` is NaN, ±∞, or ≤ 0.
    pub fn new(
        support_tol: f64, validate_support: bool, random_seed: Option<u64>,
    ) -> LKJResult<LKJOptions> {
        validate_support_tol(support_tol)?;
        Ok(LKJOptions { support_tol, validate_support, random_seed })
    }

    /// Same options with a fixed RNG seed.
    pub fn with_seed(self, seed: u64) -> LKJOptions {
        LKJOptions { random_seed: Some(seed), ..self }
    }
}

impl Default for LKJOptions {
    fn default() -> Self {
        LKJOptions { support_tol: UNIT_NORM_TOL, validate_support: true, random_seed: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::errors::LKJError;

    #[test]
    // Purpose
    // -------
    // `new` keeps its inputs and `default` matches the documented values.
    fn new_and_default_set_fields_as_documented() {
        let opts = LKJOptions::new(1e-9, false, Some(3)).unwrap();
        assert_eq!(opts.support_tol, 1e-9);
        assert!(!opts.validate_support);
        assert_eq!(opts.random_seed, Some(3));

        let def = LKJOptions::default();
        assert_eq!(def.support_tol, 1e-6);
        assert!(def.validate_support);
        assert_eq!(def.random_seed, None);
        assert_eq!(def.with_seed(11).random_seed, Some(11));
    }

    #[test]
    // Purpose
    // -------
    // A non-positive tolerance is rejected at construction.
    fn new_rejects_invalid_tolerance() {
        assert_eq!(
            LKJOptions::new(0.0, true, None),
            Err(LKJError::InvalidSupportTol { value: 0.0 })
        );
    }
}
