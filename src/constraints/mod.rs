//! constraints — support predicates for constrained matrix spaces.
//!
//! Currently one constraint: the set of lower Cholesky factors of correlation
//! matrices ([`corr_cholesky`]). Both the transforms (as codomain check on
//! inverse) and the LKJ distribution (as support check in `log_prob`) call
//! into it.

pub mod corr_cholesky;

pub use self::corr_cholesky::{
    CorrCholeskyViolation, UNIT_NORM_TOL, check_corr_cholesky, check_corr_cholesky_with_tol,
    is_corr_cholesky,
};
