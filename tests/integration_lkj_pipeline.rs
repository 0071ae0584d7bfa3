//! Integration tests for the LKJ Cholesky distribution and its transforms.
//!
//! Purpose
//! -------
//! - Validate the end-to-end pipeline: parameter validation, sampling
//!   through the vine construction, mapping samples to unconstrained space
//!   and back, and density evaluation in both parameterizations.
//! - Check distribution-level facts that only hold when every layer agrees,
//!   such as the marginal law of individual correlations.
//!
//! Coverage
//! --------
//! - `distributions::lkj::LKJCholesky`: `new`, `with_options`, `sample`,
//!   `sample_n`, `rsample`, `log_prob`, `log_prob_unconstrained`.
//! - `transforms::CorrCholeskyTransform` and `transforms::diagnostics`.
//! - `constraints::corr_cholesky` through the crate-root re-exports.
//!
//! Exclusions
//! ----------
//! - Fine-grained checks of individual transforms and validators; those are
//!   covered by unit tests.
//! - Python bindings.
use approx::{assert_abs_diff_eq, assert_relative_eq};
use lkj_cholesky::{
    CorrCholeskyTransform, ErrorKind, LKJCholesky, LKJError, LKJOptions, Transform,
    is_corr_cholesky,
    transforms::diagnostics::{jacobian_discrepancy, vec_tril_strict},
};
use ndarray::{Array1, Array2, Axis};
use rand::{SeedableRng, rngs::StdRng};

/// Correlation matrix `x xᵀ` implied by a Cholesky factor.
fn correlation(x: &Array2<f64>) -> Array2<f64> {
    x.dot(&x.t())
}

#[test]
// Purpose
// -------
// Samples survive a trip through unconstrained space, and the density in
// that space is the constrained density plus the log-Jacobian.
//
// Given
// -----
// - D = 5, η = 0.8, 50 seeded draws.
//
// Expect
// ------
// - `forward(inverse(x)) ≈ x` to 1e-9 and the result is in the support.
// - `log_prob_unconstrained(u) = log_prob(x) + log|det J(u)|`.
// - Analytic and finite-difference log-Jacobians agree at every `u`.
fn samples_round_trip_through_unconstrained_space() {
    // Arrange
    let lkj = LKJCholesky::new(5, 0.8).unwrap();
    let t: &CorrCholeskyTransform = lkj.transform();
    let mut rng = StdRng::seed_from_u64(2718);

    for _ in 0..50 {
        // Act
        let x = lkj.sample(&mut rng).unwrap();
        let u = t.inverse(&x).unwrap();
        let x_back = t.forward(&u).unwrap();
        let log_det = t.log_abs_det_jacobian(&u, &x_back).unwrap();

        // Assert
        assert!(is_corr_cholesky(x_back.view()));
        for (&a, &b) in x.iter().zip(x_back.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-9);
        }
        assert_relative_eq!(
            lkj.log_prob_unconstrained(&u).unwrap(),
            lkj.log_prob(&x_back).unwrap() + log_det,
            epsilon = 1e-10
        );
        if u.iter().all(|v| v.abs() < 2.5) {
            assert!(jacobian_discrepancy(t, &u).unwrap() < 1e-4);
        }
    }
}

#[test]
// Purpose
// -------
// Every off-diagonal correlation has the LKJ marginal law: on (−1, 1) it is
// a symmetric Beta with shape `η − 1 + D/2`, so its variance is
// `1 / (2(η − 1 + D/2) + 1)` regardless of position.
//
// Given
// -----
// - D = 4, η = 2 (shape 3, variance 1/7), 4,000 seeded draws via `sample_n`.
//
// Expect
// ------
// - Implied correlation matrices have unit diagonal.
// - Every off-diagonal entry has mean ≈ 0 (±0.03) and variance ≈ 1/7
//   (±0.015).
fn correlation_marginals_match_lkj_law() {
    // Arrange
    let opts = LKJOptions::default().with_seed(4242);
    let lkj = LKJCholesky::with_options(4, 2.0, opts).unwrap();
    let n = 4_000;

    // Act
    let draws = lkj.sample_n(n).unwrap();
    let mut sum = Array2::<f64>::zeros((4, 4));
    let mut sum_sq = Array2::<f64>::zeros((4, 4));
    for x in draws.axis_iter(Axis(0)) {
        let c = correlation(&x.to_owned());
        for i in 0..4 {
            assert_abs_diff_eq!(c[[i, i]], 1.0, epsilon = 1e-12);
        }
        sum += &c;
        sum_sq += &c.mapv(|v| v * v);
    }

    // Assert
    let expected_var = 1.0 / 7.0;
    for i in 0..4 {
        for j in 0..i {
            let mean = sum[[i, j]] / n as f64;
            let var = sum_sq[[i, j]] / n as f64 - mean * mean;
            assert!(mean.abs() < 0.03, "entry ({i}, {j}): mean {mean}");
            assert!((var - expected_var).abs() < 0.015, "entry ({i}, {j}): var {var}");
        }
    }
}

#[test]
// Purpose
// -------
// Reparameterized draws match plain draws for the same seed and carry a
// tangent that keeps the factor on the support to first order.
//
// Given
// -----
// - D = 4, η = 1.7, seed 8.
//
// Expect
// ------
// - Equal values; zero tangent above the diagonal; each row's tangent is
//   orthogonal to the row itself (the unit-norm constraint differentiated).
fn rsample_tangent_preserves_unit_rows() {
    let lkj = LKJCholesky::new(4, 1.7).unwrap();
    let plain = lkj.sample(&mut StdRng::seed_from_u64(8)).unwrap();
    let draw = lkj.rsample(&mut StdRng::seed_from_u64(8)).unwrap();

    assert_eq!(draw.value, plain);
    for i in 0..4 {
        for j in (i + 1)..4 {
            assert_eq!(draw.grad_eta[[i, j]], 0.0);
        }
        let dot: f64 = draw.value.row(i).dot(&draw.grad_eta.row(i));
        assert_abs_diff_eq!(dot, 0.0, epsilon = 1e-8);
    }
}

#[test]
// Purpose
// -------
// Errors keep their classification across layers.
fn errors_are_classified_end_to_end() {
    let err = LKJCholesky::new(1, 1.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parameter);

    let lkj = LKJCholesky::new(3, 1.0).unwrap();
    let err = lkj.log_prob_unconstrained(&Array1::zeros(4)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Shape);

    let err = lkj.log_prob(&(Array2::<f64>::eye(3) * 2.0)).unwrap_err();
    assert!(matches!(err, LKJError::NotCorrCholesky(_)));
    assert_eq!(err.kind(), ErrorKind::Domain);

    let err = lkj.transform().inverse(&(Array2::<f64>::eye(3) * -1.0)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Domain);
}

#[test]
// Purpose
// -------
// Flattened strictly-lower entries of a sample are exactly the inputs the
// vine consumed in its first column.
fn flattening_matches_vine_order() {
    let lkj = LKJCholesky::new(4, 1.0).unwrap();
    let x = lkj.sample(&mut StdRng::seed_from_u64(1)).unwrap();
    let z = lkj.transform().partial_corr().inverse(&x).unwrap();
    let flat = vec_tril_strict(&x);
    for k in 0..3 {
        assert_abs_diff_eq!(flat[k], z[k], epsilon = 1e-15);
    }
}
