//! transforms::vine — partial correlations ↔ correlation-Cholesky factor.
//!
//! Purpose
//! -------
//! Implement the vine / extended-onion construction (Lewandowski, Kurowicka
//! & Joe, 2009) mapping a vector of `L = D(D−1)/2` partial correlations in
//! `(−1, 1)` to the lower Cholesky factor of a `D×D` correlation matrix, with
//! its exact inverse, log-Jacobian, and a Jacobian–vector product.
//!
//! Key behaviors
//! -------------
//! - Forward: fill `x` column by column. Column 0 is `x[0,0] = 1`,
//!   `x[1.., 0] = z[0..D−1]`. For column `j ≥ 1`, `x[j, j] = sqrt(r_j)` and
//!   `x[i, j] = z_next · sqrt(r_i)` for `i > j`, where `r_i` is the residual
//!   norm² still available to row `i`.
//! - Inverse: undo every scaling, `z = x[i, j] / sqrt(Σ_{k≥j} x[i, k]²)`, for
//!   every column `j ∈ [0, D−2]` and row `i ∈ [j+1, D−1]`.
//! - Log-Jacobian: `x[i, j]` depends on `z` only through entries of the same
//!   row with column `≤ j`, so the Jacobian is triangular with diagonal
//!   `sqrt(1 − Σ_{k<j} x[i, k]²)`, giving
//!   `log|det J| = ½ · Σ_i Σ_{j<i} ln(1 − Σ_{k<j} x[i, k]²)`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every forward output has zero upper triangle, positive diagonal and
//!   unit-norm rows: each row's residual is absorbed by its diagonal entry.
//! - Residuals are kept as products, `r_i = Π_{k<j} (1 − z_{ik})(1 + z_{ik})`,
//!   never as `1 − Σ x²`, so they stay positive for every input strictly
//!   inside `(−1, 1)` even when an entry sits one ulp from `±1`. Only an
//!   underflow of the product (inputs at `±(1 − ε)` across more than about
//!   twenty columns) can exhaust a row; `forward` reports that instead of
//!   writing a zero diagonal.
//! - `1 − Σ_{k<j} x[i, k]²` is read from `x` as the tail `Σ_{k≥j} x[i, k]²`.
//!   The inverse is therefore invariant to a row's norm: factors accepted by
//!   the validator within its tolerance map to `|z| < 1`.
//!
//! Conventions
//! -----------
//! - z order: column-major over the strictly-lower triangle, top to bottom
//!   within a column; `vec_tril_strict` in [`super::diagnostics`] flattens a
//!   factor in the same order.
//! - Row residuals are maintained incrementally (a buffer of length `D`)
//!   rather than recomputed, so every pass is `O(D²)`.
use crate::{
    constraints::corr_cholesky::check_corr_cholesky,
    transforms::{
        errors::{TransformError, TransformResult},
        traits::Transform,
    },
};
use ndarray::{Array1, Array2};

/// Number of partial correlations for a factor of order `dim`.
pub const fn vec_len(dim: usize) -> usize {
    dim * dim.saturating_sub(1) / 2
}

/// Recover the matrix order `D` from a vector length `D(D−1)/2`.
///
/// # Errors
/// [`TransformError::NotTriangularLength`] when `len` is not triangular.
pub fn dim_from_len(len: usize) -> TransformResult<usize> {
    let d = ((1.0 + (1.0 + 8.0 * len as f64).sqrt()) / 2.0).round() as usize;
    if vec_len(d) != len {
        return Err(TransformError::NotTriangularLength { len });
    }
    Ok(d)
}

/// Vine / onion bijection from `(−1, 1)^L` to `D×D` correlation-Cholesky factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialCorrToCholesky {
    dim: usize,
}

impl PartialCorrToCholesky {
    /// Transform for factors of order `dim` (`dim ≥ 1`; `dim = 1` is the
    /// trivial map from the empty vector to `[[1]]`).
    pub const fn new(dim: usize) -> Self {
        PartialCorrToCholesky { dim }
    }

    /// Build the transform matching a vector of length `len`.
    ///
    /// # Errors
    /// [`TransformError::NotTriangularLength`] when `len ≠ D(D−1)/2`.
    pub fn from_len(len: usize) -> TransformResult<Self> {
        Ok(PartialCorrToCholesky::new(dim_from_len(len)?))
    }

    pub const fn dim(&self) -> usize {
        self.dim
    }

    /// Expected input length `D(D−1)/2`.
    pub const fn vec_len(&self) -> usize {
        vec_len(self.dim)
    }

    /// Forward map together with its Jacobian–vector product.
    ///
    /// Parameters
    /// ----------
    /// - `z`: `&Array1<f64>`
    ///   Partial correlations, length `D(D−1)/2`, entries in `(−1, 1)`.
    /// - `dz`: `&Array1<f64>`
    ///   Tangent direction in z-space, same length as `z`.
    ///
    /// Returns
    /// -------
    /// `(x, dx)` where `x = forward(z)` and `dx = J(z)·dz` laid out as a
    /// `D×D` matrix (zero above the diagonal; the diagonal carries the
    /// derivative of the implied `sqrt(r_j)` entries).
    ///
    /// Errors
    /// ------
    /// - Every error of [`Transform::forward`].
    /// - [`TransformError::TangentLengthMismatch`] when `dz.len() ≠ z.len()`.
    pub fn forward_with_tangent(
        &self, z: &Array1<f64>, dz: &Array1<f64>,
    ) -> TransformResult<(Array2<f64>, Array2<f64>)> {
        self.validate_input(z)?;
        if dz.len() != z.len() {
            return Err(TransformError::TangentLengthMismatch {
                expected: z.len(),
                actual: dz.len(),
            });
        }

        let d = self.dim;
        let mut x = Array2::<f64>::zeros((d, d));
        let mut dx = Array2::<f64>::zeros((d, d));
        let mut residual = Array1::<f64>::ones(d);
        let mut dresidual = Array1::<f64>::zeros(d);
        let mut idx = 0;
        for j in 0..d {
            let diag = diagonal_from_residual(j, residual[j])?;
            x[[j, j]] = diag;
            dx[[j, j]] = dresidual[j] / (2.0 * diag);
            for i in (j + 1)..d {
                let (zk, dzk) = (z[idx], dz[idx]);
                let scale = residual[i].sqrt();
                x[[i, j]] = zk * scale;
                dx[[i, j]] = dzk * scale + zk * dresidual[i] / (2.0 * scale);
                let shrink = (1.0 - zk) * (1.0 + zk);
                dresidual[i] = dresidual[i] * shrink - 2.0 * zk * dzk * residual[i];
                residual[i] *= shrink;
                idx += 1;
            }
        }
        Ok((x, dx))
    }

    fn validate_input(&self, z: &Array1<f64>) -> TransformResult<()> {
        let len = z.len();
        let expected = self.vec_len();
        if len != expected {
            dim_from_len(len)?;
            return Err(TransformError::LengthMismatch { expected, actual: len });
        }
        if let Some((index, &value)) = z.iter().enumerate().find(|&(_, v)| !(v.abs() < 1.0)) {
            return Err(TransformError::OutsideUnitInterval { index, value });
        }
        Ok(())
    }

    fn validate_order(&self, x: &Array2<f64>) -> TransformResult<()> {
        let found = x.dim();
        if found != (self.dim, self.dim) {
            return Err(TransformError::OrderMismatch { expected: self.dim, found });
        }
        Ok(())
    }
}

impl Transform for PartialCorrToCholesky {
    type Domain = Array1<f64>;
    type Codomain = Array2<f64>;

    /// Build the correlation-Cholesky factor from partial correlations.
    ///
    /// # Errors
    /// - [`TransformError::NotTriangularLength`] when `z.len()` is not
    ///   triangular.
    /// - [`TransformError::LengthMismatch`] when `z.len()` is triangular but
    ///   belongs to a different order.
    /// - [`TransformError::OutsideUnitInterval`] for the first entry with
    ///   `|z_k| ≥ 1` or NaN.
    /// - [`TransformError::DegenerateRow`] when a row's residual product
    ///   underflows to zero before its diagonal.
    fn forward(&self, z: &Array1<f64>) -> TransformResult<Array2<f64>> {
        self.validate_input(z)?;

        let d = self.dim;
        let mut x = Array2::<f64>::zeros((d, d));
        let mut residual = Array1::<f64>::ones(d);
        let mut idx = 0;
        for j in 0..d {
            x[[j, j]] = diagonal_from_residual(j, residual[j])?;
            for i in (j + 1)..d {
                let zk = z[idx];
                x[[i, j]] = zk * residual[i].sqrt();
                residual[i] *= (1.0 - zk) * (1.0 + zk);
                idx += 1;
            }
        }
        Ok(x)
    }

    /// Recover the full partial-correlation vector from a factor.
    ///
    /// # Errors
    /// - [`TransformError::OrderMismatch`] when `x` is not `D×D`.
    /// - [`TransformError::NotCorrCholesky`] when `x` fails the support check.
    /// - [`TransformError::DegenerateRow`] when the tail of a row is so small
    ///   relative to its entry that the partial correlation rounds to `±1`
    ///   in `f64`.
    fn inverse(&self, x: &Array2<f64>) -> TransformResult<Array1<f64>> {
        self.validate_order(x)?;
        check_corr_cholesky(x.view())?;

        let d = self.dim;
        let mut z = Array1::<f64>::zeros(self.vec_len());
        let tails = row_tails(x);
        let mut idx = 0;
        for j in 0..d.saturating_sub(1) {
            for i in (j + 1)..d {
                let residual = tails[[i, j]];
                let value = x[[i, j]] / residual.sqrt();
                if !(value.abs() < 1.0) {
                    return Err(TransformError::DegenerateRow { row: i, col: j, residual });
                }
                z[idx] = value;
                idx += 1;
            }
        }
        Ok(z)
    }

    /// `½ · Σ_i Σ_{j<i} ln(1 − Σ_{k<j} x[i, k]²)`, evaluated from `x` with
    /// `1 − Σ_{k<j} x[i, k]²` read as the row tail `Σ_{k≥j} x[i, k]²`.
    ///
    /// # Errors
    /// - [`TransformError::LengthMismatch`] when `z` does not match the order.
    /// - [`TransformError::OrderMismatch`] when `x` is not `D×D`.
    fn log_abs_det_jacobian(&self, z: &Array1<f64>, x: &Array2<f64>) -> TransformResult<f64> {
        if z.len() != self.vec_len() {
            return Err(TransformError::LengthMismatch {
                expected: self.vec_len(),
                actual: z.len(),
            });
        }
        self.validate_order(x)?;

        let tails = row_tails(x);
        let mut total = 0.0_f64;
        for i in 1..self.dim {
            for j in 0..i {
                total += 0.5 * tails[[i, j]].ln();
            }
        }
        Ok(total)
    }
}

/// `x[j, j] = sqrt(r_j)`, rejecting a residual that underflowed to zero.
fn diagonal_from_residual(row: usize, residual: f64) -> TransformResult<f64> {
    let diag = residual.sqrt();
    if !(diag > 0.0) {
        return Err(TransformError::DegenerateRow { row, col: row, residual });
    }
    Ok(diag)
}

/// `tails[[i, j]] = Σ_{k=j}^{i} x[i, k]²` on and below the diagonal.
fn row_tails(x: &Array2<f64>) -> Array2<f64> {
    let d = x.nrows();
    let mut tails = Array2::<f64>::zeros((d, d));
    for i in 0..d {
        let mut tail = 0.0_f64;
        for j in (0..=i).rev() {
            tail += x[[i, j]] * x[[i, j]];
            tails[[i, j]] = tail;
        }
    }
    tails
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::corr_cholesky::is_corr_cholesky;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use nalgebra::DMatrix;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Triangular-length bookkeeping (`dim_from_len`, `vec_len`).
    // - Hand-computed forward outputs for D = 2 and D = 3.
    // - Support membership of forward outputs and full-length inverses,
    //   including inputs a few ulps from ±1 and factors at the edge of the
    //   validator's row-norm tolerance.
    // - Log-Jacobian against a dense central-difference Jacobian.
    // - The Jacobian–vector product against directional finite differences.
    //
    // They intentionally DO NOT cover:
    // - The tanh stage or the composed transform (see `corr_cholesky`).
    // -------------------------------------------------------------------------

    fn flatten_strict_lower(x: &Array2<f64>) -> Vec<f64> {
        let d = x.nrows();
        let mut out = Vec::with_capacity(vec_len(d));
        for j in 0..d {
            for i in (j + 1)..d {
                out.push(x[[i, j]]);
            }
        }
        out
    }


    #[test]
    // Purpose
    // -------
    // Triangular lengths map back to their order; others are shape errors.
    fn dim_from_len_accepts_triangular_numbers_only() {
        for d in 1..8 {
            assert_eq!(dim_from_len(vec_len(d)), Ok(d));
        }
        for bad in [2_usize, 4, 5, 7, 8, 9] {
            assert_eq!(dim_from_len(bad), Err(TransformError::NotTriangularLength { len: bad }));
        }
    }

    #[test]
    // Purpose
    // -------
    // Forward output for D = 3 matches a hand computation.
    //
    // Given
    // -----
    // - `z = [0.5, -0.2, 0.4]`: z[0], z[1] fill column 0, z[2] is the partial
    //   correlation of row 2 in column 1.
    //
    // Expect
    // ------
    // - `x[1,1] = sqrt(1 − 0.25)`, `x[2,1] = 0.4·sqrt(1 − 0.04)`,
    //   `x[2,2] = sqrt(1 − 0.04 − x[2,1]²)`; the result is in the support.
    fn forward_matches_hand_computation_for_order_three() {
        // Arrange
        let t = PartialCorrToCholesky::new(3);
        let z = array![0.5, -0.2, 0.4];

        // Act
        let x = t.forward(&z).unwrap();

        // Assert
        let x21 = 0.4 * (1.0_f64 - 0.04).sqrt();
        let expected = array![
            [1.0, 0.0, 0.0],
            [0.5, 0.75_f64.sqrt(), 0.0],
            [-0.2, x21, (1.0 - 0.04 - x21 * x21).sqrt()],
        ];
        for (a, b) in x.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-14);
        }
        assert!(is_corr_cholesky(x.view()));
    }

    #[test]
    // Purpose
    // -------
    // The inverse recovers *every* coordinate, not just the last column.
    //
    // Given
    // -----
    // - D = 5 with a fixed, non-trivial z of length 10.
    //
    // Expect
    // ------
    // - `inverse(forward(z)) ≈ z` entry-wise, and `forward(inverse(x)) ≈ x`.
    fn inverse_recovers_all_columns() {
        let t = PartialCorrToCholesky::new(5);
        let z = array![0.3, -0.7, 0.1, 0.9, -0.45, 0.2, -0.05, 0.66, -0.8, 0.5];
        let x = t.forward(&z).unwrap();
        let z_back = t.inverse(&x).unwrap();
        assert_eq!(z_back.len(), z.len());
        for (&a, &b) in z.iter().zip(z_back.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-12, max_relative = 1e-10);
        }
        let x_again = t.forward(&z_back).unwrap();
        for (&a, &b) in x.iter().zip(x_again.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // Partial correlations within a few ulps of ±1 still give a factor with
    // a strictly positive diagonal and unit rows.
    //
    // Given
    // -----
    // - D = 5, every z entry at `±(1 − kε)` for k ∈ {1, 2, 3}, plus one
    //   moderate entry.
    //
    // Expect
    // ------
    // - `is_corr_cholesky` holds and every diagonal entry is > 0.
    fn forward_stays_in_support_next_to_the_boundary() {
        // Arrange
        let eps = f64::EPSILON;
        let t = PartialCorrToCholesky::new(5);
        let z = array![
            1.0 - eps,
            -(1.0 - eps),
            1.0 - 2.0 * eps,
            -(1.0 - 3.0 * eps),
            0.3,
            1.0 - eps,
            -(1.0 - 2.0 * eps),
            1.0 - eps,
            -(1.0 - eps),
            1.0 - 3.0 * eps,
        ];

        // Act
        let x = t.forward(&z).unwrap();
        let (x_tan, _) = t.forward_with_tangent(&z, &Array1::ones(10)).unwrap();

        // Assert
        assert!(is_corr_cholesky(x.view()), "{x:?}");
        assert_eq!(x, x_tan);
        for k in 0..5 {
            assert!(x[[k, k]] > 0.0, "diagonal {k} is {}", x[[k, k]]);
        }
    }

    #[test]
    // Purpose
    // -------
    // A residual product that underflows is reported, not written as a zero
    // diagonal.
    //
    // Given
    // -----
    // - D = 30 with every partial correlation at `1 − ε`; each factor
    //   `(1 − z)(1 + z)` is about 4.4e-16, so late rows underflow.
    //
    // Expect
    // ------
    // - `DegenerateRow` (a domain error) from `forward`.
    fn forward_reports_underflowed_residual() {
        let t = PartialCorrToCholesky::new(30);
        let z = Array1::from_elem(t.vec_len(), 1.0 - f64::EPSILON);
        let err = t.forward(&z).unwrap_err();
        assert!(matches!(err, TransformError::DegenerateRow { .. }), "{err:?}");
        assert_eq!(err.kind(), crate::transforms::errors::ErrorKind::Domain);
    }

    #[test]
    // Purpose
    // -------
    // A factor accepted by the validator with a row norm slightly above 1
    // inverts to partial correlations strictly inside (−1, 1).
    //
    // Given
    // -----
    // - `x = [[1, 0], [1.0000004, 1e-4]]`, row norm² ≈ 1 + 8e-7.
    //
    // Expect
    // ------
    // - |z| < 1 and `forward(inverse(x)) ≈ x` to 1e-6.
    fn inverse_normalizes_rows_within_tolerance() {
        let t = PartialCorrToCholesky::new(2);
        let x = array![[1.0, 0.0], [1.000_000_4, 1e-4]];
        assert!(is_corr_cholesky(x.view()));

        let z = t.inverse(&x).unwrap();
        assert!(z[0].abs() < 1.0, "z = {z:?}");
        let x_back = t.forward(&z).unwrap();
        for (&a, &b) in x.iter().zip(x_back.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-6);
        }
    }

    #[test]
    // Purpose
    // -------
    // Shape and domain violations surface as the documented errors.
    fn invalid_inputs_are_rejected() {
        let t = PartialCorrToCholesky::new(3);
        assert_eq!(
            t.forward(&array![0.1, 0.2]),
            Err(TransformError::NotTriangularLength { len: 2 })
        );
        assert_eq!(
            t.forward(&array![0.1]),
            Err(TransformError::LengthMismatch { expected: 3, actual: 1 })
        );
        assert_eq!(
            t.forward(&array![0.1, -1.0, 0.2]),
            Err(TransformError::OutsideUnitInterval { index: 1, value: -1.0 })
        );
        assert!(matches!(
            t.inverse(&Array2::eye(2)),
            Err(TransformError::OrderMismatch { expected: 3, found: (2, 2) })
        ));
        let mut not_unit = Array2::<f64>::eye(3);
        not_unit[[2, 0]] = 0.5;
        assert!(matches!(t.inverse(&not_unit), Err(TransformError::NotCorrCholesky(_))));
    }

    #[test]
    // Purpose
    // -------
    // The analytic log-Jacobian equals log|det| of a central-difference
    // Jacobian of z ↦ strictly-lower entries of x.
    //
    // Given
    // -----
    // - D = 4 (L = 6) at a fixed interior point.
    //
    // Expect
    // ------
    // - Agreement to 1e-6.
    fn log_abs_det_jacobian_matches_dense_finite_differences() {
        // Arrange
        let t = PartialCorrToCholesky::new(4);
        let z = array![0.35, -0.6, 0.15, 0.7, -0.25, 0.5];
        let x = t.forward(&z).unwrap();
        let n = z.len();
        let h = 1e-6;

        // Act
        let mut jac = DMatrix::<f64>::zeros(n, n);
        for k in 0..n {
            let mut zp = z.clone();
            let mut zm = z.clone();
            zp[k] += h;
            zm[k] -= h;
            let fp = flatten_strict_lower(&t.forward(&zp).unwrap());
            let fm = flatten_strict_lower(&t.forward(&zm).unwrap());
            for r in 0..n {
                jac[(r, k)] = (fp[r] - fm[r]) / (2.0 * h);
            }
        }
        let numerical = jac.lu().determinant().abs().ln();
        let analytic = t.log_abs_det_jacobian(&z, &x).unwrap();

        // Assert
        assert_abs_diff_eq!(analytic, numerical, epsilon = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // `forward_with_tangent` returns the same `x` as `forward` and a tangent
    // equal to a directional central difference.
    fn forward_with_tangent_matches_directional_difference() {
        let t = PartialCorrToCholesky::new(4);
        let z = array![0.2, -0.4, 0.6, 0.1, -0.3, 0.45];
        let dz = array![1.0, -0.5, 0.25, 0.8, 0.0, -1.2];
        let h = 1e-6;

        let (x, dx) = t.forward_with_tangent(&z, &dz).unwrap();
        let xp = t.forward(&(&z + &(&dz * h))).unwrap();
        let xm = t.forward(&(&z - &(&dz * h))).unwrap();

        assert_eq!(x, t.forward(&z).unwrap());
        for ((&p, &m), &d) in xp.iter().zip(xm.iter()).zip(dx.iter()) {
            assert_abs_diff_eq!((p - m) / (2.0 * h), d, epsilon = 1e-6);
        }
        assert!(matches!(
            t.forward_with_tangent(&z, &array![1.0]),
            Err(TransformError::TangentLengthMismatch { expected: 6, actual: 1 })
        ));
    }

    #[test]
    // Purpose
    // -------
    // D = 1 is the trivial bijection between the empty vector and `[[1]]`.
    fn order_one_is_trivial() {
        let t = PartialCorrToCholesky::new(1);
        let z = Array1::<f64>::zeros(0);
        let x = t.forward(&z).unwrap();
        assert_eq!(x, array![[1.0]]);
        assert_eq!(t.inverse(&x).unwrap().len(), 0);
        assert_eq!(t.log_abs_det_jacobian(&z, &x).unwrap(), 0.0);
    }
}
