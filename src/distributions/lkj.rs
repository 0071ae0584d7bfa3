//! distributions::lkj — LKJ distribution over correlation-Cholesky factors.
//!
//! Purpose
//! -------
//! Represent the LKJ(η) distribution on lower Cholesky factors of `D×D`
//! correlation matrices: draw samples through the vine / onion construction,
//! differentiate draws with respect to η, and evaluate the log-density with a
//! memoized normalizing constant.
//!
//! Key behaviors
//! -------------
//! - Construction validates `D ≥ 2` and finite `η > 0` and precomputes the
//!   Beta concentrations of the `L = D(D−1)/2` partial correlations.
//! - [`LKJCholesky::sample`] draws `b_i ~ Beta(α_i, α_i)`, sets
//!   `z_i = 2b_i − 1`, and returns the vine stage applied to `z`. The Beta
//!   draw is built from two log-Gamma variates, `z_i = tanh(½(ln G₁ − ln G₂))`
//!   with `G ~ Gamma(α_i + 1)·U^{1/α_i}`, so it is never NaN even when both
//!   Gamma variates would underflow (small η).
//! - [`LKJCholesky::rsample`] additionally returns `∂x/∂η` by implicit
//!   reparameterization of every Beta draw followed by a Jacobian–vector
//!   product through the vine.
//! - [`LKJCholesky::log_prob`] evaluates
//!   `C(η, D) + Σ_{m=1}^{D−1} (D − 1 − m + 2η − 2)·ln x[m, m]`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Concentrations follow `α ← η + (D−1)/2`; for `k = 0..D−2`:
//!   `α ← α − ½`, then `α` is repeated `D−1−k` times. Column `k` of the
//!   factor is driven by the `k`-th block.
//! - `C(η, D)` depends only on `(η, D)`, is computed on first use and cached
//!   in a write-once cell; the distribution stays `Send + Sync`.
//! - For small α most Beta mass sits closer to `0` or `1` than `f64` can
//!   resolve, so `z_i` rounds to `±1`. Such draws are set to `±(1 − ε)`, the
//!   nearest value the vine accepts; with residuals kept as products the
//!   factor keeps a strictly positive diagonal for every `D ≤ 21`. Beyond
//!   that a run of boundary draws can underflow a row, which `sample`
//!   reports as [`TransformError::DegenerateRow`](crate::transforms::errors::TransformError::DegenerateRow).
//!   `rsample` reports boundary draws as non-differentiable instead.
//!
//! Conventions
//! -----------
//! - Matrix values are `Array2<f64>` in row-major `(row, col)` indexing; the
//!   density is taken with respect to Lebesgue measure on the strictly-lower
//!   entries.
//! - With the `obs_slog` feature, an attached `slog::Logger` receives debug
//!   records; without it the module performs no I/O.
//!
//! Testing notes
//! -------------
//! - Unit tests check support membership of samples, the concentration
//!   recursion, uniformity at `D = 2, η = 1`, shrinkage in η, Monte-Carlo
//!   normalization of the density, and the η-gradient of `rsample` against
//!   quantile-coupled finite differences.
use crate::{
    constraints::corr_cholesky::check_corr_cholesky_with_tol,
    distributions::{
        errors::{LKJError, LKJResult},
        options::LKJOptions,
        validation::{validate_dim, validate_eta},
    },
    transforms::{corr_cholesky::CorrCholeskyTransform, traits::Transform, vine::vec_len},
};
use ndarray::{Array1, Array2, Array3, Axis};
use rand::{
    Rng, SeedableRng,
    distributions::{Distribution, Open01},
    rngs::StdRng,
};
use statrs::{
    distribution::{Beta, Continuous, Gamma},
    function::{beta::beta_reg, gamma::ln_gamma},
};
use std::{f64::consts::PI, sync::OnceLock};

/// Relative step for the central difference of the Beta CDF in its shape.
const CDF_SHAPE_STEP: f64 = 1e-5;

/// A reparameterized draw: the sample and its derivative in η.
#[derive(Debug, Clone, PartialEq)]
pub struct ReparamSample {
    /// Correlation-Cholesky factor.
    pub value: Array2<f64>,
    /// `∂ value / ∂η`, entry-wise; zero above the diagonal.
    pub grad_eta: Array2<f64>,
}

/// LKJCholesky — LKJ(η) distribution over `D×D` correlation-Cholesky factors.
///
/// Fields
/// ------
/// - `dim`: matrix order `D ≥ 2`.
/// - `eta`: concentration `η > 0`. `η = 1` is uniform over correlation
///   matrices; `η > 1` concentrates mass near the identity.
/// - `concentration`: Beta shape `α_i` for every partial correlation, in z
///   order.
/// - `marginals`: `Beta(α_i, α_i)` densities, one per partial correlation.
/// - `boosted`: `Gamma(α_i + 1, 1)` generators behind the log-space Beta
///   draws.
/// - `transform`: composed unconstrained bijection onto the support.
/// - `options`: support-check tolerance and sampling seed.
/// - `log_normalizer`: lazily computed `C(η, D)`.
#[derive(Debug, Clone)]
pub struct LKJCholesky {
    dim: usize,
    eta: f64,
    concentration: Array1<f64>,
    marginals: Vec<Beta>,
    boosted: Vec<Gamma>,
    transform: CorrCholeskyTransform,
    options: LKJOptions,
    log_normalizer: OnceLock<f64>,
    #[cfg(feature = "obs_slog")]
    logger: Option<slog::Logger>,
}

impl LKJCholesky {
    /// Construct with default [`LKJOptions`].
    ///
    /// # Errors
    /// - [`LKJError::InvalidDimension`] for `dim < 2`.
    /// - [`LKJError::InvalidEta`] for NaN, ±∞, or `η ≤ 0`.
    pub fn new(dim: usize, eta: f64) -> LKJResult<Self> {
        LKJCholesky::with_options(dim, eta, LKJOptions::default())
    }

    /// Construct with explicit options.
    ///
    /// Parameters
    /// ----------
    /// - `dim`: `usize`
    ///   Matrix order, at least 2.
    /// - `eta`: `f64`
    ///   Concentration, finite and strictly positive. Never clamped.
    /// - `options`: [`LKJOptions`]
    ///   Support tolerance, whether `log_prob` validates its input, and the
    ///   seed used by [`sample_n`](Self::sample_n).
    ///
    /// Errors
    /// ------
    /// - [`LKJError::InvalidDimension`], [`LKJError::InvalidEta`] as in
    ///   [`new`](Self::new).
    /// - [`LKJError::InvalidBetaParam`] if `statrs` rejects a concentration
    ///   for the Beta density or its Gamma generator.
    pub fn with_options(dim: usize, eta: f64, options: LKJOptions) -> LKJResult<Self> {
        validate_dim(dim)?;
        validate_eta(eta)?;

        let concentration = concentration_vector(dim, eta);
        let marginals = concentration
            .iter()
            .enumerate()
            .map(|(index, &alpha)| {
                Beta::new(alpha, alpha).map_err(|_| LKJError::InvalidBetaParam { index, alpha })
            })
            .collect::<LKJResult<Vec<_>>>()?;
        let boosted = concentration
            .iter()
            .enumerate()
            .map(|(index, &alpha)| {
                Gamma::new(alpha + 1.0, 1.0)
                    .map_err(|_| LKJError::InvalidBetaParam { index, alpha })
            })
            .collect::<LKJResult<Vec<_>>>()?;

        Ok(LKJCholesky {
            dim,
            eta,
            concentration,
            marginals,
            boosted,
            transform: CorrCholeskyTransform::new(dim),
            options,
            log_normalizer: OnceLock::new(),
            #[cfg(feature = "obs_slog")]
            logger: None,
        })
    }

    /// Attach a logger for debug records.
    #[cfg(feature = "obs_slog")]
    pub fn with_logger(mut self, logger: slog::Logger) -> Self {
        slog::debug!(logger, "lkj distribution configured";
            "dim" => self.dim, "eta" => self.eta, "vec_len" => self.concentration.len());
        self.logger = Some(logger);
        self
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn eta(&self) -> f64 {
        self.eta
    }

    /// Beta shape `α_i` of every partial correlation, in z order.
    pub fn concentration(&self) -> &Array1<f64> {
        &self.concentration
    }

    pub fn options(&self) -> &LKJOptions {
        &self.options
    }

    /// Unconstrained bijection `ℝ^{D(D−1)/2}` → support.
    pub fn transform(&self) -> &CorrCholeskyTransform {
        &self.transform
    }

    /// Draw one factor using the caller's RNG.
    ///
    /// # Errors
    /// [`LKJError::Transform`] wrapping
    /// [`TransformError::DegenerateRow`](crate::transforms::errors::TransformError::DegenerateRow)
    /// when boundary draws underflow a row's residual (possible only for
    /// `D > 21` with η small enough that draws round to `±1`).
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> LKJResult<Array2<f64>> {
        let z = (0..self.boosted.len())
            .map(|index| to_open_interval((0.5 * self.draw_logit(index, rng)).tanh()))
            .collect::<Array1<f64>>();
        Ok(self.transform.partial_corr().forward(&z)?)
    }

    /// Draw `n` factors with an RNG seeded from `options.random_seed`, or
    /// from system entropy when no seed is set.
    ///
    /// Returns an array of shape `(n, D, D)`.
    pub fn sample_n(&self, n: usize) -> LKJResult<Array3<f64>> {
        let mut rng = match self.options.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut out = Array3::<f64>::zeros((n, self.dim, self.dim));
        for mut slot in out.axis_iter_mut(Axis(0)) {
            slot.assign(&self.sample(&mut rng)?);
        }
        Ok(out)
    }

    /// rsample — draw a factor together with its pathwise derivative in η.
    ///
    /// Parameters
    /// ----------
    /// - `rng`: `&mut R`
    ///   Source of randomness. The draw consumes the RNG exactly like
    ///   [`sample`](Self::sample), so equal seeds give equal values.
    ///
    /// Returns
    /// -------
    /// `LKJResult<ReparamSample>`
    ///   The factor `x` and `∂x/∂η`. Each Beta draw `b` with CDF `F(b; α)`
    ///   contributes `∂b/∂α = −(∂F/∂α)/f(b; α)`, with `∂F/∂α` by central
    ///   difference; `∂α_i/∂η = 1` and `∂z/∂b = 2`. The z-tangent is pushed
    ///   through the vine with
    ///   [`forward_with_tangent`](crate::transforms::vine::PartialCorrToCholesky::forward_with_tangent).
    ///
    /// Errors
    /// ------
    /// - [`LKJError::NonDifferentiableSample`] when the Beta density at a
    ///   draw is zero or non-finite (in practice, a draw that rounded to an
    ///   endpoint of `[0, 1]`).
    pub fn rsample<R: Rng + ?Sized>(&self, rng: &mut R) -> LKJResult<ReparamSample> {
        let n = self.marginals.len();
        let mut z = Array1::<f64>::zeros(n);
        let mut dz = Array1::<f64>::zeros(n);
        for (index, (beta, &alpha)) in self.marginals.iter().zip(self.concentration.iter()).enumerate()
        {
            let logit = self.draw_logit(index, rng);
            let draw = 1.0 / (1.0 + (-logit).exp());
            let density = beta.pdf(draw);
            if !(density.is_finite() && density > 0.0) {
                #[cfg(feature = "obs_slog")]
                if let Some(logger) = &self.logger {
                    slog::debug!(logger, "rsample: non-differentiable draw";
                        "index" => index, "draw" => draw, "density" => density);
                }
                return Err(LKJError::NonDifferentiableSample { index, draw, density });
            }
            z[index] = to_open_interval((0.5 * logit).tanh());
            dz[index] = 2.0 * symmetric_beta_draw_sensitivity(alpha, draw, density);
        }
        let (value, grad_eta) = self.transform.partial_corr().forward_with_tangent(&z, &dz)?;
        Ok(ReparamSample { value, grad_eta })
    }

    /// `ln(b / (1 − b))` for `b ~ Beta(α_i, α_i)`, as `ln G₁ − ln G₂` with
    /// `G ~ Gamma(α_i)` drawn as `Gamma(α_i + 1)·U^{1/α_i}`.
    ///
    /// Each `ln G` is finite, and only the `ln U` difference can overflow
    /// after division by a tiny α, so the result is finite or `±∞`, never
    /// NaN.
    fn draw_logit<R: Rng + ?Sized>(&self, index: usize, rng: &mut R) -> f64 {
        let gamma = &self.boosted[index];
        let alpha = self.concentration[index];
        let g1 = gamma.sample(rng);
        let g2 = gamma.sample(rng);
        let u1: f64 = Open01.sample(rng);
        let u2: f64 = Open01.sample(rng);
        (g1.ln() - g2.ln()) + (u1.ln() - u2.ln()) / alpha
    }

    /// Log normalizing constant `C(η, D)`, computed once and cached.
    ///
    /// `C(η, D) = (D−1)·lnΓ(η + (D−1)/2) − Σ_{k=1}^{D−1} [½k·ln π + lnΓ(η + (D−1−k)/2)]`.
    pub fn lkj_constant(&self) -> f64 {
        *self.log_normalizer.get_or_init(|| {
            let constant = lkj_log_normalizer(self.eta, self.dim);
            #[cfg(feature = "obs_slog")]
            if let Some(logger) = &self.logger {
                slog::debug!(logger, "lkj normalizing constant computed";
                    "dim" => self.dim, "eta" => self.eta, "value" => constant);
            }
            constant
        })
    }

    /// log_prob — log-density of a correlation-Cholesky factor.
    ///
    /// Parameters
    /// ----------
    /// - `x`: `&Array2<f64>`
    ///   Candidate factor of order `D`.
    ///
    /// Returns
    /// -------
    /// `LKJResult<f64>`
    ///   `C(η, D) + Σ_{m=1}^{D−1} (D − 1 − m + 2η − 2)·ln x[m, m]`.
    ///
    /// Errors
    /// ------
    /// - [`LKJError::DimensionMismatch`] when `x` is not `D×D`.
    /// - [`LKJError::NotCorrCholesky`] when `x` fails the support check at
    ///   `options.support_tol` (skipped if `options.validate_support` is
    ///   `false`).
    pub fn log_prob(&self, x: &Array2<f64>) -> LKJResult<f64> {
        let found = x.dim();
        if found != (self.dim, self.dim) {
            return Err(LKJError::DimensionMismatch { expected: self.dim, found });
        }
        if self.options.validate_support {
            check_corr_cholesky_with_tol(x.view(), self.options.support_tol)?;
        }

        let d = self.dim as f64;
        let shift = 2.0 * self.eta - 2.0;
        let kernel: f64 = (1..self.dim)
            .map(|m| (d - 1.0 - m as f64 + shift) * x[[m, m]].ln())
            .sum();
        Ok(self.lkj_constant() + kernel)
    }

    /// Log-density of the pushforward onto unconstrained space,
    /// `log_prob(forward(u)) + ln|det J(u)|`.
    ///
    /// # Errors
    /// Transform errors for `u` of the wrong length or non-finite entries.
    pub fn log_prob_unconstrained(&self, u: &Array1<f64>) -> LKJResult<f64> {
        let (x, log_det) = self.transform.forward_with_log_det(u)?;
        Ok(self.log_prob(&x)? + log_det)
    }
}

/// Beta shapes for the `D(D−1)/2` partial correlations, in z order.
pub fn concentration_vector(dim: usize, eta: f64) -> Array1<f64> {
    let mut out = Vec::with_capacity(vec_len(dim));
    let mut alpha = eta + 0.5 * (dim as f64 - 1.0);
    for k in 0..dim.saturating_sub(1) {
        alpha -= 0.5;
        out.extend(std::iter::repeat(alpha).take(dim - 1 - k));
    }
    Array1::from(out)
}

/// `C(η, D)` from the closed form; see [`LKJCholesky::lkj_constant`].
pub fn lkj_log_normalizer(eta: f64, dim: usize) -> f64 {
    let km1 = dim as f64 - 1.0;
    let lead = km1 * ln_gamma(eta + 0.5 * km1);
    let tail: f64 = (1..dim)
        .map(|k| {
            let k = k as f64;
            0.5 * k * PI.ln() + ln_gamma(eta + 0.5 * (km1 - k))
        })
        .sum();
    lead - tail
}

// ---- Helper methods ----

/// `∂b/∂α` for a draw `b ~ Beta(α, α)` held at a fixed quantile.
fn symmetric_beta_draw_sensitivity(alpha: f64, draw: f64, density: f64) -> f64 {
    let h = CDF_SHAPE_STEP * alpha;
    let dcdf = (beta_reg(alpha + h, alpha + h, draw) - beta_reg(alpha - h, alpha - h, draw))
        / (2.0 * h);
    -dcdf / density
}

/// Nearest value to `z` that the vine accepts, `|z| ≤ 1 − ε`.
fn to_open_interval(z: f64) -> f64 {
    z.clamp(-1.0 + f64::EPSILON, 1.0 - f64::EPSILON)
}
