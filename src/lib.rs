//! lkj_cholesky — LKJ priors over correlation-Cholesky factors, with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that exposes
//! the LKJ distribution and its unconstrained transform to Python via the
//! `_lkj_cholesky` extension module. When the `python-bindings` feature is
//! enabled, this module defines the Python-facing classes and submodules used
//! by the `lkj_cholesky` package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`constraints`, `transforms`,
//!   `distributions`) as the public crate surface.
//! - Define `#[pyclass]` wrappers and the `#[pymodule]` initializer for the
//!   `_lkj_cholesky` Python extension.
//! - Create and register Python submodules (`transforms`, `distributions`)
//!   under `lkj_cholesky` so that dot-notation imports work as expected.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work is implemented in the inner Rust modules; this file
//!   performs only FFI glue, input conversion, and error mapping.
//! - Python-visible types mirror the invariants of their Rust counterparts
//!   ([`CorrCholeskyTransform`], [`LKJCholesky`]).
//!
//! Conventions
//! -----------
//! - Matrices cross the boundary as numpy arrays or nested row lists on input
//!   and as nested row lists on output.
//! - Errors from core Rust code are propagated as rich error types internally
//!   and converted to `PyErr` (`ValueError`) at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend directly on the inner modules and can
//!   ignore the PyO3 items guarded by the `python-bindings` feature.
//! - The Python packaging layer imports `_lkj_cholesky` and wraps its classes
//!   in user-facing Python APIs.
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in the inner modules and
//!   by the integration tests under `tests/`.

pub mod constraints;
pub mod distributions;
#[cfg(feature = "obs_slog")]
pub mod observability;
pub mod transforms;
pub mod utils;

pub use crate::constraints::corr_cholesky::{CorrCholeskyViolation, is_corr_cholesky};
pub use crate::distributions::{LKJCholesky, LKJError, LKJOptions, LKJResult, ReparamSample};
pub use crate::transforms::{
    CorrCholeskyTransform, ErrorKind, PartialCorrToCholesky, TanhTransform, Transform,
    TransformError, TransformResult,
};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use rand::{SeedableRng, rngs::StdRng};

#[cfg(feature = "python-bindings")]
use crate::utils::{extract_f64_matrix, extract_f64_vector, matrix_to_rows};

/// PyCorrCholeskyTransform — Python wrapper for [`CorrCholeskyTransform`].
///
/// Exposed to Python as `lkj_cholesky.transforms.CorrCholeskyTransform(dim)`
/// with `forward(u)`, `inverse(x)` and `log_abs_det_jacobian(u)`.
#[cfg(feature = "python-bindings")]
#[pyclass(name = "CorrCholeskyTransform", module = "lkj_cholesky.transforms")]
pub struct PyCorrCholeskyTransform {
    inner: CorrCholeskyTransform,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyCorrCholeskyTransform {
    #[new]
    #[pyo3(text_signature = "(dim, /)", signature = (dim))]
    pub fn new(dim: usize) -> PyResult<Self> {
        if dim == 0 {
            return Err(PyValueError::new_err("dim must be at least 1"));
        }
        Ok(PyCorrCholeskyTransform { inner: CorrCholeskyTransform::new(dim) })
    }

    #[getter]
    pub fn dim(&self) -> usize {
        self.inner.dim()
    }

    pub fn forward<'py>(&self, py: Python<'py>, u: &Bound<'py, PyAny>) -> PyResult<Vec<Vec<f64>>> {
        let u = extract_f64_vector(py, u)?;
        let x = self.inner.forward(&u)?;
        Ok(matrix_to_rows(&x))
    }

    pub fn inverse<'py>(&self, x: &Bound<'py, PyAny>) -> PyResult<Vec<f64>> {
        let x = extract_f64_matrix(x)?;
        Ok(self.inner.inverse(&x)?.to_vec())
    }

    pub fn log_abs_det_jacobian<'py>(&self, py: Python<'py>, u: &Bound<'py, PyAny>) -> PyResult<f64> {
        let u = extract_f64_vector(py, u)?;
        let (_, log_det) = self.inner.forward_with_log_det(&u)?;
        Ok(log_det)
    }
}

/// PyLKJCholesky — Python wrapper for [`LKJCholesky`].
///
/// Exposed to Python as
/// `lkj_cholesky.distributions.LKJCholesky(dim, eta, support_tol=None,
/// validate_support=None, seed=None)`.
#[cfg(feature = "python-bindings")]
#[pyclass(name = "LKJCholesky", module = "lkj_cholesky.distributions")]
pub struct PyLKJCholesky {
    inner: LKJCholesky,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyLKJCholesky {
    #[new]
    #[pyo3(
        text_signature = "(dim, eta, /, support_tol=None, validate_support=None, seed=None)",
        signature = (dim, eta, support_tol = None, validate_support = None, seed = None)
    )]
    pub fn new(
        dim: usize, eta: f64, support_tol: Option<f64>, validate_support: Option<bool>,
        seed: Option<u64>,
    ) -> PyResult<Self> {
        let defaults = LKJOptions::default();
        let options = LKJOptions::new(
            support_tol.unwrap_or(defaults.support_tol),
            validate_support.unwrap_or(defaults.validate_support),
            seed,
        )?;
        Ok(PyLKJCholesky { inner: LKJCholesky::with_options(dim, eta, options)? })
    }

    #[getter]
    pub fn dim(&self) -> usize {
        self.inner.dim()
    }

    #[getter]
    pub fn eta(&self) -> f64 {
        self.inner.eta()
    }

    #[getter]
    pub fn concentration(&self) -> Vec<f64> {
        self.inner.concentration().to_vec()
    }

    #[getter]
    pub fn lkj_constant(&self) -> f64 {
        self.inner.lkj_constant()
    }

    /// Draw `n` factors (default 1) as a list of row lists. A `seed` given
    /// here overrides the constructor seed for this call only.
    #[pyo3(text_signature = "($self, /, n=None, seed=None)", signature = (n = None, seed = None))]
    pub fn sample(&self, n: Option<usize>, seed: Option<u64>) -> PyResult<Vec<Vec<Vec<f64>>>> {
        let n = n.unwrap_or(1);
        match seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                (0..n)
                    .map(|_| -> PyResult<Vec<Vec<f64>>> {
                        Ok(matrix_to_rows(&self.inner.sample(&mut rng)?))
                    })
                    .collect()
            }
            None => {
                let draws = self.inner.sample_n(n)?;
                Ok(draws
                    .outer_iter()
                    .map(|x| x.outer_iter().map(|row| row.to_vec()).collect())
                    .collect())
            }
        }
    }

    pub fn log_prob<'py>(&self, x: &Bound<'py, PyAny>) -> PyResult<f64> {
        let x = extract_f64_matrix(x)?;
        Ok(self.inner.log_prob(&x)?)
    }
}

/// `True` iff `x` is the lower Cholesky factor of a correlation matrix.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "is_corr_cholesky")]
pub fn py_is_corr_cholesky<'py>(x: &Bound<'py, PyAny>) -> PyResult<bool> {
    let x = extract_f64_matrix(x)?;
    Ok(is_corr_cholesky(x.view()))
}

/// _lkj_cholesky — PyO3 module initializer for the Python extension.
///
/// Creates the `transforms` and `distributions` submodules, attaches them to
/// `_lkj_cholesky`, and registers them in `sys.modules` so they are
/// importable via dotted paths.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _lkj_cholesky<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let transforms_mod = PyModule::new(_py, "transforms")?;
    let distributions_mod = PyModule::new(_py, "distributions")?;
    transforms(_py, m, &transforms_mod)?;
    distributions(_py, m, &distributions_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?.getattr("modules")?.set_item("lkj_cholesky.transforms", transforms_mod)?;

    _py.import("sys")?
        .getattr("modules")?
        .set_item("lkj_cholesky.distributions", distributions_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn transforms<'py>(
    _py: Python, lkj_cholesky: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<PyCorrCholeskyTransform>()?;
    m.add_function(wrap_pyfunction!(py_is_corr_cholesky, m)?)?;
    lkj_cholesky.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn distributions<'py>(
    _py: Python, lkj_cholesky: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<PyLKJCholesky>()?;
    lkj_cholesky.add_submodule(m)?;
    Ok(())
}
