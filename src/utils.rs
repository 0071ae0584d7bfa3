//! utils — Python-boundary conversion helpers (feature `python-bindings`).
//!
//! Accept numpy arrays, objects exposing `to_numpy()`, or nested Python
//! sequences of floats, and turn Rust arrays back into plain nested lists.
#[cfg(feature = "python-bindings")]
use ndarray::{Array1, Array2};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyTypeError, exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1, PyReadonlyArray2,
};

/// Read a 1-D float64 input as a readonly numpy view.
#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err("expected a 1-D numpy.ndarray or sequence of float64")
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Read a 1-D float64 input into an owned `Array1`.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_vector<'py>(py: Python<'py>, raw: &Bound<'py, PyAny>) -> PyResult<Array1<f64>> {
    let arr = extract_f64_array(py, raw)?;
    Ok(arr.as_array().to_owned())
}

/// Read a 2-D float64 input (numpy array or list of equal-length rows) into
/// an owned `Array2`.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_matrix<'py>(raw: &Bound<'py, PyAny>) -> PyResult<Array2<f64>> {
    if let Ok(arr_ro) = raw.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr_ro.as_array().to_owned());
    }

    let rows: Vec<Vec<f64>> = raw.extract().map_err(|_| {
        PyTypeError::new_err("expected a 2-D numpy.ndarray or sequence of float64 rows")
    })?;
    let ncols = rows.first().map_or(0, Vec::len);
    if let Some(bad) = rows.iter().position(|r| r.len() != ncols) {
        return Err(PyValueError::new_err(format!(
            "row {bad} has length {} but row 0 has length {ncols}",
            rows[bad].len()
        )));
    }
    let nrows = rows.len();
    Array2::from_shape_vec((nrows, ncols), rows.into_iter().flatten().collect())
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Nested row lists for returning a matrix to Python.
#[cfg(feature = "python-bindings")]
pub fn matrix_to_rows(x: &Array2<f64>) -> Vec<Vec<f64>> {
    x.outer_iter().map(|row| row.to_vec()).collect()
}
