//! rasterfx
//!
//! Classical image filters over 8-bit RGB rasters, with Python bindings via
//! PyO3 and WASM bindings for JavaScript.
//!
//! ## Image Format
//! [`RgbImage`] stores (height, width, 3) `u8` samples. RGBA input is
//! accepted at the boundary and its alpha channel is dropped; no filter reads
//! or writes alpha.
//!
//! ## Running Filters
//! - [`Filter`]: per-pixel filters. [`invoke`] reports progress and honors a
//!   [`CancelToken`]; a cancelled run yields [`RunOutcome::Cancelled`] and no
//!   image.
//! - [`GlobalFilter`]: gray world, contrast stretch and median. [`invoke_global`]
//!   always runs to completion.
//! - [`Operation`]: either kind, parsed from a host-facing name such as
//!   `"sobel"` or `"gray-world"`.
//!
//! Filters never modify their source. Output has the same dimensions as the
//! input and starts black, so pixels a filter skips (morphology and median
//! borders) stay black.

pub mod engine;
pub mod error;
pub mod filters;
pub mod image;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use engine::{
    invoke, invoke_global, CancelToken, ProcessingMode, RunOptions, RunOutcome, Runner,
};
pub use error::{FilterError, FilterResult};
pub use filters::kernel::Kernel;
pub use filters::{Filter, GlobalFilter, Operation};
pub use image::{Rgb, RgbImage};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray2, PyReadonlyArray3};
    use pyo3::exceptions::{PyRuntimeError, PyValueError};
    use pyo3::prelude::*;

    use crate::filters::median::MedianWindow;
    use crate::filters::OPERATION_NAMES;
    use crate::{
        CancelToken, Filter, FilterError, GlobalFilter, Kernel, Operation, RgbImage, RunOutcome,
        Runner,
    };

    fn to_py_err(err: FilterError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }

    fn run_operation<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        operation: &Operation,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = RgbImage::from_array(image.as_array()).map_err(to_py_err)?;
        match Runner::default().run(operation, &src, |_| {}, &CancelToken::new()) {
            RunOutcome::Completed(result) => Ok(result.into_array().into_pyarray(py)),
            RunOutcome::Cancelled => Err(PyRuntimeError::new_err("filter run was cancelled")),
        }
    }

    // ========================================================================
    // Named Filters
    // ========================================================================

    /// Apply a filter by name with its default parameters.
    ///
    /// Accepts (H, W, 3) or (H, W, 4) u8 images; returns (H, W, 3).
    #[pyfunction]
    pub fn apply_filter<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        name: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let operation: Operation = name.parse().map_err(to_py_err)?;
        run_operation(py, image, &operation)
    }

    /// Names accepted by `apply_filter`.
    #[pyfunction]
    pub fn filter_names() -> Vec<&'static str> {
        OPERATION_NAMES.to_vec()
    }

    // ========================================================================
    // Parameterized Filters
    // ========================================================================

    #[pyfunction]
    #[pyo3(signature = (image, radius=3, sigma=2.0))]
    pub fn gaussian_blur<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        radius: usize,
        sigma: f32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let filter = Filter::gaussian(radius, sigma).map_err(to_py_err)?;
        run_operation(py, image, &filter.into())
    }

    #[pyfunction]
    #[pyo3(signature = (image, length=9))]
    pub fn motion_blur<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        length: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let filter = Filter::motion_blur(length).map_err(to_py_err)?;
        run_operation(py, image, &filter.into())
    }

    #[pyfunction]
    #[pyo3(signature = (image, offset=100))]
    pub fn brightness<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        offset: i32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run_operation(py, image, &Filter::brightness(offset).into())
    }

    /// Convolve with a custom odd-sized kernel.
    #[pyfunction]
    pub fn convolve<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        kernel: PyReadonlyArray2<'py, f32>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let kernel = Kernel::from_array(kernel.as_array().to_owned()).map_err(to_py_err)?;
        run_operation(py, image, &Filter::Convolve(kernel).into())
    }

    #[pyfunction]
    #[pyo3(signature = (image, size=9))]
    pub fn median<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        size: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let window = MedianWindow::new(size).map_err(to_py_err)?;
        run_operation(py, image, &GlobalFilter::Median(window).into())
    }

    // ========================================================================
    // Module Registration
    // ========================================================================

    #[pymodule]
    pub fn rasterfx(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(apply_filter, m)?)?;
        m.add_function(wrap_pyfunction!(filter_names, m)?)?;

        m.add_function(wrap_pyfunction!(gaussian_blur, m)?)?;
        m.add_function(wrap_pyfunction!(motion_blur, m)?)?;
        m.add_function(wrap_pyfunction!(brightness, m)?)?;
        m.add_function(wrap_pyfunction!(convolve, m)?)?;
        m.add_function(wrap_pyfunction!(median, m)?)?;
        Ok(())
    }
}
