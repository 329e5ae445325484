//! WebAssembly exports for rasterfx filters.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Filters are
//! selected by name (see [`OPERATION_NAMES`]) and run with default
//! parameters.
//!
//! ## Pixel Layout
//!
//! - **RGB**: flat `width * height * 3` bytes, row-major
//! - **RGBA**: flat `width * height * 4` bytes (canvas `ImageData`); alpha is
//!   copied from the input unchanged

use ndarray::{s, Array3};
use wasm_bindgen::prelude::*;

use crate::filters::OPERATION_NAMES;
use crate::{
    CancelToken, FilterError, Operation, ProcessingMode, RgbImage, RunOptions, RunOutcome, Runner,
};

fn to_js(err: FilterError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn run_named(src: &RgbImage, name: &str) -> Result<RgbImage, JsValue> {
    let operation: Operation = name.parse().map_err(to_js)?;
    // wasm32 has no worker threads
    let runner = Runner::new(RunOptions {
        mode: ProcessingMode::Sequential,
    })
    .map_err(to_js)?;
    match runner.run(&operation, src, |_| {}, &CancelToken::new()) {
        RunOutcome::Completed(result) => Ok(result),
        RunOutcome::Cancelled => Err(JsValue::from_str("filter run was cancelled")),
    }
}

// ============================================================================
// RGB
// ============================================================================

/// Apply a named filter to an RGB u8 image.
///
/// # Arguments
/// * `data` - Flat array of RGB bytes (length = width * height * 3)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `name` - Filter name, e.g. `"sobel"` or `"gray-world"`
#[wasm_bindgen]
pub fn apply_filter_rgb_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    name: &str,
) -> Result<Vec<u8>, JsValue> {
    let src = RgbImage::from_raw(width, height, data.to_vec()).map_err(to_js)?;
    Ok(run_named(&src, name)?.into_raw_vec())
}

// ============================================================================
// RGBA
// ============================================================================

/// Apply a named filter to an RGBA u8 image, keeping the input alpha.
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes (length = width * height * 4)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `name` - Filter name, e.g. `"sobel"` or `"gray-world"`
#[wasm_bindgen]
pub fn apply_filter_rgba_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    name: &str,
) -> Result<Vec<u8>, JsValue> {
    let input = Array3::from_shape_vec((height, width, 4), data.to_vec())
        .map_err(|e| to_js(e.into()))?;
    let src = RgbImage::from_array(input.view()).map_err(to_js)?;

    let mut output = input;
    output
        .slice_mut(s![.., .., 0..3])
        .assign(&run_named(&src, name)?.as_array());
    Ok(output.into_raw_vec_and_offset().0)
}

/// Names accepted by the `apply_filter_*` functions.
#[wasm_bindgen]
pub fn filter_names_wasm() -> Vec<String> {
    OPERATION_NAMES.iter().map(|n| n.to_string()).collect()
}
