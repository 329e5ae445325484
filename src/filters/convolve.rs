//! Kernel convolution.
//!
//! Every neighbor coordinate is clamped into the image on each axis
//! independently (edge replication), so a kernel of any radius can be
//! applied at every pixel, borders included.

use crate::filters::core::{clamp_channel, luminance_f32};
use crate::{Kernel, Rgb, RgbImage};

/// Convolve the neighborhood of `(x, y)` with `kernel`, per channel.
///
/// Channel sums are accumulated in `f32`, truncated toward zero and clamped
/// to 0-255.
///
/// # Arguments
/// * `src` - Source image, never empty
/// * `kernel` - Odd-sized weight grid centered on `(x, y)`
/// * `x`, `y` - Output coordinate; neighbors outside `src` replicate the edge
///
/// # Returns
/// Convolved color for `(x, y)`
pub fn convolve_pixel(src: &RgbImage, kernel: &Kernel, x: usize, y: usize) -> Rgb {
    let rx = kernel.radius_x() as isize;
    let ry = kernel.radius_y() as isize;

    let mut sum_r = 0.0f32;
    let mut sum_g = 0.0f32;
    let mut sum_b = 0.0f32;

    for dy in -ry..=ry {
        for dx in -rx..=rx {
            let w = kernel.weight(dx, dy);
            if w == 0.0 {
                continue;
            }
            let c = src.sample_clamped(x as i64 + dx as i64, y as i64 + dy as i64);
            sum_r += w * c.r as f32;
            sum_g += w * c.g as f32;
            sum_b += w * c.b as f32;
        }
    }

    Rgb::from_clamped(sum_r as i32, sum_g as i32, sum_b as i32)
}

/// Emboss: convolve neighbor luminance with `kernel`, then re-center the
/// signed response around mid-gray as `(response + 255) / 2`.
///
/// Luminance is weighted unrounded; only the final sum is truncated.
///
/// # Arguments
/// * `src` - Source image, never empty
/// * `kernel` - Relief kernel, usually [`Kernel::emboss`]
/// * `x`, `y` - Output coordinate; neighbors outside `src` replicate the edge
///
/// # Returns
/// Gray relief value for `(x, y)`
pub fn emboss_pixel(src: &RgbImage, kernel: &Kernel, x: usize, y: usize) -> Rgb {
    let rx = kernel.radius_x() as isize;
    let ry = kernel.radius_y() as isize;

    let mut sum = 0.0f32;
    for dy in -ry..=ry {
        for dx in -rx..=rx {
            let c = src.sample_clamped(x as i64 + dx as i64, y as i64 + dy as i64);
            sum += kernel.weight(dx, dy) * luminance_f32(c);
        }
    }

    Rgb::gray(clamp_channel((sum as i32 + 255) / 2))
}
