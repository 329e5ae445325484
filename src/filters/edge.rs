//! Gradient-magnitude edge detection: Sobel, Prewitt, Scharr.
//!
//! Two directional convolutions run over the same source pixel and are
//! combined per channel as `round(sqrt(gx^2 + gy^2))`. Each directional
//! response is a regular convolution output, so negative derivatives are
//! already clamped to 0 before they are combined.

use crate::filters::convolve::convolve_pixel;
use crate::filters::core::clamp_channel;
use crate::{Kernel, Rgb, RgbImage};

/// Named derivative kernel families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientOperator {
    Sobel,
    Prewitt,
    Scharr,
}

/// A horizontal/vertical derivative kernel pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    horizontal: Kernel,
    vertical: Kernel,
}

impl Gradient {
    pub fn new(horizontal: Kernel, vertical: Kernel) -> Self {
        Gradient {
            horizontal,
            vertical,
        }
    }

    pub fn from_operator(operator: GradientOperator) -> Self {
        match operator {
            GradientOperator::Sobel => Self::new(Kernel::sobel_x(), Kernel::sobel_y()),
            GradientOperator::Prewitt => Self::new(Kernel::prewitt_x(), Kernel::prewitt_y()),
            GradientOperator::Scharr => Self::new(Kernel::scharr_x(), Kernel::scharr_y()),
        }
    }

    pub fn horizontal(&self) -> &Kernel {
        &self.horizontal
    }

    pub fn vertical(&self) -> &Kernel {
        &self.vertical
    }

    /// Gradient magnitude at `(x, y)`.
    ///
    /// # Arguments
    /// * `src` - Source image
    /// * `x`, `y` - Pixel coordinate
    ///
    /// # Returns
    /// Per channel, `round(sqrt(gx² + gy²))` of the clamped directional
    /// responses, clamped to 0-255
    pub fn magnitude_pixel(&self, src: &RgbImage, x: usize, y: usize) -> Rgb {
        let gx = convolve_pixel(src, &self.horizontal, x, y);
        let gy = convolve_pixel(src, &self.vertical, x, y);
        Rgb {
            r: magnitude(gx.r, gy.r),
            g: magnitude(gx.g, gy.g),
            b: magnitude(gx.b, gy.b),
        }
    }
}

#[inline]
fn magnitude(gx: u8, gy: u8) -> u8 {
    let gx = gx as f32;
    let gy = gy as f32;
    clamp_channel((gx * gx + gy * gy).sqrt().round() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(width: usize, height: usize, rising: bool) -> RgbImage {
        RgbImage::from_fn(width, height, |x, _| {
            let bright = (x >= width / 2) == rising;
            if bright {
                Rgb::WHITE
            } else {
                Rgb::BLACK
            }
        })
    }

    #[test]
    fn test_flat_image_has_no_edges() {
        let src = RgbImage::filled(5, 5, Rgb::new(40, 120, 220));
        for op in [
            GradientOperator::Sobel,
            GradientOperator::Prewitt,
            GradientOperator::Scharr,
        ] {
            let g = Gradient::from_operator(op);
            for y in 0..5 {
                for x in 0..5 {
                    assert_eq!(g.magnitude_pixel(&src, x, y), Rgb::BLACK, "{op:?}");
                }
            }
        }
    }

    #[test]
    fn test_rising_step_saturates() {
        let src = step(4, 3, true);
        let g = Gradient::from_operator(GradientOperator::Sobel);
        assert_eq!(g.magnitude_pixel(&src, 1, 1), Rgb::WHITE);
        assert_eq!(g.magnitude_pixel(&src, 2, 1), Rgb::WHITE);
        assert_eq!(g.magnitude_pixel(&src, 0, 1), Rgb::BLACK);
    }

    #[test]
    fn test_falling_step_is_clamped_before_combination() {
        // Negative horizontal response clamps to 0 and vertical response is 0.
        let src = step(4, 3, false);
        let g = Gradient::from_operator(GradientOperator::Prewitt);
        assert_eq!(g.magnitude_pixel(&src, 1, 1), Rgb::BLACK);
    }

    #[test]
    fn test_horizontal_edge_detected_by_vertical_kernel() {
        let src = RgbImage::from_fn(3, 4, |_, y| if y >= 2 { Rgb::WHITE } else { Rgb::BLACK });
        let g = Gradient::from_operator(GradientOperator::Scharr);
        assert_eq!(g.magnitude_pixel(&src, 1, 1), Rgb::WHITE);
    }

    #[test]
    fn test_magnitude_rounds() {
        let one = Kernel::from_vec(1, 1, vec![1.0]).unwrap();
        let g = Gradient::new(one.clone(), one);
        let src = RgbImage::filled(1, 1, Rgb::new(2, 100, 0));
        // sqrt(8) = 2.83, sqrt(20000) = 141.42
        assert_eq!(g.magnitude_pixel(&src, 0, 0), Rgb::new(3, 141, 0));
    }

    #[test]
    fn test_magnitude_combines_components() {
        let kx = Kernel::from_vec(1, 1, vec![3.0]).unwrap();
        let ky = Kernel::from_vec(1, 1, vec![4.0]).unwrap();
        let g = Gradient::new(kx, ky);
        let src = RgbImage::filled(1, 1, Rgb::new(1, 10, 60));
        assert_eq!(g.magnitude_pixel(&src, 0, 0), Rgb::new(5, 50, 255));
    }
}
