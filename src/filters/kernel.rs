//! Convolution kernels.
//!
//! A kernel is a (2*ry + 1) x (2*rx + 1) grid of weights stored as an
//! `Array2<f32>` indexed `[[row, column]]`, with its center at `(rx, ry)`.
//! Odd dimensions are enforced at construction.

use ndarray::Array2;

use crate::{FilterError, FilterResult};

pub const DEFAULT_GAUSSIAN_RADIUS: usize = 3;
pub const DEFAULT_GAUSSIAN_SIGMA: f32 = 2.0;
pub const DEFAULT_MOTION_BLUR_LENGTH: usize = 9;

/// A 2D convolution kernel
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    weights: Array2<f32>,
}

impl Kernel {
    /// Create a kernel from an (height, width) weight array.
    pub fn from_array(weights: Array2<f32>) -> FilterResult<Self> {
        let (height, width) = weights.dim();
        if width == 0 || height == 0 {
            return Err(FilterError::InvalidKernel("kernel is empty".into()));
        }
        if width % 2 == 0 || height % 2 == 0 {
            return Err(FilterError::InvalidKernel(format!(
                "kernel dimensions must be odd, got {width}x{height}"
            )));
        }
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(FilterError::InvalidKernel(
                "kernel weights must be finite".into(),
            ));
        }
        Ok(Kernel { weights })
    }

    /// Create a kernel from row-major weights.
    pub fn from_vec(width: usize, height: usize, data: Vec<f32>) -> FilterResult<Self> {
        let weights = Array2::from_shape_vec((height, width), data)?;
        Self::from_array(weights)
    }

    fn from_3x3(rows: [[f32; 3]; 3]) -> Self {
        Kernel {
            weights: Array2::from_shape_fn((3, 3), |(r, c)| rows[r][c]),
        }
    }

    /// 3x3 uniform average, every weight 1/9.
    pub fn box_blur() -> Self {
        Kernel {
            weights: Array2::from_elem((3, 3), 1.0 / 9.0),
        }
    }

    /// Gaussian with weights `exp(-(i^2 + j^2) / (2 sigma^2))`, normalized to sum 1.
    pub fn gaussian(radius: usize, sigma: f32) -> FilterResult<Self> {
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(FilterError::InvalidKernel(format!(
                "gaussian sigma must be positive, got {sigma}"
            )));
        }
        Ok(Self::build_gaussian(radius, sigma))
    }

    /// Gaussian with radius 3 and sigma 2.
    pub fn default_gaussian() -> Self {
        Self::build_gaussian(DEFAULT_GAUSSIAN_RADIUS, DEFAULT_GAUSSIAN_SIGMA)
    }

    fn build_gaussian(radius: usize, sigma: f32) -> Self {
        let size = 2 * radius + 1;
        let r = radius as f32;
        let denom = 2.0 * sigma * sigma;
        let mut weights = Array2::from_shape_fn((size, size), |(row, col)| {
            let i = col as f32 - r;
            let j = row as f32 - r;
            (-(i * i + j * j) / denom).exp()
        });

        let norm: f32 = weights.sum();
        weights.mapv_inplace(|w| w / norm);
        Kernel { weights }
    }

    /// `{{0,-1,0},{-1,5,-1},{0,-1,0}}`
    pub fn sharpen() -> Self {
        Self::from_3x3([[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]])
    }

    /// `{{-1,-1,-1},{-1,9,-1},{-1,-1,-1}}`
    pub fn sharpen_strong() -> Self {
        Self::from_3x3([[-1.0, -1.0, -1.0], [-1.0, 9.0, -1.0], [-1.0, -1.0, -1.0]])
    }

    /// n x n kernel with 1/n on the main diagonal.
    pub fn motion_blur(length: usize) -> FilterResult<Self> {
        if length == 0 || length % 2 == 0 {
            return Err(FilterError::InvalidKernel(format!(
                "motion blur length must be odd and positive, got {length}"
            )));
        }
        let w = 1.0 / length as f32;
        Ok(Kernel {
            weights: Array2::from_shape_fn((length, length), |(r, c)| if r == c { w } else { 0.0 }),
        })
    }

    /// Sobel horizontal derivative.
    pub fn sobel_x() -> Self {
        Self::from_3x3([[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]])
    }

    /// Sobel vertical derivative.
    pub fn sobel_y() -> Self {
        Self::from_3x3([[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]])
    }

    pub fn prewitt_x() -> Self {
        Self::from_3x3([[-1.0, 0.0, 1.0], [-1.0, 0.0, 1.0], [-1.0, 0.0, 1.0]])
    }

    pub fn prewitt_y() -> Self {
        Self::from_3x3([[-1.0, -1.0, -1.0], [0.0, 0.0, 0.0], [1.0, 1.0, 1.0]])
    }

    pub fn scharr_x() -> Self {
        Self::from_3x3([[-3.0, 0.0, 3.0], [-10.0, 0.0, 10.0], [-3.0, 0.0, 3.0]])
    }

    pub fn scharr_y() -> Self {
        Self::from_3x3([[-3.0, -10.0, -3.0], [0.0, 0.0, 0.0], [3.0, 10.0, 3.0]])
    }

    /// Diagonal relief kernel applied to luminance.
    pub fn emboss() -> Self {
        Self::from_3x3([[0.0, 1.0, 0.0], [1.0, 0.0, -1.0], [0.0, -1.0, 0.0]])
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.weights.dim().1
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.weights.dim().0
    }

    /// Horizontal radius `rx`.
    #[inline]
    pub fn radius_x(&self) -> usize {
        self.width() / 2
    }

    /// Vertical radius `ry`.
    #[inline]
    pub fn radius_y(&self) -> usize {
        self.height() / 2
    }

    /// Weight at offset `(dx, dy)` from the center.
    ///
    /// Panics if the offset lies outside the kernel.
    #[inline]
    pub fn weight(&self, dx: isize, dy: isize) -> f32 {
        let col = (dx + self.radius_x() as isize) as usize;
        let row = (dy + self.radius_y() as isize) as usize;
        self.weights[[row, col]]
    }

    pub fn weights(&self) -> &Array2<f32> {
        &self.weights
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f32 {
        self.weights.sum()
    }
}
