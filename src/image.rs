//! 8-bit RGB image buffer.
//!
//! Pixels live in an `ndarray::Array3<u8>` of shape (height, width, 3), the
//! same layout the filter modules have always used. Coordinates in the public
//! API are `(x, y)` = (column, row).

use ndarray::{s, Array3, ArrayView3};

use crate::filters::core::{clamp_channel, clamp_index};
use crate::{FilterError, FilterResult};

/// One RGB sample, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Neutral color with all three channels set to `v`.
    #[inline]
    pub const fn gray(v: u8) -> Self {
        Rgb { r: v, g: v, b: v }
    }

    /// Build a color from wide intermediates, clamping each channel to 0-255.
    #[inline]
    pub fn from_clamped(r: i32, g: i32, b: i32) -> Self {
        Rgb {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
        }
    }

    #[inline]
    pub const fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Rgb { r, g, b }
    }
}

/// Fixed-size grid of RGB pixels.
///
/// Filters never mutate their source; every run allocates a fresh, zeroed
/// (black) output of the same dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImage {
    data: Array3<u8>,
}

impl RgbImage {
    /// Create a black image.
    pub fn new(width: usize, height: usize) -> Self {
        RgbImage {
            data: Array3::<u8>::zeros((height, width, 3)),
        }
    }

    /// Create an image where every pixel is `color`.
    pub fn filled(width: usize, height: usize, color: Rgb) -> Self {
        Self::from_fn(width, height, |_, _| color)
    }

    /// Create an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> Rgb,
    {
        let mut image = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                image.set(x, y, f(x, y));
            }
        }
        image
    }

    /// Wrap a row-major RGB byte buffer (length = width * height * 3).
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> FilterResult<Self> {
        let data = Array3::from_shape_vec((height, width, 3), data)?;
        Ok(RgbImage { data })
    }

    /// Copy an (height, width, channels) array. RGBA input has its alpha dropped.
    pub fn from_array(array: ArrayView3<u8>) -> FilterResult<Self> {
        let (_, _, channels) = array.dim();
        match channels {
            3 => Ok(RgbImage {
                data: array.to_owned(),
            }),
            4 => Ok(RgbImage {
                data: array.slice(s![.., .., 0..3]).to_owned(),
            }),
            actual => Err(FilterError::UnsupportedChannels { actual }),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    /// (width, height)
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    /// Bounds-checked read.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width() && y < self.height() {
            Some(self.pixel(x, y))
        } else {
            None
        }
    }

    /// Read a pixel whose coordinates the caller has already bounded.
    #[inline]
    pub(crate) fn pixel(&self, x: usize, y: usize) -> Rgb {
        Rgb {
            r: self.data[[y, x, 0]],
            g: self.data[[y, x, 1]],
            b: self.data[[y, x, 2]],
        }
    }

    /// Read with edge replication: out-of-range coordinates are clamped
    /// into `[0, width-1] x [0, height-1]`. The image must not be empty.
    #[inline]
    pub fn sample_clamped(&self, x: i64, y: i64) -> Rgb {
        self.pixel(clamp_index(x, self.width()), clamp_index(y, self.height()))
    }

    #[inline]
    pub(crate) fn set(&mut self, x: usize, y: usize, color: Rgb) {
        self.data[[y, x, 0]] = color.r;
        self.data[[y, x, 1]] = color.g;
        self.data[[y, x, 2]] = color.b;
    }

    /// Iterate `(x, y, color)` in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize, Rgb)> + '_ {
        let width = self.width();
        (0..self.height()).flat_map(move |y| (0..width).map(move |x| (x, y, self.pixel(x, y))))
    }

    pub fn as_array(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }

    pub fn into_array(self) -> Array3<u8> {
        self.data
    }

    /// Row-major RGB bytes.
    pub fn into_raw_vec(self) -> Vec<u8> {
        self.data.iter().copied().collect()
    }
}
