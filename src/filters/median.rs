//! Median (order-statistic) filter.
//!
//! For an odd window size `n`, the channel values of the `n x n` window are
//! sorted and the element at index `n*n/2 + 1` is taken: one rank above the
//! conventional median. Only pixels whose column and row fall in
//! `[n/2 + 1, len - n/2 - 2)` are computed; everything else stays black.

use std::ops::Range;

use crate::{FilterError, FilterResult, Rgb, RgbImage};

pub const DEFAULT_MEDIAN_WINDOW: usize = 9;

/// Validated median window size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MedianWindow {
    size: usize,
}

impl Default for MedianWindow {
    fn default() -> Self {
        MedianWindow {
            size: DEFAULT_MEDIAN_WINDOW,
        }
    }
}

impl MedianWindow {
    /// Window of `size x size` pixels; `size` must be odd and at least 3.
    pub fn new(size: usize) -> FilterResult<Self> {
        if size < 3 || size % 2 == 0 {
            return Err(FilterError::InvalidParameters(format!(
                "median window must be odd and at least 3, got {size}"
            )));
        }
        Ok(MedianWindow { size })
    }

    #[inline]
    pub fn size(self) -> usize {
        self.size
    }

    /// Index read from the sorted window values.
    #[inline]
    pub fn rank(self) -> usize {
        self.size * self.size / 2 + 1
    }

    /// Processed coordinates along an axis of length `len`.
    pub fn interior(self, len: usize) -> Range<usize> {
        let half = self.size / 2;
        let start = half + 1;
        let end = len.saturating_sub(half + 2).max(start);
        start..end
    }
}

/// Order statistic of the window centered on `(x, y)`, per channel.
///
/// # Arguments
/// * `src` - Source image
/// * `window` - Window size; its [`rank`](MedianWindow::rank) picks the value
/// * `x`, `y` - Center of the window; must lie in [`MedianWindow::interior`]
///   on both axes so the whole window is inside `src`
///
/// # Returns
/// Per-channel order statistic of the window
pub fn median_pixel(src: &RgbImage, window: MedianWindow, x: usize, y: usize) -> Rgb {
    let half = window.size / 2;
    let count = window.size * window.size;

    let mut reds = Vec::with_capacity(count);
    let mut greens = Vec::with_capacity(count);
    let mut blues = Vec::with_capacity(count);

    for sx in x - half..=x + half {
        for sy in y - half..=y + half {
            let c = src.pixel(sx, sy);
            reds.push(c.r);
            greens.push(c.g);
            blues.push(c.b);
        }
    }

    reds.sort_unstable();
    greens.sort_unstable();
    blues.sort_unstable();

    let rank = window.rank();
    Rgb::new(reds[rank], greens[rank], blues[rank])
}
