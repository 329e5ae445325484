//! Geometric warps: Shift, Waves, Rotation, Glass.
//!
//! Each output pixel is an inverse-mapped source pixel. Source coordinates
//! are truncated toward zero and clamped into the image, so pixels mapped
//! past an edge replicate that edge.

use std::f64::consts::PI;

use crate::filters::core::PixelRng;
use crate::{FilterError, FilterResult, Rgb, RgbImage};

pub const DEFAULT_SHIFT: i64 = 50;
pub const DEFAULT_WAVE_AMPLITUDE: f64 = 20.0;
pub const DEFAULT_WAVE_PERIOD: f64 = 60.0;
pub const DEFAULT_ROTATION: f64 = PI / 6.0;
pub const DEFAULT_GLASS_SPREAD: f64 = 10.0;

/// Move the image right by `dx` pixels (left for negative `dx`).
///
/// # Arguments
/// * `src` - Source image
/// * `dx` - Horizontal offset in pixels
/// * `x`, `y` - Output coordinate
///
/// # Returns
/// The source pixel at `(x - dx, y)`, clamped to the image
#[inline]
pub fn shift_pixel(src: &RgbImage, dx: i64, x: usize, y: usize) -> Rgb {
    src.sample_clamped((x as i64).saturating_sub(dx), y as i64)
}

/// Which coordinate drives the sine displacement of a [`Wave`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveDirection {
    /// Rows slide sideways by an amount that varies with the row
    Horizontal,
    /// Columns are resampled by an amount that varies with the column
    Vertical,
}

/// Sinusoidal horizontal displacement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wave {
    amplitude: f64,
    period: f64,
    direction: WaveDirection,
}

impl Default for Wave {
    fn default() -> Self {
        Wave {
            amplitude: DEFAULT_WAVE_AMPLITUDE,
            period: DEFAULT_WAVE_PERIOD,
            direction: WaveDirection::Horizontal,
        }
    }
}

impl Wave {
    pub fn new(amplitude: f64, period: f64, direction: WaveDirection) -> FilterResult<Self> {
        if !amplitude.is_finite() {
            return Err(FilterError::InvalidParameters(format!(
                "wave amplitude must be finite, got {amplitude}"
            )));
        }
        if !period.is_finite() || period == 0.0 {
            return Err(FilterError::InvalidParameters(format!(
                "wave period must be finite and non-zero, got {period}"
            )));
        }
        Ok(Wave {
            amplitude,
            period,
            direction,
        })
    }

    /// Default amplitude and period in the given direction.
    pub fn with_direction(direction: WaveDirection) -> Self {
        Wave {
            direction,
            ..Self::default()
        }
    }

    pub fn direction(&self) -> WaveDirection {
        self.direction
    }

    /// Output pixel at `(x, y)`.
    ///
    /// # Arguments
    /// * `src` - Source image
    /// * `x`, `y` - Output coordinate
    ///
    /// # Returns
    /// The source pixel at `(x - amplitude * sin(2 pi t / period), y)`, where
    /// `t` is the row or column picked by the direction
    pub fn pixel(&self, src: &RgbImage, x: usize, y: usize) -> Rgb {
        let t = match self.direction {
            WaveDirection::Horizontal => y,
            WaveDirection::Vertical => x,
        } as f64;
        let sx = x as f64 - self.amplitude * (2.0 * PI * t / self.period).sin();
        src.sample_clamped(sx as i64, y as i64)
    }
}

/// Rotation about the image center `(width / 2, height / 2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    angle: f64,
}

impl Default for Rotation {
    fn default() -> Self {
        Rotation {
            angle: DEFAULT_ROTATION,
        }
    }
}

impl Rotation {
    /// `angle` in radians.
    pub fn new(angle: f64) -> FilterResult<Self> {
        if !angle.is_finite() {
            return Err(FilterError::InvalidParameters(format!(
                "rotation angle must be finite, got {angle}"
            )));
        }
        Ok(Rotation { angle })
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Source pixel that lands on `(x, y)`, clamped to the image.
    pub fn pixel(&self, src: &RgbImage, x: usize, y: usize) -> Rgb {
        let x0 = (src.width() / 2) as f64;
        let y0 = (src.height() / 2) as f64;
        let dx = x as f64 - x0;
        let dy = y as f64 - y0;
        let (sin, cos) = self.angle.sin_cos();

        let sx = dx * cos - dy * sin + x0;
        let sy = dx * sin + dy * cos + y0;
        src.sample_clamped(sx as i64, sy as i64)
    }
}

/// Frosted-glass scatter: each pixel takes a source pixel up to `spread / 2`
/// away on each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glass {
    spread: f64,
    seed: u64,
}

impl Default for Glass {
    fn default() -> Self {
        Glass {
            spread: DEFAULT_GLASS_SPREAD,
            seed: 0,
        }
    }
}

impl Glass {
    pub fn new(spread: f64, seed: u64) -> FilterResult<Self> {
        if !(spread.is_finite() && spread >= 0.0) {
            return Err(FilterError::InvalidParameters(format!(
                "glass spread must be finite and non-negative, got {spread}"
            )));
        }
        Ok(Glass { spread, seed })
    }

    /// Scattered pixel for `(x, y)`. The same seed and coordinate always
    /// pick the same source pixel.
    pub fn pixel(&self, src: &RgbImage, x: usize, y: usize) -> Rgb {
        let mut rng = PixelRng::for_pixel(self.seed, x, y);
        let sx = x as f64 + (rng.next_f64() - 0.5) * self.spread;
        let sy = y as f64 + (rng.next_f64() - 0.5) * self.spread;
        src.sample_clamped(sx as i64, sy as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Each pixel encodes its own coordinates.
    fn coords(width: usize, height: usize) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| Rgb::new(x as u8, y as u8, 0))
    }

    #[test]
    fn test_shift_replicates_left_edge() {
        let src = coords(80, 2);
        assert_eq!(shift_pixel(&src, DEFAULT_SHIFT, 10, 1), Rgb::new(0, 1, 0));
        assert_eq!(shift_pixel(&src, DEFAULT_SHIFT, 70, 0), Rgb::new(20, 0, 0));
        assert_eq!(shift_pixel(&src, -5, 78, 0), Rgb::new(79, 0, 0));
    }

    #[test]
    fn test_wave_displacement_follows_row() {
        let src = coords(64, 32);
        let wave = Wave::default();
        // sin(0) = 0 on row 0, sin(pi/2) = 1 on row 15
        assert_eq!(wave.pixel(&src, 30, 0), Rgb::new(30, 0, 0));
        assert_eq!(wave.pixel(&src, 30, 15), Rgb::new(10, 15, 0));
        assert_eq!(wave.pixel(&src, 5, 15), Rgb::new(0, 15, 0));
    }

    #[test]
    fn test_wave_vertical_follows_column() {
        let src = coords(64, 4);
        let wave = Wave::with_direction(WaveDirection::Vertical);
        assert_eq!(wave.pixel(&src, 15, 2), Rgb::new(0, 2, 0));
        assert_eq!(wave.pixel(&src, 0, 3), Rgb::new(0, 3, 0));
    }

    #[test]
    fn test_wave_rejects_zero_period() {
        assert!(Wave::new(20.0, 0.0, WaveDirection::Horizontal).is_err());
        assert!(Wave::new(f64::INFINITY, 60.0, WaveDirection::Vertical).is_err());
    }

    #[test]
    fn test_zero_rotation_is_identity() {
        let src = coords(7, 5);
        let rot = Rotation::new(0.0).unwrap();
        for (x, y, c) in src.pixels() {
            assert_eq!(rot.pixel(&src, x, y), c);
        }
    }

    #[test]
    fn test_rotation_fixes_center() {
        let src = coords(9, 7);
        let rot = Rotation::default();
        assert_eq!(rot.pixel(&src, 4, 3), Rgb::new(4, 3, 0));
        assert!(Rotation::new(f64::NAN).is_err());
    }

    #[test]
    fn test_glass_is_deterministic_and_bounded() {
        let src = coords(40, 40);
        let glass = Glass::default();
        for y in 0..40 {
            for x in 0..40 {
                let c = glass.pixel(&src, x, y);
                assert_eq!(c, glass.pixel(&src, x, y));
                assert!((c.r as i64 - x as i64).abs() <= 5);
                assert!((c.g as i64 - y as i64).abs() <= 5);
            }
        }
    }

    #[test]
    fn test_glass_without_spread_is_identity() {
        let src = coords(6, 6);
        let glass = Glass::new(0.0, 99).unwrap();
        for (x, y, c) in src.pixels() {
            assert_eq!(glass.pixel(&src, x, y), c);
        }
        assert!(Glass::new(-1.0, 0).is_err());
    }
}
