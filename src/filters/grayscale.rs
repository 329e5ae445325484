//! Grayscale and sepia conversion.
//!
//! Uses ITU-R BT.601 luma weights in integer arithmetic so that converting an
//! already-gray image is exact.

use crate::filters::core::luminance;
use crate::Rgb;

/// Default sepia tint strength
pub const DEFAULT_SEPIA_DEPTH: i32 = 15;

/// R = G = B = luminance.
#[inline]
pub fn grayscale_color(c: Rgb) -> Rgb {
    Rgb::gray(luminance(c))
}

/// Warm-toned grayscale: R = I + 2k, G = I + k/2, B = I - k.
///
/// # Arguments
/// * `c` - Input color
/// * `depth` - Tint strength `k`
///
/// # Returns
/// Tinted color, each channel clamped to 0-255
#[inline]
pub fn sepia_color(c: Rgb, depth: i32) -> Rgb {
    let intensity = luminance(c) as i32;
    Rgb::from_clamped(
        intensity.saturating_add(depth.saturating_mul(2)),
        (intensity as f32 + 0.5 * depth as f32) as i32,
        intensity.saturating_sub(depth),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grayscale_is_idempotent() {
        for c in [
            Rgb::new(255, 0, 0),
            Rgb::new(12, 200, 99),
            Rgb::new(1, 1, 254),
            Rgb::WHITE,
            Rgb::BLACK,
        ] {
            let once = grayscale_color(c);
            assert_eq!(grayscale_color(once), once);
        }
    }

    #[test]
    fn test_grayscale_weights() {
        assert_eq!(grayscale_color(Rgb::new(255, 0, 0)), Rgb::gray(76));
        assert_eq!(grayscale_color(Rgb::new(0, 255, 0)), Rgb::gray(150));
        assert_eq!(grayscale_color(Rgb::new(0, 0, 255)), Rgb::gray(29));
        assert_eq!(grayscale_color(Rgb::WHITE), Rgb::WHITE);
    }

    #[test]
    fn test_sepia_tint() {
        assert_eq!(
            sepia_color(Rgb::gray(100), DEFAULT_SEPIA_DEPTH),
            Rgb::new(130, 107, 85)
        );
        assert_eq!(
            sepia_color(Rgb::gray(250), DEFAULT_SEPIA_DEPTH),
            Rgb::new(255, 255, 235)
        );
        assert_eq!(
            sepia_color(Rgb::gray(5), DEFAULT_SEPIA_DEPTH),
            Rgb::new(35, 12, 0)
        );
    }
}
