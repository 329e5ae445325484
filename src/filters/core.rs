//! Core utilities shared by the filters:
//! - Value and coordinate clamping
//! - Luminance
//! - Deterministic per-pixel random numbers

use crate::Rgb;

/// Clamp `value` into `[min, max]`.
#[inline]
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Clamp a wide intermediate into a channel value.
#[inline]
pub fn clamp_channel(value: i32) -> u8 {
    clamp(value, 0, 255) as u8
}

/// Map a possibly out-of-range coordinate onto `[0, len-1]` (edge replication).
#[inline]
pub fn clamp_index(value: i64, len: usize) -> usize {
    clamp(value, 0, len as i64 - 1) as usize
}

/// ITU-R BT.601 luma weights, in thousandths
const LUMA_R: u32 = 299;
const LUMA_G: u32 = 587;
const LUMA_B: u32 = 114;

/// Rounded BT.601 intensity of a color.
///
/// Integer arithmetic keeps `luminance(Rgb::gray(v)) == v` exact.
#[inline]
pub fn luminance(color: Rgb) -> u8 {
    let sum = LUMA_R * color.r as u32 + LUMA_G * color.g as u32 + LUMA_B * color.b as u32;
    ((sum + 500) / 1000) as u8
}

/// Unrounded BT.601 intensity, for sums over many neighbors.
#[inline]
pub fn luminance_f32(color: Rgb) -> f32 {
    let sum = LUMA_R * color.r as u32 + LUMA_G * color.g as u32 + LUMA_B * color.b as u32;
    sum as f32 / 1000.0
}

/// MINSTD generator seeded per pixel.
///
/// Seeding from `(seed, x, y)` instead of sharing one stream keeps random
/// filters pure functions of the coordinate, so traversal order and
/// parallelism do not change their output.
pub(crate) struct PixelRng {
    state: u64,
}

impl PixelRng {
    const MODULUS: u64 = 2147483647;

    pub(crate) fn for_pixel(seed: u64, x: usize, y: usize) -> Self {
        // SplitMix64 finalizer
        let mut z = seed
            ^ (x as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ (y as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        PixelRng {
            state: z % Self::MODULUS,
        }
    }

    fn next_u32(&mut self) -> u32 {
        self.state = (self.state * 48271 + 1) % Self::MODULUS;
        self.state as u32
    }

    /// Uniform in [0, 1).
    pub(crate) fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / Self::MODULUS as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_bounds() {
        assert_eq!(clamp(-3, 0, 10), 0);
        assert_eq!(clamp(11, 0, 10), 10);
        assert_eq!(clamp(4, 0, 10), 4);
        assert_eq!(clamp(2.5f32, 0.0, 1.0), 1.0);
    }

    #[test]
    fn test_clamp_channel_never_wraps() {
        assert_eq!(clamp_channel(256), 255);
        assert_eq!(clamp_channel(-1), 0);
        assert_eq!(clamp_channel(77), 77);
    }

    #[test]
    fn test_clamp_index_replicates_edges() {
        assert_eq!(clamp_index(-1, 5), 0);
        assert_eq!(clamp_index(5, 5), 4);
        assert_eq!(clamp_index(3, 5), 3);
    }

    #[test]
    fn test_luminance_of_gray_is_identity() {
        for v in 0..=255u8 {
            assert_eq!(luminance(Rgb::gray(v)), v);
        }
        assert_eq!(luminance(Rgb::new(255, 0, 0)), 76);
    }

    #[test]
    fn test_luminance_f32_is_unrounded() {
        assert_eq!(luminance_f32(Rgb::gray(200)), 200.0);
        assert!((luminance_f32(Rgb::new(1, 0, 0)) - 0.299).abs() < 1e-6);
    }

    #[test]
    fn test_pixel_rng_is_deterministic_and_in_range() {
        let mut a = PixelRng::for_pixel(7, 3, 4);
        let mut b = PixelRng::for_pixel(7, 3, 4);
        for _ in 0..100 {
            let v = a.next_f64();
            assert_eq!(v, b.next_f64());
            assert!((0.0..1.0).contains(&v));
        }
        let mut other = PixelRng::for_pixel(7, 4, 3);
        let mut same = PixelRng::for_pixel(7, 3, 4);
        assert_ne!(other.next_f64(), same.next_f64());
    }
}
