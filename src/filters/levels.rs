//! Whole-image tonal corrections: Gray World balance, Contrast Stretch.
//!
//! Both run two passes over the image: the first aggregates a statistic over
//! every pixel, the second rescales each pixel from it. Neither can be
//! cancelled or reports progress.
//!
//! Degenerate statistics never divide by zero:
//! - a zero-mean channel keeps a scale factor of 1.0 in gray world
//! - a zero-intensity pixel spreads the stretched intensity evenly over its
//!   channels in contrast stretch

use log::warn;

use crate::filters::core::clamp_channel;
use crate::{Rgb, RgbImage};

/// Per-channel mean intensity, `[r, g, b]`.
pub fn channel_means(src: &RgbImage) -> [f32; 3] {
    let n = (src.width() * src.height()) as f32;
    if n == 0.0 {
        return [0.0; 3];
    }

    let mut sums = [0u64; 3];
    for (_, _, c) in src.pixels() {
        sums[0] += c.r as u64;
        sums[1] += c.g as u64;
        sums[2] += c.b as u64;
    }
    sums.map(|s| s as f32 / n)
}

#[inline]
fn rescale(value: u8, target: f64, mean: f32) -> u8 {
    if mean == 0.0 {
        return value;
    }
    clamp_channel((value as f64 * target / mean as f64) as i32)
}

/// Gray World balance: scale each channel so its mean matches the average of
/// the three channel means.
///
/// # Arguments
/// * `src` - Source image
///
/// # Returns
/// Balanced image; a zero-mean channel is copied unscaled
pub fn gray_world(src: &RgbImage) -> RgbImage {
    let means = channel_means(src);
    let target = (means[0] + means[1] + means[2]) as f64 / 3.0;
    if means.contains(&0.0) {
        warn!("gray world: zero-mean channel in {means:?}, leaving it unscaled");
    }

    RgbImage::from_fn(src.width(), src.height(), |x, y| {
        let c = src.pixel(x, y);
        Rgb {
            r: rescale(c.r, target, means[0]),
            g: rescale(c.g, target, means[1]),
            b: rescale(c.b, target, means[2]),
        }
    })
}

/// Integer mean of the three channels.
#[inline]
pub fn intensity(c: Rgb) -> u32 {
    (c.r as u32 + c.g as u32 + c.b as u32) / 3
}

/// `(min, max)` pixel intensity, widened to `max = min + 1` for flat images.
pub fn intensity_range(src: &RgbImage) -> (u32, u32) {
    let mut min = 255u32;
    let mut max = 0u32;
    for (_, _, c) in src.pixels() {
        let i = intensity(c);
        min = min.min(i);
        max = max.max(i);
    }
    if min >= max {
        warn!("contrast stretch: flat intensity {min}, widening range by one");
        max = min + 1;
    }
    (min, max)
}

/// Contrast Stretch: map intensity `[min, max]` linearly onto `[0, 255]` and
/// redistribute the new intensity over the channels in their original
/// proportions.
///
/// # Arguments
/// * `src` - Source image
///
/// # Returns
/// Stretched image; black when every pixel has the same intensity
pub fn contrast_stretch(src: &RgbImage) -> RgbImage {
    let (min, max) = intensity_range(src);
    let range = (max - min) as f32;

    RgbImage::from_fn(src.width(), src.height(), |x, y| {
        let c = src.pixel(x, y);
        let i = intensity(c);
        let stretched = (i - min) as f32 * 255.0 / range;
        let channel = |v: u8| {
            let ratio = if i == 0 { 1.0 } else { v as f32 / i as f32 };
            clamp_channel((stretched * ratio) as i32)
        };
        Rgb {
            r: channel(c.r),
            g: channel(c.g),
            b: channel(c.b),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_means() {
        let src = RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgb::new(200, 100, 50)
            } else {
                Rgb::new(100, 50, 25)
            }
        });
        assert_eq!(channel_means(&src), [150.0, 75.0, 37.5]);
        assert_eq!(channel_means(&RgbImage::new(0, 0)), [0.0; 3]);
    }

    #[test]
    fn test_gray_world_neutralizes_cast() {
        let src = RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgb::new(200, 100, 50)
            } else {
                Rgb::new(100, 50, 25)
            }
        });
        let out = gray_world(&src);
        // target mean 87.5; every channel of pixel 0 becomes 116.67
        assert_eq!(out.get(0, 0), Some(Rgb::gray(116)));
        assert_eq!(out.get(1, 0), Some(Rgb::gray(58)));
    }

    #[test]
    fn test_gray_world_black_image_unchanged() {
        let src = RgbImage::new(2, 2);
        assert_eq!(gray_world(&src), src);
    }

    #[test]
    fn test_gray_world_zero_channel_passes_through() {
        let src = RgbImage::filled(3, 2, Rgb::new(100, 50, 0));
        let out = gray_world(&src);
        assert!(out.pixels().all(|(_, _, c)| c == Rgb::new(50, 50, 0)));
    }

    #[test]
    fn test_contrast_stretch_maps_range_to_full_scale() {
        let values: [u8; 16] = [
            10, 40, 70, 100, 130, 160, 190, 200, 25, 55, 85, 115, 145, 175, 20, 180,
        ];
        let src = RgbImage::from_fn(4, 4, |x, y| Rgb::gray(values[y * 4 + x]));
        assert_eq!(intensity_range(&src), (10, 200));

        let out = contrast_stretch(&src);
        let (lo, hi) = out
            .pixels()
            .map(|(_, _, c)| intensity(c))
            .fold((255, 0), |(lo, hi), i| (lo.min(i), hi.max(i)));
        assert_eq!(lo, 0);
        assert!(hi >= 254);
        assert_eq!(out.get(0, 0), Some(Rgb::gray(0)));
        assert_eq!(out.get(3, 1), Some(Rgb::gray(255)));
    }

    #[test]
    fn test_contrast_stretch_keeps_channel_proportions() {
        let src = RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgb::gray(0)
            } else {
                Rgb::new(30, 60, 90)
            }
        });
        // intensity 60 -> 255, ratios 0.5 / 1.0 / 1.5
        let out = contrast_stretch(&src);
        assert_eq!(out.get(1, 0), Some(Rgb::new(127, 255, 255)));
    }

    #[test]
    fn test_contrast_stretch_zero_intensity_is_defined() {
        let src = RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgb::new(1, 1, 0)
            } else {
                Rgb::gray(200)
            }
        });
        let out = contrast_stretch(&src);
        assert_eq!(out.get(0, 0), Some(Rgb::BLACK));
        assert_eq!(out.get(1, 0), Some(Rgb::WHITE));
    }

    #[test]
    fn test_contrast_stretch_flat_image_goes_black() {
        let src = RgbImage::filled(3, 3, Rgb::gray(50));
        assert_eq!(intensity_range(&src), (50, 51));
        let out = contrast_stretch(&src);
        assert!(out.pixels().all(|(_, _, c)| c == Rgb::BLACK));
    }
}
