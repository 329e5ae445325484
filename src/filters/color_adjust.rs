//! Color adjustment filters: Invert, Brightness.
//!
//! Pixel-wise operations that don't require spatial context.

use crate::Rgb;

pub const DEFAULT_BRIGHTNESS_OFFSET: i32 = 100;

/// `255 - c` per channel.
#[inline]
pub fn invert_color(c: Rgb) -> Rgb {
    Rgb::new(255 - c.r, 255 - c.g, 255 - c.b)
}

/// Add `offset` to every channel, clamping to 0-255.
///
/// # Arguments
/// * `c` - Input color
/// * `offset` - Signed amount added to each channel
///
/// # Returns
/// Adjusted color
#[inline]
pub fn brightness_color(c: Rgb, offset: i32) -> Rgb {
    Rgb::from_clamped(
        (c.r as i32).saturating_add(offset),
        (c.g as i32).saturating_add(offset),
        (c.b as i32).saturating_add(offset),
    )
}
