//! Filter modules for image processing effects.
//!
//! ## Filter Kinds
//!
//! Every filter is a value of one of two enums:
//!
//! | Enum | Traversal | Cancellable | Progress |
//! |------|-----------|-------------|----------|
//! | [`Filter`] | per pixel, one color per `(x, y)` | yes | yes |
//! | [`GlobalFilter`] | aggregate pass, then correction pass | no | no |
//!
//! A [`Filter`] computes each output pixel from the *source* image only, so
//! the result does not depend on traversal order and columns can be
//! processed in parallel. Morphological filters run one traversal per pass
//! over interior pixels; everything else covers the full image.
//!
//! ## Filter Categories
//!
//! - **Pixel-wise**: invert, grayscale, sepia, brightness
//! - **Geometric**: shift, waves, rotation, glass
//! - **Convolution**: box blur, gaussian, sharpen, motion blur, emboss, custom kernels
//! - **Edge detection**: sobel, prewitt, scharr
//! - **Morphology**: erosion, dilation, opening, closing
//! - **Global**: gray world, contrast stretch, median

use std::fmt;
use std::str::FromStr;

pub mod color_adjust;
pub mod convolve;
pub mod core;
pub mod edge;
pub mod geometric;
pub mod grayscale;
pub mod kernel;
pub mod levels;
pub mod median;
pub mod morphology;

use crate::{FilterError, FilterResult, Kernel, Rgb, RgbImage};
use edge::{Gradient, GradientOperator};
use geometric::{Glass, Rotation, Wave, WaveDirection};
use median::MedianWindow;
use morphology::{MorphOp, MorphPass, StructuringElement};

// ============================================================================
// Pixel Filters
// ============================================================================

/// A per-pixel filter and its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Invert,
    Grayscale,
    Sepia { depth: i32 },
    Brightness { offset: i32 },
    /// Horizontal translation with edge replication
    Shift { dx: i64 },
    Wave(Wave),
    Rotate(Rotation),
    Glass(Glass),
    /// Per-channel convolution
    Convolve(Kernel),
    /// Luminance convolution mapped around mid-gray
    Emboss(Kernel),
    Gradient(Gradient),
    /// Interior-only morphology; two-pass ops traverse the image twice
    Morphology {
        op: MorphOp,
        element: StructuringElement,
    },
}

impl Filter {
    pub fn sepia() -> Self {
        Filter::Sepia {
            depth: grayscale::DEFAULT_SEPIA_DEPTH,
        }
    }

    pub fn brightness(offset: i32) -> Self {
        Filter::Brightness { offset }
    }

    pub fn shift(dx: i64) -> Self {
        Filter::Shift { dx }
    }

    pub fn waves(direction: WaveDirection) -> Self {
        Filter::Wave(Wave::with_direction(direction))
    }

    /// 3x3 box blur.
    pub fn blur() -> Self {
        Filter::Convolve(Kernel::box_blur())
    }

    pub fn gaussian(radius: usize, sigma: f32) -> FilterResult<Self> {
        Ok(Filter::Convolve(Kernel::gaussian(radius, sigma)?))
    }

    pub fn sharpen() -> Self {
        Filter::Convolve(Kernel::sharpen())
    }

    pub fn sharpen_strong() -> Self {
        Filter::Convolve(Kernel::sharpen_strong())
    }

    pub fn motion_blur(length: usize) -> FilterResult<Self> {
        Ok(Filter::Convolve(Kernel::motion_blur(length)?))
    }

    pub fn emboss() -> Self {
        Filter::Emboss(Kernel::emboss())
    }

    pub fn gradient(operator: GradientOperator) -> Self {
        Filter::Gradient(Gradient::from_operator(operator))
    }

    pub fn sobel() -> Self {
        Self::gradient(GradientOperator::Sobel)
    }

    pub fn prewitt() -> Self {
        Self::gradient(GradientOperator::Prewitt)
    }

    pub fn scharr() -> Self {
        Self::gradient(GradientOperator::Scharr)
    }

    /// Morphology over the full 3x3 structuring element.
    pub fn morphology(op: MorphOp) -> Self {
        Filter::Morphology {
            op,
            element: StructuringElement::ones(),
        }
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Filter::Invert => "invert",
            Filter::Grayscale => "grayscale",
            Filter::Sepia { .. } => "sepia",
            Filter::Brightness { .. } => "brightness",
            Filter::Shift { .. } => "shift",
            Filter::Wave(w) => match w.direction() {
                WaveDirection::Horizontal => "waves-horizontal",
                WaveDirection::Vertical => "waves-vertical",
            },
            Filter::Rotate(_) => "rotate",
            Filter::Glass(_) => "glass",
            Filter::Convolve(_) => "convolve",
            Filter::Emboss(_) => "emboss",
            Filter::Gradient(_) => "gradient",
            Filter::Morphology { op, .. } => match op {
                MorphOp::Erosion => "erosion",
                MorphOp::Dilation => "dilation",
                MorphOp::Opening => "opening",
                MorphOp::Closing => "closing",
            },
        }
    }

    /// Output color at `(x, y)`, computed from `src` alone.
    ///
    /// For morphology this is a single pass (the first one for opening and
    /// closing) and `(x, y)` must be interior; the full operation is
    /// [`invoke`](crate::invoke).
    pub fn compute_color(&self, src: &RgbImage, x: usize, y: usize) -> Rgb {
        match self {
            Filter::Invert => color_adjust::invert_color(src.pixel(x, y)),
            Filter::Grayscale => grayscale::grayscale_color(src.pixel(x, y)),
            Filter::Sepia { depth } => grayscale::sepia_color(src.pixel(x, y), *depth),
            Filter::Brightness { offset } => {
                color_adjust::brightness_color(src.pixel(x, y), *offset)
            }
            Filter::Shift { dx } => geometric::shift_pixel(src, *dx, x, y),
            Filter::Wave(wave) => wave.pixel(src, x, y),
            Filter::Rotate(rotation) => rotation.pixel(src, x, y),
            Filter::Glass(glass) => glass.pixel(src, x, y),
            Filter::Convolve(kernel) => convolve::convolve_pixel(src, kernel, x, y),
            Filter::Emboss(kernel) => convolve::emboss_pixel(src, kernel, x, y),
            Filter::Gradient(gradient) => gradient.magnitude_pixel(src, x, y),
            Filter::Morphology { op, element } => {
                let pass = match op {
                    MorphOp::Erosion | MorphOp::Opening => MorphPass::Erode,
                    MorphOp::Dilation | MorphOp::Closing => MorphPass::Dilate,
                };
                pass.apply(src, element, x, y)
            }
        }
    }
}

// ============================================================================
// Global Filters
// ============================================================================

/// A filter that needs the whole image before it can write any pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalFilter {
    GrayWorld,
    ContrastStretch,
    Median(MedianWindow),
}

impl GlobalFilter {
    pub fn name(&self) -> &'static str {
        match self {
            GlobalFilter::GrayWorld => "gray-world",
            GlobalFilter::ContrastStretch => "contrast-stretch",
            GlobalFilter::Median(_) => "median",
        }
    }
}

// ============================================================================
// Operation Registry
// ============================================================================

/// Any filter, as selected by name from a host.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Pixel(Filter),
    Global(GlobalFilter),
}

/// Names accepted by [`Operation::from_str`].
pub const OPERATION_NAMES: &[&str] = &[
    "invert",
    "grayscale",
    "sepia",
    "brightness",
    "shift",
    "waves-horizontal",
    "waves-vertical",
    "rotate",
    "glass",
    "blur",
    "gaussian",
    "sharpen",
    "sharpen-strong",
    "motion-blur",
    "emboss",
    "sobel",
    "prewitt",
    "scharr",
    "erosion",
    "dilation",
    "opening",
    "closing",
    "median",
    "gray-world",
    "contrast-stretch",
];

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Pixel(f) => f.name(),
            Operation::Global(g) => g.name(),
        }
    }
}

impl From<Filter> for Operation {
    fn from(filter: Filter) -> Self {
        Operation::Pixel(filter)
    }
}

impl From<GlobalFilter> for Operation {
    fn from(filter: GlobalFilter) -> Self {
        Operation::Global(filter)
    }
}

impl FromStr for Operation {
    type Err = FilterError;

    /// Default-configured operation for a host-facing name.
    fn from_str(name: &str) -> FilterResult<Self> {
        let op: Operation = match name {
            "invert" => Filter::Invert.into(),
            "grayscale" => Filter::Grayscale.into(),
            "sepia" => Filter::sepia().into(),
            "brightness" => Filter::brightness(color_adjust::DEFAULT_BRIGHTNESS_OFFSET).into(),
            "shift" => Filter::shift(geometric::DEFAULT_SHIFT).into(),
            "waves-horizontal" => Filter::waves(WaveDirection::Horizontal).into(),
            "waves-vertical" => Filter::waves(WaveDirection::Vertical).into(),
            "rotate" => Filter::Rotate(Rotation::default()).into(),
            "glass" => Filter::Glass(Glass::default()).into(),
            "blur" => Filter::blur().into(),
            "gaussian" => Filter::Convolve(Kernel::default_gaussian()).into(),
            "sharpen" => Filter::sharpen().into(),
            "sharpen-strong" => Filter::sharpen_strong().into(),
            "motion-blur" => Filter::motion_blur(kernel::DEFAULT_MOTION_BLUR_LENGTH)?.into(),
            "emboss" => Filter::emboss().into(),
            "sobel" => Filter::sobel().into(),
            "prewitt" => Filter::prewitt().into(),
            "scharr" => Filter::scharr().into(),
            "erosion" => Filter::morphology(MorphOp::Erosion).into(),
            "dilation" => Filter::morphology(MorphOp::Dilation).into(),
            "opening" => Filter::morphology(MorphOp::Opening).into(),
            "closing" => Filter::morphology(MorphOp::Closing).into(),
            "median" => GlobalFilter::Median(MedianWindow::default()).into(),
            "gray-world" => GlobalFilter::GrayWorld.into(),
            "contrast-stretch" => GlobalFilter::ContrastStretch.into(),
            other => {
                return Err(FilterError::InvalidParameters(format!(
                    "unknown filter: {other}"
                )))
            }
        };
        Ok(op)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_name_parses() {
        for name in OPERATION_NAMES {
            let op: Operation = name.parse().unwrap();
            if !matches!(op, Operation::Pixel(Filter::Convolve(_) | Filter::Gradient(_))) {
                assert_eq!(op.name(), *name);
            }
        }
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        let err = "posterize".parse::<Operation>().unwrap_err();
        assert!(matches!(err, FilterError::InvalidParameters(_)));
    }

    #[test]
    fn test_defaults_from_names() {
        assert_eq!(
            "brightness".parse::<Operation>().unwrap(),
            Operation::Pixel(Filter::Brightness { offset: 100 })
        );
        assert_eq!(
            "median".parse::<Operation>().unwrap(),
            Operation::Global(GlobalFilter::Median(MedianWindow::default()))
        );
        assert_eq!(
            "gaussian".parse::<Operation>().unwrap(),
            Operation::Pixel(Filter::gaussian(3, 2.0).unwrap())
        );
    }

    #[test]
    fn test_median_name_uses_nine_pixel_window() {
        match "median".parse::<Operation>().unwrap() {
            Operation::Global(GlobalFilter::Median(window)) => assert_eq!(window.size(), 9),
            other => panic!("unexpected operation {other}"),
        }
    }

    #[test]
    fn test_constructors_validate() {
        assert!(Filter::gaussian(2, 0.0).is_err());
        assert!(Filter::motion_blur(4).is_err());
        assert!(Filter::motion_blur(9).is_ok());
    }

    #[test]
    fn test_compute_color_dispatch() {
        let src = RgbImage::filled(3, 3, Rgb::new(10, 20, 30));
        assert_eq!(Filter::Invert.compute_color(&src, 1, 1), Rgb::new(245, 235, 225));
        assert!(Filter::blur().compute_color(&src, 0, 0).r.abs_diff(10) <= 1);
        assert_eq!(
            Filter::morphology(MorphOp::Opening).compute_color(&src, 1, 1),
            Rgb::new(10, 20, 30)
        );
    }
}
