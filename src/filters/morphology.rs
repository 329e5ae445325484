//! Morphology filters: Erosion, Dilation, Opening, Closing.
//!
//! Color morphology over a 3x3 structuring element. A neighbor replaces the
//! running extreme only when all three channels are simultaneously better
//! (strictly lower for erosion, strictly higher for dilation), so the result
//! is always one of the sampled colors or the initial sentinel.
//!
//! Only interior pixels are computed; the 1-pixel border of every pass stays
//! black.

use crate::{FilterError, FilterResult, Rgb, RgbImage};

/// Distance from the structuring element's center to its edge.
pub const MORPH_MARGIN: usize = 1;

/// Binary 3x3 neighborhood mask, indexed `[dy + 1][dx + 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuringElement {
    mask: [[bool; 3]; 3],
}

impl Default for StructuringElement {
    fn default() -> Self {
        Self::ones()
    }
}

impl StructuringElement {
    /// Full 3x3 window.
    pub const fn ones() -> Self {
        StructuringElement {
            mask: [[true; 3]; 3],
        }
    }

    /// Build a mask from rows of 0/1 entries.
    pub fn from_rows(rows: [[u8; 3]; 3]) -> FilterResult<Self> {
        let mut mask = [[false; 3]; 3];
        for (r, row) in rows.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                mask[r][c] = match v {
                    0 => false,
                    1 => true,
                    other => {
                        return Err(FilterError::InvalidParameters(format!(
                            "structuring element entries must be 0 or 1, got {other}"
                        )))
                    }
                };
            }
        }
        if !mask.iter().flatten().any(|&m| m) {
            return Err(FilterError::InvalidParameters(
                "structuring element must include at least one pixel".into(),
            ));
        }
        Ok(StructuringElement { mask })
    }

    #[inline]
    pub fn contains(&self, dx: isize, dy: isize) -> bool {
        self.mask[(dy + 1) as usize][(dx + 1) as usize]
    }
}

/// Morphological operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphOp {
    Erosion,
    Dilation,
    /// Erosion, then dilation of the eroded image
    Opening,
    /// Dilation, then erosion of the dilated image
    Closing,
}

/// Single traversal pass of a morphological operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphPass {
    Erode,
    Dilate,
}

impl MorphOp {
    /// Passes in execution order; each pass reads the previous pass's output.
    pub fn passes(self) -> &'static [MorphPass] {
        match self {
            MorphOp::Erosion => &[MorphPass::Erode],
            MorphOp::Dilation => &[MorphPass::Dilate],
            MorphOp::Opening => &[MorphPass::Erode, MorphPass::Dilate],
            MorphOp::Closing => &[MorphPass::Dilate, MorphPass::Erode],
        }
    }
}

impl MorphPass {
    #[inline]
    pub fn apply(self, src: &RgbImage, element: &StructuringElement, x: usize, y: usize) -> Rgb {
        match self {
            MorphPass::Erode => erode_pixel(src, element, x, y),
            MorphPass::Dilate => dilate_pixel(src, element, x, y),
        }
    }
}

/// Minimum over the structuring element, starting from white.
///
/// # Arguments
/// * `src` - Source image
/// * `element` - Neighborhood offsets to visit
/// * `x`, `y` - Interior coordinate, at least `MORPH_MARGIN` from every edge
///
/// # Returns
/// Per-channel minimum over the neighborhood
pub fn erode_pixel(src: &RgbImage, element: &StructuringElement, x: usize, y: usize) -> Rgb {
    let mut min = Rgb::WHITE;
    for dy in -1isize..=1 {
        for dx in -1isize..=1 {
            if !element.contains(dx, dy) {
                continue;
            }
            let p = src.pixel((x as isize + dx) as usize, (y as isize + dy) as usize);
            if p.r < min.r && p.g < min.g && p.b < min.b {
                min = p;
            }
        }
    }
    min
}

/// Maximum over the structuring element, starting from black.
///
/// # Arguments
/// * `src` - Source image
/// * `element` - Neighborhood offsets to visit
/// * `x`, `y` - Interior coordinate, at least `MORPH_MARGIN` from every edge
///
/// # Returns
/// Per-channel maximum over the neighborhood
pub fn dilate_pixel(src: &RgbImage, element: &StructuringElement, x: usize, y: usize) -> Rgb {
    let mut max = Rgb::BLACK;
    for dy in -1isize..=1 {
        for dx in -1isize..=1 {
            if !element.contains(dx, dy) {
                continue;
            }
            let p = src.pixel((x as isize + dx) as usize, (y as isize + dy) as usize);
            if p.r > max.r && p.g > max.g && p.b > max.b {
                max = p;
            }
        }
    }
    max
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_ramp() -> RgbImage {
        RgbImage::from_fn(3, 3, |x, y| Rgb::gray((10 + 20 * (y * 3 + x)) as u8))
    }

    #[test]
    fn test_erode_dilate_gray_extremes() {
        let src = gray_ramp();
        let se = StructuringElement::ones();
        assert_eq!(erode_pixel(&src, &se, 1, 1), Rgb::gray(10));
        assert_eq!(dilate_pixel(&src, &se, 1, 1), Rgb::gray(170));
    }

    #[test]
    fn test_requires_all_channels_better() {
        let mut src = RgbImage::filled(3, 3, Rgb::new(200, 200, 200));
        src.set(2, 0, Rgb::new(10, 220, 220));
        src.set(2, 2, Rgb::new(50, 50, 50));
        let se = StructuringElement::ones();
        // (10, 220, 220) never beats the (200, 200, 200) neighbors on G and B.
        assert_eq!(erode_pixel(&src, &se, 1, 1), Rgb::new(50, 50, 50));
    }

    #[test]
    fn test_first_strictly_better_candidate_wins() {
        let mut src = RgbImage::filled(3, 3, Rgb::WHITE);
        src.set(0, 0, Rgb::new(10, 200, 200));
        src.set(1, 0, Rgb::new(50, 50, 50));
        let se = StructuringElement::ones();
        assert_eq!(erode_pixel(&src, &se, 1, 1), Rgb::new(10, 200, 200));
    }

    #[test]
    fn test_sentinels_when_nothing_qualifies() {
        let se = StructuringElement::ones();
        let red = RgbImage::filled(3, 3, Rgb::new(255, 0, 0));
        assert_eq!(erode_pixel(&red, &se, 1, 1), Rgb::WHITE);
        let cyan = RgbImage::filled(3, 3, Rgb::new(0, 255, 255));
        assert_eq!(dilate_pixel(&cyan, &se, 1, 1), Rgb::BLACK);
    }

    #[test]
    fn test_custom_element_limits_neighbors() {
        let src = gray_ramp();
        let cross = StructuringElement::from_rows([[0, 1, 0], [1, 1, 1], [0, 1, 0]]).unwrap();
        // Corners (10, 50, 130, 170) are excluded.
        assert_eq!(erode_pixel(&src, &cross, 1, 1), Rgb::gray(30));
        assert_eq!(dilate_pixel(&src, &cross, 1, 1), Rgb::gray(150));
    }

    #[test]
    fn test_from_rows_validation() {
        assert!(StructuringElement::from_rows([[0; 3]; 3]).is_err());
        assert!(StructuringElement::from_rows([[2, 0, 0], [0, 1, 0], [0, 0, 0]]).is_err());
        assert_eq!(
            StructuringElement::from_rows([[1; 3]; 3]).unwrap(),
            StructuringElement::default()
        );
    }

    #[test]
    fn test_pass_order() {
        assert_eq!(MorphOp::Opening.passes(), &[MorphPass::Erode, MorphPass::Dilate]);
        assert_eq!(MorphOp::Closing.passes(), &[MorphPass::Dilate, MorphPass::Erode]);
        assert_eq!(MorphOp::Erosion.passes().len(), 1);
    }
}
