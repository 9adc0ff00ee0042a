//! Maps the part of an object that lands on one sheet back onto the pixels of
//! the image covering that object.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// A rectangle in source image pixels. Fractional, since sheet edges rarely
/// fall on pixel boundaries.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    /// Rounds outwards to whole pixels and clamps to an image of size
    /// `pixel_size`. The result is `(x, y, width, height)` and is never empty
    /// as long as the image isn't.
    pub fn to_whole_pixels(&self, pixel_size: (u32, u32)) -> (u32, u32, u32, u32) {
        let (max_x, max_y) = (f64::from(pixel_size.0), f64::from(pixel_size.1));

        let left = self.x.floor().max(0.0).min((max_x - 1.0).max(0.0));
        let top = self.y.floor().max(0.0).min((max_y - 1.0).max(0.0));
        let right = (self.x + self.width).ceil().min(max_x).max(left + 1.0);
        let bottom = (self.y + self.height).ceil().min(max_y).max(top + 1.0);

        (
            left as u32,
            top as u32,
            (right - left) as u32,
            (bottom - top) as u32,
        )
    }
}

/// Computes which pixels of a `pixel_size` image stretched over `object` end
/// up inside `section`, a part of `object` in the same millimeter space.
///
/// The crop is always at least one pixel wide and tall and never reaches
/// past the right or bottom edge of the image.
pub fn sample_crop(object: &Rect, pixel_size: (u32, u32), section: &Rect) -> PixelRect {
    let source_width = f64::from(pixel_size.0);
    let source_height = f64::from(pixel_size.1);

    let scale_x = source_width / object.width();
    let scale_y = source_height / object.height();

    let x = ((section.left() - object.left()) * scale_x).max(0.0);
    let y = ((section.top() - object.top()) * scale_y).max(0.0);

    let width = (source_width - x).min(section.width() * scale_x).max(1.0);
    let height = (source_height - y).min(section.height() * scale_y).max(1.0);

    PixelRect {
        x,
        y,
        width,
        height,
    }
}
