#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Distances at or below this many millimeters are treated as zero when
/// deciding whether something fits or overlaps.
pub const EPSILON_MM: f64 = 0.0001;

/// An axis-aligned rectangle in millimeters. `pos` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    pub pos: (f64, f64),
    pub size: (f64, f64),
}

impl Rect {
    #[inline]
    pub fn new(pos: (f64, f64), size: (f64, f64)) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.pos.0
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.pos.1
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.pos.0 + self.size.0
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.pos.1 + self.size.1
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.size.0
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.size.1
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.size.0 * self.size.1
    }

    /// The overlapping region of two rectangles, or `None` if the overlap is
    /// thinner than `EPSILON_MM` along either axis.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let right = self.right().min(other.right());
        let top = self.top().max(other.top());
        let bottom = self.bottom().min(other.bottom());

        let width = right - left;
        let height = bottom - top;

        if width <= EPSILON_MM || height <= EPSILON_MM {
            return None;
        }

        Some(Rect::new((left, top), (width, height)))
    }

    /// Moves the rectangle so that `origin` becomes (0, 0).
    pub fn relative_to(&self, origin: (f64, f64)) -> Rect {
        Rect::new((self.pos.0 - origin.0, self.pos.1 - origin.1), self.size)
    }
}
