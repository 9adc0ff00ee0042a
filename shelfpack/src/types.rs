use std::{collections::BTreeMap, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{geometry::Rect, id::Id};

/// An input to the packing routines.
///
/// `Rectangle` is just a size in millimeters and a caller-provided ID. The
/// packer never changes it; results refer back to it by ID.
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    pub(crate) id: Id,
    pub(crate) size: (f64, f64),
}

impl Rectangle {
    #[inline]
    pub fn new<I: Into<Id>>(id: I, size: (f64, f64)) -> Self {
        Self {
            id: id.into(),
            size,
        }
    }

    #[inline]
    pub fn id(&self) -> &Id {
        &self.id
    }

    #[inline]
    pub fn size(&self) -> (f64, f64) {
        self.size
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

    /// The longer of the two sides.
    #[inline]
    pub(crate) fn longest_side(&self) -> f64 {
        self.size.0.max(self.size.1)
    }
}

/// Top-left corner of a placed rectangle in layout space, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    pub x: f64,
    pub y: f64,
}

impl Placement {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Where each rectangle ended up, keyed by rectangle ID.
pub type PlacementMap = BTreeMap<Id, Placement>;

/// The result of a single run of `ShelfPacker::pack`.
#[derive(Debug, Clone, PartialEq)]
pub struct PackOutput {
    pub(crate) placements: PlacementMap,
    pub(crate) width: f64,
    pub(crate) height: f64,
}

impl PackOutput {
    #[inline]
    pub fn placements(&self) -> &PlacementMap {
        &self.placements
    }

    /// The widest shelf, never more than the width the packer was given.
    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// The bottom edge of the lowest shelf.
    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }
}

/// A sheet-grid size together with the placement that was chosen for it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackingResult {
    pub columns: u32,
    pub rows: u32,
    pub placements: PlacementMap,
    pub layout_width: f64,
    pub layout_height: f64,

    /// Area of the whole sheet grid minus the area of every rectangle, in
    /// square millimeters.
    pub waste_area: f64,

    pub sheet: SheetSize,
}

impl PackingResult {
    /// The layout space covered by the sheet grid.
    pub fn grid_extent(&self) -> Rect {
        self.sheet.grid_extent(self.columns, self.rows)
    }

    /// Fraction of the sheet grid covered by rectangles, between 0 and 1.
    pub fn utilization(&self) -> f64 {
        let grid_area = self.grid_extent().area();

        if grid_area <= 0.0 {
            return 0.0;
        }

        ((grid_area - self.waste_area) / grid_area).max(0.0).min(1.0)
    }
}

/// The physical size of one printed page, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SheetSize {
    pub width: f64,
    pub height: f64,
}

impl SheetSize {
    pub const A5: SheetSize = SheetSize::new(148.0, 210.0);
    pub const A4: SheetSize = SheetSize::new(210.0, 297.0);
    pub const A3: SheetSize = SheetSize::new(297.0, 420.0);
    pub const A2: SheetSize = SheetSize::new(420.0, 594.0);
    pub const A1: SheetSize = SheetSize::new(594.0, 841.0);
    pub const LETTER: SheetSize = SheetSize::new(215.9, 279.4);
    pub const LEGAL: SheetSize = SheetSize::new(215.9, 355.6);
    pub const TABLOID: SheetSize = SheetSize::new(279.4, 431.8);

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The same sheet turned on its side.
    pub fn landscape(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// The footprint of the sheet at `(row, column)` in layout space.
    pub fn cell(&self, row: u32, column: u32) -> Rect {
        Rect::new(
            (f64::from(column) * self.width, f64::from(row) * self.height),
            (self.width, self.height),
        )
    }

    pub fn grid_extent(&self, columns: u32, rows: u32) -> Rect {
        Rect::new(
            (0.0, 0.0),
            (
                f64::from(columns) * self.width,
                f64::from(rows) * self.height,
            ),
        )
    }
}

impl FromStr for SheetSize {
    type Err = UnknownSheetSize;

    fn from_str(value: &str) -> Result<SheetSize, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "a5" => Ok(SheetSize::A5),
            "a4" => Ok(SheetSize::A4),
            "a3" => Ok(SheetSize::A3),
            "a2" => Ok(SheetSize::A2),
            "a1" => Ok(SheetSize::A1),
            "letter" => Ok(SheetSize::LETTER),
            "legal" => Ok(SheetSize::LEGAL),
            "tabloid" => Ok(SheetSize::TABLOID),

            _ => Err(UnknownSheetSize(value.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown sheet size '{0}'. Valid options are a5, a4, a3, a2, a1, letter, legal and tabloid.")]
pub struct UnknownSheetSize(pub String);
