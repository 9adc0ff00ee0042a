//! Splits an arrangement of objects into the pieces that land on each printed
//! sheet.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    geometry::Rect,
    id::Id,
    sampler::{sample_crop, PixelRect},
    types::SheetSize,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
}

/// How the inside of an object is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Color(Rgb),

    /// An image stretched over the whole object. Only the image's size matters
    /// for tiling; the pixels stay with the caller.
    Texture { pixel_size: (u32, u32) },
}

/// An object in layout space, ready to be tiled.
#[derive(Debug, Clone, PartialEq)]
pub struct TileObject {
    pub id: Id,
    pub rect: Rect,
    pub paint: Paint,
    pub outline: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(tag = "type", rename_all = "kebab-case")
)]
pub enum DrawKind {
    Fill { color: Rgb },
    ImageCrop { source: PixelRect },
}

/// One piece of one object on one sheet.
///
/// `dest` is in millimeters relative to the sheet's top-left corner. Every
/// command is outlined with `outline` after it's filled.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DrawCommand {
    pub object: Id,
    pub dest: Rect,
    pub kind: DrawKind,
    pub outline: Rgb,
}

/// Everything to draw on the sheet at `(row, column)` of the grid.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Page {
    pub row: u32,
    pub column: u32,
    pub commands: Vec<DrawCommand>,
}

impl Page {
    /// A spreadsheet-style name for this sheet, like `A1` for the top-left
    /// sheet or `C2` for the third sheet of the second row.
    pub fn label(&self) -> String {
        let mut letters = Vec::new();
        let mut column = self.column + 1;

        while column > 0 {
            let remainder = (column - 1) % 26;
            letters.push((b'A' + remainder as u8) as char);
            column = (column - 1) / 26;
        }

        letters.iter().rev().collect::<String>() + &(self.row + 1).to_string()
    }
}

/// Cuts `objects` along the edges of a `columns` by `rows` grid of `sheet`
/// sized pages.
///
/// Pages come out in row-major order and commands in the order of `objects`.
/// Sheets that nothing touches are left out entirely, so the result can be
/// shorter than `columns * rows` or even empty.
pub fn tile(objects: &[TileObject], sheet: SheetSize, columns: u32, rows: u32) -> Vec<Page> {
    let mut pages = Vec::new();

    for row in 0..rows {
        for column in 0..columns {
            let cell = sheet.cell(row, column);

            let commands: Vec<_> = objects
                .iter()
                .filter_map(|object| draw_command(object, &cell))
                .collect();

            if commands.is_empty() {
                log::trace!("Sheet ({}, {}) is blank, skipping", row, column);
                continue;
            }

            log::trace!(
                "Sheet ({}, {}) has {} pieces",
                row,
                column,
                commands.len()
            );

            pages.push(Page {
                row,
                column,
                commands,
            });
        }
    }

    pages
}

fn draw_command(object: &TileObject, cell: &Rect) -> Option<DrawCommand> {
    let section = object.rect.intersection(cell)?;

    let kind = match object.paint {
        Paint::Color(color) => DrawKind::Fill { color },
        Paint::Texture { pixel_size } => DrawKind::ImageCrop {
            source: sample_crop(&object.rect, pixel_size, &section),
        },
    };

    Some(DrawCommand {
        object: object.id.clone(),
        dest: section.relative_to(cell.pos),
        kind,
        outline: object.outline,
    })
}
