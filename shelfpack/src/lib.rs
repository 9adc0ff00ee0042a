//! Shelfpack lays out rectangles for printing across a grid of paper sheets.
//! It was built for Papertile, a tool that prints large artwork as a set of
//! pages to be cut out and assembled.
//!
//! Shelfpack does two things:
//!
//! - [`optimise`][optimise] picks the number of sheets across and down, and a
//!   position for every rectangle, so that as little paper as possible is
//!   wasted. Placement uses [`ShelfPacker`][ShelfPacker].
//! - [`tile`][tile] cuts an arrangement along sheet edges and describes what
//!   to draw on each sheet, including which part of an object's image belongs
//!   on it.
//!
//! All units are millimeters. Nothing here touches the filesystem or pixels.
//!
//! ## Example
//! ```
//! use shelfpack::{optimise, tile, Paint, Rectangle, Rect, Rgb, SheetSize, TileObject};
//!
//! let items = vec![
//!     Rectangle::new("sun", (300.0, 300.0)),
//!     Rectangle::new("cloud", (120.0, 60.0)),
//! ];
//!
//! let result = optimise(&items, SheetSize::A4).expect("everything fits");
//!
//! let objects: Vec<_> = items
//!     .iter()
//!     .map(|item| {
//!         let placement = result.placements[item.id()];
//!         TileObject {
//!             id: item.id().clone(),
//!             rect: Rect::new((placement.x, placement.y), item.size()),
//!             paint: Paint::Color(Rgb(250, 200, 40)),
//!             outline: Rgb::BLACK,
//!         }
//!     })
//!     .collect();
//!
//! let pages = tile(&objects, SheetSize::A4, result.columns, result.rows);
//! assert!(!pages.is_empty());
//! ```
//!
//! [optimise]: fn.optimise.html
//! [ShelfPacker]: struct.ShelfPacker.html
//! [tile]: fn.tile.html

mod geometry;
mod id;
mod optimizer;
mod packer;
mod sampler;
mod tiler;
mod types;

pub use geometry::*;
pub use id::*;
pub use optimizer::*;
pub use packer::*;
pub use sampler::*;
pub use tiler::*;
pub use types::*;
