use std::cmp::Ordering;

use crate::{
    packer::ShelfPacker,
    types::{PackOutput, PackingResult, Rectangle, SheetSize},
};

/// Grids wider than this many sheets are never considered.
pub const MAX_COLUMNS: u32 = 24;

/// Waste areas closer than this, in square millimeters, count as equal.
pub const WASTE_TOLERANCE_MM2: f64 = 0.5;

/// Finds the sheet grid and placement that wastes the least paper.
///
/// Every column count from the narrowest grid that can hold the widest
/// rectangle up to `MAX_COLUMNS` is tried with a `ShelfPacker`, and the
/// candidate with the smallest waste wins. Near-ties prefer fewer rows, then
/// fewer columns, then a shorter packing.
///
/// Returns `None` if `items` is empty or if no grid of at most `MAX_COLUMNS`
/// columns can hold every rectangle.
pub fn optimise(items: &[Rectangle], sheet: SheetSize) -> Option<PackingResult> {
    if items.is_empty() {
        return None;
    }

    let mut sorted: Vec<&Rectangle> = items.iter().collect();
    sorted.sort_by(|a, b| packing_order(a, b));

    let widest = items.iter().map(Rectangle::width).fold(0.0, f64::max);
    let total_area: f64 = items.iter().map(Rectangle::area).sum();

    let min_columns = ((widest / sheet.width).ceil() as u32).max(1);

    log::trace!(
        "Optimising {} items on {}x{} sheets, trying {} to {} columns",
        items.len(),
        sheet.width,
        sheet.height,
        min_columns,
        MAX_COLUMNS
    );

    let mut best: Option<Candidate> = None;

    for columns in min_columns..=MAX_COLUMNS {
        let packer = ShelfPacker::new(f64::from(columns) * sheet.width);

        let output = match packer.pack(sorted.iter().copied()) {
            Ok(output) => output,
            Err(err) => {
                log::trace!("{} columns: {}", columns, err);
                continue;
            }
        };

        let rows = ((output.height() / sheet.height).ceil() as u32).max(1);
        let waste = f64::from(columns) * f64::from(rows) * sheet.area() - total_area;

        log::trace!(
            "{} columns: {} rows, {}mm tall, waste {}",
            columns,
            rows,
            output.height(),
            waste
        );

        let candidate = Candidate {
            columns,
            rows,
            waste,
            output,
        };

        let replace = match &best {
            Some(current) => candidate.is_better_than(current),
            None => true,
        };

        if replace {
            best = Some(candidate);
        }
    }

    let best = best?;

    log::debug!(
        "Chose a {}x{} grid wasting {}mm²",
        best.columns,
        best.rows,
        best.waste
    );

    Some(PackingResult {
        columns: best.columns,
        rows: best.rows,
        layout_width: best.output.width,
        layout_height: best.output.height,
        placements: best.output.placements,
        waste_area: best.waste,
        sheet,
    })
}

/// Largest side first, then taller first, then wider first.
fn packing_order(a: &Rectangle, b: &Rectangle) -> Ordering {
    b.longest_side()
        .total_cmp(&a.longest_side())
        .then_with(|| b.height().total_cmp(&a.height()))
        .then_with(|| b.width().total_cmp(&a.width()))
}

struct Candidate {
    columns: u32,
    rows: u32,
    waste: f64,
    output: PackOutput,
}

impl Candidate {
    fn is_better_than(&self, other: &Candidate) -> bool {
        if self.waste < other.waste - WASTE_TOLERANCE_MM2 {
            return true;
        }

        if (self.waste - other.waste).abs() > WASTE_TOLERANCE_MM2 {
            return false;
        }

        (self.rows, self.columns)
            .cmp(&(other.rows, other.columns))
            .then_with(|| self.output.height.total_cmp(&other.output.height))
            == Ordering::Less
    }
}
