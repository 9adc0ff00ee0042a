use thiserror::Error;

use crate::{
    geometry::EPSILON_MM,
    id::Id,
    types::{PackOutput, Placement, PlacementMap, Rectangle},
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PackError {
    #[error("{id} is {width}mm wide, which does not fit in {max_width}mm")]
    NoFit { id: Id, width: f64, max_width: f64 },
}

/// A horizontal band of rectangles sitting side by side, top-aligned.
#[derive(Debug)]
struct Shelf {
    y: f64,
    height: f64,
    used_width: f64,

    /// Every rectangle on this shelf with its x offset. The y offset is always
    /// the shelf's own, so shifting the shelf moves them too.
    items: Vec<(Id, f64)>,
}

/// Packs rectangles into shelves that grow downwards, never exceeding a fixed
/// width.
///
/// Rectangles are placed in the order they're given. Each one goes onto the
/// existing shelf it fits most tightly, or onto a new shelf at the bottom if
/// it fits nowhere. Rectangles are never rotated.
#[derive(Debug, Clone, Copy)]
pub struct ShelfPacker {
    max_width: f64,
}

impl ShelfPacker {
    pub fn new(max_width: f64) -> Self {
        Self { max_width }
    }

    pub fn max_width(&self) -> f64 {
        self.max_width
    }

    pub fn pack<'a, I>(&self, items: I) -> Result<PackOutput, PackError>
    where
        I: IntoIterator<Item = &'a Rectangle>,
    {
        let limit = self.max_width + EPSILON_MM;

        let mut shelves: Vec<Shelf> = Vec::new();
        let mut total_height = 0.0_f64;

        for item in items {
            if item.width() > limit {
                log::trace!(
                    "{} ({}x{}) is wider than {}",
                    item.id,
                    item.width(),
                    item.height(),
                    self.max_width
                );

                return Err(PackError::NoFit {
                    id: item.id.clone(),
                    width: item.width(),
                    max_width: self.max_width,
                });
            }

            let best_shelf = shelves
                .iter()
                .enumerate()
                .filter(|(_, shelf)| shelf.used_width + item.width() <= limit)
                .map(|(index, shelf)| {
                    let remaining = self.max_width - (shelf.used_width + item.width());
                    (index, remaining)
                })
                .fold(None, |best: Option<(usize, f64)>, candidate| match best {
                    Some((_, best_remaining)) if best_remaining <= candidate.1 => best,
                    _ => Some(candidate),
                });

            match best_shelf {
                Some((index, _)) => {
                    let shelf = &mut shelves[index];

                    log::trace!(
                        "Placing {} on shelf {} at x = {}",
                        item.id,
                        index,
                        shelf.used_width
                    );

                    shelf.items.push((item.id.clone(), shelf.used_width));
                    shelf.used_width += item.width();

                    if item.height() > shelf.height {
                        let delta = item.height() - shelf.height;
                        shelf.height = item.height();

                        // Everything below this shelf has to move down so that
                        // the shelves keep stacking without overlap.
                        for later in &mut shelves[index + 1..] {
                            later.y += delta;
                        }

                        total_height += delta;
                    }
                }
                None => {
                    log::trace!(
                        "Opening shelf {} at y = {} for {}",
                        shelves.len(),
                        total_height,
                        item.id
                    );

                    shelves.push(Shelf {
                        y: total_height,
                        height: item.height(),
                        used_width: item.width(),
                        items: vec![(item.id.clone(), 0.0)],
                    });

                    total_height += item.height();
                }
            }
        }

        let height = match shelves.last() {
            Some(last) => total_height.max(last.y + last.height),
            None => total_height,
        };

        let widest = shelves
            .iter()
            .map(|shelf| shelf.used_width)
            .fold(0.0, f64::max);

        let mut placements = PlacementMap::new();
        for shelf in &shelves {
            for (id, x) in &shelf.items {
                placements.insert(id.clone(), Placement::new(*x, shelf.y));
            }
        }

        log::trace!(
            "Packed {} items onto {} shelves, {}x{}",
            placements.len(),
            shelves.len(),
            widest.min(self.max_width),
            height
        );

        Ok(PackOutput {
            placements,
            width: widest.min(self.max_width),
            height,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn rect(id: &str, width: f64, height: f64) -> Rectangle {
        Rectangle::new(id, (width, height))
    }

    fn position(output: &PackOutput, id: &str) -> (f64, f64) {
        let placement = output.placements()[&Id::from(id)];
        (placement.x, placement.y)
    }

    #[test]
    fn two_halves_share_a_shelf() {
        let items = vec![
            rect("a", 100.0, 50.0),
            rect("b", 100.0, 50.0),
            rect("c", 100.0, 100.0),
        ];

        let output = ShelfPacker::new(210.0).pack(&items).unwrap();

        assert_eq!(position(&output, "a"), (0.0, 0.0));
        assert_eq!(position(&output, "b"), (100.0, 0.0));
        assert_eq!(position(&output, "c"), (0.0, 50.0));
        assert_eq!(output.height(), 150.0);
        assert_eq!(output.width(), 200.0);
    }

    #[test]
    fn too_wide() {
        let items = vec![rect("small", 10.0, 10.0), rect("huge", 211.0, 10.0)];

        let result = ShelfPacker::new(210.0).pack(&items);

        assert_eq!(
            result,
            Err(PackError::NoFit {
                id: Id::from("huge"),
                width: 211.0,
                max_width: 210.0,
            })
        );
    }

    #[test]
    fn exact_width_within_tolerance() {
        let items = vec![rect("a", 105.00005, 10.0), rect("b", 105.0, 10.0)];

        let output = ShelfPacker::new(210.0).pack(&items).unwrap();

        assert_eq!(position(&output, "b"), (105.00005, 0.0));
        assert_eq!(output.width(), 210.0);
    }

    #[test]
    fn tightest_shelf_wins() {
        let items = vec![
            rect("loose", 40.0, 30.0),
            rect("snug", 70.0, 30.0),
            rect("fits-both", 20.0, 5.0),
        ];

        let output = ShelfPacker::new(100.0).pack(&items).unwrap();

        // Shelf 0 would have 40mm left over, shelf 1 only 10mm.
        assert_eq!(position(&output, "snug"), (0.0, 30.0));
        assert_eq!(position(&output, "fits-both"), (70.0, 30.0));
        assert_eq!(output.height(), 60.0);
    }

    #[test]
    fn growing_a_shelf_pushes_later_shelves_down() {
        let items = vec![
            rect("short", 60.0, 10.0),
            rect("filler", 80.0, 20.0),
            rect("tall", 30.0, 50.0),
        ];

        let output = ShelfPacker::new(100.0).pack(&items).unwrap();

        // "tall" joins shelf 0 and grows it from 10 to 50.
        assert_eq!(position(&output, "tall"), (60.0, 0.0));
        assert_eq!(position(&output, "filler"), (0.0, 50.0));
        assert_eq!(output.height(), 70.0);
    }

    #[test]
    fn shelves_never_overlap() {
        let sizes = [
            (30.0, 12.0),
            (55.0, 40.0),
            (12.0, 70.0),
            (90.0, 5.0),
            (45.0, 45.0),
            (8.0, 8.0),
            (70.0, 22.0),
            (33.0, 61.0),
        ];
        let items: Vec<_> = sizes
            .iter()
            .enumerate()
            .map(|(index, &(w, h))| rect(&format!("item-{}", index), w, h))
            .collect();

        let output = ShelfPacker::new(100.0).pack(&items).unwrap();

        let placed: Vec<_> = items
            .iter()
            .map(|item| {
                let placement = output.placements()[item.id()];
                (placement.x, placement.y, item.width(), item.height())
            })
            .collect();

        for (i, a) in placed.iter().enumerate() {
            assert!(a.0 + a.2 <= 100.0 + EPSILON_MM);
            assert!(a.1 + a.3 <= output.height() + EPSILON_MM);

            for b in &placed[i + 1..] {
                let x_overlap = a.0 < b.0 + b.2 && b.0 < a.0 + a.2;
                let y_overlap = a.1 < b.1 + b.3 && b.1 < a.1 + a.3;
                assert!(!(x_overlap && y_overlap), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn deterministic() {
        let items: Vec<_> = (0..20)
            .map(|index| {
                let w = 10.0 + f64::from(index * 7 % 50);
                let h = 5.0 + f64::from(index * 13 % 40);
                rect(&format!("r{}", index), w, h)
            })
            .collect();

        let packer = ShelfPacker::new(120.0);

        assert_eq!(packer.pack(&items), packer.pack(&items));
    }

    #[test]
    fn empty() {
        let items: Vec<Rectangle> = Vec::new();
        let output = ShelfPacker::new(100.0).pack(&items).unwrap();

        assert!(output.placements().is_empty());
        assert_eq!(output.height(), 0.0);
        assert_eq!(output.width(), 0.0);
    }
}
