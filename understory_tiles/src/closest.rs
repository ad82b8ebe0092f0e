// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Closest-first enumeration of subdivisions around a seed coordinate.
//!
//! The search is a best-first flood over the global subdivision grid. Each
//! discovered cell is queued with the squared distance from the seed to the
//! nearest point of the cell, so cells come out in non-decreasing distance
//! order. Discovery wraps in both axes, so every cell of the grid is
//! eventually reached and the search ends once all of them have been yielded.

use alloc::collections::BinaryHeap;
use core::cmp::{Ordering, Reverse};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use hashbrown::HashSet;

use crate::coord::Coord;
use crate::error::TilesError;
use crate::tiles::{SubdivisionId, TileId, Tiles};

/// One result of a [`ClosestFirst`] search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClosestSubdivision {
    /// Tile holding the subdivision.
    pub tile_id: TileId,
    /// Subdivision within the tile.
    pub subdivision: SubdivisionId,
    /// Squared distance from the seed to the nearest point of the
    /// subdivision, as measured by the coordinate type. `0` when the seed
    /// lies inside it.
    pub distance_squared: f64,
}

/// Queued cell, ordered by distance and then by global cell index.
#[derive(Clone, Copy, Debug)]
struct Candidate {
    distance_squared: f64,
    index: i64,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance_squared
            .total_cmp(&other.distance_squared)
            .then(self.index.cmp(&other.index))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

/// Stateful search yielding the subdivisions of a grid closest-first.
///
/// Created by [`Tiles::closest_first`]. Call [`next_closest`][Self::next_closest]
/// repeatedly, or use it as an [`Iterator`].
#[derive(Clone, Debug)]
pub struct ClosestFirst<C: Coord> {
    tiles: Tiles<C>,
    seed: C,
    columns: i64,
    rows: i64,
    queue: BinaryHeap<Reverse<Candidate>>,
    seen: HashSet<i64>,
    yielded: u64,
}

impl<C: Coord> ClosestFirst<C> {
    fn new(tiles: Tiles<C>, seed: C) -> Self {
        let columns = tiles.subdivision_columns();
        let rows = tiles.subdivision_rows();
        let mut search = Self {
            tiles,
            seed,
            columns,
            rows,
            queue: BinaryHeap::new(),
            seen: HashSet::new(),
            yielded: 0,
        };

        // Seeds off the grid start from the nearest edge cell.
        let p = tiles.subdivision_coords(seed.x(), seed.y());
        let gx = clamp_cell(p.x, columns);
        let gy = clamp_cell(p.y, rows);
        search.discover(gx, gy);
        search
    }

    /// Number of subdivisions yielded so far.
    pub fn yielded(&self) -> u64 {
        self.yielded
    }

    /// The next closest subdivision not yet yielded.
    ///
    /// Ties are broken by global cell index, so the order is deterministic.
    ///
    /// # Errors
    ///
    /// [`TilesError::SubdivisionsExhausted`] once every subdivision of the
    /// grid has been yielded. Further calls keep returning the error.
    pub fn next_closest(&mut self) -> Result<ClosestSubdivision, TilesError> {
        let Some(Reverse(candidate)) = self.queue.pop() else {
            tracing::debug!(yielded = self.yielded, "closest-first search exhausted");
            return Err(TilesError::SubdivisionsExhausted {
                yielded: self.yielded,
            });
        };

        let gx = candidate.index % self.columns;
        let gy = candidate.index / self.columns;
        let (w, h) = (self.columns, self.rows);
        // Left, right, up, down.
        for (nx, ny) in [
            ((gx + w - 1) % w, gy),
            ((gx + 1) % w, gy),
            (gx, (gy + 1) % h),
            (gx, (gy + h - 1) % h),
        ] {
            self.discover(nx, ny);
        }

        self.yielded += 1;
        let (tile_id, subdivision) = self.tiles.locate_subdivision(gx, gy);
        Ok(ClosestSubdivision {
            tile_id,
            subdivision,
            distance_squared: candidate.distance_squared,
        })
    }

    fn discover(&mut self, gx: i64, gy: i64) {
        let index = gy * self.columns + gx;
        if self.seen.insert(index) {
            let distance_squared = self.cell_distance_squared(gx, gy);
            self.queue.push(Reverse(Candidate {
                distance_squared,
                index,
            }));
        }
    }

    /// Squared distance from the seed to the nearest point of cell `(gx, gy)`.
    fn cell_distance_squared(&self, gx: i64, gy: i64) -> f64 {
        let bounds = self.tiles.bounds();
        let (w, h) = (self.columns as f64, self.rows as f64);
        let x0 = bounds.min_x + gx as f64 / w * bounds.width();
        let x1 = bounds.min_x + (gx + 1) as f64 / w * bounds.width();
        let y0 = bounds.min_y + gy as f64 / h * bounds.height();
        let y1 = bounds.min_y + (gy + 1) as f64 / h * bounds.height();
        let nearest = C::from_xy(self.seed.x().clamp(x0, x1), self.seed.y().clamp(y0, y1));
        self.seed.distance_squared(&nearest)
    }
}

/// Yields until every subdivision has been returned.
///
/// The iterator ends exactly where [`next_closest`][ClosestFirst::next_closest]
/// starts reporting [`TilesError::SubdivisionsExhausted`], but it cannot tell
/// exhaustion apart from a normal end. Use `next_closest` when that matters.
impl<C: Coord> Iterator for ClosestFirst<C> {
    type Item = ClosestSubdivision;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_closest().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let total = self.columns.saturating_mul(self.rows);
        let remaining = usize::try_from(total).unwrap_or(usize::MAX);
        let yielded = usize::try_from(self.yielded).unwrap_or(usize::MAX);
        let remaining = remaining.saturating_sub(yielded);
        (remaining, Some(remaining))
    }
}

/// Floor `v` onto a cell index in `0..n`.
#[allow(
    clippy::cast_possible_truncation,
    reason = "The float-to-int cast saturates and the result is clamped to the grid."
)]
fn clamp_cell(v: f64, n: i64) -> i64 {
    if v.is_nan() {
        return 0;
    }
    (v.floor() as i64).clamp(0, n - 1)
}

impl<C: Coord> Tiles<C> {
    /// Start a search that yields every subdivision of the grid ordered by
    /// distance from `seed`.
    ///
    /// A seed outside the grid starts from the nearest edge subdivision.
    ///
    /// ```
    /// use core::num::NonZeroU16;
    /// use kurbo::Point;
    /// use understory_tiles::{Aabb2D, Tiles};
    ///
    /// let tiles: Tiles =
    ///     Tiles::new(Aabb2D::new(0.0, 0.0, 4.0, 4.0), 2.0, NonZeroU16::new(2).unwrap()).unwrap();
    /// let mut search = tiles.closest_first(Point::new(1.5, 1.5));
    ///
    /// let first = search.next_closest().unwrap();
    /// assert_eq!((first.tile_id, first.subdivision), (0, 3));
    /// assert_eq!(first.distance_squared, 0.0);
    /// assert_eq!(search.next_closest().unwrap().distance_squared, 0.25);
    /// ```
    pub fn closest_first(&self, seed: C) -> ClosestFirst<C> {
        ClosestFirst::new(*self, seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::LngLat;
    use crate::types::Aabb2D;
    use alloc::vec::Vec;
    use core::num::NonZeroU16;
    use kurbo::Point;

    fn two_by_two() -> Tiles {
        Tiles::new(
            Aabb2D::new(0.0, 0.0, 4.0, 4.0),
            2.0,
            NonZeroU16::new(2).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn seed_cell_comes_first() {
        let mut search = two_by_two().closest_first(Point::new(1.5, 1.5));
        assert_eq!(
            search.next_closest(),
            Ok(ClosestSubdivision {
                tile_id: 0,
                subdivision: 3,
                distance_squared: 0.0,
            })
        );
    }

    #[test]
    fn adjacent_cells_tie_and_break_by_index() {
        let mut search = two_by_two().closest_first(Point::new(1.5, 1.5));
        search.next_closest().unwrap();
        let next: Vec<_> = (0..4).map(|_| search.next_closest().unwrap()).collect();
        assert!(next.iter().all(|c| c.distance_squared == 0.25));
        // Global cells 1, 4, 6 and 9.
        let located: Vec<_> = next.iter().map(|c| (c.tile_id, c.subdivision)).collect();
        assert_eq!(located, [(0, 1), (0, 2), (1, 2), (2, 1)]);
    }

    #[test]
    fn every_cell_once_in_distance_order() {
        let mut search = two_by_two().closest_first(Point::new(0.2, 3.1));
        let mut all = Vec::new();
        while let Ok(c) = search.next_closest() {
            all.push(c);
        }
        assert_eq!(all.len(), 16);
        assert_eq!(search.yielded(), 16);
        for w in all.windows(2) {
            assert!(w[0].distance_squared <= w[1].distance_squared);
        }
        let mut located: Vec<_> = all.iter().map(|c| (c.tile_id, c.subdivision)).collect();
        located.sort_unstable();
        located.dedup();
        assert_eq!(located.len(), 16);
    }

    #[test]
    fn exhaustion_is_reported_and_sticky() {
        let tiles: Tiles =
            Tiles::new(Aabb2D::new(0.0, 0.0, 1.0, 1.0), 1.0, NonZeroU16::MIN).unwrap();
        let mut search = tiles.closest_first(Point::new(0.5, 0.5));
        assert_eq!(search.next_closest().unwrap().tile_id, 0);
        assert_eq!(
            search.next_closest(),
            Err(TilesError::SubdivisionsExhausted { yielded: 1 })
        );
        assert_eq!(
            search.next_closest(),
            Err(TilesError::SubdivisionsExhausted { yielded: 1 })
        );
    }

    #[test]
    fn finest_grid_keeps_distinct_subdivision_ids() {
        let tiles: Tiles = Tiles::new(
            Aabb2D::new(0.0, 0.0, 1.0, 1.0),
            1.0,
            NonZeroU16::new(crate::MAX_SUBDIVISIONS).unwrap(),
        )
        .unwrap();
        let first = tiles
            .closest_first(Point::new(0.9999, 0.9999))
            .next_closest()
            .unwrap();
        assert_eq!((first.tile_id, first.subdivision), (0, SubdivisionId::MAX));
    }

    #[test]
    fn seed_outside_the_grid_starts_at_the_edge() {
        let mut search = two_by_two().closest_first(Point::new(-3.0, 1.5));
        let first = search.next_closest().unwrap();
        assert_eq!((first.tile_id, first.subdivision), (0, 2));
        assert_eq!(first.distance_squared, 9.0);
    }

    #[test]
    fn iterator_matches_next_closest() {
        let tiles = two_by_two();
        let seed = Point::new(3.3, 0.4);
        let mut manual = tiles.closest_first(seed);
        let iter = tiles.closest_first(seed);
        assert_eq!(iter.size_hint(), (16, Some(16)));
        for c in iter {
            assert_eq!(manual.next_closest(), Ok(c));
        }
        assert!(manual.next_closest().is_err());
    }

    #[test]
    fn spherical_seed_uses_great_circle_distance() {
        let tiles = Tiles::<LngLat>::world(1.0, NonZeroU16::MIN).unwrap();
        let mut search = tiles.closest_first(LngLat::new(0.5, 0.5));
        let first = search.next_closest().unwrap();
        assert_eq!(first.tile_id, 90 * 360 + 180);
        assert_eq!(first.distance_squared, 0.0);
        // Half a degree to the nearest neighboring cell, in meters.
        let second = search.next_closest().unwrap();
        let meters = second.distance_squared.sqrt();
        assert!((50_000.0..60_000.0).contains(&meters), "got {meters} m");
    }

    #[test]
    fn candidates_order_by_distance_then_index() {
        let near = Candidate {
            distance_squared: 1.0,
            index: 9,
        };
        let far = Candidate {
            distance_squared: 2.0,
            index: 0,
        };
        let near_later = Candidate {
            distance_squared: 1.0,
            index: 10,
        };
        assert!(near < far);
        assert!(near < near_later);
        assert_eq!(
            near,
            Candidate {
                distance_squared: 1.0,
                index: 9,
            }
        );
    }
}
