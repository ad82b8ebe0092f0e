// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rasterizing polylines onto tile subdivisions.
//!
//! Subdivisions are treated as pixels of one large image spanning the grid.
//! Segments are walked in continuous coordinates: from the cell holding the
//! start point, each step moves one cell along x or along y, whichever puts
//! the new cell's center closer to the exact line. Every cell the line
//! crosses is marked, not just the ones a classic integer line would light.

use alloc::borrow::Cow;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Point;

use hashbrown::{HashMap, HashSet};

use crate::coord::Coord;
use crate::geo::meters_per_lng_degree;
use crate::polyline;
use crate::tiles::{SubdivisionId, TileId, Tiles};

/// Subdivisions touched by a polyline, grouped by tile.
pub type Intersection = HashMap<TileId, HashSet<SubdivisionId>>;

/// Resampling thresholds below this many meters are treated as degenerate.
const MIN_RESAMPLE_METERS: f64 = 1e-3;

/// Walk every cell the segment `p0 → p1` passes through.
///
/// `mark` is called with each cell, starting with the one holding `p0`, and
/// reports whether that cell lies outside the drawable region. The walk
/// stops early the first time it steps from an inside cell to an outside
/// one. Segments with a non-finite endpoint mark nothing.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Cell coordinates are floored floats well inside the i64 range."
)]
fn walk_cells(p0: Point, p1: Point, mut mark: impl FnMut(i64, i64) -> bool) {
    if !p0.is_finite() || !p1.is_finite() {
        tracing::trace!(?p0, ?p1, "skipped non-finite segment");
        return;
    }
    let target = Point::new(p1.x.floor(), p1.y.floor());
    let mut cell = Point::new(p0.x.floor(), p0.y.floor());
    let mut outside = mark(cell.x as i64, cell.y as i64);

    let dir = p1 - p0;
    let sx = if p0.x < p1.x { 1.0 } else { -1.0 };
    let sy = if p0.y < p1.y { 1.0 } else { -1.0 };
    // Center of the current cell.
    let mut x = cell.x + 0.5;
    let mut y = cell.y + 0.5;

    while cell != target {
        let step_x = if cell.x == target.x {
            false
        } else if cell.y == target.y {
            true
        } else {
            // Twice the area of the triangle between the line and each
            // candidate center; smaller means closer to the line.
            let tx = dir.cross(Point::new(x + sx, y) - p0).abs();
            let ty = dir.cross(Point::new(x, y + sy) - p0).abs();
            tx < ty
        };
        if step_x {
            x += sx;
        } else {
            y += sy;
        }
        cell = Point::new(x.floor(), y.floor());

        let o = mark(cell.x as i64, cell.y as i64);
        if !outside && o {
            tracing::trace!(x = cell.x, y = cell.y, "segment left the grid");
            return;
        }
        outside = o;
    }
}

impl<C: Coord> Tiles<C> {
    /// Every `(tile, subdivision)` cell the polyline through `line` passes
    /// through.
    ///
    /// A single coordinate marks the one subdivision containing it. Cells
    /// outside the grid are dropped, and a segment stops being traced once it
    /// leaves the grid.
    ///
    /// For spherical coordinates, a polyline longer than a quarter of a
    /// subdivision (in meters at the first point's latitude) is first
    /// resampled along the great circle, since straight chords between
    /// distant points stray from the geodesic.
    ///
    /// ```
    /// use core::num::NonZeroU16;
    /// use kurbo::Point;
    /// use understory_tiles::{Aabb2D, Tiles};
    ///
    /// let tiles: Tiles =
    ///     Tiles::new(Aabb2D::new(0.0, 0.0, 4.0, 4.0), 2.0, NonZeroU16::new(2).unwrap()).unwrap();
    /// let hit = tiles.intersect(&[Point::new(0.5, 0.5), Point::new(3.5, 0.5)]);
    /// assert_eq!(hit.len(), 2);
    /// assert!(hit[&0].contains(&0) && hit[&0].contains(&1));
    /// assert!(hit[&1].contains(&0) && hit[&1].contains(&1));
    /// ```
    pub fn intersect(&self, line: &[C]) -> Intersection {
        let mut intersection = Intersection::new();
        let Some(first) = line.first() else {
            return intersection;
        };

        let line = if C::is_spherical() {
            let max_meters = self.subdivision_size() * 0.25 * meters_per_lng_degree(first.y());
            if max_meters.is_finite()
                && max_meters > MIN_RESAMPLE_METERS
                && polyline::length(line) > max_meters
            {
                let resampled = polyline::resample(line, max_meters, true);
                tracing::trace!(
                    from = line.len(),
                    to = resampled.len(),
                    max_meters,
                    "resampled spherical polyline"
                );
                Cow::Owned(resampled)
            } else {
                Cow::Borrowed(line)
            }
        } else {
            Cow::Borrowed(line)
        };

        let columns = self.subdivision_columns();
        let rows = self.subdivision_rows();
        let mut mark = |x: i64, y: i64| {
            if x < 0 || y < 0 || x >= columns || y >= rows {
                return true;
            }
            let (tile, subdivision) = self.locate_subdivision(x, y);
            intersection.entry(tile).or_default().insert(subdivision);
            false
        };

        if let [only] = &*line {
            let p = self.subdivision_coords(only.x(), only.y());
            walk_cells(p, p, &mut mark);
        }
        for segment in line.windows(2) {
            let p0 = self.subdivision_coords(segment[0].x(), segment[0].y());
            let p1 = self.subdivision_coords(segment[1].x(), segment[1].y());
            walk_cells(p0, p1, &mut mark);
        }
        intersection
    }
}
