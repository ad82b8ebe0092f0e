// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform tile grid: addressing and 4-neighbor topology.
//!
//! The grid covers a bounding box with square tiles of a fixed size. Rows
//! grow upward from `min_y` and columns grow rightward from `min_x`, and tile
//! ids are row-major: `id = row * ncolumns + col`.
//!
//! Neighbor queries wrap around in the column axis (the grid is a cylinder,
//! which suits longitudes) and saturate in the row axis: asking for the tile
//! above the top row, or below the bottom row, returns the tile itself.

use core::marker::PhantomData;
use core::num::NonZeroU16;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Point;

use crate::coord::Coord;
use crate::error::TilesError;
use crate::geo::{LngLat, WORLD_BOUNDS};
use crate::types::Aabb2D;

/// Row-major tile identifier, valid in `0..tile_count()`.
pub type TileId = i32;

/// Tile-relative, row-major subdivision identifier, valid in `0..nsubdivisions²`.
pub type SubdivisionId = u16;

/// Sentinel returned by addressing queries for coordinates outside the grid.
pub const INVALID_TILE_ID: TileId = -1;

/// Largest number of subdivisions per tile edge, so that every local id in
/// `0..n²` fits a [`SubdivisionId`].
pub const MAX_SUBDIVISIONS: u16 = 256;

/// Map a coordinate to a cell index along one axis, rounding toward -∞.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Cell indices are intentionally i32; out-of-range values are saturated."
)]
#[inline]
fn axis_index(value: f64, origin: f64, size: f64) -> i32 {
    let t = (value - origin) / size;
    let index = t as i32;

    // Round towards -∞ (the cast above has already truncated).
    if t < 0.0 && f64::from(index) > t {
        index.saturating_sub(1)
    } else {
        index
    }
}

/// Number of cells of `size` needed to cover `extent`.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Callers check the float count against the i32 range before relying on it."
)]
#[inline]
fn axis_count(extent: f64, size: f64) -> i32 {
    (extent / size).ceil() as i32
}

/// A uniform grid of square tiles, each split into `n × n` subdivisions.
///
/// `Tiles` is a small immutable value: every query borrows it, nothing
/// mutates it, and it can be copied or shared across threads freely. The
/// coordinate type `C` only decides what [`base`][Self::base] and
/// [`center`][Self::center] return and how polylines are measured.
///
/// ```
/// use core::num::NonZeroU16;
/// use understory_tiles::{Aabb2D, Tiles};
///
/// let tiles: Tiles = Tiles::new(
///     Aabb2D::new(0.0, 0.0, 4.0, 4.0),
///     2.0,
///     NonZeroU16::new(5).unwrap(),
/// )
/// .unwrap();
///
/// assert_eq!(tiles.tile_count(), 4);
/// assert_eq!(tiles.tile_id_xy(3.0, 1.0), 1);
/// assert_eq!(tiles.tile_id_xy(5.0, 1.0), -1);
/// assert_eq!(tiles.top(0), 2);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Tiles<C: Coord = Point> {
    bounds: Aabb2D,
    tile_size: f64,
    subdivision_size: f64,
    nsubdivisions: NonZeroU16,
    ncolumns: i32,
    nrows: i32,
    _coord: PhantomData<fn() -> C>,
}

impl<C: Coord> Tiles<C> {
    /// Create a tiling of `bounds` with square tiles of `tile_size`, each
    /// split into `subdivisions × subdivisions` cells.
    ///
    /// Column and row counts are `ceil(width / tile_size)` and
    /// `ceil(height / tile_size)`, so the last column and row may extend past
    /// `bounds`.
    ///
    /// # Errors
    ///
    /// - [`TilesError::InvalidTileSize`] if `tile_size` is not finite and positive.
    /// - [`TilesError::InvalidBounds`] if `bounds` is not finite or has no area.
    /// - [`TilesError::TooManyTiles`] if the tile ids would not fit a [`TileId`].
    /// - [`TilesError::TooManySubdivisions`] if `subdivisions` exceeds [`MAX_SUBDIVISIONS`].
    pub fn new(
        bounds: Aabb2D,
        tile_size: f64,
        subdivisions: NonZeroU16,
    ) -> Result<Self, TilesError> {
        if !tile_size.is_finite() || tile_size <= 0.0 {
            return Err(TilesError::InvalidTileSize(tile_size));
        }
        if !bounds.is_finite() || bounds.is_empty() {
            return Err(TilesError::InvalidBounds(bounds));
        }
        if subdivisions.get() > MAX_SUBDIVISIONS {
            return Err(TilesError::TooManySubdivisions(subdivisions.get()));
        }
        let columns = (bounds.width() / tile_size).ceil();
        let rows = (bounds.height() / tile_size).ceil();
        if columns * rows > f64::from(TileId::MAX) {
            return Err(TilesError::TooManyTiles { columns, rows });
        }

        let ncolumns = axis_count(bounds.width(), tile_size);
        let nrows = axis_count(bounds.height(), tile_size);
        tracing::debug!(
            ncolumns,
            nrows,
            tile_size,
            subdivisions = subdivisions.get(),
            "created tiling"
        );
        Ok(Self {
            bounds,
            tile_size,
            subdivision_size: tile_size / f64::from(subdivisions.get()),
            nsubdivisions: subdivisions,
            ncolumns,
            nrows,
            _coord: PhantomData,
        })
    }

    /// Bounding box of the whole tiling system.
    #[inline]
    pub fn bounds(&self) -> Aabb2D {
        self.bounds
    }

    /// Edge length of a tile. Tiles are square.
    #[inline]
    pub fn tile_size(&self) -> f64 {
        self.tile_size
    }

    /// Edge length of a subdivision.
    #[inline]
    pub fn subdivision_size(&self) -> f64 {
        self.subdivision_size
    }

    /// Number of subdivisions along each tile edge.
    #[inline]
    pub fn nsubdivisions(&self) -> u16 {
        self.nsubdivisions.get()
    }

    /// Number of tile rows.
    #[inline]
    pub fn nrows(&self) -> i32 {
        self.nrows
    }

    /// Number of tile columns.
    #[inline]
    pub fn ncolumns(&self) -> i32 {
        self.ncolumns
    }

    /// Row containing `y`, or `-1` if `y` lies outside the bounds.
    ///
    /// A `y` exactly on the top edge of the bounds belongs to the last row;
    /// everywhere else a `y` on a tile boundary belongs to the upper tile.
    pub fn row(&self, y: f64) -> i32 {
        if !(self.bounds.min_y..=self.bounds.max_y).contains(&y) {
            return INVALID_TILE_ID;
        }
        if y == self.bounds.max_y {
            return self.nrows - 1;
        }
        axis_index(y, self.bounds.min_y, self.tile_size).min(self.nrows - 1)
    }

    /// Column containing `x`, or `-1` if `x` lies outside the bounds.
    ///
    /// Boundary rules match [`row`][Self::row].
    pub fn col(&self, x: f64) -> i32 {
        if !(self.bounds.min_x..=self.bounds.max_x).contains(&x) {
            return INVALID_TILE_ID;
        }
        if x == self.bounds.max_x {
            return self.ncolumns - 1;
        }
        axis_index(x, self.bounds.min_x, self.tile_size).min(self.ncolumns - 1)
    }

    /// Tile containing `coord`, or `-1` if it lies outside the bounds.
    #[inline]
    pub fn tile_id(&self, coord: &C) -> TileId {
        self.tile_id_xy(coord.x(), coord.y())
    }

    /// Tile containing `(x, y)`, or `-1` if it lies outside the bounds.
    pub fn tile_id_xy(&self, x: f64, y: f64) -> TileId {
        let row = self.row(y);
        let col = self.col(x);
        if row == INVALID_TILE_ID || col == INVALID_TILE_ID {
            return INVALID_TILE_ID;
        }
        row * self.ncolumns + col
    }

    /// Tile at `col`, `row`. The indices are not checked.
    #[inline]
    pub fn tile_id_col_row(&self, col: i32, row: i32) -> TileId {
        row * self.ncolumns + col
    }

    /// `(row, col)` of a tile.
    #[inline]
    pub fn row_col(&self, tile_id: TileId) -> (i32, i32) {
        (tile_id / self.ncolumns, tile_id % self.ncolumns)
    }

    /// Largest tile id of a tiling of `bounds` with tiles of `tile_size`.
    ///
    /// This needs no grid; it is `columns * rows - 1`.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Counts beyond u32 saturate, matching the id range they describe."
    )]
    pub fn max_tile_id(bounds: &Aabb2D, tile_size: f64) -> u32 {
        let cols = (bounds.width() / tile_size).ceil() as u32;
        let rows = (bounds.height() / tile_size).ceil() as u32;
        cols.saturating_mul(rows).saturating_sub(1)
    }

    /// Lower-left corner of a tile.
    pub fn base(&self, tile_id: TileId) -> C {
        let (row, col) = self.row_col(tile_id);
        C::from_xy(
            self.bounds.min_x + f64::from(col) * self.tile_size,
            self.bounds.min_y + f64::from(row) * self.tile_size,
        )
    }

    /// Bounding box of a tile.
    pub fn tile_bounds(&self, tile_id: TileId) -> Aabb2D {
        let base = self.base(tile_id);
        Aabb2D::from_xywh(base.x(), base.y(), self.tile_size, self.tile_size)
    }

    /// Bounding box of the tile at `col`, `row`. The indices are not checked.
    pub fn tile_bounds_col_row(&self, col: i32, row: i32) -> Aabb2D {
        Aabb2D::from_xywh(
            self.bounds.min_x + f64::from(col) * self.tile_size,
            self.bounds.min_y + f64::from(row) * self.tile_size,
            self.tile_size,
            self.tile_size,
        )
    }

    /// Center of a tile.
    pub fn center(&self, tile_id: TileId) -> C {
        let base = self.base(tile_id);
        let half = 0.5 * self.tile_size;
        C::from_xy(base.x() + half, base.y() + half)
    }

    /// The tile `delta_rows` rows and `delta_cols` columns away from
    /// `initial`. The result is not checked.
    #[inline]
    pub fn relative_tile_id(&self, initial: TileId, delta_rows: i32, delta_cols: i32) -> TileId {
        initial + delta_rows * self.ncolumns + delta_cols
    }

    /// `(delta_rows, delta_cols)` such that
    /// `relative_tile_id(initial, delta_rows, delta_cols) == target`.
    pub fn tile_offsets(&self, initial: TileId, target: TileId) -> (i32, i32) {
        let delta_rows = target / self.ncolumns - initial / self.ncolumns;
        let delta_cols = (target - initial) - delta_rows * self.ncolumns;
        (delta_rows, delta_cols)
    }

    /// Number of tiles in the grid.
    ///
    /// Derived from the bounds height rather than the cached row count; the
    /// two agree for every grid built by [`new`][Self::new].
    #[allow(
        clippy::cast_sign_loss,
        reason = "Both factors are positive for a validated grid."
    )]
    pub fn tile_count(&self) -> u32 {
        let rows = axis_count(self.bounds.height(), self.tile_size);
        (self.ncolumns * rows) as u32
    }

    /// Neighbor to the right (east). Wraps to the first column of the row.
    pub fn right(&self, tile_id: TileId) -> TileId {
        let col = tile_id % self.ncolumns;
        if col < self.ncolumns - 1 {
            tile_id + 1
        } else {
            tile_id - self.ncolumns + 1
        }
    }

    /// Neighbor to the left (west). Wraps to the last column of the row.
    pub fn left(&self, tile_id: TileId) -> TileId {
        let col = tile_id % self.ncolumns;
        if col > 0 {
            tile_id - 1
        } else {
            tile_id + self.ncolumns - 1
        }
    }

    /// Neighbor above (north). Tiles in the top row return themselves.
    pub fn top(&self, tile_id: TileId) -> TileId {
        if i64::from(tile_id) < i64::from(self.tile_count()) - i64::from(self.ncolumns) {
            tile_id + self.ncolumns
        } else {
            tile_id
        }
    }

    /// Neighbor below (south). Tiles in the bottom row return themselves.
    pub fn bottom(&self, tile_id: TileId) -> TileId {
        if tile_id < self.ncolumns {
            tile_id
        } else {
            tile_id - self.ncolumns
        }
    }

    /// The four neighbors in expansion order: left, right, top, bottom.
    #[inline]
    pub fn neighbors(&self, tile_id: TileId) -> [TileId; 4] {
        [
            self.left(tile_id),
            self.right(tile_id),
            self.top(tile_id),
            self.bottom(tile_id),
        ]
    }

    /// Whether `b` is the top, right, bottom or left neighbor of `a`.
    ///
    /// Because rows saturate, a tile in the top or bottom row counts as its
    /// own neighbor. The relation is not symmetric in general and is not
    /// meant to be.
    pub fn are_neighbors(&self, a: TileId, b: TileId) -> bool {
        b == self.top(a) || b == self.right(a) || b == self.bottom(a) || b == self.left(a)
    }

    /// Number of subdivision columns across the whole grid.
    #[inline]
    pub(crate) fn subdivision_columns(&self) -> i64 {
        i64::from(self.ncolumns) * i64::from(self.nsubdivisions.get())
    }

    /// Number of subdivision rows across the whole grid.
    #[inline]
    pub(crate) fn subdivision_rows(&self) -> i64 {
        i64::from(self.nrows) * i64::from(self.nsubdivisions.get())
    }

    /// Continuous global subdivision coordinates of `(x, y)`.
    ///
    /// The bounds map onto `[0, ncolumns * n] × [0, nrows * n]`.
    #[inline]
    pub(crate) fn subdivision_coords(&self, x: f64, y: f64) -> Point {
        Point::new(
            (x - self.bounds.min_x) / self.bounds.width() * self.subdivision_columns() as f64,
            (y - self.bounds.min_y) / self.bounds.height() * self.subdivision_rows() as f64,
        )
    }

    /// Tile and local subdivision of an on-grid global subdivision cell.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "On-grid cells index tiles that fit TileId and subdivisions that fit u16."
    )]
    #[inline]
    pub(crate) fn locate_subdivision(&self, gx: i64, gy: i64) -> (TileId, SubdivisionId) {
        let n = i64::from(self.nsubdivisions.get());
        let tile = (gy / n) * i64::from(self.ncolumns) + gx / n;
        let subdivision = (gy % n) * n + gx % n;
        (tile as TileId, subdivision as SubdivisionId)
    }
}

impl Tiles<LngLat> {
    /// Tile the whole globe in longitude/latitude degrees.
    ///
    /// # Errors
    ///
    /// Fails like [`Tiles::new`] for an invalid `tile_size`.
    pub fn world(tile_size: f64, subdivisions: NonZeroU16) -> Result<Self, TilesError> {
        Self::new(WORLD_BOUNDS, tile_size, subdivisions)
    }
}
