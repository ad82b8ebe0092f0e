// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by the tiling system.
//!
//! Addressing queries never fail: a coordinate outside the grid yields
//! [`INVALID_TILE_ID`][crate::INVALID_TILE_ID]. Errors are reserved for
//! rejecting a grid at construction and for a closest-first search that has
//! run out of subdivisions.

use crate::types::Aabb2D;

/// Errors produced by [`Tiles`][crate::Tiles] and [`ClosestFirst`][crate::ClosestFirst].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum TilesError {
    /// The tile size must be finite and strictly positive.
    #[error("tile size must be finite and strictly positive, got {0}")]
    InvalidTileSize(f64),

    /// The bounds must be finite and enclose a non-zero area.
    #[error("tiling bounds must be finite and non-empty, got {0:?}")]
    InvalidBounds(Aabb2D),

    /// The bounds hold more tiles than a [`TileId`][crate::TileId] can address.
    #[error("a grid of {columns} x {rows} tiles overflows the tile id range")]
    TooManyTiles {
        /// Column count implied by the bounds and tile size.
        columns: f64,
        /// Row count implied by the bounds and tile size.
        rows: f64,
    },

    /// Local subdivision ids would not fit a [`SubdivisionId`][crate::SubdivisionId].
    #[error("at most {max} subdivisions per tile edge are supported, got {0}", max = crate::MAX_SUBDIVISIONS)]
    TooManySubdivisions(u16),

    /// A closest-first search has yielded every subdivision of the grid.
    ///
    /// The search space is the whole (wrapping) grid, so reaching this means
    /// the caller asked for more subdivisions than exist.
    #[error("subdivisions were exhausted after {yielded} results")]
    SubdivisionsExhausted {
        /// Number of subdivisions the search yielded before running dry.
        yielded: u64,
    },
}
