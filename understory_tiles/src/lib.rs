// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Tiles: a uniform tile grid with subdivisions.
//!
//! A [`Tiles`] value partitions a rectangular region into square tiles and
//! splits every tile into `n × n` subdivisions. It answers:
//!
//! - Which tile holds a coordinate, and where a tile is ([`Tiles::tile_id`],
//!   [`Tiles::tile_bounds`], [`Tiles::center`], ...).
//! - Who a tile's neighbors are. Columns wrap around, rows saturate.
//! - Which tiles a bounding box touches ([`Tiles::tile_list`]) and how a sparse
//!   set of tiles splits into connected regions ([`Tiles::color_map`]).
//! - Which subdivisions a polyline passes through ([`Tiles::intersect`]).
//! - Which subdivisions lie closest to a coordinate, nearest first
//!   ([`Tiles::closest_first`]).
//!
//! The grid is generic over a [`Coord`] type. [`kurbo::Point`] gives a planar
//! grid; [`LngLat`] gives a longitude/latitude grid where polylines are
//! measured and densified along great circles and distances are in meters.
//!
//! Addressing never fails: a coordinate outside the grid maps to
//! [`INVALID_TILE_ID`]. Errors ([`TilesError`]) are reserved for invalid grid
//! parameters and for running a closest-first search past its last
//! subdivision.
//!
//! ## Features
//!
//! - `std` *(default)*: float math from `std`.
//! - `libm`: float math from `libm`, for `no_std` builds.
//!
//! # Example
//!
//! ```rust
//! use core::num::NonZeroU16;
//! use kurbo::Point;
//! use understory_tiles::{Aabb2D, Tiles};
//!
//! // 2 × 2 tiles of size 2, each split into 2 × 2 subdivisions.
//! let tiles: Tiles =
//!     Tiles::new(Aabb2D::new(0.0, 0.0, 4.0, 4.0), 2.0, NonZeroU16::new(2).unwrap()).unwrap();
//!
//! assert_eq!(tiles.tile_id(&Point::new(3.0, 1.0)), 1);
//! assert_eq!(tiles.neighbors(0), [1, 1, 2, 0]);
//!
//! // Every tile touched by a box, starting from the one at its center.
//! assert_eq!(tiles.tile_list(&Aabb2D::new(1.0, 1.0, 3.0, 3.0)), [3, 2, 1, 0]);
//!
//! // A horizontal line across the bottom row lights two subdivisions per tile.
//! let hit = tiles.intersect(&[Point::new(0.5, 0.5), Point::new(3.5, 0.5)]);
//! assert_eq!(hit[&0].len(), 2);
//! assert_eq!(hit[&1].len(), 2);
//!
//! // Subdivisions nearest first.
//! let nearest = tiles.closest_first(Point::new(3.5, 3.5)).next_closest().unwrap();
//! assert_eq!((nearest.tile_id, nearest.subdivision), (3, 3));
//! ```
//!
//! Tiling the globe:
//!
//! ```rust
//! use core::num::NonZeroU16;
//! use understory_tiles::{LngLat, Tiles};
//!
//! let world = Tiles::<LngLat>::world(1.0, NonZeroU16::new(4).unwrap()).unwrap();
//! assert_eq!(world.tile_count(), 360 * 180);
//! // Columns wrap across the antimeridian.
//! let west = world.tile_id(&LngLat::new(-179.5, 0.5));
//! let east = world.tile_id(&LngLat::new(179.5, 0.5));
//! assert!(world.are_neighbors(west, east));
//! ```

#![no_std]

extern crate alloc;

mod closest;
mod coord;
mod error;
pub mod geo;
pub mod polyline;
mod raster;
mod region;
mod tiles;
mod types;

pub use closest::{ClosestFirst, ClosestSubdivision};
pub use coord::Coord;
pub use error::TilesError;
pub use geo::LngLat;
pub use raster::Intersection;
pub use region::ConnectivityMap;
pub use tiles::{INVALID_TILE_ID, MAX_SUBDIVISIONS, SubdivisionId, TileId, Tiles};
pub use types::Aabb2D;
