// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Region queries built on breadth-first expansion over tile neighbors.

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::hash::BuildHasher;

use hashbrown::{HashMap, HashSet};

use crate::coord::Coord;
use crate::tiles::{INVALID_TILE_ID, TileId, Tiles};
use crate::types::Aabb2D;

/// Caller-owned map from tile id to connectivity color, where `0` means
/// "not yet colored". See [`Tiles::color_map`].
pub type ConnectivityMap = HashMap<TileId, usize>;

impl<C: Coord> Tiles<C> {
    /// Breadth-first expansion from `seed` over left, right, top and bottom
    /// neighbors.
    ///
    /// `admit` decides whether a neighbor joins the frontier and is
    /// responsible for remembering it, so it must return `false` for a tile
    /// it has already admitted. `visit` sees every tile in discovery order,
    /// starting with `seed`.
    fn expand<A, V>(&self, seed: TileId, mut admit: A, mut visit: V)
    where
        A: FnMut(TileId) -> bool,
        V: FnMut(TileId),
    {
        let mut frontier = VecDeque::from([seed]);
        while let Some(tile) = frontier.pop_front() {
            visit(tile);
            for neighbor in self.neighbors(tile) {
                if admit(neighbor) {
                    frontier.push_back(neighbor);
                }
            }
        }
    }

    /// Tiles intersecting `bbox`, in breadth-first order from the tile at the
    /// center of `bbox`.
    ///
    /// The search starts from the center tile, so a box whose center lies
    /// outside the grid yields nothing even if it overlaps the grid.
    ///
    /// ```
    /// use core::num::NonZeroU16;
    /// use understory_tiles::{Aabb2D, Tiles};
    ///
    /// let tiles: Tiles =
    ///     Tiles::new(Aabb2D::new(0.0, 0.0, 4.0, 4.0), 2.0, NonZeroU16::MIN).unwrap();
    /// assert_eq!(tiles.tile_list(&Aabb2D::new(1.0, 1.0, 3.0, 3.0)), [3, 2, 1, 0]);
    /// assert_eq!(tiles.tile_list(&Aabb2D::new(0.5, 0.5, 1.5, 1.5)), [0]);
    /// ```
    pub fn tile_list(&self, bbox: &Aabb2D) -> Vec<TileId> {
        let center = bbox.center();
        let seed = self.tile_id_xy(center.x, center.y);
        if seed == INVALID_TILE_ID {
            return Vec::new();
        }

        let mut visited: HashSet<TileId> = HashSet::new();
        visited.insert(seed);
        let mut tiles = Vec::new();
        self.expand(
            seed,
            |neighbor| {
                if visited.contains(&neighbor) || !bbox.intersects(&self.tile_bounds(neighbor)) {
                    return false;
                }
                visited.insert(neighbor);
                true
            },
            |tile| tiles.push(tile),
        );
        tiles
    }

    /// Color the connected regions of a sparse set of tiles.
    ///
    /// Every key of `connectivity` whose color is `0` is colored so that two
    /// keys share a color exactly when a path of left/right/top/bottom
    /// neighbors, all of them keys, connects them. Colors start at `1` and
    /// increase by one per region in map iteration order. Tiles that are not
    /// keys are never added or colored, and keys that already carry a color
    /// are left alone and act as barriers.
    pub fn color_map<S: BuildHasher>(&self, connectivity: &mut HashMap<TileId, usize, S>) {
        let keys: Vec<TileId> = connectivity.keys().copied().collect();
        let mut color = 1;
        for tile in keys {
            match connectivity.get_mut(&tile) {
                Some(c) if *c == 0 => *c = color,
                _ => continue,
            }
            self.expand(
                tile,
                |neighbor| match connectivity.get_mut(&neighbor) {
                    Some(c) if *c == 0 => {
                        *c = color;
                        true
                    }
                    _ => false,
                },
                |_| {},
            );
            color += 1;
        }
        tracing::debug!(regions = color - 1, tiles = connectivity.len(), "colored tiles");
    }
}
