// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate abstraction shared by every grid operation.

use core::fmt::Debug;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Point;

/// A 2D coordinate that a [`Tiles`][crate::Tiles] grid can address.
///
/// Implementations decide what "distance" means. Planar coordinates use
/// Euclidean distance in their own units; spherical coordinates (see
/// [`LngLat`][crate::LngLat]) measure along the great circle in meters and
/// report [`is_spherical`][Coord::is_spherical] so the rasterizer knows to
/// resample long chords.
pub trait Coord: Copy + Debug {
    /// Build a coordinate from its `x` and `y` components.
    fn from_xy(x: f64, y: f64) -> Self;

    /// Horizontal component (longitude for spherical coordinates).
    fn x(&self) -> f64;

    /// Vertical component (latitude for spherical coordinates).
    fn y(&self) -> f64;

    /// Whether straight segments between two coordinates are geodesics on a
    /// sphere rather than lines in the plane.
    #[inline]
    fn is_spherical() -> bool {
        false
    }

    /// Squared distance to `other`.
    fn distance_squared(&self, other: &Self) -> f64;

    /// Distance to `other`.
    #[inline]
    fn distance(&self, other: &Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// The coordinate a fraction `t` of the way from `self` to `other`.
    ///
    /// `t = 0` is `self` and `t = 1` is `other`. The default interpolates
    /// linearly in `x` and `y`.
    #[inline]
    fn interpolate(&self, other: &Self, t: f64) -> Self {
        Self::from_xy(
            self.x() + (other.x() - self.x()) * t,
            self.y() + (other.y() - self.y()) * t,
        )
    }
}

impl Coord for Point {
    #[inline(always)]
    fn from_xy(x: f64, y: f64) -> Self {
        Self::new(x, y)
    }

    #[inline(always)]
    fn x(&self) -> f64 {
        self.x
    }

    #[inline(always)]
    fn y(&self) -> f64 {
        self.y
    }

    #[inline]
    fn distance_squared(&self, other: &Self) -> f64 {
        (*self - *other).hypot2()
    }

    #[inline]
    fn interpolate(&self, other: &Self, t: f64) -> Self {
        self.lerp(*other, t)
    }
}
