// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

use kurbo::{Point, Rect};

/// Axis-aligned bounding box in 2D.
///
/// `y` grows upward: `min_y` is the bottom edge, which is where row 0 of a
/// [`Tiles`][crate::Tiles] grid starts.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2D {
    /// Minimum x (left)
    pub min_x: f64,
    /// Minimum y (bottom)
    pub min_y: f64,
    /// Maximum x (right)
    pub max_x: f64,
    /// Maximum y (top)
    pub max_y: f64,
}

impl Aabb2D {
    /// Create a new AABB from min/max corners.
    #[inline(always)]
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Create an AABB from its lower-left corner and size.
    #[inline]
    pub fn from_xywh(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self::new(x, y, x + w, y + h)
    }

    /// Width of the box (`max_x - min_x`).
    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the box (`max_y - min_y`).
    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Center point of the box.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(
            0.5 * (self.min_x + self.max_x),
            0.5 * (self.min_y + self.max_y),
        )
    }

    /// Whether this AABB contains the point. Edges are inclusive.
    #[inline]
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.min_x <= x && self.min_y <= y && x <= self.max_x && y <= self.max_y
    }

    /// Determines whether this AABB intersects another in any way.
    ///
    /// The edge of the AABB is part of itself, so two boxes that only share
    /// an edge or a corner intersect.
    ///
    /// # Examples
    ///
    /// ```
    /// use understory_tiles::Aabb2D;
    ///
    /// let a = Aabb2D::new(0.0, 0.0, 10.0, 10.0);
    /// assert!(a.intersects(&Aabb2D::new(5.0, 5.0, 15.0, 15.0)));
    /// assert!(a.intersects(&Aabb2D::new(10.0, 0.0, 20.0, 10.0)));
    /// assert!(!a.intersects(&Aabb2D::new(11.0, 0.0, 20.0, 10.0)));
    /// ```
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    /// Return true if the AABB is empty or inverted (no area). Assumes no NaN.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.max_x <= self.min_x || self.max_y <= self.min_y
    }

    /// Whether all four edges are finite numbers.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.min_x.is_finite()
            && self.min_y.is_finite()
            && self.max_x.is_finite()
            && self.max_y.is_finite()
    }
}

impl From<Rect> for Aabb2D {
    fn from(rect: Rect) -> Self {
        let rect = rect.abs();
        Self::new(rect.x0, rect.y0, rect.x1, rect.y1)
    }
}
