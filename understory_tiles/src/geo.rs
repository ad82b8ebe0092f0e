// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spherical (longitude/latitude) coordinates.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::coord::Coord;
use crate::types::Aabb2D;

/// Equatorial radius of the WGS84 ellipsoid, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_378_137.0;

/// Approximate length of one degree of latitude, in meters.
pub const METERS_PER_DEGREE_LAT: f64 = 110_567.0;

/// The whole globe in longitude/latitude degrees.
pub const WORLD_BOUNDS: Aabb2D = Aabb2D::new(-180.0, -90.0, 180.0, 90.0);

/// Approximate length of one degree of longitude at the given latitude, in meters.
///
/// ```
/// use understory_tiles::geo::{METERS_PER_DEGREE_LAT, meters_per_lng_degree};
///
/// assert_eq!(meters_per_lng_degree(0.0), METERS_PER_DEGREE_LAT);
/// assert!(meters_per_lng_degree(60.0) < 0.5001 * METERS_PER_DEGREE_LAT);
/// ```
#[inline]
pub fn meters_per_lng_degree(lat: f64) -> f64 {
    lat.to_radians().cos() * METERS_PER_DEGREE_LAT
}

/// A point on the sphere in degrees.
///
/// `x` is longitude and `y` is latitude. Distances are great-circle distances
/// in meters and interpolation follows the great circle.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LngLat {
    /// Longitude in degrees, positive east.
    pub lng: f64,
    /// Latitude in degrees, positive north.
    pub lat: f64,
}

impl LngLat {
    /// Create a coordinate from longitude and latitude in degrees.
    #[inline]
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    fn to_unit_vector(self) -> [f64; 3] {
        let (lng, lat) = (self.lng.to_radians(), self.lat.to_radians());
        let cos_lat = lat.cos();
        [cos_lat * lng.cos(), cos_lat * lng.sin(), lat.sin()]
    }

    fn from_unit_vector([x, y, z]: [f64; 3]) -> Self {
        let lat = z.atan2(x.hypot(y));
        let lng = y.atan2(x);
        Self::new(lng.to_degrees(), lat.to_degrees())
    }
}

impl Coord for LngLat {
    #[inline(always)]
    fn from_xy(x: f64, y: f64) -> Self {
        Self::new(x, y)
    }

    #[inline(always)]
    fn x(&self) -> f64 {
        self.lng
    }

    #[inline(always)]
    fn y(&self) -> f64 {
        self.lat
    }

    #[inline(always)]
    fn is_spherical() -> bool {
        true
    }

    #[inline]
    fn distance_squared(&self, other: &Self) -> f64 {
        let d = self.distance(other);
        d * d
    }

    /// Haversine distance in meters.
    fn distance(&self, other: &Self) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let half_dlat = 0.5 * (lat2 - lat1);
        let half_dlng = 0.5 * (other.lng - self.lng).to_radians();
        let sin_dlat = half_dlat.sin();
        let sin_dlng = half_dlng.sin();
        let a = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlng * sin_dlng;
        let a = a.clamp(0.0, 1.0);
        2.0 * EARTH_RADIUS_METERS * a.sqrt().atan2((1.0 - a).sqrt())
    }

    /// Spherical linear interpolation along the great circle.
    fn interpolate(&self, other: &Self, t: f64) -> Self {
        let a = self.to_unit_vector();
        let b = other.to_unit_vector();
        let dot = a[0] * b[0] + a[1] * b[1] + a[2] * b[2];
        let cross = [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ];
        let sin_theta =
            (cross[0] * cross[0] + cross[1] * cross[1] + cross[2] * cross[2]).sqrt();
        // Coincident or antipodal: no unique great circle.
        if sin_theta < 1e-12 {
            return Self::new(
                self.lng + (other.lng - self.lng) * t,
                self.lat + (other.lat - self.lat) * t,
            );
        }
        let theta = sin_theta.atan2(dot);
        let wa = ((1.0 - t) * theta).sin() / sin_theta;
        let wb = (t * theta).sin() / sin_theta;
        Self::from_unit_vector([
            wa * a[0] + wb * b[0],
            wa * a[1] + wb * b[1],
            wa * a[2] + wb * b[2],
        ])
    }
}
