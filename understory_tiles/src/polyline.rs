// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Length and resampling of coordinate sequences.
//!
//! Both functions measure with [`Coord::distance`] and place new points with
//! [`Coord::interpolate`], so a sequence of [`LngLat`][crate::LngLat] is
//! measured and densified along great circles while a sequence of
//! [`kurbo::Point`] stays in the plane.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::coord::Coord;

/// Total length of the polyline through `line`.
///
/// Empty and single-point sequences have length zero.
pub fn length<C: Coord>(line: &[C]) -> f64 {
    line.windows(2).map(|w| w[0].distance(&w[1])).sum()
}

/// Resample `line` so that no segment is longer than `max_segment_length`.
///
/// The result always starts with the first and ends with the last coordinate
/// of `line`.
///
/// - With `preserve_vertices`, every input vertex is kept and each segment
///   longer than the maximum is split into equal pieces.
/// - Without it, only the two endpoints are kept and samples are placed every
///   `max_segment_length` along the whole polyline.
///
/// Sequences with fewer than two points, and non-positive or non-finite
/// maxima, are returned unchanged.
///
/// ```
/// use kurbo::Point;
/// use understory_tiles::polyline::resample;
///
/// let line = [Point::new(0.0, 0.0), Point::new(4.0, 0.0)];
/// let dense = resample(&line, 1.0, true);
/// assert_eq!(dense.len(), 5);
/// assert_eq!(dense[1], Point::new(1.0, 0.0));
/// ```
pub fn resample<C: Coord>(
    line: &[C],
    max_segment_length: f64,
    preserve_vertices: bool,
) -> Vec<C> {
    let (Some(&first), Some(&last)) = (line.first(), line.last()) else {
        return Vec::new();
    };
    if line.len() < 2 || !max_segment_length.is_finite() || max_segment_length <= 0.0 {
        return line.to_vec();
    }

    let mut out = Vec::with_capacity(line.len());
    out.push(first);

    if preserve_vertices {
        for w in line.windows(2) {
            let (u, v) = (w[0], w[1]);
            let d = u.distance(&v);
            if d > max_segment_length {
                let pieces = (d / max_segment_length).ceil();
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "piece counts are small positive integers stored in a float"
                )]
                let n = pieces as usize;
                for i in 1..n {
                    out.push(u.interpolate(&v, i as f64 / pieces));
                }
            }
            out.push(v);
        }
        return out;
    }

    // Distance into the current segment at which the next sample falls.
    let mut offset = max_segment_length;
    for w in line.windows(2) {
        let (u, v) = (w[0], w[1]);
        let d = u.distance(&v);
        while offset < d {
            out.push(u.interpolate(&v, offset / d));
            offset += max_segment_length;
        }
        offset -= d;
    }
    out.push(last);
    out
}
