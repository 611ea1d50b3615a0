// Copyright 2025 the Ductus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Closed-form intersections of lines and circles.
//!
//! All functions return `None` when there is no intersection; a returned
//! point is always a real intersection.

use crate::{Line, Point};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// Intersection of the line segments `a0..a1` and `b0..b1`.
///
/// Parallel and colinear segments (determinant within `epsilon` of zero)
/// have no intersection, and neither do segments whose supporting lines
/// cross outside either segment. End points count as part of the segment.
///
/// See [`Line::crossing`] for the unbounded variant.
///
/// ```
/// use ductus::{intersect_line_line, Point};
///
/// let p = intersect_line_line(
///     Point::new(2.0, 0.0),
///     Point::new(2.0, 3.0),
///     Point::new(1.0, 2.0),
///     Point::new(3.0, 2.0),
///     1e-10,
/// );
/// assert_eq!(p, Some(Point::new(2.0, 2.0)));
/// ```
pub fn intersect_line_line(
    a0: Point,
    a1: Point,
    b0: Point,
    b1: Point,
    epsilon: f64,
) -> Option<Point> {
    let crossing = Line::new(a0, a1).crossing(Line::new(b0, b1), epsilon)?;
    crossing
        .is_within_segments(epsilon)
        .then_some(crossing.point)
}

/// Intersection of the infinite line through `l0` and `l1` with a circle.
///
/// Returns both intersection points, which coincide when the line is a
/// tangent. Reversing the line yields the same points, possibly in the
/// other order. Returns `None` when the line misses the circle or when
/// `l0` and `l1` coincide.
///
/// See <https://mathworld.wolfram.com/Circle-LineIntersection.html>.
pub fn intersect_ray_circle(
    l0: Point,
    l1: Point,
    center: Point,
    radius: f64,
    epsilon: f64,
) -> Option<(Point, Point)> {
    let p0 = l0 - center;
    let p1 = l1 - center;
    let d = p1 - p0;
    let dr2 = d.hypot2();
    if d.is_zero(epsilon) {
        return None;
    }
    let det = p0.cross(p1);
    // Squared radius minus the squared distance of the line to the center;
    // symmetric in l0 and l1.
    let h = radius * radius - det * det / dr2;
    if h < 0.0 && h.abs() > epsilon {
        return None;
    }
    let root = (h.max(0.0) * dr2).sqrt();
    let sign = if d.y < 0.0 { -1.0 } else { 1.0 };
    let x = det * d.y / dr2;
    let y = -det * d.x / dr2;
    let dx = sign * d.x * root / dr2;
    let dy = d.y.abs() * root / dr2;
    Some((
        Point::new(center.x + x + dx, center.y + y + dy),
        Point::new(center.x + x - dx, center.y + y - dy),
    ))
}

/// Intersection of two circles.
///
/// Returns both intersection points, which coincide when the circles touch.
/// Returns `None` for disjoint circles, for a circle inside the other and
/// for concentric circles (including identical ones).
pub fn intersect_circle_circle(
    c0: Point,
    r0: f64,
    c1: Point,
    r1: f64,
    epsilon: f64,
) -> Option<(Point, Point)> {
    let d = c1 - c0;
    let dist = d.hypot();
    if dist <= epsilon || dist > r0 + r1 + epsilon || dist < (r0 - r1).abs() - epsilon {
        return None;
    }
    // Triangle of the two centers and an intersection point: `along` places
    // the chord on the center line, `across` is half the chord length (both
    // relative to the center distance).
    let dist2 = dist * dist;
    let k = r0 * r0 - r1 * r1;
    let along = 0.5 * k / dist2;
    let across = 0.5 * (2.0 * (r0 * r0 + r1 * r1) / dist2 - k * k / (dist2 * dist2) - 1.0)
        .max(0.0)
        .sqrt();
    let mid = c0.midpoint(c1) + d * along;
    let offset = d.rot90_cw() * across;
    Some((mid + offset, mid - offset))
}
