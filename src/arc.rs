// Copyright 2025 the Ductus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Elliptical arcs, in center and in endpoint form.
//!
//! An ellipse is given by its center, its radii and the rotation of its
//! x axis. A point on it is addressed by the angle θ of the unrotated,
//! unscaled circle: `center + rotate(x_rotation, (rx cos θ, ry sin θ))`.

use core::f64::consts::{FRAC_PI_2, PI, TAU};
use core::ops::Range;

use crate::common::{
    angle_between, integrate, normalize_angle, GAUSS_LEGENDRE_COEFFS_16, GAUSS_LEGENDRE_COEFFS_8,
};
use crate::{BezPath, Line, ParamCurve, ParamCurveArclen, PathEl, Point, Tolerances, Vec2};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// The largest number of segments an arc is converted into.
///
/// This bounds the work done for a vanishing tolerance.
pub const MAX_ARC_SEGMENTS: usize = 1024;

// Bisection depth bound for flattening and for measuring.
const MAX_DEPTH: usize = 16;

/// A single elliptical arc segment, in center form.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Arc {
    /// The arc's centre point.
    pub center: Point,
    /// The arc's radii, where the vector's x-component is the radius in the
    /// positive x direction after applying `x_rotation`.
    pub radii: Vec2,
    /// The start angle in radians.
    pub start_angle: f64,
    /// The angle between the start and end of the arc.
    ///
    /// Positive values sweep towards positive y. The end angle
    /// `start_angle + sweep_angle` may lie outside `[0, 2π)`.
    pub sweep_angle: f64,
    /// How much the arc is rotated, in radians.
    pub x_rotation: f64,
}

/// An elliptical arc in endpoint form, as used by SVG path data.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SvgArc {
    /// The arc's start point.
    pub from: Point,
    /// The arc's end point.
    pub to: Point,
    /// The arc's radii, where the vector's x-component is the radius in the
    /// positive x direction after applying `x_rotation`.
    pub radii: Vec2,
    /// How much the arc is rotated, in radians.
    pub x_rotation: f64,
    /// Does this arc sweep through more than π radians?
    pub large_arc: bool,
    /// Does this arc move towards positive angles?
    pub sweep: bool,
}

/// Position on the ellipse at angle `theta`.
#[inline]
pub fn ellipse_point(center: Point, radii: Vec2, x_rotation: f64, theta: f64) -> Point {
    let (sin, cos) = theta.sin_cos();
    center + Vec2::new(radii.x * cos, radii.y * sin).rotate(x_rotation)
}

/// Derivative of the ellipse with respect to the direction of travel.
///
/// With `sweep` false the arc is traversed towards negative angles, which
/// negates the derivative.
#[inline]
pub fn ellipse_deriv(radii: Vec2, x_rotation: f64, sweep: bool, theta: f64) -> Vec2 {
    let (sin, cos) = theta.sin_cos();
    let d = Vec2::new(-radii.x * sin, radii.y * cos).rotate(x_rotation);
    if sweep {
        d
    } else {
        -d
    }
}

/// Second derivative of the ellipse; independent of the direction of travel.
#[inline]
pub fn ellipse_deriv2(radii: Vec2, x_rotation: f64, theta: f64) -> Vec2 {
    let (sin, cos) = theta.sin_cos();
    Vec2::new(-radii.x * cos, -radii.y * sin).rotate(x_rotation)
}

/// Signed radius of curvature at angle `theta`.
///
/// Positive when the path turns towards positive y. NaN for a degenerate
/// ellipse, where the cross product of the derivatives is within `epsilon`
/// of zero.
pub fn ellipse_curvature_radius(radii: Vec2, sweep: bool, theta: f64, epsilon: f64) -> f64 {
    // Rotation does not change the radius of curvature.
    let d = ellipse_deriv(radii, 0.0, sweep, theta);
    let d2 = ellipse_deriv2(radii, 0.0, theta);
    let denom = d.cross(d2);
    if denom.abs() <= epsilon {
        return f64::NAN;
    }
    let r = d.hypot();
    r * r * r / denom
}

/// The normal at angle `theta`, scaled to length `d`.
///
/// As for Bézier curves, the normal is the derivative turned by
/// [`Vec2::rot90_cw`].
#[inline]
pub fn ellipse_normal(radii: Vec2, x_rotation: f64, sweep: bool, theta: f64, d: f64) -> Vec2 {
    ellipse_deriv(radii, x_rotation, sweep, theta)
        .rot90_cw()
        .with_length(d)
}

/// Length of the ellipse between the angles `theta1` and `theta2`.
///
/// The angles may be given in either order.
pub fn ellipse_length(radii: Vec2, theta1: f64, theta2: f64) -> f64 {
    arc_length(radii, theta1, theta2, 1e-9)
}

fn arc_length(radii: Vec2, theta1: f64, theta2: f64, accuracy: f64) -> f64 {
    fn rec(radii: Vec2, a: f64, b: f64, accuracy: f64, depth: usize) -> f64 {
        let speed = |theta: f64| {
            let (sin, cos) = theta.sin_cos();
            Vec2::new(radii.x * sin, radii.y * cos).hypot()
        };
        let coarse = integrate(GAUSS_LEGENDRE_COEFFS_8, a, b, speed);
        let fine = integrate(GAUSS_LEGENDRE_COEFFS_16, a, b, speed);
        if (fine - coarse).abs() <= accuracy || depth == MAX_DEPTH {
            fine
        } else {
            let mid = 0.5 * (a + b);
            rec(radii, a, mid, accuracy * 0.5, depth + 1)
                + rec(radii, mid, b, accuracy * 0.5, depth + 1)
        }
    }
    let (lo, hi) = if theta1 <= theta2 {
        (theta1, theta2)
    } else {
        (theta2, theta1)
    };
    // Quarter turns at most, so that each piece is smooth enough for the
    // quadrature.
    let n = ((hi - lo) / FRAC_PI_2).ceil().clamp(1.0, MAX_ARC_SEGMENTS as f64);
    let step = (hi - lo) / n;
    let n = n as usize;
    (0..n)
        .map(|i| {
            let a = lo + step * i as f64;
            rec(radii, a, a + step, accuracy / n as f64, 0)
        })
        .sum()
}

impl SvgArc {
    /// Whether the arc degenerates into a straight line.
    ///
    /// In this case it can be replaced by a `LineTo`. Coincident end points
    /// count as a straight line of zero length.
    pub fn is_straight_line(&self, epsilon: f64) -> bool {
        self.radii.x.abs() <= epsilon
            || self.radii.y.abs() <= epsilon
            || self.from.approx_eq(self.to, epsilon)
    }

    /// Factor by which the radii must grow for the ellipse to reach from
    /// `from` to `to`.
    ///
    /// Values at or below 1 mean the radii are large enough as they are.
    ///
    /// ```
    /// use ductus::{Point, SvgArc, Vec2};
    ///
    /// let arc = SvgArc {
    ///     from: Point::new(0.0, 0.0),
    ///     to: Point::new(1.0, 0.0),
    ///     radii: Vec2::new(0.1, 0.1),
    ///     x_rotation: 0.0,
    ///     large_arc: false,
    ///     sweep: false,
    /// };
    /// assert!((arc.radii_scale() - 5.0).abs() < 1e-12);
    /// ```
    pub fn radii_scale(&self) -> f64 {
        let p = self.half_chord();
        let rx = self.radii.x.abs();
        let ry = self.radii.y.abs();
        (p.x * p.x / (rx * rx) + p.y * p.y / (ry * ry)).sqrt()
    }

    // Half the chord, in the coordinate system of the unrotated ellipse.
    fn half_chord(&self) -> Vec2 {
        ((self.from - self.to) * 0.5).rotate(-self.x_rotation)
    }
}

impl Arc {
    /// Create a new `Arc`.
    #[inline]
    pub fn new(
        center: impl Into<Point>,
        radii: impl Into<Vec2>,
        start_angle: f64,
        sweep_angle: f64,
        x_rotation: f64,
    ) -> Self {
        Self {
            center: center.into(),
            radii: radii.into(),
            start_angle,
            sweep_angle,
            x_rotation,
        }
    }

    /// Creates an `Arc` from a `SvgArc`.
    ///
    /// Radii too small to connect the end points are scaled up uniformly,
    /// as prescribed by the SVG implementation notes. Coincident end points
    /// give an arc of zero sweep (and zero radii) at the start point.
    ///
    /// Returns `None` when a radius is zero and the end points differ; such
    /// an arc is a straight line.
    pub fn from_svg_arc(arc: &SvgArc, epsilon: f64) -> Option<Arc> {
        if arc.from.approx_eq(arc.to, epsilon) {
            return Some(Arc::new(arc.from, Vec2::ZERO, 0.0, 0.0, arc.x_rotation));
        }
        if arc.is_straight_line(epsilon) {
            return None;
        }

        let mut rx = arc.radii.x.abs();
        let mut ry = arc.radii.y.abs();
        let p = arc.half_chord();

        let scale = arc.radii_scale();
        if scale > 1.0 {
            rx *= scale;
            ry *= scale;
        }

        let rxpy = rx * p.y;
        let rypx = ry * p.x;
        let sum_of_sq = rxpy * rxpy + rypx * rypx;
        // Negative only through rounding after the radii were scaled up.
        let rxry = rx * ry;
        let sq = ((rxry * rxry - sum_of_sq) / sum_of_sq).max(0.0);
        let coef = if arc.large_arc == arc.sweep {
            -sq.sqrt()
        } else {
            sq.sqrt()
        };
        let center_p = Vec2::new(coef * rxpy / ry, -coef * rypx / rx);
        let center = arc.from.midpoint(arc.to) + center_p.rotate(arc.x_rotation);

        let u = Vec2::new((p.x - center_p.x) / rx, (p.y - center_p.y) / ry);
        let v = Vec2::new((-p.x - center_p.x) / rx, (-p.y - center_p.y) / ry);
        let start_angle = normalize_angle(u.atan2());
        let mut sweep_angle = u.cross(v).atan2(u.dot(v));
        if arc.sweep && sweep_angle < 0.0 {
            sweep_angle += TAU;
        } else if !arc.sweep && sweep_angle > 0.0 {
            sweep_angle -= TAU;
        }

        Some(Arc {
            center,
            radii: Vec2::new(rx, ry),
            start_angle,
            sweep_angle,
            x_rotation: arc.x_rotation,
        })
    }

    /// The endpoint form of this arc.
    pub fn to_svg_arc(&self) -> SvgArc {
        SvgArc {
            from: self.start(),
            to: self.end(),
            radii: self.radii,
            x_rotation: self.x_rotation,
            large_arc: self.is_large(),
            sweep: self.sweep_angle > 0.0,
        }
    }

    /// The angle at which the arc ends.
    #[inline]
    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.sweep_angle
    }

    /// Whether the arc spans more than half a turn.
    #[inline]
    pub fn is_large(&self) -> bool {
        self.sweep_angle.abs() > PI
    }

    #[inline]
    fn sweeps_positive(&self) -> bool {
        self.sweep_angle >= 0.0
    }

    /// Position on the underlying ellipse at angle `theta`.
    #[inline]
    pub fn point_at(&self, theta: f64) -> Point {
        ellipse_point(self.center, self.radii, self.x_rotation, theta)
    }

    /// Derivative at angle `theta`, oriented along the direction of travel.
    #[inline]
    pub fn deriv_at(&self, theta: f64) -> Vec2 {
        ellipse_deriv(self.radii, self.x_rotation, self.sweeps_positive(), theta)
    }

    /// Second derivative at angle `theta`.
    #[inline]
    pub fn deriv2_at(&self, theta: f64) -> Vec2 {
        ellipse_deriv2(self.radii, self.x_rotation, theta)
    }

    /// Signed radius of curvature at angle `theta`; see
    /// [`ellipse_curvature_radius`].
    #[inline]
    pub fn curvature_radius_at(&self, theta: f64, epsilon: f64) -> f64 {
        ellipse_curvature_radius(self.radii, self.sweeps_positive(), theta, epsilon)
    }

    /// The normal at angle `theta`, scaled to length `d`.
    #[inline]
    pub fn normal_at(&self, theta: f64, d: f64) -> Vec2 {
        ellipse_normal(
            self.radii,
            self.x_rotation,
            self.sweeps_positive(),
            theta,
            d,
        )
    }

    /// Split the arc at angle `theta`.
    ///
    /// `theta` is compared modulo 2π with the span of the arc. Returns
    /// `None` when it lies outside the span by more than `epsilon`.
    ///
    /// ```
    /// use ductus::{Arc, ParamCurve, Point};
    /// use std::f64::consts::{FRAC_PI_2, PI};
    ///
    /// let arc = Arc::new((0.0, 0.0), (2.0, 1.0), PI, -PI, 0.0);
    /// let (first, second) = arc.split(FRAC_PI_2, 1e-10).unwrap();
    /// assert!(first.end().approx_eq(Point::new(0.0, 1.0), 1e-12));
    /// assert!(!first.is_large() && !second.is_large());
    /// assert!(arc.split(-FRAC_PI_2, 1e-10).is_none());
    /// ```
    pub fn split(&self, theta: f64, epsilon: f64) -> Option<(Arc, Arc)> {
        let start = self.start_angle;
        let end = self.end_angle();
        if !angle_between(theta, start, end, epsilon) {
            return None;
        }
        let (lower, upper) = if start <= end {
            (start, end)
        } else {
            (end, start)
        };
        let mut theta = lower + normalize_angle(theta - lower);
        if theta > upper {
            // Within `epsilon` below the span.
            theta -= TAU;
        }
        let theta = theta.max(lower).min(upper);
        Some((
            Arc {
                sweep_angle: theta - start,
                ..*self
            },
            Arc {
                start_angle: theta,
                sweep_angle: end - theta,
                ..*self
            },
        ))
    }

    // The number of equal pieces to cut the arc into, capped.
    fn segment_count(&self, n_real: f64) -> usize {
        n_real.ceil().clamp(0.0, MAX_ARC_SEGMENTS as f64) as usize
    }

    /// Create an iterator generating Bézier path elements.
    ///
    /// The generated elements can be appended to an existing Bézier path;
    /// they start at the arc's start point, which is not emitted.
    pub fn append_iter(&self, tolerance: f64) -> ArcAppendIter {
        let scaled_err = self.radii.x.max(self.radii.y) / tolerance;
        // Number of subdivisions per ellipse based on error tolerance.
        // Note: this may slightly underestimate the error for quadrants.
        let n_err = (1.1163 * scaled_err).powf(1.0 / 6.0).max(3.999_999);
        let n = self.segment_count(n_err * self.sweep_angle.abs() * (1.0 / TAU));
        let angle_step = if n == 0 {
            0.0
        } else {
            self.sweep_angle / n as f64
        };
        // Signed like `angle_step`, so it applies to the derivative in θ.
        let arm_len = (4.0 / 3.0) * (0.25 * angle_step).tan();
        let angle0 = self.start_angle;
        let p0 = self.point_at(angle0);

        ArcAppendIter {
            idx: 0,

            arc: *self,
            n,
            arm_len,
            angle_step,

            p0,
            angle0,
        }
    }

    /// Converts an arc into a series of cubic Bézier segments.
    ///
    /// The closure is invoked with the control points and end point of
    /// each segment.
    pub fn to_cubic_beziers<P>(&self, tolerance: f64, mut p: P)
    where
        P: FnMut(Point, Point, Point),
    {
        for el in self.append_iter(tolerance) {
            if let PathEl::CurveTo(p1, p2, p3) = el {
                p(p1, p2, p3);
            }
        }
    }

    /// Create an iterator generating quadratic Bézier path elements.
    ///
    /// A quadratic deviates from a circular arc of half-angle `h` by about
    /// `r h⁴ / 8`, which determines the number of pieces. Each control point
    /// is the crossing of the tangents at the ends of its piece.
    pub fn quad_iter(&self, tolerance: f64) -> ArcQuadIter {
        let r = self.radii.x.max(self.radii.y);
        let h = (8.0 * tolerance / r).powf(0.25);
        let sweep = self.sweep_angle.abs();
        let n = self.segment_count((sweep / (2.0 * h)).max(sweep / FRAC_PI_2));
        let angle_step = if n == 0 {
            0.0
        } else {
            self.sweep_angle / n as f64
        };
        ArcQuadIter {
            idx: 0,
            arc: *self,
            n,
            angle_step,
            p0: self.start(),
            angle0: self.start_angle,
        }
    }

    /// Approximate the arc with lines.
    ///
    /// The closure receives the end point of each line; the arc's start
    /// point is not reported. No point of the arc is farther than
    /// `tolerance` from the polyline.
    pub fn flatten(&self, tolerance: f64, mut callback: impl FnMut(Point)) {
        fn rec(
            arc: &Arc,
            a: f64,
            b: f64,
            tolerance: f64,
            depth: usize,
            callback: &mut impl FnMut(Point),
        ) {
            let mid = 0.5 * (a + b);
            let pa = arc.point_at(a);
            let pb = arc.point_at(b);
            if depth == MAX_DEPTH || arc.point_at(mid).distance(pa.midpoint(pb)) <= tolerance {
                callback(pb);
            } else {
                rec(arc, a, mid, tolerance, depth + 1, callback);
                rec(arc, mid, b, tolerance, depth + 1, callback);
            }
        }
        let n = self.segment_count(self.sweep_angle.abs() / FRAC_PI_2).max(1);
        let step = self.sweep_angle / n as f64;
        for i in 0..n {
            let a = self.start_angle + step * i as f64;
            rec(self, a, a + step, tolerance, 0, &mut callback);
        }
    }
}

impl ParamCurve for Arc {
    /// The point at the fraction `t` of the sweep.
    #[inline]
    fn eval(&self, t: f64) -> Point {
        self.point_at(self.start_angle + t * self.sweep_angle)
    }

    fn subsegment(&self, range: Range<f64>) -> Arc {
        Arc {
            start_angle: self.start_angle + range.start * self.sweep_angle,
            sweep_angle: (range.end - range.start) * self.sweep_angle,
            ..*self
        }
    }

    #[inline]
    fn start(&self) -> Point {
        self.point_at(self.start_angle)
    }

    #[inline]
    fn end(&self) -> Point {
        self.point_at(self.end_angle())
    }
}

impl ParamCurveArclen for Arc {
    /// Arc length, by adaptive Gauss-Legendre quadrature.
    fn arclen(&self, accuracy: f64) -> f64 {
        arc_length(self.radii, self.start_angle, self.end_angle(), accuracy)
    }
}

/// Iterator over the cubic Bézier elements approximating an [`Arc`].
///
/// Created by [`Arc::append_iter`].
#[derive(Debug)]
pub struct ArcAppendIter {
    idx: usize,

    arc: Arc,
    n: usize,
    arm_len: f64,
    angle_step: f64,

    p0: Point,
    angle0: f64,
}

impl Iterator for ArcAppendIter {
    type Item = PathEl;

    fn next(&mut self) -> Option<Self::Item> {
        if self.idx >= self.n {
            return None;
        }

        let angle1 = self.angle0 + self.angle_step;
        let radii = self.arc.radii;
        let rot = self.arc.x_rotation;
        let p0 = self.p0;
        let p1 = p0 + self.arm_len * ellipse_deriv(radii, rot, true, self.angle0);
        let p3 = self.arc.point_at(angle1);
        let p2 = p3 - self.arm_len * ellipse_deriv(radii, rot, true, angle1);

        self.angle0 = angle1;
        self.p0 = p3;
        self.idx += 1;

        Some(PathEl::CurveTo(p1, p2, p3))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.n - self.idx;
        (remaining, Some(remaining))
    }
}

/// Iterator over the quadratic Bézier elements approximating an [`Arc`].
///
/// Created by [`Arc::quad_iter`].
#[derive(Debug)]
pub struct ArcQuadIter {
    idx: usize,
    arc: Arc,
    n: usize,
    angle_step: f64,
    p0: Point,
    angle0: f64,
}

impl Iterator for ArcQuadIter {
    type Item = PathEl;

    fn next(&mut self) -> Option<Self::Item> {
        if self.idx >= self.n {
            return None;
        }
        let angle1 = self.angle0 + self.angle_step;
        let p0 = self.p0;
        let p2 = self.arc.point_at(angle1);
        let t0 = Line::new(p0, p0 + self.arc.deriv_at(self.angle0));
        let t1 = Line::new(p2, p2 + self.arc.deriv_at(angle1));
        // Pieces span at most a quarter turn, so the tangents only fail to
        // cross when the piece vanishes.
        let p1 = t0
            .crossing(t1, 1e-12)
            .map_or(p0.midpoint(p2), |crossing| crossing.point);

        self.angle0 = angle1;
        self.p0 = p2;
        self.idx += 1;

        Some(PathEl::QuadTo(p1, p2))
    }
}

/// Convert an arc in endpoint form into cubic Béziers.
///
/// The result starts with a `MoveTo` to `arc.from`. An arc that is a straight
/// line becomes a single `LineTo`.
///
/// ```
/// use ductus::{arc_to_cubic, Point, SvgArc, Tolerances, Vec2};
///
/// let arc = SvgArc {
///     from: Point::new(0.0, 0.0),
///     to: Point::new(200.0, 0.0),
///     radii: Vec2::new(100.0, 100.0),
///     x_rotation: 0.0,
///     large_arc: false,
///     sweep: false,
/// };
/// let path = arc_to_cubic(&arc, Tolerances::default());
/// // A move and three cubics for the half circle.
/// assert_eq!(path.elements().len(), 1 + 3);
/// ```
pub fn arc_to_cubic(arc: &SvgArc, tol: Tolerances) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(arc.from);
    match Arc::from_svg_arc(arc, tol.epsilon) {
        Some(a) => path.extend(a.append_iter(tol.tolerance)),
        None => path.line_to(arc.to),
    }
    path
}

/// Convert an arc in endpoint form into quadratic Béziers.
///
/// See [`arc_to_cubic`] for the shape of the result.
pub fn arc_to_quad(arc: &SvgArc, tol: Tolerances) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(arc.from);
    match Arc::from_svg_arc(arc, tol.epsilon) {
        Some(a) => path.extend(a.quad_iter(tol.tolerance)),
        None => path.line_to(arc.to),
    }
    path
}

/// Approximate an arc in endpoint form with lines.
///
/// See [`arc_to_cubic`] for the shape of the result.
pub fn flatten_arc(arc: &SvgArc, tol: Tolerances) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(arc.from);
    match Arc::from_svg_arc(arc, tol.epsilon) {
        Some(a) => a.flatten(tol.tolerance, |p| path.line_to(p)),
        None => path.line_to(arc.to),
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::FRAC_PI_4;

    const EPS: f64 = 1e-10;

    fn assert_near(p: Point, q: Point, epsilon: f64) {
        assert!(p.approx_eq(q, epsilon), "{p:?} != {q:?}");
    }

    fn assert_vec_near(v: Vec2, w: Vec2) {
        assert!(v.approx_eq(w, 1e-9), "{v:?} != {w:?}");
    }

    fn svg_arc(
        from: (f64, f64),
        to: (f64, f64),
        radii: (f64, f64),
        x_rotation: f64,
        large_arc: bool,
        sweep: bool,
    ) -> SvgArc {
        SvgArc {
            from: from.into(),
            to: to.into(),
            radii: radii.into(),
            x_rotation,
            large_arc,
            sweep,
        }
    }

    fn el_points(el: &PathEl) -> Vec<Point> {
        match *el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => vec![p],
            PathEl::QuadTo(p1, p2) => vec![p1, p2],
            PathEl::CurveTo(p1, p2, p3) => vec![p1, p2, p3],
            PathEl::ClosePath => vec![],
        }
    }

    fn assert_els_near(actual: &BezPath, expected: &[PathEl]) {
        let els = actual.elements();
        assert_eq!(els.len(), expected.len(), "{els:?}");
        for (a, e) in els.iter().zip(expected) {
            let (a, e) = (el_points(a), el_points(e));
            assert_eq!(a.len(), e.len(), "{els:?}");
            for (p, q) in a.iter().zip(e) {
                assert_near(*p, q, 1e-3);
            }
        }
    }

    #[test]
    fn ellipse_evaluation() {
        let radii = Vec2::new(2.0, 1.0);
        let p = ellipse_point(Point::new(1.0, 0.5), radii, FRAC_PI_2, 0.0);
        assert_near(p, Point::new(1.0, 2.5), 1e-12);
        assert_vec_near(ellipse_deriv(radii, FRAC_PI_2, true, 0.0), Vec2::new(-1.0, 0.0));
        assert_vec_near(ellipse_deriv(radii, FRAC_PI_2, false, 0.0), Vec2::new(1.0, 0.0));
        assert_vec_near(ellipse_deriv2(radii, FRAC_PI_2, 0.0), Vec2::new(0.0, -2.0));
        assert_vec_near(
            ellipse_normal(radii, FRAC_PI_2, true, 0.0, 1.0),
            Vec2::new(0.0, 1.0),
        );
        assert_vec_near(
            ellipse_normal(radii, FRAC_PI_2, false, 0.0, 1.0),
            Vec2::new(0.0, -1.0),
        );
    }

    #[test]
    fn ellipse_curvature() {
        let radii = Vec2::new(2.0, 1.0);
        assert!((ellipse_curvature_radius(radii, true, 0.0, EPS) - 0.5).abs() < 1e-12);
        assert!((ellipse_curvature_radius(radii, false, 0.0, EPS) + 0.5).abs() < 1e-12);
        assert!((ellipse_curvature_radius(radii, true, FRAC_PI_2, EPS) - 4.0).abs() < 1e-12);
        let flat = Vec2::new(2.0, 0.0);
        assert!(ellipse_curvature_radius(flat, true, 0.0, EPS).is_nan());
    }

    #[test]
    fn ellipse_lengths() {
        let radii = Vec2::new(2.0, 1.0);
        assert!((ellipse_length(radii, 0.0, FRAC_PI_2) - 2.422110).abs() < 1e-5);
        assert!((ellipse_length(radii, FRAC_PI_2, 0.0) - 2.422110).abs() < 1e-5);
        let circle = Vec2::new(3.0, 3.0);
        assert!((ellipse_length(circle, -1.0, 5.0) - 18.0).abs() < 1e-9);
        let arc = Arc::new((0.0, 0.0), radii, 0.0, -TAU, 0.3);
        assert!((arc.arclen(1e-9) - 4.0 * 2.422110).abs() < 1e-4);
    }

    #[test]
    fn radii_scale() {
        let arc = svg_arc((0.0, 0.0), (1.0, 0.0), (0.1, 0.1), 0.0, false, false);
        assert!((arc.radii_scale() - 5.0).abs() < 1e-12);
        let arc = svg_arc((0.0, 0.0), (2.0, 2.0), (2.0, 2.0), 0.0, false, false);
        assert!(arc.radii_scale() < 1.0);
    }

    fn check_center(arc: SvgArc, center: (f64, f64), theta0: f64, theta1: f64) {
        let a = Arc::from_svg_arc(&arc, EPS).unwrap();
        assert_near(a.center, center.into(), 1e-9);
        assert!((a.start_angle - theta0).abs() < 1e-9, "{a:?}");
        assert!((a.end_angle() - theta1).abs() < 1e-9, "{a:?}");
        // Both end points lie on the ellipse.
        assert_near(a.start(), arc.from, 1e-9);
        assert_near(a.end(), arc.to, 1e-9);
    }

    #[test]
    fn svg_arc_to_center() {
        let (f, t) = (false, true);
        check_center(
            svg_arc((0.0, 0.0), (2.0, 2.0), (2.0, 2.0), 0.0, f, f),
            (2.0, 0.0),
            PI,
            FRAC_PI_2,
        );
        check_center(
            svg_arc((0.0, 0.0), (2.0, 2.0), (2.0, 2.0), 0.0, t, f),
            (0.0, 2.0),
            1.5 * PI,
            0.0,
        );
        check_center(
            svg_arc((0.0, 0.0), (2.0, 2.0), (2.0, 2.0), 0.0, t, t),
            (2.0, 0.0),
            PI,
            2.5 * PI,
        );
        check_center(
            svg_arc((0.0, 0.0), (1.0, 2.0), (2.0, 1.0), FRAC_PI_2, f, f),
            (1.0, 0.0),
            FRAC_PI_2,
            0.0,
        );
        // Radii too small, scaled up to 0.5.
        let arc = svg_arc((0.0, 0.0), (1.0, 0.0), (0.1, 0.1), 0.0, f, f);
        check_center(arc, (0.5, 0.0), PI, 0.0);
        let a = Arc::from_svg_arc(&arc, EPS).unwrap();
        assert_vec_near(a.radii, Vec2::new(0.5, 0.5));
    }

    #[test]
    fn svg_arc_degenerate() {
        let arc = svg_arc((1.0, 1.0), (1.0, 1.0), (2.0, 2.0), 0.0, false, false);
        let a = Arc::from_svg_arc(&arc, EPS).unwrap();
        assert_eq!(a.sweep_angle, 0.0);
        assert_near(a.start(), Point::new(1.0, 1.0), 1e-12);
        assert_near(a.end(), Point::new(1.0, 1.0), 1e-12);

        let arc = svg_arc((0.0, 0.0), (1.0, 0.0), (0.0, 2.0), 0.0, false, false);
        assert!(Arc::from_svg_arc(&arc, EPS).is_none());
        let path = arc_to_cubic(&arc, Tolerances::default());
        assert_eq!(
            path.elements(),
            &[
                PathEl::MoveTo(Point::new(0.0, 0.0)),
                PathEl::LineTo(Point::new(1.0, 0.0))
            ]
        );
    }

    #[test]
    fn svg_arc_round_trip() {
        let arc = svg_arc((3.0, -1.0), (0.5, 2.0), (4.0, 2.5), 0.7, true, false);
        let a = Arc::from_svg_arc(&arc, EPS).unwrap();
        let back = a.to_svg_arc();
        assert_near(back.from, arc.from, 1e-9);
        assert_near(back.to, arc.to, 1e-9);
        assert_eq!(back.large_arc, arc.large_arc);
        assert_eq!(back.sweep, arc.sweep);
    }

    #[test]
    fn arc_split() {
        let arc = Arc::new((0.0, 0.0), (2.0, 1.0), PI, -PI, 0.0);
        let (a, b) = arc.split(FRAC_PI_2, EPS).unwrap();
        assert_near(a.end(), Point::new(0.0, 1.0), 1e-12);
        assert_near(b.start(), Point::new(0.0, 1.0), 1e-12);
        assert!(!a.is_large() && !b.is_large());
        assert!(arc.split(-FRAC_PI_2, EPS).is_none());

        let arc = Arc::new((0.0, 0.0), (2.0, 1.0), 0.0, 7.0 * FRAC_PI_4, 0.0);
        let (a, b) = arc.split(FRAC_PI_2, EPS).unwrap();
        assert_near(a.end(), Point::new(0.0, 1.0), 1e-12);
        assert!(!a.is_large() && b.is_large());
        let (a, b) = arc.split(3.0 * FRAC_PI_2, EPS).unwrap();
        assert_near(a.end(), Point::new(0.0, -1.0), 1e-12);
        assert!(a.is_large() && !b.is_large());
        // Angles are taken modulo 2π.
        let (a, _) = arc.split(FRAC_PI_2 + TAU, EPS).unwrap();
        assert!((a.sweep_angle - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn arc_to_cubic_semicircle() {
        let arc = svg_arc((0.0, 0.0), (200.0, 0.0), (100.0, 100.0), 0.0, false, false);
        let path = arc_to_cubic(&arc, Tolerances::default().with_tolerance(1.0));
        let expected =
            BezPath::from_svg("M0 0C0 55.228 44.772 100 100 100C155.228 100 200 55.228 200 0")
                .unwrap();
        assert_els_near(&path, expected.elements());
    }

    #[test]
    fn arc_to_cubic_accuracy() {
        let a = Arc::new((1.0, 2.0), (30.0, 10.0), 0.4, 4.0, 0.3);
        for tolerance in [1.0, 0.1, 0.001] {
            let mut p0 = a.start();
            a.to_cubic_beziers(tolerance, |p1, p2, p3| {
                let c = crate::CubicBez::new(p0, p1, p2, p3);
                for i in 0..=8 {
                    let p = c.eval(f64::from(i) / 8.0);
                    // Distance to the ellipse, measured in the ellipse's frame.
                    let local = (p - a.center).rotate(-a.x_rotation);
                    let theta = Vec2::new(local.x / a.radii.x, local.y / a.radii.y).atan2();
                    let on = a.point_at(theta);
                    assert!(p.distance(on) < 2.0 * tolerance);
                }
                p0 = p3;
            });
            assert_near(p0, a.end(), 1e-9);
        }
    }

    #[test]
    fn arc_to_quad_semicircle() {
        let arc = svg_arc((0.0, 0.0), (200.0, 0.0), (100.0, 100.0), 0.0, false, false);
        // The quad count follows the tolerance. At 10 the quarter-turn cap
        // is what splits the half circle, giving one quad per quarter.
        let path = arc_to_quad(&arc, Tolerances::default().with_tolerance(10.0));
        let expected = BezPath::from_svg("M0 0Q0 100 100 100Q200 100 200 0").unwrap();
        assert_els_near(&path, expected.elements());

        let fine = arc_to_quad(&arc, Tolerances::default());
        assert!(fine.elements().len() > 3);
        assert_near(fine.current_position().unwrap(), Point::new(200.0, 0.0), 1e-9);
    }

    #[test]
    fn arc_flatten() {
        let arc = svg_arc((0.0, 0.0), (200.0, 0.0), (100.0, 100.0), 0.0, true, true);
        let tol = Tolerances::default().with_tolerance(0.5);
        let path = flatten_arc(&arc, tol);
        let center = Point::new(100.0, 0.0);
        let mut last = Point::new(0.0, 0.0);
        for el in &path.elements()[1..] {
            let PathEl::LineTo(p) = *el else {
                panic!("unexpected element {el:?}");
            };
            assert!((p.distance(center) - 100.0).abs() < 1e-9);
            // Sagitta of the chord.
            let half = 0.5 * p.distance(last);
            let sagitta = 100.0 - (100.0 * 100.0 - half * half).sqrt();
            assert!(sagitta <= 0.5 + 1e-9);
            last = p;
        }
        assert_near(last, Point::new(200.0, 0.0), 1e-9);
    }
}
