// Copyright 2025 the Ductus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadratic Bézier segments.

use core::ops::Range;

use arrayvec::ArrayVec;

use crate::{
    CubicBez, Line, ParamCurve, ParamCurveArclen, ParamCurveCurvature, ParamCurveDeriv,
    ParamCurveExtrema, Point, Vec2, MAX_EXTREMA,
};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// A single quadratic Bézier segment.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs, reason = "the control points are self-explanatory")]
pub struct QuadBez {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
}

impl QuadBez {
    /// Create a new quadratic Bézier segment.
    #[inline]
    pub fn new<V: Into<Point>>(p0: V, p1: V, p2: V) -> QuadBez {
        QuadBez {
            p0: p0.into(),
            p1: p1.into(),
            p2: p2.into(),
        }
    }

    /// Raise the order by 1.
    ///
    /// Returns a cubic Bézier segment that exactly represents this quadratic.
    ///
    /// ```
    /// use ductus::{Point, QuadBez};
    ///
    /// let c = QuadBez::new((0.0, 0.0), (1.5, 0.0), (3.0, 0.0)).raise();
    /// assert_eq!(c.p1, Point::new(1.0, 0.0));
    /// assert_eq!(c.p2, Point::new(2.0, 0.0));
    /// ```
    #[inline]
    pub fn raise(&self) -> CubicBez {
        CubicBez::new(
            self.p0,
            self.p0 + (2.0 / 3.0) * (self.p1 - self.p0),
            self.p2 + (2.0 / 3.0) * (self.p1 - self.p2),
            self.p2,
        )
    }

    /// Split at parameter `t` with de Casteljau's algorithm.
    ///
    /// The two halves meet exactly at `self.eval(t)`.
    #[inline]
    pub fn split(&self, t: f64) -> (QuadBez, QuadBez) {
        let a = self.p0.lerp(self.p1, t);
        let b = self.p1.lerp(self.p2, t);
        let m = a.lerp(b, t);
        (QuadBez::new(self.p0, a, m), QuadBez::new(m, b, self.p2))
    }

    /// The normal at `t`, scaled to length `d`.
    ///
    /// The normal is the derivative turned by [`Vec2::rot90_cw`]. See
    /// [`CubicBez::normal`] for the treatment of vanishing derivatives.
    #[inline]
    pub fn normal(&self, t: f64, d: f64, epsilon: f64) -> Vec2 {
        self.raise().normal(t, d, epsilon)
    }
}

impl ParamCurve for QuadBez {
    #[inline]
    fn eval(&self, t: f64) -> Point {
        let mt = 1.0 - t;
        (self.p0.to_vec2() * (mt * mt)
            + (self.p1.to_vec2() * (mt * 2.0) + self.p2.to_vec2() * t) * t)
            .to_point()
    }

    fn subsegment(&self, range: Range<f64>) -> QuadBez {
        let (t0, t1) = (range.start, range.end);
        let p0 = self.eval(t0);
        let p2 = self.eval(t1);
        let p1 = p0 + (self.p1 - self.p0).lerp(self.p2 - self.p1, t0) * (t1 - t0);
        QuadBez { p0, p1, p2 }
    }

    /// Subdivide into halves, using de Casteljau.
    #[inline]
    fn subdivide(&self) -> (QuadBez, QuadBez) {
        self.split(0.5)
    }

    #[inline(always)]
    fn start(&self) -> Point {
        self.p0
    }

    #[inline(always)]
    fn end(&self) -> Point {
        self.p2
    }
}

impl ParamCurveDeriv for QuadBez {
    type DerivResult = Line;

    #[inline]
    fn deriv(&self) -> Line {
        Line::new(
            (2.0 * (self.p1 - self.p0)).to_point(),
            (2.0 * (self.p2 - self.p1)).to_point(),
        )
    }
}

impl ParamCurveArclen for QuadBez {
    /// Arclength of a quadratic Bézier segment.
    ///
    /// This is computed in closed form, so `accuracy` is unused. Straight
    /// and backtracking curves are handled.
    fn arclen(&self, _accuracy: f64) -> f64 {
        // The speed is 2 |d0 + t dd|; integrate sqrt(a t² + 2 b t + c).
        let d0 = self.p1 - self.p0;
        let d1 = self.p2 - self.p1;
        let dd = d1 - d0;
        let a = dd.hypot2();
        let c = d0.hypot2();
        if a <= 1e-12 * c.max(d1.hypot2()) {
            // Uniform speed along a line.
            return (self.p2 - self.p0).hypot();
        }
        let b = d0.dot(dd);
        // With u = t + b/a the integrand becomes sqrt(a) sqrt(u² + k).
        let k = (c / a - (b / a) * (b / a)).max(0.0);
        let antideriv = |u: f64| {
            if k > 0.0 {
                let s = (u * u + k).sqrt();
                0.5 * (u * s + k * (u / k.sqrt()).asinh())
            } else {
                // Colinear control points.
                0.5 * u * u.abs()
            }
        };
        let u0 = b / a;
        let u1 = 1.0 + u0;
        2.0 * a.sqrt() * (antideriv(u1) - antideriv(u0))
    }
}

impl ParamCurveCurvature for QuadBez {}

impl ParamCurveExtrema for QuadBez {
    fn extrema(&self) -> ArrayVec<f64, MAX_EXTREMA> {
        let mut result = ArrayVec::new();
        let d0 = self.p1 - self.p0;
        let d1 = self.p2 - self.p1;
        let dd = d1 - d0;
        if dd.x != 0.0 {
            let t = -d0.x / dd.x;
            if t > 0.0 && t < 1.0 {
                result.push(t);
            }
        }
        if dd.y != 0.0 {
            let t = -d0.y / dd.y;
            if t > 0.0 && t < 1.0 {
                result.push(t);
                if result.len() == 2 && result[0] > t {
                    result.swap(0, 1);
                }
            }
        }
        result
    }
}
