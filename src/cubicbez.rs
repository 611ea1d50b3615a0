// Copyright 2025 the Ductus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cubic Bézier segments.

use core::ops::Range;

use arrayvec::ArrayVec;

use crate::common::solve_quadratic;
use crate::{
    ParamCurve, ParamCurveArclen, ParamCurveCurvature, ParamCurveDeriv, ParamCurveExtrema, Point,
    QuadBez, Vec2, MAX_EXTREMA,
};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// A single cubic Bézier segment.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs, reason = "the control points are self-explanatory")]
pub struct CubicBez {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

impl CubicBez {
    /// Create a new cubic Bézier segment.
    #[inline]
    pub fn new<P: Into<Point>>(p0: P, p1: P, p2: P, p3: P) -> CubicBez {
        CubicBez {
            p0: p0.into(),
            p1: p1.into(),
            p2: p2.into(),
            p3: p3.into(),
        }
    }

    /// Returns a cubic Bézier segment that traverses the same points in the
    /// opposite direction.
    #[must_use]
    #[inline]
    pub fn reverse(&self) -> CubicBez {
        CubicBez::new(self.p3, self.p2, self.p1, self.p0)
    }

    /// Split at parameter `t` with de Casteljau's algorithm.
    ///
    /// Re-joining the two halves reproduces the curve exactly; the shared
    /// point is `self.eval(t)`.
    ///
    /// ```
    /// use ductus::{CubicBez, ParamCurve};
    ///
    /// let c = CubicBez::new((0.0, 0.0), (1.0, 2.0), (3.0, 2.0), (4.0, 0.0));
    /// let (a, b) = c.split(0.25);
    /// assert_eq!(a.p3, b.p0);
    /// assert!((a.p3 - c.eval(0.25)).hypot() < 1e-12);
    /// ```
    #[inline]
    pub fn split(&self, t: f64) -> (CubicBez, CubicBez) {
        let p01 = self.p0.lerp(self.p1, t);
        let p12 = self.p1.lerp(self.p2, t);
        let p23 = self.p2.lerp(self.p3, t);
        let p012 = p01.lerp(p12, t);
        let p123 = p12.lerp(p23, t);
        let m = p012.lerp(p123, t);
        (
            CubicBez::new(self.p0, p01, p012, m),
            CubicBez::new(m, p123, p23, self.p3),
        )
    }

    /// The second derivative at parameter `t`.
    #[inline]
    pub fn deriv2(&self, t: f64) -> Vec2 {
        let a = self.p2.to_vec2() - 2.0 * self.p1.to_vec2() + self.p0.to_vec2();
        let b = self.p3.to_vec2() - 2.0 * self.p2.to_vec2() + self.p1.to_vec2();
        6.0 * a.lerp(b, t)
    }

    /// The normal at `t`, scaled to length `d`.
    ///
    /// The normal is the derivative turned by [`Vec2::rot90_cw`], so a
    /// positive `d` points to the right of the direction of travel in a
    /// y-up coordinate system.
    ///
    /// Where the derivative vanishes, the direction the curve leaves the
    /// point in is used instead. At the end points that is the first
    /// control point not coincident (within `epsilon`) with the end point;
    /// in the interior it is the first non-vanishing higher derivative.
    /// The zero vector is returned only when all control points coincide.
    pub fn normal(&self, t: f64, d: f64, epsilon: f64) -> Vec2 {
        let dir = if t == 0.0 {
            self.start_tangent(epsilon)
        } else if t == 1.0 {
            self.end_tangent(epsilon)
        } else {
            let deriv = self.deriv().eval(t).to_vec2();
            if !deriv.is_zero(epsilon) {
                deriv
            } else {
                let deriv2 = self.deriv2(t);
                if !deriv2.is_zero(epsilon) {
                    deriv2
                } else {
                    // The third derivative is constant.
                    6.0 * (self.p3 - self.p0 + 3.0 * (self.p1 - self.p2))
                }
            }
        };
        dir.rot90_cw().with_length(d)
    }

    /// Direction of travel at the start, skipping coincident control points.
    pub(crate) fn start_tangent(&self, epsilon: f64) -> Vec2 {
        [self.p1, self.p2, self.p3]
            .into_iter()
            .map(|p| p - self.p0)
            .find(|v| !v.is_zero(epsilon))
            .unwrap_or(Vec2::ZERO)
    }

    /// Direction of travel at the end, skipping coincident control points.
    pub(crate) fn end_tangent(&self, epsilon: f64) -> Vec2 {
        [self.p2, self.p1, self.p0]
            .into_iter()
            .map(|p| self.p3 - p)
            .find(|v| !v.is_zero(epsilon))
            .unwrap_or(Vec2::ZERO)
    }

    /// Whether all four control points coincide within `epsilon`.
    #[inline]
    pub fn is_point(&self, epsilon: f64) -> bool {
        self.p0.approx_eq(self.p1, epsilon)
            && self.p0.approx_eq(self.p2, epsilon)
            && self.p0.approx_eq(self.p3, epsilon)
    }
}

impl ParamCurve for CubicBez {
    #[inline]
    fn eval(&self, t: f64) -> Point {
        let mt = 1.0 - t;
        let v = self.p0.to_vec2() * (mt * mt * mt)
            + (self.p1.to_vec2() * (mt * mt * 3.0)
                + (self.p2.to_vec2() * (mt * 3.0) + self.p3.to_vec2() * t) * t)
                * t;
        v.to_point()
    }

    #[inline(always)]
    fn start(&self) -> Point {
        self.p0
    }

    #[inline(always)]
    fn end(&self) -> Point {
        self.p3
    }

    fn subsegment(&self, range: Range<f64>) -> CubicBez {
        let (t0, t1) = (range.start, range.end);
        let p0 = self.eval(t0);
        let p3 = self.eval(t1);
        let d = self.deriv();
        let scale = (t1 - t0) * (1.0 / 3.0);
        let p1 = p0 + scale * d.eval(t0).to_vec2();
        let p2 = p3 - scale * d.eval(t1).to_vec2();
        CubicBez { p0, p1, p2, p3 }
    }

    /// Subdivide into halves, using de Casteljau.
    #[inline]
    fn subdivide(&self) -> (CubicBez, CubicBez) {
        self.split(0.5)
    }
}

impl ParamCurveDeriv for CubicBez {
    type DerivResult = QuadBez;

    #[inline]
    fn deriv(&self) -> QuadBez {
        QuadBez::new(
            (3.0 * (self.p1 - self.p0)).to_point(),
            (3.0 * (self.p2 - self.p1)).to_point(),
            (3.0 * (self.p3 - self.p2)).to_point(),
        )
    }
}

impl ParamCurveArclen for CubicBez {
    /// Arclength of a cubic Bézier segment.
    ///
    /// This algorithm is based on "Adaptive subdivision and the length and
    /// energy of Bézier curves" by Jens Gravesen.
    fn arclen(&self, accuracy: f64) -> f64 {
        // Estimate for a single segment.
        fn calc_l0(c: &CubicBez) -> f64 {
            let lc = (c.p3 - c.p0).hypot();
            let lp = (c.p1 - c.p0).hypot() + (c.p2 - c.p1).hypot() + (c.p3 - c.p2).hypot();
            (lc + lp) * 0.5
        }
        const MAX_DEPTH: usize = 16;
        fn rec(c: &CubicBez, l0: f64, accuracy: f64, depth: usize) -> f64 {
            let (c0, c1) = c.subdivide();
            let l0_c0 = calc_l0(&c0);
            let l0_c1 = calc_l0(&c1);
            let l1 = l0_c0 + l0_c1;
            let error = (l0 - l1) * (1.0 / 15.0);
            if error.abs() < accuracy || depth == MAX_DEPTH {
                l1 - error
            } else {
                rec(&c0, l0_c0, accuracy * 0.5, depth + 1)
                    + rec(&c1, l0_c1, accuracy * 0.5, depth + 1)
            }
        }
        rec(self, calc_l0(self), accuracy, 0)
    }
}

impl ParamCurveCurvature for CubicBez {}

impl ParamCurveExtrema for CubicBez {
    fn extrema(&self) -> ArrayVec<f64, MAX_EXTREMA> {
        fn one_coord(result: &mut ArrayVec<f64, MAX_EXTREMA>, d0: f64, d1: f64, d2: f64) {
            let a = d0 - 2.0 * d1 + d2;
            let b = 2.0 * (d1 - d0);
            let c = d0;
            let roots = solve_quadratic(c, b, a);
            for &t in &roots {
                if t > 0.0 && t < 1.0 {
                    result.push(t);
                }
            }
        }
        let mut result = ArrayVec::new();
        let d0 = self.p1 - self.p0;
        let d1 = self.p2 - self.p1;
        let d2 = self.p3 - self.p2;
        one_coord(&mut result, d0.x, d1.x, d2.x);
        one_coord(&mut result, d0.y, d1.y, d2.y);
        result.sort_unstable_by(f64::total_cmp);
        result
    }
}
