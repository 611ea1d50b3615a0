// Copyright 2025 the Ductus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inflection points of cubic Béziers and the flat regions around them.
//!
//! Offsetting a curve with a single polyline breaks down near an inflection,
//! where the offset curve can develop a cusp or a loop. The offset engine
//! replaces a small range around each inflection with a straight line; this
//! module finds the inflections and sizes those ranges, following Hain et
//! al., "Fast, precise flattening of cubic Bézier path and offset curves"
//! (2005).

use arrayvec::ArrayVec;

use crate::common::solve_quadratic;
use crate::CubicBez;

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

impl CubicBez {
    /// Parameters of the inflection points, in ascending order.
    ///
    /// Only inflections strictly inside `(0, 1)` are reported. A cubic has at
    /// most two; a symmetric cusp reports its parameter once.
    ///
    /// ```
    /// use ductus::CubicBez;
    ///
    /// let c = CubicBez::new((0.0, 0.0), (1.0, 1.0), (0.0, 1.0), (1.0, 0.0));
    /// assert_eq!(c.inflections().as_slice(), &[0.5]);
    /// ```
    pub fn inflections(&self) -> ArrayVec<f64, 2> {
        // B'(t) ∝ a + 2bt + ct², B''(t) ∝ b + ct; their cross product is
        // a×b + (a×c)t + (b×c)t².
        let a = self.p1 - self.p0;
        let b = self.p2.to_vec2() - 2.0 * self.p1.to_vec2() + self.p0.to_vec2();
        let c = (self.p3 - self.p0) + 3.0 * (self.p1 - self.p2);
        let mut result = ArrayVec::new();
        for t in solve_quadratic(a.cross(b), a.cross(c), b.cross(c)) {
            if t > 0.0 && t < 1.0 {
                result.push(t);
            }
        }
        result
    }

    /// The parameter range around `t` within which the curve deviates less
    /// than `flatness` from a straight line.
    ///
    /// The range is symmetric around `t` and is not clamped to `[0, 1]`.
    /// When the curve is straight from `t` on (including when all control
    /// points from `t` on coincide within `epsilon`), the whole range
    /// `(0.0, 1.0)` is returned. A NaN `t` gives `(∞, ∞)`, a range that
    /// contains no parameter.
    pub fn inflection_range(&self, t: f64, flatness: f64, epsilon: f64) -> (f64, f64) {
        if t.is_nan() {
            return (f64::INFINITY, f64::INFINITY);
        }
        let q = if t == 0.0 { *self } else { self.split(t).1 };
        let mut nr = q.p1 - q.p0;
        if nr.is_zero(epsilon) {
            nr = q.p2 - q.p0;
            if nr.is_zero(epsilon) {
                return (0.0, 1.0);
            }
        }
        // Distance of the end point from the tangent line.
        let s3 = (q.p3 - q.p0).cross(nr).abs() / nr.hypot();
        if s3 <= epsilon {
            return (0.0, 1.0);
        }
        let tf = (flatness / s3).cbrt();
        (t - tf * (1.0 - t), t + tf * (1.0 - t))
    }
}

#[cfg(test)]
mod tests {
    use crate::{CubicBez, ParamCurve, ParamCurveDeriv};

    const EPS: f64 = 1e-10;

    fn check_inflections(p: [(f64, f64); 4], expected: &[f64]) {
        let c = CubicBez::new(p[0], p[1], p[2], p[3]);
        let ts = c.inflections();
        assert_eq!(ts.len(), expected.len(), "{ts:?} vs {expected:?}");
        for (t, e) in ts.iter().zip(expected) {
            assert!((t - e).abs() < 1e-6, "{ts:?} vs {expected:?}");
        }
    }

    #[test]
    fn inflection_points() {
        check_inflections([(0.0, 0.0), (1.0, 1.0), (0.0, 1.0), (1.0, 0.0)], &[0.5]);
        check_inflections([(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)], &[]);
        check_inflections(
            [(16.0, 467.0), (185.0, 95.0), (673.0, 545.0), (810.0, 17.0)],
            &[0.456590],
        );
        check_inflections(
            [(859.0, 676.0), (13.0, 422.0), (781.0, 12.0), (266.0, 425.0)],
            &[0.681076, 0.705299],
        );
        check_inflections(
            [(872.0, 686.0), (11.0, 423.0), (779.0, 13.0), (220.0, 376.0)],
            &[0.588071, 0.886863],
        );
        check_inflections(
            [(819.0, 566.0), (43.0, 18.0), (826.0, 18.0), (25.0, 533.0)],
            &[0.476169, 0.539295],
        );
        check_inflections(
            [(884.0, 574.0), (135.0, 14.0), (678.0, 14.0), (14.0, 566.0)],
            &[0.320836, 0.682291],
        );
    }

    #[test]
    fn inflection_is_curvature_sign_change() {
        let c = CubicBez::new((16.0, 467.0), (185.0, 95.0), (673.0, 545.0), (810.0, 17.0));
        let d = c.deriv();
        let cross = |t: f64| d.eval(t).to_vec2().cross(c.deriv2(t));
        for t in c.inflections() {
            assert!(cross(t).abs() < 1e-6 * cross(0.0).abs());
            assert!(cross(t - 1e-3).signum() != cross(t + 1e-3).signum());
        }
    }

    #[test]
    fn inflection_range() {
        let c = CubicBez::new((0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0));
        let (x1, x2) = c.inflection_range(0.5, 1.0, EPS);
        assert!(x1 <= 0.0 && x2 >= 1.0, "({x1}, {x2})");

        let (x1, x2) = c.inflection_range(0.5, 1e-9, EPS);
        assert!((x1 - 0.499449).abs() < 1e-6, "{x1}");
        assert!((x2 - 0.500550).abs() < 1e-6, "{x2}");

        let (x1, x2) = c.inflection_range(f64::NAN, 1.0, EPS);
        assert!(x1.is_infinite() && x2.is_infinite());
    }

    #[test]
    fn inflection_range_degenerate() {
        let c = CubicBez::new((0.0, 0.0), (0.0, 0.0), (0.0, 0.0), (1.0, 0.0));
        assert_eq!(c.inflection_range(0.0, 1.0, EPS), (0.0, 1.0));
        let c = CubicBez::new((0.0, 0.0), (0.0, 0.0), (1.0, 0.0), (1.0, 0.0));
        assert_eq!(c.inflection_range(0.0, 1.0, EPS), (0.0, 1.0));
    }
}
