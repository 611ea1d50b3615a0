// Copyright 2025 the Ductus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lines.

use core::ops::Range;

use arrayvec::ArrayVec;

use crate::{
    ParamCurve, ParamCurveArclen, ParamCurveDeriv, ParamCurveExtrema, Point, MAX_EXTREMA,
};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// A single line.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    /// The line's start point.
    pub p0: Point,
    /// The line's end point.
    pub p1: Point,
}

/// The point where two lines, extended to infinity, cross.
///
/// Returned by [`Line::crossing`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineCrossing {
    /// The crossing point.
    pub point: Point,
    /// Parameter of the crossing along the first line, 0 at `p0`, 1 at `p1`.
    pub line_t: f64,
    /// Parameter of the crossing along the second line.
    pub other_t: f64,
}

impl Line {
    /// Create a new line.
    #[inline(always)]
    pub fn new(p0: impl Into<Point>, p1: impl Into<Point>) -> Line {
        Line {
            p0: p0.into(),
            p1: p1.into(),
        }
    }

    /// Returns a copy of this `Line` with the end points swapped so that it
    /// points in the opposite direction.
    #[must_use]
    #[inline(always)]
    pub fn reversed(&self) -> Line {
        Self {
            p0: self.p1,
            p1: self.p0,
        }
    }

    /// The length of the line.
    #[inline]
    pub fn length(self) -> f64 {
        (self.p1 - self.p0).hypot()
    }

    /// Computes where two lines, if extended to infinity, would cross.
    ///
    /// Returns `None` when the lines are parallel or colinear, that is when
    /// the determinant of the system is within `epsilon` of zero.
    ///
    /// ```
    /// use ductus::{Line, Point};
    ///
    /// let a = Line::new((2.0, 0.0), (2.0, 1.0));
    /// let b = Line::new((0.0, 2.0), (1.0, 2.0));
    /// let crossing = a.crossing(b, 1e-10).unwrap();
    /// assert_eq!(crossing.point, Point::new(2.0, 2.0));
    /// assert!(!crossing.is_within_segments(1e-10));
    /// ```
    pub fn crossing(self, other: Line, epsilon: f64) -> Option<LineCrossing> {
        let ab = self.p1 - self.p0;
        let cd = other.p1 - other.p0;
        let det = ab.cross(cd);
        if det.abs() <= epsilon {
            return None;
        }
        let ac = other.p0 - self.p0;
        let line_t = ac.cross(cd) / det;
        let other_t = ac.cross(ab) / det;
        Some(LineCrossing {
            point: self.p0 + ab * line_t,
            line_t,
            other_t,
        })
    }
}

impl LineCrossing {
    /// Whether the crossing lies on both segments, end points included.
    #[inline]
    pub fn is_within_segments(&self, epsilon: f64) -> bool {
        let within = |t: f64| t >= -epsilon && t <= 1.0 + epsilon;
        within(self.line_t) && within(self.other_t)
    }
}

impl ParamCurve for Line {
    #[inline]
    fn eval(&self, t: f64) -> Point {
        self.p0.lerp(self.p1, t)
    }

    #[inline]
    fn subsegment(&self, range: Range<f64>) -> Line {
        Line {
            p0: self.eval(range.start),
            p1: self.eval(range.end),
        }
    }

    #[inline(always)]
    fn start(&self) -> Point {
        self.p0
    }

    #[inline(always)]
    fn end(&self) -> Point {
        self.p1
    }
}

impl ParamCurveDeriv for Line {
    type DerivResult = ConstPoint;

    #[inline]
    fn deriv(&self) -> ConstPoint {
        ConstPoint((self.p1 - self.p0).to_point())
    }
}

impl ParamCurveArclen for Line {
    #[inline]
    fn arclen(&self, _accuracy: f64) -> f64 {
        self.length()
    }
}

impl ParamCurveExtrema for Line {
    #[inline]
    fn extrema(&self) -> ArrayVec<f64, MAX_EXTREMA> {
        ArrayVec::new()
    }
}

/// A trivial "curve" that is just a constant.
///
/// This is the derivative of a [`Line`].
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstPoint(Point);

impl ParamCurve for ConstPoint {
    #[inline(always)]
    fn eval(&self, _t: f64) -> Point {
        self.0
    }

    #[inline(always)]
    fn subsegment(&self, _range: Range<f64>) -> ConstPoint {
        *self
    }
}

impl ParamCurveDeriv for ConstPoint {
    type DerivResult = ConstPoint;

    #[inline(always)]
    fn deriv(&self) -> ConstPoint {
        ConstPoint(Point::new(0.0, 0.0))
    }
}
