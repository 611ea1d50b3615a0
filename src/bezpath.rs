// Copyright 2025 the Ductus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bézier paths (up to cubic).

use core::iter::Copied;
use core::ops::Range;
use core::slice;

use alloc::vec::{self, Vec};

use arrayvec::ArrayVec;

use crate::offset::offset_cubic_lines;
use crate::{
    Arc, CubicBez, Line, ParamCurve, ParamCurveArclen, ParamCurveExtrema, Point, QuadBez, Rect,
    SvgArc, Tolerances, Vec2, MAX_EXTREMA,
};

/// A Bézier path, possibly with multiple subpaths.
///
/// Segments are lines, quadratic and cubic Béziers. Elliptical arcs are
/// approximated with cubics when they are added; see [`BezPath::arc_to`].
#[derive(Clone, Default, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BezPath(Vec<PathEl>);

/// The element of a Bézier path.
///
/// A valid path has `MoveTo` at the beginning of each subpath.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathEl {
    /// Move directly to the point without drawing anything, starting a new
    /// subpath.
    MoveTo(Point),
    /// Draw a line from the current location to the point.
    LineTo(Point),
    /// Draw a quadratic Bézier using the current location and the two points.
    QuadTo(Point, Point),
    /// Draw a cubic Bézier using the current location and the three points.
    CurveTo(Point, Point, Point),
    /// Close off the path.
    ClosePath,
}

/// A segment of a Bézier path.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathSeg {
    /// A line segment.
    Line(Line),
    /// A quadratic Bézier segment.
    Quad(QuadBez),
    /// A cubic Bézier segment.
    Cubic(CubicBez),
}

impl BezPath {
    /// Create a new path.
    #[inline]
    pub fn new() -> BezPath {
        BezPath::default()
    }

    /// Create a new path with the specified capacity.
    ///
    /// This can be useful if you already know how many path elements the
    /// path will consist of, to prevent reallocations.
    pub fn with_capacity(capacity: usize) -> BezPath {
        BezPath(Vec::with_capacity(capacity))
    }

    /// Push a generic path element onto the path.
    #[inline]
    pub fn push(&mut self, el: PathEl) {
        self.0.push(el);
    }

    /// Push a "move to" element onto the path.
    pub fn move_to<P: Into<Point>>(&mut self, p: P) {
        self.push(PathEl::MoveTo(p.into()));
    }

    /// Push a "line to" element onto the path.
    pub fn line_to<P: Into<Point>>(&mut self, p: P) {
        self.push(PathEl::LineTo(p.into()));
    }

    /// Push a "quad to" element onto the path.
    pub fn quad_to<P: Into<Point>>(&mut self, p1: P, p2: P) {
        self.push(PathEl::QuadTo(p1.into(), p2.into()));
    }

    /// Push a "curve to" element onto the path.
    pub fn curve_to<P: Into<Point>>(&mut self, p1: P, p2: P, p3: P) {
        self.push(PathEl::CurveTo(p1.into(), p2.into(), p3.into()));
    }

    /// Push a "close path" element onto the path.
    pub fn close_path(&mut self) {
        self.push(PathEl::ClosePath);
    }

    /// Append an elliptical arc from the current point to `to`.
    ///
    /// The arc is given in the endpoint form of the SVG path notation and is
    /// approximated with cubic Béziers to within `tol.tolerance`. When a
    /// radius is zero, the arc is a straight line. A path without a current
    /// point starts a new subpath at `to`.
    pub fn arc_to<P: Into<Point>>(
        &mut self,
        radii: Vec2,
        x_rotation: f64,
        large_arc: bool,
        sweep: bool,
        to: P,
        tol: Tolerances,
    ) {
        let to = to.into();
        let Some(from) = self.current_position() else {
            self.move_to(to);
            return;
        };
        let arc = SvgArc {
            from,
            to,
            radii,
            x_rotation,
            large_arc,
            sweep,
        };
        match Arc::from_svg_arc(&arc, tol.epsilon) {
            Some(arc) => self.extend(arc.append_iter(tol.tolerance)),
            None => self.line_to(to),
        }
    }

    /// Get the path elements.
    #[inline]
    pub fn elements(&self) -> &[PathEl] {
        &self.0
    }

    /// Returns an iterator over the path's elements.
    pub fn iter(&self) -> impl Iterator<Item = PathEl> + Clone + '_ {
        self.0.iter().copied()
    }

    /// Iterate over the path segments.
    pub fn segments(&self) -> BezPathSegs<'_> {
        let start = match self.0.first() {
            Some(PathEl::MoveTo(p)) => *p,
            _ => Point::ORIGIN,
        };
        BezPathSegs {
            els: self.0.iter(),
            start,
            last: start,
        }
    }

    /// Shorten the path, keeping the first `len` elements.
    pub fn truncate(&mut self, len: usize) {
        self.0.truncate(len);
    }

    /// Returns `true` if the path contains no segments.
    pub fn is_empty(&self) -> bool {
        self.0
            .iter()
            .all(|el| matches!(el, PathEl::MoveTo(..) | PathEl::ClosePath))
    }

    /// The current point of the path: where the next segment would start.
    ///
    /// After a `ClosePath`, this is the start of the closed subpath. Returns
    /// `None` for an empty path.
    pub fn current_position(&self) -> Option<Point> {
        match self.0.last()? {
            PathEl::ClosePath => self.0.iter().rev().find_map(|el| match *el {
                PathEl::MoveTo(p) => Some(p),
                _ => None,
            }),
            el => el.end_point(),
        }
    }

    /// The smallest rectangle enclosing every segment of the path.
    ///
    /// A path without segments gives [`Rect::ZERO`].
    pub fn bounding_box(&self) -> Rect {
        self.segments()
            .map(|seg| seg.bounding_box())
            .reduce(|a, b| a.union(b))
            .unwrap_or(Rect::ZERO)
    }

    /// The total arc length of the path's segments.
    ///
    /// `accuracy` applies to each segment, so the total error is at most
    /// `accuracy` times the number of segments.
    pub fn arclen(&self, accuracy: f64) -> f64 {
        self.segments().map(|seg| seg.arclen(accuracy)).sum()
    }

    /// Approximate the path with lines.
    ///
    /// The callback receives `MoveTo`, `LineTo` and `ClosePath` elements.
    /// Quadratics are raised to cubics, and cubics are cut into flat pieces
    /// no farther than about `tolerance` from their chords, with the same
    /// subdivision the offset engine uses at distance zero.
    ///
    /// ```
    /// use ductus::{BezPath, PathEl};
    ///
    /// let mut path = BezPath::new();
    /// path.move_to((0.0, 0.0));
    /// path.curve_to((0.0, 50.0), (50.0, 100.0), (100.0, 100.0));
    /// let mut n = 0;
    /// path.flatten(0.1, |el| {
    ///     assert!(matches!(el, PathEl::MoveTo(_) | PathEl::LineTo(_)));
    ///     n += 1;
    /// });
    /// assert!(n > 4);
    /// ```
    pub fn flatten(&self, tolerance: f64, mut callback: impl FnMut(PathEl)) {
        let tol = Tolerances::default().with_tolerance(tolerance);
        let mut scratch = BezPath::new();
        let mut start = Point::ORIGIN;
        let mut last = Point::ORIGIN;
        for el in self.iter() {
            let c = match el {
                PathEl::MoveTo(p) => {
                    start = p;
                    last = p;
                    callback(el);
                    continue;
                }
                PathEl::LineTo(p) => {
                    last = p;
                    callback(el);
                    continue;
                }
                PathEl::ClosePath => {
                    last = start;
                    callback(el);
                    continue;
                }
                PathEl::QuadTo(p1, p2) => QuadBez::new(last, p1, p2).raise(),
                PathEl::CurveTo(p1, p2, p3) => CubicBez::new(last, p1, p2, p3),
            };
            last = c.p3;
            if c.is_point(tol.epsilon) {
                callback(PathEl::LineTo(c.p3));
                continue;
            }
            scratch.truncate(0);
            offset_cubic_lines(&mut scratch, c, 0.0, tol);
            scratch.iter().for_each(&mut callback);
        }
    }
}

impl FromIterator<PathEl> for BezPath {
    fn from_iter<T: IntoIterator<Item = PathEl>>(iter: T) -> Self {
        BezPath(iter.into_iter().collect())
    }
}

impl Extend<PathEl> for BezPath {
    fn extend<I: IntoIterator<Item = PathEl>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl<'a> IntoIterator for &'a BezPath {
    type Item = PathEl;
    type IntoIter = Copied<slice::Iter<'a, PathEl>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

impl IntoIterator for BezPath {
    type Item = PathEl;
    type IntoIter = vec::IntoIter<PathEl>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl PathEl {
    /// Get the end point of the path element, if it exists.
    pub fn end_point(&self) -> Option<Point> {
        match self {
            PathEl::MoveTo(p) => Some(*p),
            PathEl::LineTo(p1) => Some(*p1),
            PathEl::QuadTo(_, p2) => Some(*p2),
            PathEl::CurveTo(_, _, p3) => Some(*p3),
            PathEl::ClosePath => None,
        }
    }
}

/// An iterator over the segments of a path.
///
/// A `ClosePath` yields the closing line, unless the subpath already ends
/// at its start point.
#[derive(Clone, Debug)]
pub struct BezPathSegs<'a> {
    els: slice::Iter<'a, PathEl>,
    start: Point,
    last: Point,
}

impl Iterator for BezPathSegs<'_> {
    type Item = PathSeg;

    fn next(&mut self) -> Option<PathSeg> {
        for el in &mut self.els {
            let (seg, last) = match *el {
                PathEl::MoveTo(p) => {
                    self.start = p;
                    self.last = p;
                    continue;
                }
                PathEl::LineTo(p) => (PathSeg::Line(Line::new(self.last, p)), p),
                PathEl::QuadTo(p1, p2) => (PathSeg::Quad(QuadBez::new(self.last, p1, p2)), p2),
                PathEl::CurveTo(p1, p2, p3) => {
                    (PathSeg::Cubic(CubicBez::new(self.last, p1, p2, p3)), p3)
                }
                PathEl::ClosePath => {
                    if self.last != self.start {
                        (PathSeg::Line(Line::new(self.last, self.start)), self.start)
                    } else {
                        continue;
                    }
                }
            };
            self.last = last;
            return Some(seg);
        }
        None
    }
}

impl PathSeg {
    /// Returns a new `PathSeg` describing the same path as `self`, but with
    /// the points reversed.
    #[must_use]
    pub fn reverse(&self) -> PathSeg {
        match self {
            PathSeg::Line(line) => PathSeg::Line(line.reversed()),
            PathSeg::Quad(q) => PathSeg::Quad(QuadBez::new(q.p2, q.p1, q.p0)),
            PathSeg::Cubic(c) => PathSeg::Cubic(c.reverse()),
        }
    }

    /// Convert this segment to a cubic Bézier.
    pub fn to_cubic(&self) -> CubicBez {
        match *self {
            PathSeg::Line(Line { p0, p1 }) => CubicBez::new(p0, p0, p1, p1),
            PathSeg::Cubic(c) => c,
            PathSeg::Quad(q) => q.raise(),
        }
    }

    /// The path element that draws this segment from its start point.
    pub fn as_path_el(&self) -> PathEl {
        match self {
            PathSeg::Line(line) => PathEl::LineTo(line.p1),
            PathSeg::Quad(q) => PathEl::QuadTo(q.p1, q.p2),
            PathSeg::Cubic(c) => PathEl::CurveTo(c.p1, c.p2, c.p3),
        }
    }

    /// The directions of travel at the start and at the end.
    ///
    /// Control points coincident (within `epsilon`) with an end point are
    /// skipped. The vectors are not normalized, and both are zero for a
    /// segment that is a single point.
    pub fn tangents(&self, epsilon: f64) -> (Vec2, Vec2) {
        match self {
            PathSeg::Line(line) => {
                let d = line.p1 - line.p0;
                (d, d)
            }
            _ => {
                let c = self.to_cubic();
                (c.start_tangent(epsilon), c.end_tangent(epsilon))
            }
        }
    }
}

impl ParamCurve for PathSeg {
    fn eval(&self, t: f64) -> Point {
        match *self {
            PathSeg::Line(line) => line.eval(t),
            PathSeg::Quad(quad) => quad.eval(t),
            PathSeg::Cubic(cubic) => cubic.eval(t),
        }
    }

    fn subsegment(&self, range: Range<f64>) -> PathSeg {
        match *self {
            PathSeg::Line(line) => PathSeg::Line(line.subsegment(range)),
            PathSeg::Quad(quad) => PathSeg::Quad(quad.subsegment(range)),
            PathSeg::Cubic(cubic) => PathSeg::Cubic(cubic.subsegment(range)),
        }
    }

    fn start(&self) -> Point {
        match *self {
            PathSeg::Line(line) => line.p0,
            PathSeg::Quad(quad) => quad.p0,
            PathSeg::Cubic(cubic) => cubic.p0,
        }
    }

    fn end(&self) -> Point {
        match *self {
            PathSeg::Line(line) => line.p1,
            PathSeg::Quad(quad) => quad.p2,
            PathSeg::Cubic(cubic) => cubic.p3,
        }
    }
}

impl ParamCurveArclen for PathSeg {
    fn arclen(&self, accuracy: f64) -> f64 {
        match *self {
            PathSeg::Line(line) => line.arclen(accuracy),
            PathSeg::Quad(quad) => quad.arclen(accuracy),
            PathSeg::Cubic(cubic) => cubic.arclen(accuracy),
        }
    }
}

impl ParamCurveExtrema for PathSeg {
    fn extrema(&self) -> ArrayVec<f64, MAX_EXTREMA> {
        match *self {
            PathSeg::Line(line) => line.extrema(),
            PathSeg::Quad(quad) => quad.extrema(),
            PathSeg::Cubic(cubic) => cubic.extrema(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arc_to_cubic;

    fn assert_near(p0: Point, p1: Point, epsilon: f64) {
        assert!(p0.approx_eq(p1, epsilon), "{p0:?} != {p1:?}");
    }

    fn triangle() -> BezPath {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((4.0, 0.0));
        path.line_to((4.0, 3.0));
        path.close_path();
        path
    }

    #[test]
    fn current_position() {
        let mut path = BezPath::new();
        assert_eq!(path.current_position(), None);
        path.move_to((1.0, 2.0));
        assert_eq!(path.current_position(), Some(Point::new(1.0, 2.0)));
        path.quad_to((3.0, 4.0), (5.0, 6.0));
        assert_eq!(path.current_position(), Some(Point::new(5.0, 6.0)));
        path.close_path();
        assert_eq!(path.current_position(), Some(Point::new(1.0, 2.0)));
    }

    #[test]
    fn is_empty() {
        let mut path = BezPath::new();
        assert!(path.is_empty());
        path.move_to((1.0, 1.0));
        assert!(path.is_empty());
        path.line_to((2.0, 1.0));
        assert!(!path.is_empty());
        path.truncate(1);
        assert!(path.is_empty());
    }

    #[test]
    fn segments_close_path() {
        let path = triangle();
        let segs: Vec<_> = path.segments().collect();
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[2], PathSeg::Line(Line::new((4.0, 3.0), (0.0, 0.0))));
        assert!((path.arclen(1e-9) - 12.0).abs() < 1e-12);

        // A subpath ending at its start has no closing segment.
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((1.0, 0.0));
        path.line_to((0.0, 0.0));
        path.close_path();
        assert_eq!(path.segments().count(), 2);
    }

    #[test]
    fn bounding_box() {
        assert_eq!(BezPath::new().bounding_box(), Rect::ZERO);
        assert_eq!(triangle().bounding_box(), Rect::new(0.0, 0.0, 4.0, 3.0));

        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.curve_to((0.0, 1.0), (1.0, 1.0), (1.0, 0.0));
        let bbox = path.bounding_box();
        assert!((bbox.y1 - 0.75).abs() < 1e-12, "{bbox:?}");
        assert_eq!(bbox.x1, 1.0);
    }

    #[test]
    fn arc_to() {
        let tol = Tolerances::default();
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.arc_to(Vec2::new(100.0, 100.0), 0.0, false, false, (200.0, 0.0), tol);
        let arc = SvgArc {
            from: Point::new(0.0, 0.0),
            to: Point::new(200.0, 0.0),
            radii: Vec2::new(100.0, 100.0),
            x_rotation: 0.0,
            large_arc: false,
            sweep: false,
        };
        assert_eq!(path, arc_to_cubic(&arc, tol));

        // Zero radii draw a line.
        path.arc_to(Vec2::ZERO, 0.0, false, false, (300.0, 0.0), tol);
        assert_eq!(
            path.elements().last(),
            Some(&PathEl::LineTo(Point::new(300.0, 0.0)))
        );

        let mut path = BezPath::new();
        path.arc_to(Vec2::new(1.0, 1.0), 0.0, false, false, (2.0, 0.0), tol);
        assert_eq!(path.elements(), &[PathEl::MoveTo(Point::new(2.0, 0.0))]);
    }

    #[test]
    fn flatten_cubic() {
        let c = CubicBez::new((0.0, 0.0), (0.0, 55.0), (45.0, 100.0), (100.0, 100.0));
        let mut path = BezPath::new();
        path.move_to(c.p0);
        path.curve_to(c.p1, c.p2, c.p3);
        path.close_path();

        let mut points = Vec::new();
        let mut closed = false;
        path.flatten(0.1, |el| match el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => points.push(p),
            PathEl::ClosePath => closed = true,
            _ => panic!("unexpected element {el:?}"),
        });
        assert!(closed);
        assert_eq!(points[0], c.p0);
        assert_near(*points.last().unwrap(), c.p3, 1e-9);
        assert!(points.len() > 10);
        // Every vertex lies on the curve.
        let samples: Vec<_> = (0..=2000).map(|i| c.eval(f64::from(i) / 2000.0)).collect();
        for p in &points {
            let dist = samples
                .iter()
                .map(|q| q.distance(*p))
                .fold(f64::INFINITY, f64::min);
            assert!(dist < 0.1, "{p:?}");
        }
    }

    #[test]
    fn flatten_lines_and_quads() {
        let mut path = triangle();
        path.move_to((10.0, 10.0));
        path.quad_to((10.0, 10.0), (10.0, 10.0));
        let mut els = Vec::new();
        path.flatten(0.1, |el| els.push(el));
        assert_eq!(&els[..4], triangle().elements());
        assert_eq!(
            &els[4..],
            &[
                PathEl::MoveTo(Point::new(10.0, 10.0)),
                PathEl::LineTo(Point::new(10.0, 10.0))
            ]
        );
    }

    #[test]
    fn seg_tangents() {
        let seg = PathSeg::Cubic(CubicBez::new((0.0, 0.0), (0.0, 0.0), (1.0, 1.0), (2.0, 1.0)));
        let (t0, t1) = seg.tangents(1e-10);
        assert_eq!(t0, Vec2::new(1.0, 1.0));
        assert_eq!(t1, Vec2::new(1.0, 0.0));

        let seg = PathSeg::Quad(QuadBez::new((0.0, 0.0), (1.0, 0.0), (1.0, 1.0)));
        let (t0, t1) = seg.tangents(1e-10);
        assert!(t0.cross(Vec2::new(1.0, 0.0)).abs() < 1e-12 && t0.x > 0.0);
        assert!(t1.cross(Vec2::new(0.0, 1.0)).abs() < 1e-12 && t1.y > 0.0);

        let seg = PathSeg::Line(Line::new((1.0, 1.0), (1.0, 1.0)));
        assert_eq!(seg.tangents(1e-10), (Vec2::ZERO, Vec2::ZERO));
    }

    #[test]
    fn seg_eval_reverse() {
        let seg = PathSeg::Quad(QuadBez::new((0.0, 0.0), (1.0, 0.0), (1.0, 1.0)));
        let rev = seg.reverse();
        for i in 0..=10 {
            let t = f64::from(i) / 10.0;
            assert_near(seg.eval(t), rev.eval(1.0 - t), 1e-12);
        }
        assert_eq!(seg.start(), rev.end());
        assert_eq!(seg.as_path_el(), PathEl::QuadTo(Point::new(1.0, 0.0), Point::new(1.0, 1.0)));
        let c = seg.to_cubic();
        assert_near(c.eval(0.3), seg.eval(0.3), 1e-12);
    }
}
