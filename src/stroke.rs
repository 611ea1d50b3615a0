// Copyright 2025 the Ductus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stroking: expanding a path into the outline of its stroke.
//!
//! Every segment is offset on both sides by half the stroke width. Lines are
//! offset exactly; curves go through the offset engine in [`crate::offset`].
//! The forward side of a subpath lies at `+width / 2` (the
//! [`Vec2::rot90_cw`] side of the direction of travel), the backward side at
//! `-width / 2` and is traversed in reverse when the outline is assembled.

use core::f64::consts::PI;

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

use crate::offset::offset_cubic_lines;
use crate::{Arc, BezPath, CubicBez, PathEl, PathSeg, Point, QuadBez, Tolerances, Vec2};

/// Defines the connection between two segments of a stroke.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Join {
    /// A straight line connecting the segments.
    Bevel,
    /// The segments are extended to their natural intersection point.
    Miter,
    /// An arc between the segments.
    Round,
}

/// Defines the shape to be drawn at the ends of a stroke.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cap {
    /// Flat cap.
    Butt,
    /// Square cap with dimensions equal to half the stroke width.
    Square,
    /// Rounded cap with radius equal to half the stroke width.
    Round,
}

/// Describes the visual style of a stroke.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stroke {
    /// Width of the stroke.
    pub width: f64,
    /// Style for connecting segments of the stroke.
    pub join: Join,
    /// Limit for miter joins, as a ratio of the miter length to the width.
    pub miter_limit: f64,
    /// Style for capping the beginning of an open subpath.
    pub start_cap: Cap,
    /// Style for capping the end of an open subpath.
    pub end_cap: Cap,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            width: 1.0,
            join: Join::Round,
            miter_limit: 4.0,
            start_cap: Cap::Round,
            end_cap: Cap::Round,
        }
    }
}

impl Stroke {
    /// Creates a new stroke with the specified width.
    pub fn new(width: f64) -> Self {
        Self {
            width,
            ..Default::default()
        }
    }

    /// Builder method for setting the join style.
    #[must_use]
    pub fn with_join(mut self, join: Join) -> Self {
        self.join = join;
        self
    }

    /// Builder method for setting the limit for miter joins.
    #[must_use]
    pub fn with_miter_limit(mut self, limit: f64) -> Self {
        self.miter_limit = limit;
        self
    }

    /// Builder method for setting the cap style for the start of the stroke.
    #[must_use]
    pub fn with_start_cap(mut self, cap: Cap) -> Self {
        self.start_cap = cap;
        self
    }

    /// Builder method for setting the cap style for the end of the stroke.
    #[must_use]
    pub fn with_end_cap(mut self, cap: Cap) -> Self {
        self.end_cap = cap;
        self
    }

    /// Builder method for setting the cap style.
    #[must_use]
    pub fn with_caps(mut self, cap: Cap) -> Self {
        self.start_cap = cap;
        self.end_cap = cap;
        self
    }
}

/// Scratch state for stroking.
///
/// Keeping one around and passing it to [`stroke_with`] reuses its
/// allocations across calls.
#[derive(Default, Debug)]
pub struct StrokeCtx {
    output: BezPath,
    forward_path: BezPath,
    backward_path: BezPath,
    start_pt: Point,
    start_norm: Vec2,
    start_tan: Vec2,
    last_pt: Point,
    last_tan: Vec2,
    // if cross < hypot * join_thresh, omit join altogether
    join_thresh: f64,
}

impl StrokeCtx {
    /// The outline produced by the last call to [`stroke_with`].
    pub fn output(&self) -> &BezPath {
        &self.output
    }
}

/// Expand a stroke into a fill.
///
/// Closed subpaths become two closed contours (the outer and the inner
/// side), open subpaths a single closed contour including the caps.
/// Subpaths without length produce nothing. The outline is meant to be
/// filled with the nonzero winding rule.
///
/// ```
/// use ductus::{stroke, BezPath, Cap, Rect, Stroke, Tolerances};
///
/// let mut path = BezPath::new();
/// path.move_to((0.0, 0.0));
/// path.line_to((10.0, 0.0));
/// let style = Stroke::new(2.0).with_caps(Cap::Square);
/// let outline = stroke(&path, &style, Tolerances::default());
/// assert_eq!(outline.bounding_box(), Rect::new(-1.0, -1.0, 11.0, 1.0));
/// ```
pub fn stroke(
    path: impl IntoIterator<Item = PathEl>,
    style: &Stroke,
    tol: Tolerances,
) -> BezPath {
    let mut ctx = StrokeCtx::default();
    stroke_with(path, style, tol, &mut ctx);
    ctx.output
}

/// Expand a stroke into a fill, reusing the buffers of `ctx`.
///
/// See [`stroke`]; the result is also available as [`StrokeCtx::output`]
/// until the next call.
pub fn stroke_with<'a>(
    path: impl IntoIterator<Item = PathEl>,
    style: &Stroke,
    tol: Tolerances,
    ctx: &'a mut StrokeCtx,
) -> &'a BezPath {
    ctx.output.truncate(0);
    ctx.forward_path.truncate(0);
    ctx.backward_path.truncate(0);
    ctx.start_pt = Point::ORIGIN;
    ctx.last_pt = Point::ORIGIN;
    ctx.join_thresh = 2.0 * tol.tolerance / style.width;

    for el in path {
        let p0 = ctx.last_pt;
        match el {
            PathEl::MoveTo(p) => {
                ctx.finish(style, tol);
                ctx.start_pt = p;
                ctx.last_pt = p;
            }
            PathEl::LineTo(p1) => {
                let tangent = p1 - p0;
                if !tangent.is_zero(tol.epsilon) {
                    ctx.do_join(style, tol, tangent);
                    ctx.last_tan = tangent;
                    ctx.do_line(style, tangent, p1);
                }
            }
            PathEl::QuadTo(p1, p2) => {
                let q = QuadBez::new(p0, p1, p2);
                ctx.do_curve(style, tol, PathSeg::Quad(q));
            }
            PathEl::CurveTo(p1, p2, p3) => {
                let c = CubicBez::new(p0, p1, p2, p3);
                ctx.do_curve(style, tol, PathSeg::Cubic(c));
            }
            PathEl::ClosePath => {
                let tangent = ctx.start_pt - p0;
                if !tangent.is_zero(tol.epsilon) {
                    ctx.do_join(style, tol, tangent);
                    ctx.last_tan = tangent;
                    ctx.do_line(style, tangent, ctx.start_pt);
                }
                ctx.finish_closed(style, tol);
            }
        }
    }
    ctx.finish(style, tol);
    &ctx.output
}

/// Half a turn around `center`, starting at `center + norm`.
fn round_cap(out: &mut BezPath, tolerance: f64, center: Point, norm: Vec2) {
    round_join(out, tolerance, center, norm, PI);
}

/// An arc around `center` starting at `center + norm`, turning by `angle`.
fn round_join(out: &mut BezPath, tolerance: f64, center: Point, norm: Vec2, angle: f64) {
    let r = norm.hypot();
    let arc = Arc::new(center, (r, r), norm.atan2(), angle, 0.0);
    arc.to_cubic_beziers(tolerance, |p1, p2, p3| out.curve_to(p1, p2, p3));
}

/// A square cap from `center + norm` to `center - norm`, extending half
/// the width beyond `center`.
fn square_cap(out: &mut BezPath, close: bool, center: Point, norm: Vec2) {
    let ext = norm.turn_90();
    out.line_to(center + norm + ext);
    out.line_to(center - norm + ext);
    if close {
        out.close_path();
    } else {
        out.line_to(center - norm);
    }
}

fn extend_reversed(out: &mut BezPath, elements: &[PathEl]) {
    for i in (1..elements.len()).rev() {
        let Some(end) = elements[i - 1].end_point() else {
            continue;
        };
        match elements[i] {
            PathEl::LineTo(_) => out.line_to(end),
            PathEl::QuadTo(p1, _) => out.quad_to(p1, end),
            PathEl::CurveTo(p1, p2, _) => out.curve_to(p2, p1, end),
            PathEl::MoveTo(_) | PathEl::ClosePath => {}
        }
    }
}

/// The offset of the forward side at a point with tangent `tan`.
fn side_offset(style: &Stroke, tan: Vec2) -> Vec2 {
    tan.rot90_cw().with_length(0.5 * style.width)
}

impl StrokeCtx {
    /// Append forward and backward paths to output, with caps.
    fn finish(&mut self, style: &Stroke, tol: Tolerances) {
        if self.forward_path.is_empty() {
            self.forward_path.truncate(0);
            self.backward_path.truncate(0);
            return;
        }
        self.output.extend(self.forward_path.iter());
        let back_els = self.backward_path.elements();
        let Some(return_p) = back_els.last().and_then(PathEl::end_point) else {
            return;
        };
        let d = self.last_pt - return_p;
        match style.end_cap {
            Cap::Butt => self.output.line_to(return_p),
            Cap::Round => round_cap(&mut self.output, tol.tolerance, self.last_pt, d),
            Cap::Square => square_cap(&mut self.output, false, self.last_pt, d),
        }
        extend_reversed(&mut self.output, back_els);
        match style.start_cap {
            Cap::Butt => self.output.close_path(),
            Cap::Round => {
                round_cap(&mut self.output, tol.tolerance, self.start_pt, -self.start_norm);
                self.output.close_path();
            }
            Cap::Square => square_cap(&mut self.output, true, self.start_pt, -self.start_norm),
        }

        self.forward_path.truncate(0);
        self.backward_path.truncate(0);
    }

    /// Finish a closed path
    fn finish_closed(&mut self, style: &Stroke, tol: Tolerances) {
        if self.forward_path.is_empty() {
            self.forward_path.truncate(0);
            self.backward_path.truncate(0);
            self.last_pt = self.start_pt;
            return;
        }
        self.do_join(style, tol, self.start_tan);
        self.output.extend(self.forward_path.iter());
        self.output.close_path();
        let back_els = self.backward_path.elements();
        if let Some(last_pt) = back_els.last().and_then(PathEl::end_point) {
            self.output.move_to(last_pt);
            extend_reversed(&mut self.output, back_els);
            self.output.close_path();
        }
        self.forward_path.truncate(0);
        self.backward_path.truncate(0);
        self.last_pt = self.start_pt;
    }

    fn do_join(&mut self, style: &Stroke, tol: Tolerances, tan0: Vec2) {
        let norm = side_offset(style, tan0);
        let p0 = self.last_pt;
        if self.forward_path.is_empty() {
            self.forward_path.truncate(0);
            self.backward_path.truncate(0);
            self.forward_path.move_to(p0 + norm);
            self.backward_path.move_to(p0 - norm);
            self.start_tan = tan0;
            self.start_norm = norm;
            return;
        }
        let ab = self.last_tan;
        let cd = tan0;
        let cross = ab.cross(cd);
        let dot = ab.dot(cd);
        let hypot = Vec2::new(cross, dot).hypot();
        // Reversals always get a join, even though they are collinear.
        if cross.abs() < hypot * self.join_thresh && dot > 0.0 {
            return;
        }
        let last_norm = side_offset(style, ab);
        match style.join {
            Join::Bevel => {
                self.forward_path.line_to(p0 + norm);
                self.backward_path.line_to(p0 - norm);
            }
            Join::Miter => {
                if 2.0 * hypot < (hypot + dot) * style.miter_limit.powi(2) {
                    if cross > 0.0 {
                        let fp_last = p0 + last_norm;
                        let fp_this = p0 + norm;
                        let h = ab.cross(fp_this - fp_last) / cross;
                        self.forward_path.line_to(fp_this - cd * h);
                    } else if cross < 0.0 {
                        let fp_last = p0 - last_norm;
                        let fp_this = p0 - norm;
                        let h = ab.cross(fp_this - fp_last) / cross;
                        self.backward_path.line_to(fp_this - cd * h);
                    }
                }
                self.forward_path.line_to(p0 + norm);
                self.backward_path.line_to(p0 - norm);
            }
            Join::Round => {
                let angle = cross.atan2(dot);
                if cross > 0.0 {
                    self.backward_path.line_to(p0 - norm);
                    round_join(&mut self.forward_path, tol.tolerance, p0, last_norm, angle);
                } else {
                    // A reversal (cross == 0) turns through the front.
                    self.forward_path.line_to(p0 + norm);
                    round_join(
                        &mut self.backward_path,
                        tol.tolerance,
                        p0,
                        -last_norm,
                        -angle.abs(),
                    );
                }
            }
        }
    }

    fn do_line(&mut self, style: &Stroke, tangent: Vec2, p1: Point) {
        let norm = side_offset(style, tangent);
        self.forward_path.line_to(p1 + norm);
        self.backward_path.line_to(p1 - norm);
        self.last_pt = p1;
    }

    fn do_curve(&mut self, style: &Stroke, tol: Tolerances, seg: PathSeg) {
        let (tan0, tan1) = seg.tangents(tol.epsilon);
        if tan0.is_zero(tol.epsilon) {
            return;
        }
        self.do_join(style, tol, tan0);
        self.last_tan = tan1;
        let c = seg.to_cubic();
        offset_cubic_lines(&mut self.forward_path, c, 0.5 * style.width, tol);
        offset_cubic_lines(&mut self.backward_path, c, -0.5 * style.width, tol);
        self.last_pt = c.p3;
    }
}
