// Copyright 2025 the Ductus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Offset curves of cubic Béziers, flattened to polylines.
//!
//! The offset of a cubic by a distance `d` is the curve traced by
//! `c(t) + d n(t)`, with `n` the unit normal on the [`Vec2::rot90_cw`] side of
//! the tangent. It is approximated by a polyline whose vertices lie exactly on
//! the offset curve, following Hain et al., "Fast, precise flattening of cubic
//! Bézier path and offset curves" (2005): the curve is cut into flat heads,
//! and small ranges around inflection points, where the offset can cusp or
//! loop, are bridged by a single line.
//!
//! [`Vec2::rot90_cw`]: crate::Vec2::rot90_cw

use smallvec::SmallVec;

use crate::{BezPath, CubicBez, ParamCurve, Point, Tolerances};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// The largest number of points the flattening of a single curve emits.
///
/// Flat heads are never shorter than `1 / MAX_OFFSET_SEGMENTS` in the
/// parameter of the curve, which bounds the work for a vanishing tolerance.
pub const MAX_OFFSET_SEGMENTS: usize = 4096;

/// The point at distance `d` from the curve at parameter `t`, along the
/// normal.
///
/// Returns `None` for a curve whose end points coincide within `epsilon`.
///
/// ```
/// use ductus::{offset_point, CubicBez, Point};
///
/// let c = CubicBez::new((0.0, 0.0), (2.0 / 3.0, 0.0), (1.0, 1.0 / 3.0), (1.0, 1.0));
/// let p = offset_point(c, 1.0, 0.5, 1e-10).unwrap();
/// assert!(p.approx_eq(Point::new(1.5, 1.0), 1e-12));
/// ```
pub fn offset_point(c: CubicBez, t: f64, d: f64, epsilon: f64) -> Option<Point> {
    if c.p0.approx_eq(c.p3, epsilon) {
        return None;
    }
    Some(offset_at(&c, t, d, epsilon))
}

#[inline]
fn offset_at(c: &CubicBez, t: f64, d: f64, epsilon: f64) -> Point {
    c.eval(t) + c.normal(t, d, epsilon)
}

/// Flatten the offset of a curve without inflections, appending `LineTo`s.
///
/// The offset of the start point is not emitted; the last point emitted is
/// the offset of the end point. The curve is repeatedly split at
/// `t = min(t2, t3)`, the parameter up to which its head deviates at most
/// `tol.tolerance` from its start tangent, estimated from the distances of
/// `p2` (`t2 = 2 sqrt(f |D| / 3|s2|)`) and `p3` (`t3 = 2 cbrt(f |D| / |s3|)`)
/// to that tangent.
///
/// On the outer side of a bend the offset of a head sags more than the head
/// itself, by about `1 + |d| / R` for a radius of curvature `R`. A head whose
/// offset chord sags by more than `tol.tolerance` at its midpoint is halved
/// until it does not. When the source head already sags by more than that,
/// its own sag (with 1% slack) is the limit instead, so the result does not
/// change as `d` goes to zero.
///
/// Inflections must have been removed first; see [`offset_cubic`].
pub fn flatten_offset(out: &mut BezPath, c: CubicBez, d: f64, tol: Tolerances) {
    let epsilon = tol.epsilon;
    let min_step = 1.0 / MAX_OFFSET_SEGMENTS as f64;
    let mut c = c;
    // Parameter of `c.p0` in the curve we started with.
    let mut t_start = 0.0;
    loop {
        let mut tangent = c.p1 - c.p0;
        if tangent.is_zero(epsilon) {
            tangent = c.p2 - c.p0;
        }
        let denom = tangent.hypot();
        if tol.is_zero(denom) {
            break;
        }
        let s2 = tangent.cross(c.p2 - c.p0);
        let s3 = tangent.cross(c.p3 - c.p0);
        let t2 = 2.0 * (tol.tolerance * denom / (3.0 * s2.abs())).sqrt();
        let t3 = 2.0 * (tol.tolerance * denom / s3.abs()).cbrt();
        let floor = min_step / (1.0 - t_start);
        let mut t = t2.min(t3).max(floor);
        if t.is_nan() {
            break;
        }
        t = t.min(1.0);
        if !tol.is_zero(d) {
            while t > floor && !offset_head_is_flat(&c, t, d, tol) {
                t = (0.5 * t).max(floor);
            }
        }
        if t >= 1.0 {
            break;
        }
        c = c.split(t).1;
        t_start += t * (1.0 - t_start);
        out.line_to(offset_at(&c, 0.0, d, epsilon));
    }
    out.line_to(offset_at(&c, 1.0, d, epsilon));
}

/// Whether the chord of the offset of `c` over `0..t` is flat enough.
fn offset_head_is_flat(c: &CubicBez, t: f64, d: f64, tol: Tolerances) -> bool {
    let source = chord_sag(c, t, 0.0, tol.epsilon);
    let limit = if source <= tol.tolerance {
        tol.tolerance
    } else {
        source * 1.01
    };
    chord_sag(c, t, d, tol.epsilon) <= limit
}

/// Distance of the offset point at `t / 2` from the chord between the offset
/// points at `0` and `t`.
fn chord_sag(c: &CubicBez, t: f64, d: f64, epsilon: f64) -> f64 {
    let a = offset_at(c, 0.0, d, epsilon);
    let b = offset_at(c, t, d, epsilon);
    let m = offset_at(c, 0.5 * t, d, epsilon);
    let chord = b - a;
    let len = chord.hypot();
    if len <= epsilon {
        m.distance(a)
    } else {
        chord.cross(m - a).abs() / len
    }
}

/// Offset a cubic Bézier by `d`, as a polyline.
///
/// The result is a `MoveTo` to the offset start point followed by `LineTo`s.
/// A curve whose control points all coincide yields an empty path.
///
/// ```
/// use ductus::{offset_cubic, CubicBez, PathEl, Point, Tolerances};
///
/// let c = CubicBez::new((0.0, 0.0), (1.0, 1.0), (0.0, 1.0), (1.0, 0.0));
/// let path = offset_cubic(c, 0.1, Tolerances::default().with_tolerance(1.0));
/// assert_eq!(path.elements().len(), 2);
/// ```
pub fn offset_cubic(c: CubicBez, d: f64, tol: Tolerances) -> BezPath {
    let mut out = BezPath::new();
    offset_cubic_into(&mut out, c, d, tol);
    out
}

/// Like [`offset_cubic`], but appends to a caller-owned path.
pub fn offset_cubic_into(out: &mut BezPath, c: CubicBez, d: f64, tol: Tolerances) {
    if c.is_point(tol.epsilon) {
        return;
    }
    out.move_to(offset_at(&c, 0.0, d, tol.epsilon));
    offset_cubic_lines(out, c, d, tol);
}

/// The `LineTo`s of [`offset_cubic`], without the initial `MoveTo`.
pub(crate) fn offset_cubic_lines(out: &mut BezPath, c: CubicBez, d: f64, tol: Tolerances) {
    let epsilon = tol.epsilon;
    let mut ranges: SmallVec<[(f64, f64); 2]> = c
        .inflections()
        .into_iter()
        .map(|t| {
            let (t0, t1) = c.inflection_range(t, tol.tolerance, epsilon);
            (t0.max(0.0), t1.min(1.0))
        })
        .collect();
    ranges.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));

    // Regular intervals are flattened, each inflection range is bridged by
    // a line to its end. Overlapping ranges are bridged one after the other.
    let mut t0 = 0.0;
    for (start, end) in ranges {
        if end <= t0 {
            continue;
        }
        if start > t0 {
            flatten_offset(out, c.subsegment(t0..start), d, tol);
        }
        out.line_to(offset_at(&c, end, d, epsilon));
        t0 = end;
    }
    if t0 < 1.0 {
        flatten_offset(out, c.subsegment(t0..1.0), d, tol);
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;
    use crate::{PathEl, Point, Vec2};

    const EPS: f64 = 1e-10;

    fn tol(tolerance: f64) -> Tolerances {
        Tolerances::default().with_tolerance(tolerance)
    }

    fn test_curve() -> CubicBez {
        CubicBez::new((0.0, 0.0), (2.0 / 3.0, 0.0), (1.0, 1.0 / 3.0), (1.0, 1.0))
    }

    fn vertices(path: &BezPath) -> Vec<Point> {
        path.elements()
            .iter()
            .map(|el| match *el {
                PathEl::MoveTo(p) | PathEl::LineTo(p) => p,
                _ => panic!("unexpected element {el:?}"),
            })
            .collect()
    }

    fn assert_vertices(path: &BezPath, expected: &[(f64, f64)]) {
        let actual = vertices(path);
        assert_eq!(actual.len(), expected.len(), "{actual:?}");
        for (p, q) in actual.iter().zip(expected) {
            assert!(p.approx_eq((*q).into(), 1e-4), "{actual:?}");
        }
    }

    #[test]
    fn offset_points() {
        let c = test_curve();
        let p = offset_point(c, 0.0, 0.5, EPS).unwrap();
        assert!(p.approx_eq(Point::new(0.0, -0.5), 1e-12));
        let p = offset_point(c, 1.0, 0.5, EPS).unwrap();
        assert!(p.approx_eq(Point::new(1.5, 1.0), 1e-12));
        let closed = CubicBez::new(c.p0, c.p1, c.p0, c.p0);
        assert!(offset_point(closed, 0.0, 0.5, EPS).is_none());
    }

    #[test]
    fn flatten_offset_heads() {
        // With no offset, only the flatness estimate of the source cuts heads.
        let c = test_curve();
        let mut out = BezPath::new();
        flatten_offset(&mut out, c, 0.0, tol(0.5));
        assert_vertices(&out, &[(1.0, 1.0)]);

        let mut out = BezPath::new();
        flatten_offset(&mut out, c, 0.0, tol(0.125));
        assert_vertices(&out, &[(0.914214, 0.5), (1.0, 1.0)]);

        // The outer offset sags more than the source, so heads are halved.
        let mut out = BezPath::new();
        flatten_offset(&mut out, c, 0.5, tol(0.125));
        assert_vertices(
            &out,
            &[(0.822028, -0.313678), (1.325623, 0.200327), (1.5, 1.0)],
        );

        // Coincident start and first control point.
        let c = CubicBez::new(c.p0, c.p0, c.p2, c.p3);
        let mut out = BezPath::new();
        flatten_offset(&mut out, c, 0.0, tol(0.125));
        assert_vertices(&out, &[(1.0, 1.0)]);
        let mut out = BezPath::new();
        flatten_offset(&mut out, c, 0.5, tol(0.125));
        assert_vertices(&out, &[(0.777350, -0.166025), (1.24375, 0.2625), (1.5, 1.0)]);
    }

    #[test]
    fn flatten_offset_zero_tolerance_terminates() {
        let mut out = BezPath::new();
        flatten_offset(&mut out, test_curve(), 0.5, tol(0.0));
        let n = out.elements().len();
        assert!(n > 100 && n <= MAX_OFFSET_SEGMENTS + 2, "{n}");
        assert!(out.current_position().unwrap().approx_eq(Point::new(1.5, 1.0), 1e-12));
    }

    #[test]
    fn offset_across_inflections() {
        // Single inflection, its range covers the whole curve.
        let c = CubicBez::new((0.0, 0.0), (1.0, 1.0), (0.0, 1.0), (1.0, 0.0));
        let path = offset_cubic(c, 0.1, tol(1.0));
        assert_vertices(&path, &[(0.070711, -0.070711), (0.92929, -0.070711)]);

        // Two inflections.
        let c = CubicBez::new((0.0, 0.0), (0.9, 1.0), (0.1, 1.0), (1.0, 0.0));
        let path = offset_cubic(c, 0.1, tol(1.0));
        assert_vertices(&path, &[(0.074329, -0.066896), (0.92567, -0.066896)]);

        // One inflection, its range reaches beyond the end.
        let c = CubicBez::new((0.0, 0.0), (80.0, 100.0), (80.0, -100.0), (100.0, 0.0));
        let path = offset_cubic(c, 0.1, tol(50.0));
        assert_vertices(
            &path,
            &[
                (0.078087, -0.062470),
                (11.921625, 13.185736),
                (100.098058, -0.019612),
            ],
        );
    }

    #[test]
    fn offset_long_curves() {
        let tol = tol(0.1);
        let c = CubicBez::new((16.0, 467.0), (185.0, 95.0), (673.0, 545.0), (810.0, 17.0));
        let v = vertices(&offset_cubic(c, 0.1, tol));
        assert_eq!(v.len(), 55);
        for (p, q) in v.iter().zip([
            (15.908954972453508, 466.95863814608776),
            (23.48456098319597, 451.2405990921657),
            (31.406915423123145, 436.61248142864105),
        ]) {
            assert!(p.approx_eq(q.into(), 1e-6), "{p:?}");
        }
        assert!(v[54].approx_eq(Point::new(809.9032052603823, 16.97488469824313), 1e-6));

        // Two close inflections with overlapping ranges.
        let c = CubicBez::new((859.0, 676.0), (13.0, 422.0), (781.0, 12.0), (266.0, 425.0));
        let v = vertices(&offset_cubic(c, 0.1, tol));
        assert_eq!(v.len(), 48);
        assert!(v[39].approx_eq(Point::new(460.56771394585064, 250.1522891099844), 1e-6));
        assert!(v[40].approx_eq(Point::new(457.8624602450436, 253.36801392951682), 1e-6));

        for (c, n) in [
            (((872.0, 686.0), (11.0, 423.0), (779.0, 13.0), (220.0, 376.0)), 49),
            (((819.0, 566.0), (43.0, 18.0), (826.0, 18.0), (25.0, 533.0)), 45),
            (((884.0, 574.0), (135.0, 14.0), (678.0, 14.0), (14.0, 566.0)), 41),
        ] {
            let c = CubicBez::new(c.0, c.1, c.2, c.3);
            let path = offset_cubic(c, 0.1, tol);
            assert_eq!(path.elements().len(), n);
        }
    }

    #[test]
    fn offset_bounds() {
        let c = CubicBez::new((0.0, 0.0), (30.0, 0.0), (30.0, 10.0), (25.0, 10.0));
        let bbox = offset_cubic(c, 5.0, tol(0.01)).bounding_box();
        assert!((bbox.x0 - 0.0).abs() < 1e-6, "{bbox:?}");
        assert!((bbox.y0 + 5.0).abs() < 1e-6, "{bbox:?}");
        assert!((bbox.y1 - 15.0).abs() < 1e-6, "{bbox:?}");
        // Vertices lie on the offset, whose rightmost point is at 32.478775.
        assert!(bbox.x1 <= 32.478776, "{bbox:?}");
        assert!(bbox.x1 > 32.478775 - 0.01, "{bbox:?}");
    }

    #[test]
    fn offset_degenerate() {
        let p = Point::new(3.0, 4.0);
        let path = offset_cubic(CubicBez::new(p, p, p, p), 1.0, Tolerances::default());
        assert!(path.is_empty());

        // A straight line is offset by a single line.
        let c = CubicBez::new((0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0));
        let path = offset_cubic(c, 1.0, Tolerances::default());
        assert_vertices(&path, &[(0.0, -1.0), (3.0, -1.0)]);
    }

    #[test]
    fn offset_vertices_lie_at_distance() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut random_point = || Point::new(rng.random::<f64>(), rng.random::<f64>());
        for _ in 0..100 {
            let c = CubicBez::new(
                random_point(),
                random_point(),
                random_point(),
                random_point(),
            );
            let samples: Vec<Point> = (0..=4000).map(|i| c.eval(f64::from(i) / 4000.0)).collect();
            for d in [0.0, 0.05, -0.1] {
                let path = offset_cubic(c, d, Tolerances::default());
                let v = vertices(&path);
                assert!(v[0].approx_eq(c.p0 + c.normal(0.0, d, EPS), 1e-12));
                let last = v[v.len() - 1];
                assert!(last.approx_eq(c.p3 + c.normal(1.0, d, EPS), 1e-12));
                for p in v {
                    let dist = samples
                        .iter()
                        .map(|s| s.distance(p))
                        .fold(f64::INFINITY, f64::min);
                    assert!(dist <= d.abs() + 1e-3, "{p:?} at {dist} from {c:?}");
                }
            }
        }
    }

    /// The largest difference between `|d|` and the distance from the
    /// source curve, over points sampled along every segment of `path`.
    fn max_chord_deviation(c: CubicBez, path: &BezPath, d: f64, n: usize) -> f64 {
        let samples: Vec<Point> = (0..=n).map(|i| c.eval(i as f64 / n as f64)).collect();
        let v = vertices(path);
        let mut max = 0.0_f64;
        for w in v.windows(2) {
            for k in 0..=8 {
                let p = w[0].lerp(w[1], f64::from(k) / 8.0);
                let dist = samples
                    .iter()
                    .map(|s| s.distance(p))
                    .fold(f64::INFINITY, f64::min);
                max = max.max((dist - d.abs()).abs());
            }
        }
        max
    }

    #[test]
    fn offset_chords_follow_quarter_circle() {
        let tol = tol(0.01);
        // Counterclockwise, so positive distances are on the outside.
        let c = CubicBez::new((10.0, 0.0), (10.0, 5.52), (5.52, 10.0), (0.0, 10.0));
        let plain = offset_cubic(c, 0.0, tol).elements().len();
        for d in [5.0, 10.0, 40.0, -5.0] {
            let path = offset_cubic(c, d, tol);
            let dev = max_chord_deviation(c, &path, d, 4000);
            assert!(dev <= tol.tolerance, "d = {d}: {dev}");
            if d > 0.0 {
                assert!(path.elements().len() > plain, "d = {d}");
            }
        }
    }

    #[test]
    fn offset_chords_follow_random_arcs() {
        let tol = tol(0.01);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..32 {
            let center = Point::new(rng.random_range(-50.0..50.0), rng.random_range(-50.0..50.0));
            let r = rng.random_range(1.0..20.0);
            let a0 = rng.random_range(0.0..core::f64::consts::TAU);
            let sweep = rng.random_range(0.2..core::f64::consts::FRAC_PI_2);
            let k = 4.0 / 3.0 * (sweep / 4.0).tan() * r;
            let a1 = a0 + sweep;
            let p0 = center + Vec2::from_angle(a0) * r;
            let p3 = center + Vec2::from_angle(a1) * r;
            let c = CubicBez::new(
                p0,
                p0 + Vec2::from_angle(a0).turn_90() * k,
                p3 - Vec2::from_angle(a1).turn_90() * k,
                p3,
            );
            // Outside, out to several radii, and inside, short of the center.
            let outer = rng.random_range(0.25..5.0 * r);
            let inner = -rng.random_range(0.25..0.5 * r);
            for d in [outer, inner] {
                let path = offset_cubic(c, d, tol);
                let dev = max_chord_deviation(c, &path, d, 2000);
                // A flat head of the source itself may overshoot by a few
                // percent; the offset adds no more than 1% on top of that.
                assert!(dev <= 1.05 * tol.tolerance, "{c:?} at {d}: {dev}");
            }
        }
    }
}
