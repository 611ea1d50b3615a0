// Copyright 2025 the Ductus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Offsetting and stroking of Bézier paths.
//!
//! The ductus library is a 2D vector geometry kernel. It evaluates, measures,
//! splits and converts quadratic and cubic Bézier curves and elliptical arcs,
//! and produces offset curves and stroked outlines of arbitrary paths,
//! including curves that loop or cusp. It is meant to sit between the code
//! that produces vector outlines (fonts, drawing commands) and the code that
//! consumes them (rasterizers, document writers).
//!
//! Every approximating operation takes a [`Tolerances`] value, which bundles
//! the equality threshold used for degeneracy tests with the largest
//! deviation allowed in an approximation.
//!
//! # Examples
//!
//! Offsetting a single cubic:
//! ```
//! use ductus::{offset_cubic, CubicBez, PathEl, Tolerances};
//!
//! let c = CubicBez::new((0.0, 0.0), (0.0, 50.0), (50.0, 100.0), (100.0, 100.0));
//! let offset = offset_cubic(c, 5.0, Tolerances::default().with_tolerance(0.1));
//! assert!(matches!(offset.elements()[0], PathEl::MoveTo(_)));
//! assert!(offset.elements().len() > 2);
//! ```
//!
//! Converting an SVG arc and stroking the result:
//! ```
//! use ductus::{stroke, BezPath, Join, Stroke, Tolerances};
//!
//! let path = BezPath::from_svg("M0 0A50 50 0 0 1 100 0L100 50").unwrap();
//! let style = Stroke::new(4.0).with_join(Join::Miter);
//! let outline = stroke(&path, &style, Tolerances::default());
//! let bbox = outline.bounding_box();
//! assert!(bbox.y1 > 50.0);
//! ```
//!
//! # Feature Flags
//!
//! The following crate [feature flags](https://doc.rust-lang.org/cargo/reference/features.html#dependency-features) are available:
//!
//! - `std` (enabled by default): Get floating point functions from the standard library
//!   (likely using your target's libc).
//! - `libm`: Use floating point implementations from [libm][].
//!   This is useful for `no_std` environments.
//!   However, note that the `libm` crate is not as efficient as the standard library.
//! - `mint`: Enable `From`/`Into` conversion of Ductus and [mint][] types, enabling interoperability
//!   with other graphics libraries.
//! - `serde`: Implement `serde::Deserialize` and `serde::Serialize` on various types.
//! - `schemars`: Add best-effort support for using Ductus types in JSON schemas using [schemars][].
//!
//! At least one of `std` and `libm` is required; `std` overrides `libm`.
//! Note that Ductus does require that an allocator is available (i.e. it uses [alloc]).

// LINEBENDER LINT SET - lib.rs - v1
// See https://linebender.org/wiki/canonical-lints/
// These lints aren't included in Cargo.toml because they
// shouldn't apply to examples and tests
#![warn(unused_crate_dependencies)]
#![warn(clippy::print_stdout, clippy::print_stderr)]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]
#![allow(
    clippy::unreadable_literal,
    clippy::many_single_char_names,
    clippy::excessive_precision,
    clippy::bool_to_int_with_if
)]
// The following lints are part of the Linebender standard set,
// but resolving them has been deferred for now.
#![allow(
    missing_debug_implementations,
    elided_lifetimes_in_paths,
    single_use_lifetimes,
    trivial_numeric_casts,
    unnameable_types,
    clippy::use_self,
    clippy::return_self_not_must_use,
    clippy::cast_possible_truncation,
    clippy::wildcard_imports,
    clippy::shadow_unrelated,
    clippy::missing_assert_message,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::exhaustive_enums,
    clippy::match_same_arms,
    clippy::partial_pub_fields,
    clippy::unseparated_literal_suffix,
    clippy::duplicated_attributes,
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason
)]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("ductus requires either the `std` or `libm` feature");

// Suppress the unused_crate_dependencies lint when both std and libm are specified.
#[cfg(all(feature = "std", feature = "libm"))]
use libm as _;

extern crate alloc;

mod arc;
mod bezpath;
pub mod common;
mod cubicbez;
mod inflection;
mod intersect;
mod line;
pub mod offset;
mod param_curve;
mod point;
mod quadbez;
mod rect;
mod stroke;
mod svg;
mod tolerance;
mod vec2;

pub use crate::arc::{
    arc_to_cubic, arc_to_quad, ellipse_curvature_radius, ellipse_deriv, ellipse_deriv2,
    ellipse_length, ellipse_normal, ellipse_point, flatten_arc, Arc, ArcAppendIter, ArcQuadIter,
    SvgArc, MAX_ARC_SEGMENTS,
};
pub use crate::bezpath::{BezPath, BezPathSegs, PathEl, PathSeg};
pub use crate::cubicbez::CubicBez;
pub use crate::intersect::{intersect_circle_circle, intersect_line_line, intersect_ray_circle};
pub use crate::line::{ConstPoint, Line, LineCrossing};
pub use crate::offset::{
    flatten_offset, offset_cubic, offset_cubic_into, offset_point, MAX_OFFSET_SEGMENTS,
};
pub use crate::param_curve::{
    ParamCurve, ParamCurveArclen, ParamCurveCurvature, ParamCurveDeriv, ParamCurveExtrema,
    DEFAULT_ACCURACY, MAX_EXTREMA,
};
pub use crate::point::Point;
pub use crate::quadbez::QuadBez;
pub use crate::rect::Rect;
pub use crate::stroke::{stroke, stroke_with, Cap, Join, Stroke, StrokeCtx};
pub use crate::svg::SvgParseError;
pub use crate::tolerance::Tolerances;
pub use crate::vec2::Vec2;
