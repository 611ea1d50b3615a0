// Copyright 2025 the Ductus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG path representation.

use core::fmt;

use alloc::string::String;

use crate::{BezPath, PathEl, Point, Tolerances, Vec2};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

impl BezPath {
    /// Convert the path to an SVG path string representation.
    ///
    /// The current implementation doesn't take any special care to produce a
    /// short string (reducing precision, using relative movement).
    ///
    /// ```
    /// use ductus::BezPath;
    ///
    /// let mut path = BezPath::new();
    /// path.move_to((0.0, 0.0));
    /// path.line_to((1.0, 2.5));
    /// path.close_path();
    /// assert_eq!(path.to_svg(), "M0 0L1 2.5Z");
    /// ```
    pub fn to_svg(&self) -> String {
        let mut result = String::new();
        // Writing to a `String` cannot fail.
        let _ = self.write_svg(&mut result);
        result
    }

    /// Write the SVG representation of this path to the provided writer.
    pub fn write_svg<W: fmt::Write>(&self, w: &mut W) -> fmt::Result {
        for el in self.elements() {
            match *el {
                PathEl::MoveTo(p) => write!(w, "M{} {}", p.x, p.y)?,
                PathEl::LineTo(p) => write!(w, "L{} {}", p.x, p.y)?,
                PathEl::QuadTo(p1, p2) => write!(w, "Q{} {} {} {}", p1.x, p1.y, p2.x, p2.y)?,
                PathEl::CurveTo(p1, p2, p3) => write!(
                    w,
                    "C{} {} {} {} {} {}",
                    p1.x, p1.y, p2.x, p2.y, p3.x, p3.y
                )?,
                PathEl::ClosePath => write!(w, "Z")?,
            }
        }
        Ok(())
    }

    /// Try to parse a bezier path from an SVG path element.
    ///
    /// All commands of the path notation are supported, in their absolute
    /// and relative forms. Arcs are converted to cubic Béziers with the
    /// default [`Tolerances`]; use [`BezPath::arc_to`] for other tolerances.
    pub fn from_svg(data: &str) -> Result<BezPath, SvgParseError> {
        let mut lexer = SvgLexer::new(data);
        let mut path = BezPath::new();
        let mut last_cmd = 0;
        let mut start_pt = Point::ORIGIN;
        let mut closed = false;
        // Control points available for reflection by `S` and `T`.
        let mut cubic_ctrl = None;
        let mut quad_ctrl = None;
        while let Some(c) = lexer.get_cmd(last_cmd)? {
            if closed && !matches!(c, b'm' | b'M') {
                path.move_to(start_pt);
            }
            closed = false;
            let last_pt = lexer.last_pt;
            let (mut next_cubic_ctrl, mut next_quad_ctrl) = (None, None);
            match c {
                b'm' | b'M' => {
                    let pt = lexer.get_maybe_relative(c)?;
                    path.move_to(pt);
                    lexer.last_pt = pt;
                    start_pt = pt;
                    cubic_ctrl = None;
                    quad_ctrl = None;
                    // Further coordinate pairs are implicit line-tos.
                    last_cmd = c - (b'M' - b'L');
                    continue;
                }
                b'l' | b'L' => {
                    let pt = lexer.get_maybe_relative(c)?;
                    path.line_to(pt);
                    lexer.last_pt = pt;
                }
                b'h' | b'H' => {
                    let mut x = lexer.get_number()?;
                    lexer.opt_comma();
                    if c == b'h' {
                        x += last_pt.x;
                    }
                    let pt = Point::new(x, last_pt.y);
                    path.line_to(pt);
                    lexer.last_pt = pt;
                }
                b'v' | b'V' => {
                    let mut y = lexer.get_number()?;
                    lexer.opt_comma();
                    if c == b'v' {
                        y += last_pt.y;
                    }
                    let pt = Point::new(last_pt.x, y);
                    path.line_to(pt);
                    lexer.last_pt = pt;
                }
                b'q' | b'Q' => {
                    let p1 = lexer.get_maybe_relative(c)?;
                    let p2 = lexer.get_maybe_relative(c)?;
                    path.quad_to(p1, p2);
                    lexer.last_pt = p2;
                    next_quad_ctrl = Some(p1);
                }
                b't' | b'T' => {
                    let p1 = reflect(last_pt, quad_ctrl);
                    let p2 = lexer.get_maybe_relative(c)?;
                    path.quad_to(p1, p2);
                    lexer.last_pt = p2;
                    next_quad_ctrl = Some(p1);
                }
                b'c' | b'C' => {
                    let p1 = lexer.get_maybe_relative(c)?;
                    let p2 = lexer.get_maybe_relative(c)?;
                    let p3 = lexer.get_maybe_relative(c)?;
                    path.curve_to(p1, p2, p3);
                    lexer.last_pt = p3;
                    next_cubic_ctrl = Some(p2);
                }
                b's' | b'S' => {
                    let p1 = reflect(last_pt, cubic_ctrl);
                    let p2 = lexer.get_maybe_relative(c)?;
                    let p3 = lexer.get_maybe_relative(c)?;
                    path.curve_to(p1, p2, p3);
                    lexer.last_pt = p3;
                    next_cubic_ctrl = Some(p2);
                }
                b'a' | b'A' => {
                    let rx = lexer.get_number()?;
                    lexer.opt_comma();
                    let ry = lexer.get_number()?;
                    lexer.opt_comma();
                    let x_rotation = lexer.get_number()?.to_radians();
                    lexer.opt_comma();
                    let large_arc = lexer.get_flag()?;
                    let sweep = lexer.get_flag()?;
                    let to = lexer.get_maybe_relative(c)?;
                    let radii = Vec2::new(rx.abs(), ry.abs());
                    path.arc_to(radii, x_rotation, large_arc, sweep, to, Tolerances::default());
                    lexer.last_pt = to;
                }
                b'z' | b'Z' => {
                    path.close_path();
                    lexer.last_pt = start_pt;
                    closed = true;
                    last_cmd = 0;
                    cubic_ctrl = None;
                    quad_ctrl = None;
                    continue;
                }
                _ => return Err(SvgParseError::UnknownCommand(c as char)),
            }
            cubic_ctrl = next_cubic_ctrl;
            quad_ctrl = next_quad_ctrl;
            last_cmd = c;
        }
        Ok(path)
    }
}

/// The reflection of `ctrl` about `pt`, or `pt` itself when there is no
/// control point to reflect.
fn reflect(pt: Point, ctrl: Option<Point>) -> Point {
    ctrl.map_or(pt, |ctrl| pt + (pt - ctrl))
}

/// An error which can be returned when parsing an SVG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SvgParseError {
    /// A number was expected.
    Wrong,
    /// The input string ended while still expecting input.
    UnexpectedEof,
    /// Encountered an unknown command letter.
    UnknownCommand(char),
}

impl fmt::Display for SvgParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SvgParseError::Wrong => write!(f, "Unable to parse a number"),
            SvgParseError::UnexpectedEof => write!(f, "Unexpected EOF"),
            SvgParseError::UnknownCommand(letter) => write!(f, "Unknown command, \"{letter}\""),
        }
    }
}

impl core::error::Error for SvgParseError {}

struct SvgLexer<'a> {
    data: &'a str,
    ix: usize,
    last_pt: Point,
}

impl SvgLexer<'_> {
    fn new(data: &str) -> SvgLexer<'_> {
        SvgLexer {
            data,
            ix: 0,
            last_pt: Point::ORIGIN,
        }
    }

    fn skip_ws(&mut self) {
        while let Some(&c) = self.data.as_bytes().get(self.ix) {
            if !(c == b' ' || c == 9 || c == 10 || c == 12 || c == 13) {
                break;
            }
            self.ix += 1;
        }
    }

    fn get_cmd(&mut self, last_cmd: u8) -> Result<Option<u8>, SvgParseError> {
        self.skip_ws();
        match self.peek() {
            None => Ok(None),
            Some(c) if c.is_ascii_alphabetic() => {
                self.ix += 1;
                Ok(Some(c))
            }
            // Plausible number start: the last command repeats.
            Some(c)
                if last_cmd != 0
                    && (c == b'-' || c == b'+' || c == b'.' || c.is_ascii_digit()) =>
            {
                Ok(Some(last_cmd))
            }
            Some(_) => Err(SvgParseError::Wrong),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.data.as_bytes().get(self.ix).copied()
    }

    fn get_byte(&mut self) -> Option<u8> {
        self.data.as_bytes().get(self.ix).map(|&c| {
            self.ix += 1;
            c
        })
    }

    fn unget(&mut self) {
        self.ix -= 1;
    }

    fn get_number(&mut self) -> Result<f64, SvgParseError> {
        self.skip_ws();
        let start = self.ix;
        let c = self.get_byte().ok_or(SvgParseError::UnexpectedEof)?;
        if !(c == b'-' || c == b'+') {
            self.unget();
        }
        let mut digit_count = 0;
        let mut seen_period = false;
        while let Some(c) = self.get_byte() {
            if c.is_ascii_digit() {
                digit_count += 1;
            } else if c == b'.' && !seen_period {
                seen_period = true;
            } else {
                self.unget();
                break;
            }
        }
        if digit_count == 0 {
            return Err(SvgParseError::Wrong);
        }
        if let Some(b'e' | b'E') = self.peek() {
            let mark = self.ix;
            self.ix += 1;
            if let Some(b'-' | b'+') = self.peek() {
                self.ix += 1;
            }
            let exp_start = self.ix;
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.ix += 1;
            }
            if self.ix == exp_start {
                self.ix = mark;
            }
        }
        self.data[start..self.ix]
            .parse()
            .map_err(|_| SvgParseError::Wrong)
    }

    fn get_flag(&mut self) -> Result<bool, SvgParseError> {
        self.skip_ws();
        let flag = match self.get_byte().ok_or(SvgParseError::UnexpectedEof)? {
            b'0' => false,
            b'1' => true,
            _ => return Err(SvgParseError::Wrong),
        };
        self.opt_comma();
        Ok(flag)
    }

    fn get_number_pair(&mut self) -> Result<Point, SvgParseError> {
        let x = self.get_number()?;
        self.opt_comma();
        let y = self.get_number()?;
        self.opt_comma();
        Ok(Point::new(x, y))
    }

    fn get_maybe_relative(&mut self, cmd: u8) -> Result<Point, SvgParseError> {
        let pt = self.get_number_pair()?;
        if cmd.is_ascii_lowercase() {
            Ok(self.last_pt + pt.to_vec2())
        } else {
            Ok(pt)
        }
    }

    fn opt_comma(&mut self) {
        self.skip_ws();
        if let Some(c) = self.get_byte() {
            if c != b',' {
                self.unget();
            }
        }
    }
}
