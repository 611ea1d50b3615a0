// Copyright 2025 the Ductus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Common mathematical operations

#![allow(missing_docs)]

use core::f64::consts::TAU;

use arrayvec::ArrayVec;

/// Defines a trait that chooses between libstd or libm implementations of float methods.
macro_rules! define_float_funcs {
    ($(
        fn $name:ident(self $(,$arg:ident: $arg_ty:ty)*) -> $ret:ty
        => $lname:ident;
    )+) => {
        #[cfg(not(feature = "std"))]
        pub(crate) trait FloatFuncs : Sized {
            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret;)+
        }

        #[cfg(not(feature = "std"))]
        impl FloatFuncs for f64 {
            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret {
                #[cfg(feature = "libm")]
                return libm::$lname(self $(,$arg as _)*);

                #[cfg(not(feature = "libm"))]
                compile_error!("ductus requires either the `std` or `libm` feature")
            })+
        }
    }
}

define_float_funcs! {
    fn abs(self) -> Self => fabs;
    fn asinh(self) -> Self => asinh;
    fn atan2(self, other: Self) -> Self => atan2;
    fn cbrt(self) -> Self => cbrt;
    fn ceil(self) -> Self => ceil;
    fn floor(self) -> Self => floor;
    fn copysign(self, sign: Self) -> Self => copysign;
    fn powf(self, n: Self) -> Self => pow;
    fn powi(self, n: i32) -> Self => pow;
    fn sin_cos(self) -> (Self, Self) => sincos;
    fn sqrt(self) -> Self => sqrt;
    fn tan(self) -> Self => tan;
}

/// Return values of x for which c0 + c1 x + c2 x² = 0.
///
/// If the equation is nearly linear, the root of the linear part is
/// returned and the other root (likely out of representable range) is
/// dropped. A double root is reported once. When all coefficients are
/// zero, a single `0.0` is returned.
///
/// The roots are sorted in ascending order.
pub fn solve_quadratic(c0: f64, c1: f64, c2: f64) -> ArrayVec<f64, 2> {
    let mut result = ArrayVec::new();
    let sc0 = c0 * c2.recip();
    let sc1 = c1 * c2.recip();
    if !sc0.is_finite() || !sc1.is_finite() {
        // c2 is zero or very small, treat as linear eqn
        let root = -c0 / c1;
        if root.is_finite() {
            result.push(root);
        } else if c0 == 0.0 && c1 == 0.0 {
            result.push(0.0);
        }
        return result;
    }
    let arg = sc1 * sc1 - 4. * sc0;
    let root1 = if !arg.is_finite() {
        // sc1 * sc1 overflowed; solve sc1 x + x² = 0 for one root,
        // the other is sc0 / root1.
        -sc1
    } else {
        if arg < 0.0 {
            return result;
        } else if arg == 0.0 {
            result.push(-0.5 * sc1);
            return result;
        }
        // See https://math.stackexchange.com/questions/866331
        -0.5 * (sc1 + arg.sqrt().copysign(sc1))
    };
    let root2 = sc0 / root1;
    if root2.is_finite() {
        if root2 > root1 {
            result.push(root1);
            result.push(root2);
        } else {
            result.push(root2);
            result.push(root1);
        }
    } else {
        result.push(root1);
    }
    result
}

/// Normalize an angle (in radians) into the range `[0, 2π)`.
#[inline]
pub fn normalize_angle(theta: f64) -> f64 {
    let theta = theta % TAU;
    if theta < 0.0 {
        // `-tiny + TAU` may round up to TAU itself.
        let wrapped = theta + TAU;
        if wrapped >= TAU {
            0.0
        } else {
            wrapped
        }
    } else {
        theta
    }
}

/// Whether `theta` lies in the angular span `[lower, upper]`, end points included.
///
/// The bounds may be given in either order and outside `[0, 2π)`; angles
/// are compared modulo 2π. `eps` widens the span on both ends.
pub fn angle_between(theta: f64, lower: f64, upper: f64, eps: f64) -> bool {
    let (lower, upper) = if upper < lower {
        (upper, lower)
    } else {
        (lower, upper)
    };
    if upper - lower >= TAU - eps {
        return true;
    }
    let theta = normalize_angle(theta - lower + eps);
    let span = normalize_angle(upper - lower + 2.0 * eps);
    theta <= span
}

/// Integrate `f` over `[a, b]` with the given Gauss-Legendre coefficients.
#[inline]
pub fn integrate(coeffs: &[(f64, f64)], a: f64, b: f64, mut f: impl FnMut(f64) -> f64) -> f64 {
    let half = 0.5 * (b - a);
    let mid = 0.5 * (a + b);
    coeffs
        .iter()
        .map(|&(wi, xi)| wi * f(mid + half * xi))
        .sum::<f64>()
        * half
}

// Tables of Legendre-Gauss quadrature coefficients, adapted from:
// <https://pomax.github.io/bezierinfo/legendre-gauss.html>

pub const GAUSS_LEGENDRE_COEFFS_8: &[(f64, f64)] = &[
    (0.3626837833783620, -0.1834346424956498),
    (0.3626837833783620, 0.1834346424956498),
    (0.3137066458778873, -0.5255324099163290),
    (0.3137066458778873, 0.5255324099163290),
    (0.2223810344533745, -0.7966664774136267),
    (0.2223810344533745, 0.7966664774136267),
    (0.1012285362903763, -0.9602898564975363),
    (0.1012285362903763, 0.9602898564975363),
];

pub const GAUSS_LEGENDRE_COEFFS_16: &[(f64, f64)] = &[
    (0.1894506104550685, -0.0950125098376374),
    (0.1894506104550685, 0.0950125098376374),
    (0.1826034150449236, -0.2816035507792589),
    (0.1826034150449236, 0.2816035507792589),
    (0.1691565193950025, -0.4580167776572274),
    (0.1691565193950025, 0.4580167776572274),
    (0.1495959888165767, -0.6178762444026438),
    (0.1495959888165767, 0.6178762444026438),
    (0.1246289712555339, -0.7554044083550030),
    (0.1246289712555339, 0.7554044083550030),
    (0.0951585116824928, -0.8656312023878318),
    (0.0951585116824928, 0.8656312023878318),
    (0.0622535239386479, -0.9445750230732326),
    (0.0622535239386479, 0.9445750230732326),
    (0.0271524594117541, -0.9894009349916499),
    (0.0271524594117541, 0.9894009349916499),
];

#[cfg(test)]
mod tests {
    use core::f64::consts::{FRAC_PI_2, PI};

    use crate::common::*;
    use arrayvec::ArrayVec;

    fn verify<const N: usize>(roots: ArrayVec<f64, N>, expected: &[f64]) {
        assert_eq!(expected.len(), roots.len(), "{roots:?} vs {expected:?}");
        let epsilon = 1e-12;
        for (root, exp) in roots.iter().zip(expected) {
            assert!((root - exp).abs() < epsilon, "{roots:?} vs {expected:?}");
        }
    }

    #[test]
    fn test_solve_quadratic() {
        verify(
            solve_quadratic(-5.0, 0.0, 1.0),
            &[-(5.0f64.sqrt()), 5.0f64.sqrt()],
        );
        verify(solve_quadratic(5.0, 0.0, 1.0), &[]);
        verify(solve_quadratic(5.0, 1.0, 0.0), &[-5.0]);
        verify(solve_quadratic(1.0, 2.0, 1.0), &[-1.0]);
        verify(solve_quadratic(0.0, 0.0, 0.0), &[0.0]);
        verify(solve_quadratic(1.0, -4.0, 4.0), &[0.5]);
    }

    #[test]
    fn normalize() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert!((normalize_angle(-FRAC_PI_2) - 1.5 * PI).abs() < 1e-12);
        assert!((normalize_angle(5.0 * PI) - PI).abs() < 1e-12);
        assert!(normalize_angle(-1e-300) < TAU);
    }

    #[test]
    fn between() {
        assert!(angle_between(FRAC_PI_2, 0.0, PI, 1e-10));
        assert!(angle_between(FRAC_PI_2, PI, 0.0, 1e-10));
        assert!(!angle_between(-FRAC_PI_2, PI, 0.0, 1e-10));
        assert!(angle_between(0.0, 0.0, PI, 1e-10));
        assert!(angle_between(PI, 0.0, PI, 1e-10));
        // Wrapped spans.
        assert!(angle_between(0.0, 1.5 * PI, 2.5 * PI, 1e-10));
        assert!(angle_between(2.0 * PI + 0.1, 0.0, 1.0, 1e-10));
        assert!(!angle_between(PI, 1.5 * PI, 2.5 * PI, 1e-10));
        // Full turns contain everything.
        assert!(angle_between(1.0, 0.0, 4.0 * PI, 1e-10));
    }

    #[test]
    fn gauss_legendre() {
        // Exact for polynomials of degree < 16.
        let x3 = integrate(GAUSS_LEGENDRE_COEFFS_8, 0.0, 2.0, |x| x * x * x);
        assert!((x3 - 4.0).abs() < 1e-12);
        let sin = integrate(GAUSS_LEGENDRE_COEFFS_16, 0.0, PI, f64::sin);
        assert!((sin - 2.0).abs() < 1e-12);
    }
}
