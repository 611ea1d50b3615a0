// Copyright 2025 the Ductus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Numeric thresholds used throughout the crate.

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// The pair of thresholds every approximating algorithm reads.
///
/// `epsilon` decides when two values are considered equal, when a vector is
/// considered zero and when a determinant is considered singular.
/// `tolerance` is the largest distance an approximation (a flattened arc,
/// a cubic standing in for an ellipse, an offset polyline) may deviate from
/// the exact geometry.
///
/// The value is passed by copy into each operation; derived quantities such
/// as segment counts are recomputed from it on every call.
///
/// ```
/// use ductus::Tolerances;
///
/// let tol = Tolerances::default().with_tolerance(0.5);
/// assert!(tol.is_zero(1e-12));
/// assert_eq!(tol.tolerance, 0.5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerances {
    /// Equality and degeneracy threshold.
    pub epsilon: f64,
    /// Maximum allowed deviation when approximating.
    pub tolerance: f64,
}

impl Tolerances {
    /// The default equality threshold.
    pub const DEFAULT_EPSILON: f64 = 1e-10;
    /// The default approximation tolerance.
    pub const DEFAULT_TOLERANCE: f64 = 0.01;

    /// Create a new set of thresholds.
    #[inline]
    pub const fn new(epsilon: f64, tolerance: f64) -> Self {
        Tolerances { epsilon, tolerance }
    }

    /// Builder method for setting the equality threshold.
    #[must_use]
    #[inline]
    pub const fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Builder method for setting the approximation tolerance.
    #[must_use]
    #[inline]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Whether `x` is zero within `epsilon`.
    #[inline]
    pub fn is_zero(&self, x: f64) -> bool {
        x.abs() <= self.epsilon
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Tolerances::new(Self::DEFAULT_EPSILON, Self::DEFAULT_TOLERANCE)
    }
}
