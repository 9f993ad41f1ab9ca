// Copyright 2025 the Glyph Grid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mathematical helper functions.

use core::f64::consts::PI;
use smallvec::SmallVec;

#[cfg(not(feature = "std"))]
use peniko::kurbo::common::FloatFuncs as _;

/// Tolerance used when deciding whether a curve is locally linear along an axis.
pub(crate) const EPSILON: f64 = 1e-5;

/// Tolerance used by the polynomial solvers.
pub(crate) const PRECISION: f64 = 1e-8;

/// A number of useful methods for f64 numbers.
pub(crate) trait FloatExt: Sized {
    /// Whether the number is approximately 0.
    fn is_nearly_zero(&self) -> bool {
        self.is_nearly_zero_within_tolerance(EPSILON)
    }

    /// Whether the number is approximately 0, with a given tolerance.
    fn is_nearly_zero_within_tolerance(&self, tolerance: f64) -> bool;
}

impl FloatExt for f64 {
    #[inline(always)]
    fn is_nearly_zero_within_tolerance(&self, tolerance: f64) -> bool {
        debug_assert!(tolerance >= 0.0, "tolerance must be positive");

        self.abs() <= tolerance
    }
}

/// Real roots of `a*x^2 + b*x + c = 0`.
///
/// Falls back to the linear equation when `a` vanishes. A double root is
/// reported once.
pub(crate) fn solve_quadratic(a: f64, b: f64, c: f64) -> SmallVec<[f64; 2]> {
    let mut roots: SmallVec<[f64; 2]> = SmallVec::new();
    if a.is_nearly_zero_within_tolerance(PRECISION) {
        if b != 0.0 {
            roots.push(-c / b);
        }
        return roots;
    }
    let discriminant = b * b - 4.0 * a * c;
    if discriminant.is_nearly_zero_within_tolerance(PRECISION) {
        roots.push(-b / (2.0 * a));
    } else if discriminant > 0.0 {
        let sqrt = discriminant.sqrt();
        roots.push((-b - sqrt) / (2.0 * a));
        roots.push((-b + sqrt) / (2.0 * a));
    }
    roots
}

/// Real roots of `a*x^3 + b*x^2 + c*x + d = 0`.
///
/// Uses Cardano's method in the formulation of R.W.D. Nickalls,
/// "A new approach to solving the cubic" (doi:10.2307/3619777).
pub(crate) fn solve_cubic(a: f64, b: f64, c: f64, d: f64) -> SmallVec<[f64; 3]> {
    if a.is_nearly_zero_within_tolerance(PRECISION) {
        return solve_quadratic(b, c, d).into_iter().collect();
    }

    let mut roots: SmallVec<[f64; 3]> = SmallVec::new();

    // Point of symmetry.
    let xn = -b / (3.0 * a);
    let yn = ((a * xn + b) * xn + c) * xn + d;

    let delta_sq = (b * b - 3.0 * a * c) / (9.0 * a * a);
    let h_sq = 4.0 * a * a * delta_sq * delta_sq * delta_sq;
    let d3 = yn * yn - h_sq;

    if d3.is_nearly_zero_within_tolerance(PRECISION) {
        let delta = (yn / (2.0 * a)).cbrt();
        roots.push(xn - 2.0 * delta);
        roots.push(xn + delta);
    } else if d3 > 0.0 {
        let sqrt = d3.sqrt();
        roots.push(xn + ((-yn + sqrt) / (2.0 * a)).cbrt() + ((-yn - sqrt) / (2.0 * a)).cbrt());
    } else {
        let theta = (-yn / h_sq.sqrt()).clamp(-1.0, 1.0).acos() / 3.0;
        let delta = delta_sq.sqrt();
        roots.push(xn + 2.0 * delta * theta.cos());
        roots.push(xn + 2.0 * delta * (theta + PI * 2.0 / 3.0).cos());
        roots.push(xn + 2.0 * delta * (theta + PI * 4.0 / 3.0).cos());
    }
    roots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(roots: impl IntoIterator<Item = f64>) -> alloc::vec::Vec<f64> {
        let mut roots: alloc::vec::Vec<f64> = roots.into_iter().collect();
        roots.sort_by(f64::total_cmp);
        roots
    }

    fn assert_roots(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-6, "{actual:?} vs {expected:?}");
        }
    }

    #[test]
    fn quadratic_two_roots() {
        // (x - 1)(x - 3)
        assert_roots(&sorted(solve_quadratic(1.0, -4.0, 3.0)), &[1.0, 3.0]);
    }

    #[test]
    fn quadratic_double_root_reported_once() {
        // (x - 2)^2
        assert_roots(&sorted(solve_quadratic(1.0, -4.0, 4.0)), &[2.0]);
    }

    #[test]
    fn quadratic_no_real_roots() {
        assert!(solve_quadratic(1.0, 0.0, 1.0).is_empty(), "x^2 + 1 has no real roots");
    }

    #[test]
    fn quadratic_degenerates_to_linear() {
        assert_roots(&sorted(solve_quadratic(0.0, 2.0, -1.0)), &[0.5]);
        assert!(solve_quadratic(0.0, 0.0, 1.0).is_empty(), "constant has no roots");
    }

    #[test]
    fn cubic_three_roots() {
        // (x - 1)(x - 2)(x - 3) = x^3 - 6x^2 + 11x - 6
        assert_roots(&sorted(solve_cubic(1.0, -6.0, 11.0, -6.0)), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn cubic_one_root() {
        // (x - 1)(x^2 + 1) = x^3 - x^2 + x - 1
        assert_roots(&sorted(solve_cubic(1.0, -1.0, 1.0, -1.0)), &[1.0]);
    }

    #[test]
    fn cubic_repeated_root() {
        // (x - 1)^2 (x + 2) = x^3 - 3x + 2
        assert_roots(&sorted(solve_cubic(1.0, 0.0, -3.0, 2.0)), &[-2.0, 1.0]);
    }

    #[test]
    fn cubic_degenerates_to_quadratic() {
        assert_roots(&sorted(solve_cubic(0.0, 1.0, -4.0, 3.0)), &[1.0, 3.0]);
    }
}
