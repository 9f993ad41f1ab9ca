// Copyright 2025 the Glyph Grid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadratic bezier curves and their intersections with axis-aligned lines.

use peniko::kurbo::{Point, Vec2};
use smallvec::SmallVec;

#[cfg(not(feature = "std"))]
use peniko::kurbo::common::FloatFuncs as _;

use crate::math::FloatExt;

/// Coordinates at which a curve crosses a horizontal or vertical line.
///
/// A quadratic crosses a line at most twice.
pub type Intersections = SmallVec<[f64; 2]>;

/// A quadratic bezier curve.
///
/// Straight segments are represented with the control point equal to the
/// start point, so that lines and curves share one representation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bezier2 {
    /// Start point.
    pub e0: Point,
    /// Control point.
    pub c: Point,
    /// End point.
    pub e1: Point,
}

impl Bezier2 {
    /// Creates a curve from its start, control and end points.
    #[inline]
    pub fn new(e0: impl Into<Point>, c: impl Into<Point>, e1: impl Into<Point>) -> Self {
        Self {
            e0: e0.into(),
            c: c.into(),
            e1: e1.into(),
        }
    }

    /// Creates a straight segment from `e0` to `e1`.
    #[inline]
    pub fn line(e0: impl Into<Point>, e1: impl Into<Point>) -> Self {
        let e0 = e0.into();
        Self { e0, c: e0, e1: e1.into() }
    }

    /// Whether this curve is a straight segment in the degenerate `c == e0` form.
    #[inline]
    pub fn is_line(&self) -> bool {
        self.c == self.e0
    }

    /// Evaluates the curve at parameter `t`.
    #[inline]
    pub fn eval(&self, t: f64) -> Point {
        let mt = 1.0 - t;
        let x = mt * mt * self.e0.x + 2.0 * t * mt * self.c.x + t * t * self.e1.x;
        let y = mt * mt * self.e0.y + 2.0 * t * mt * self.c.y + t * t * self.e1.y;
        Point::new(x, y)
    }

    /// The same curve traversed in the opposite direction.
    #[inline]
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            e0: self.e1,
            c: self.c,
            e1: self.e0,
        }
    }

    /// The curve with its x and y axes swapped.
    #[inline]
    #[must_use]
    pub fn transposed(&self) -> Self {
        fn swap(p: Point) -> Point {
            Point::new(p.y, p.x)
        }
        Self {
            e0: swap(self.e0),
            c: swap(self.c),
            e1: swap(self.e1),
        }
    }

    /// The curve moved by `offset`.
    #[inline]
    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            e0: self.e0 + offset,
            c: self.c + offset,
            e1: self.e1 + offset,
        }
    }

    /// Finds the x coordinates at which the curve crosses the line `y = y`.
    ///
    /// Solving `(1-t)^2*A + 2t(1-t)*B + t^2*C = y` for `t` gives
    /// `t = (A - B ± sqrt(y*a + B^2 - A*C)) / a` with `a = A - 2B + C`.
    /// When `a` vanishes the curve is linear along y and the equation is solved
    /// directly. Only roots with `t` in `[0, 1]` are kept.
    pub fn intersect_horizontal(&self, y: f64) -> Intersections {
        let mut out = Intersections::new();
        let (a_y, b_y, c_y) = (self.e0.y, self.c.y, self.e1.y);

        let a = a_y - 2.0 * b_y + c_y;

        if a.is_nearly_zero() {
            let denom = 2.0 * (b_y - c_y);
            // Parallel to the line.
            if denom == 0.0 {
                return out;
            }
            let t = (2.0 * b_y - c_y - y) / denom;
            if (0.0..=1.0).contains(&t) {
                out.push(self.eval(t).x);
            }
            return out;
        }

        let discriminant = y * a + b_y * b_y - a_y * c_y;
        if discriminant < 0.0 {
            return out;
        }
        let sqrt = discriminant.sqrt();

        for t in [(a_y - b_y + sqrt) / a, (a_y - b_y - sqrt) / a] {
            if (0.0..=1.0).contains(&t) {
                out.push(self.eval(t).x);
            }
        }
        out
    }

    /// Finds the y coordinates at which the curve crosses the line `x = x`.
    #[inline]
    pub fn intersect_vertical(&self, x: f64) -> Intersections {
        self.transposed().intersect_horizontal(x)
    }
}
