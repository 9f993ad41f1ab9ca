// Copyright 2025 the Glyph Grid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Approximation of cubic beziers with chains of quadratic beziers.
//!
//! Each inflection-free piece of the cubic is split into `n` equal parameter
//! ranges for increasing `n`. Every range gets one quadratic whose control
//! point is the intersection of the cubic's tangents at both ends of the
//! range. The first `n` whose quadratics stay within the error bound wins.
//! The closeness test is a simplified Hausdorff distance: points sampled on
//! the cubic are compared against the nearest point of the corresponding
//! quadratic. See <https://fontforge.github.io/bezier.html> for the method.

use peniko::kurbo::{CubicBez, ParamCurve, Point, Vec2};
use smallvec::SmallVec;

#[cfg(not(feature = "std"))]
use peniko::kurbo::common::FloatFuncs as _;

use crate::bezier::Bezier2;
use crate::math::{FloatExt, PRECISION, solve_cubic, solve_quadratic};

/// A cubic has at most two inflection points.
const MAX_INFLECTIONS: usize = 2;

/// Maximum number of quadratics generated for one inflection-free piece.
const MAX_SEGMENTS: usize = 8;

/// Maximum number of quadratics generated for one cubic.
pub const MAX_QUADS: usize = MAX_SEGMENTS * (MAX_INFLECTIONS + 1);

/// Number of subdivisions used when sampling a segment for the error check.
const SAMPLE_SUBDIVISIONS: usize = 10;

/// Approximates `cubic` with a chain of quadratic beziers.
///
/// Every quadratic ends where the next one starts, the chain starts at the
/// cubic's first point and ends at its last point. Sampled points of the cubic
/// lie within `error_bound` of their quadratic unless the per-piece segment
/// cap was reached, in which case the finest attempt is returned.
pub fn cubic_to_quads(cubic: CubicBez, error_bound: f64) -> SmallVec<[Bezier2; 8]> {
    let inflections = inflections(&cubic);

    let mut quads: SmallVec<[Bezier2; 8]> = SmallVec::new();
    let mut start = 0.0;
    for t in inflections.iter().copied().chain(core::iter::once(1.0)) {
        let piece = if start == 0.0 && t == 1.0 {
            cubic
        } else {
            cubic.subsegment(start..t)
        };
        quads.extend(approximate_piece(&piece, error_bound));
        start = t;
    }
    debug_assert!(quads.len() <= MAX_QUADS, "too many quadratics for one cubic");

    // Pin the chain to the exact input endpoints and make the joints bitwise equal.
    if let Some(first) = quads.first_mut() {
        first.e0 = cubic.p0;
    }
    if let Some(last) = quads.last_mut() {
        last.e1 = cubic.p3;
    }
    for i in 1..quads.len() {
        quads[i].e0 = quads[i - 1].e1;
    }
    quads
}

/// The cubic in power form `a*t^3 + b*t^2 + c*t + d`.
#[derive(Copy, Clone, Debug)]
struct PowerCoefficients {
    a: Vec2,
    b: Vec2,
    c: Vec2,
    d: Vec2,
}

impl PowerCoefficients {
    fn new(cubic: &CubicBez) -> Self {
        let p0 = cubic.p0.to_vec2();
        let p1 = cubic.p1.to_vec2();
        let p2 = cubic.p2.to_vec2();
        let p3 = cubic.p3.to_vec2();
        Self {
            a: (p3 - p0) + (p1 - p2) * 3.0,
            b: (p0 + p2) * 3.0 - p1 * 6.0,
            c: (p1 - p0) * 3.0,
            d: p0,
        }
    }

    fn point(&self, t: f64) -> Vec2 {
        ((self.a * t + self.b) * t + self.c) * t + self.d
    }

    fn derivative(&self, t: f64) -> Vec2 {
        (self.a * (3.0 * t) + self.b * 2.0) * t + self.c
    }
}

/// Parameter values in `(0, 1)` where the cubic's curvature changes sign, ascending.
///
/// See <http://www.caffeineowl.com/graphics/2d/vectorial/cubic-inflexion.html>.
fn inflections(cubic: &CubicBez) -> SmallVec<[f64; MAX_INFLECTIONS]> {
    let (x1, y1) = (cubic.p0.x, cubic.p0.y);
    let (x2, y2) = (cubic.p1.x, cubic.p1.y);
    let (x3, y3) = (cubic.p2.x, cubic.p2.y);
    let (x4, y4) = (cubic.p3.x, cubic.p3.y);

    let p = -(x4 * (y1 - 2.0 * y2 + y3)) + x3 * (2.0 * y1 - 3.0 * y2 + y4)
        + x1 * (y2 - 2.0 * y3 + y4)
        - x2 * (y1 - 3.0 * y3 + 2.0 * y4);
    let q = x4 * (y1 - y2) + 3.0 * x3 * (-y1 + y2) + x2 * (2.0 * y1 - 3.0 * y3 + y4)
        - x1 * (2.0 * y2 - 3.0 * y3 + y4);
    let r = x3 * (y1 - y2) + x1 * (y2 - y3) + x2 * (-y1 + y3);

    let mut roots: SmallVec<[f64; MAX_INFLECTIONS]> = solve_quadratic(p, q, r)
        .into_iter()
        .filter(|t| *t > PRECISION && *t < 1.0 - PRECISION)
        .collect();
    roots.sort_by(f64::total_cmp);
    roots
}

/// Approximates an inflection-free cubic with at most [`MAX_SEGMENTS`] quadratics.
fn approximate_piece(cubic: &CubicBez, error_bound: f64) -> SmallVec<[Bezier2; MAX_SEGMENTS]> {
    let coeffs = PowerCoefficients::new(cubic);
    let mut approximation: SmallVec<[Bezier2; MAX_SEGMENTS]> = SmallVec::new();

    for count in 1..=MAX_SEGMENTS {
        approximation.clear();
        for i in 0..count {
            let t0 = i as f64 / count as f64;
            let t1 = (i + 1) as f64 / count as f64;
            approximation.push(tangent_quad(&coeffs, t0, t1));
        }

        // A single quadratic bending the other way than the cubic is never acceptable.
        if count == 1 {
            let quad = &approximation[0];
            if (quad.c - cubic.p0).dot(cubic.p1 - cubic.p0) < 0.0
                || (quad.c - cubic.p3).dot(cubic.p2 - cubic.p3) < 0.0
            {
                continue;
            }
        }

        if is_approximation_close(&coeffs, &approximation, error_bound) {
            break;
        }
    }
    approximation
}

/// The quadratic spanning `[t0, t1]` of the cubic whose control point is the
/// intersection of the cubic's tangent lines at `t0` and `t1`.
fn tangent_quad(coeffs: &PowerCoefficients, t0: f64, t1: f64) -> Bezier2 {
    let f1 = coeffs.point(t0);
    let f2 = coeffs.point(t1);
    let d1 = coeffs.derivative(t0);
    let d2 = coeffs.derivative(t1);

    // Solving f1 + d1*z1 = f2 + d2*z2 for the intersection.
    let det = -d1.x * d2.y + d2.x * d1.y;
    let control = if det.is_nearly_zero_within_tolerance(PRECISION) {
        // Parallel tangents, the piece is a straight line.
        (f1 + f2) * 0.5
    } else {
        let k2 = f2.y * d2.x - f2.x * d2.y;
        let k1 = f1.x * d1.y - f1.y * d1.x;
        Vec2::new(
            (d1.x * k2 + d2.x * k1) / det,
            (d1.y * k2 + d2.y * k1) / det,
        )
    };

    Bezier2::new(f1.to_point(), control.to_point(), f2.to_point())
}

fn is_approximation_close(coeffs: &PowerCoefficients, quads: &[Bezier2], error_bound: f64) -> bool {
    let dt = 1.0 / quads.len() as f64;
    quads.iter().enumerate().all(|(i, quad)| {
        is_segment_close(coeffs, i as f64 * dt, (i + 1) as f64 * dt, quad, error_bound)
    })
}

/// Whether the cubic's interior sample points on `[t_min, t_max]` are all within
/// `error_bound` of `quad`. The endpoints are shared and never sampled.
fn is_segment_close(
    coeffs: &PowerCoefficients,
    t_min: f64,
    t_max: f64,
    quad: &Bezier2,
    error_bound: f64,
) -> bool {
    let dt = (t_max - t_min) / SAMPLE_SUBDIVISIONS as f64;
    (1..SAMPLE_SUBDIVISIONS - 1).all(|i| {
        let point = coeffs.point(t_min + i as f64 * dt).to_point();
        min_distance_to_quad(point, quad) <= error_bound
    })
}

/// Distance from `point` to the nearest point of `quad`.
///
/// With `f(t) = a*t^2 + b*t + c` the squared distance has a zero derivative
/// where `(f'(t), f(t) - point) = 0`, a cubic in `t`. The minimum is at one of
/// its roots in `(0, 1)` or at an endpoint.
pub(crate) fn min_distance_to_quad(point: Point, quad: &Bezier2) -> f64 {
    let p0 = quad.e0.to_vec2();
    let p1 = quad.c.to_vec2();
    let p2 = quad.e1.to_vec2();

    let a = p0 + p2 - p1 * 2.0;
    let b = (p1 - p0) * 2.0;
    let c = p0;
    let rel = c - point.to_vec2();

    let e3 = 2.0 * a.hypot2();
    let e2 = 3.0 * a.dot(b);
    let e1 = b.hypot2() + 2.0 * a.dot(rel);
    let e0 = rel.dot(b);

    solve_cubic(e3, e2, e1, e0)
        .into_iter()
        .filter(|t| *t > PRECISION && *t < 1.0 - PRECISION)
        .chain([0.0, 1.0])
        .map(|t| ((a * t + b) * t + c - point.to_vec2()).hypot())
        .fold(f64::INFINITY, f64::min)
}
