// Copyright 2025 the Glyph Grid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Synthetic glyph outlines in font units.

use std::f64::consts::TAU;

use glyph_grid::kurbo::{BezPath, Circle, Point, Shape};

/// An "O": a clockwise outer circle with a counter-clockwise counter, drawn
/// with cubic curves.
pub(crate) fn ring(center: Point, outer: f64, inner: f64) -> BezPath {
    let mut path = Circle::new(center, outer).to_path(0.1).reverse_subpaths();
    path.extend(Circle::new(center, inner).to_path(0.1));
    path
}

/// A square traced clockwise.
pub(crate) fn square(x: f64, y: f64, side: f64) -> BezPath {
    let mut path = BezPath::new();
    path.move_to((x, y));
    path.line_to((x, y + side));
    path.line_to((x + side, y + side));
    path.line_to((x + side, y));
    path.close_path();
    path
}

/// A regular polygon with `sides` edges, traced clockwise.
pub(crate) fn polygon(center: Point, radius: f64, sides: usize) -> BezPath {
    let mut path = BezPath::new();
    for i in 0..sides {
        let angle = -TAU * i as f64 / sides as f64;
        let p = (center.x + radius * angle.cos(), center.y + radius * angle.sin());
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    path.close_path();
    path
}
