// Copyright 2025 the Glyph Grid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decomposition of glyph outlines into flat lists of quadratic beziers.

use alloc::vec::Vec;
use peniko::kurbo::{BezPath, CubicBez, PathEl, Point, Rect, Vec2};

#[cfg(not(feature = "std"))]
use peniko::kurbo::common::FloatFuncs as _;

use crate::bezier::Bezier2;
use crate::cubic::cubic_to_quads;
use crate::error::Error;

/// Winding direction of a glyph outline in a y-up coordinate system.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    /// Filled region on the right of the direction of travel.
    ///
    /// This is the TrueType convention for outer contours.
    #[default]
    Clockwise,
    /// Filled region on the left of the direction of travel.
    ///
    /// This is the PostScript (CFF) convention for outer contours.
    CounterClockwise,
}

impl Orientation {
    /// Determines the fill orientation of `path` from the signed area of its
    /// control polygon.
    ///
    /// All contours contribute, so the outer contours of a glyph dominate its
    /// counters. An outline with zero area is treated as clockwise.
    pub fn of_path(path: &BezPath) -> Self {
        if signed_area(path) > 0.0 {
            Self::CounterClockwise
        } else {
            Self::Clockwise
        }
    }
}

/// Twice the signed area of every contour's control polygon, positive for
/// counter-clockwise contours in y-up space.
fn signed_area(path: &BezPath) -> f64 {
    fn edge(a: Point, b: Point) -> f64 {
        a.x * b.y - b.x * a.y
    }

    let mut area = 0.0;
    let mut start = Point::ZERO;
    let mut last = Point::ZERO;
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                area += edge(last, start);
                start = p;
                last = p;
            }
            PathEl::LineTo(p) => {
                area += edge(last, p);
                last = p;
            }
            PathEl::QuadTo(c, p) => {
                area += edge(last, c) + edge(c, p);
                last = p;
            }
            PathEl::CurveTo(c0, c1, p) => {
                area += edge(last, c0) + edge(c0, c1) + edge(c1, p);
                last = p;
            }
            PathEl::ClosePath => {
                area += edge(last, start);
                last = start;
            }
        }
    }
    area + edge(last, start)
}

/// Bounding box of every point in `path`, including control points.
fn control_box(path: &BezPath) -> Rect {
    let mut points = path.elements().iter().flat_map(|el| {
        let (a, b, c) = match *el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => (Some(p), None, None),
            PathEl::QuadTo(c, p) => (Some(c), Some(p), None),
            PathEl::CurveTo(c0, c1, p) => (Some(c0), Some(c1), Some(p)),
            PathEl::ClosePath => (None, None, None),
        };
        a.into_iter().chain(b).chain(c)
    });
    let Some(first) = points.next() else {
        return Rect::ZERO;
    };
    points.fold(Rect::from_points(first, first), |rect, p| rect.union_pt(p))
}

/// Metrics of a glyph in font units.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct GlyphMetrics {
    /// Horizontal advance.
    pub advance: f64,
    /// Bounding box of the outline.
    ///
    /// `x0`/`y0` are the horizontal and vertical bearings, and the box size is
    /// the glyph size.
    pub bounds: Rect,
}

impl GlyphMetrics {
    /// Horizontal and vertical bearing of the outline.
    #[inline]
    pub fn bearing(&self) -> Vec2 {
        self.bounds.origin().to_vec2()
    }
}

/// A glyph outline in font units, as read from a font.
#[derive(Clone, Debug, Default)]
pub struct GlyphOutline {
    /// The outline's contours.
    pub path: BezPath,
    /// Fill orientation of the outer contours.
    pub orientation: Orientation,
    /// Metrics of the glyph.
    pub metrics: GlyphMetrics,
}

impl GlyphOutline {
    /// Creates an outline from its path, computing orientation and bounds.
    pub fn new(path: BezPath, advance: f64) -> Self {
        let bounds = control_box(&path);
        Self::with_bounds(path, bounds, advance)
    }

    /// Creates an outline whose control box is already known.
    pub(crate) fn with_bounds(path: BezPath, bounds: Rect, advance: f64) -> Self {
        let orientation = Orientation::of_path(&path);
        Self {
            path,
            orientation,
            metrics: GlyphMetrics { advance, bounds },
        }
    }

    /// Whether the outline has no contours, as with a space.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.path.elements().is_empty()
    }
}

/// Options controlling outline decomposition.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DecomposeOptions {
    /// Fraction of the average glyph dimension used as the error bound when
    /// approximating cubic curves.
    pub tolerance_factor: f64,
    /// Smallest error bound used for cubic approximation, in font units.
    pub min_resolution: f64,
}

impl Default for DecomposeOptions {
    fn default() -> Self {
        Self {
            tolerance_factor: 0.05,
            min_resolution: 1.0,
        }
    }
}

/// Error bound used when approximating the cubic curves of a glyph with the
/// given bounding box.
pub fn cubic_resolution(bounds: Rect, options: &DecomposeOptions) -> f64 {
    let average = (bounds.width() + bounds.height()) * 0.5;
    (average * options.tolerance_factor)
        .floor()
        .max(options.min_resolution)
}

/// Flattens `outline` into a list of clockwise quadratic beziers with the
/// bounding box's lower-left corner moved to the origin.
///
/// Straight segments become degenerate quadratics and cubics are approximated
/// with [`cubic_to_quads`]. Open contours are closed when the path says so;
/// a contour that ends away from its start without closing is rejected.
pub fn decompose(outline: &GlyphOutline, options: &DecomposeOptions) -> Result<Vec<Bezier2>, Error> {
    let bounds = outline.metrics.bounds;
    let offset = -bounds.origin().to_vec2();
    let resolution = cubic_resolution(bounds, options);

    let mut beziers = Vec::new();
    let mut start: Option<Point> = None;
    let mut current: Option<Point> = None;

    for el in outline.path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                ensure_closed(start, current)?;
                start = Some(p + offset);
                current = start;
            }
            PathEl::LineTo(p) => {
                let from = current.ok_or(Error::malformed_outline("line before move"))?;
                let to = p + offset;
                beziers.push(Bezier2::line(from, to));
                current = Some(to);
            }
            PathEl::QuadTo(c, p) => {
                let from = current.ok_or(Error::malformed_outline("curve before move"))?;
                let to = p + offset;
                beziers.push(Bezier2::new(from, c + offset, to));
                current = Some(to);
            }
            PathEl::CurveTo(c0, c1, p) => {
                let from = current.ok_or(Error::malformed_outline("curve before move"))?;
                let to = p + offset;
                let cubic = CubicBez::new(from, c0 + offset, c1 + offset, to);
                beziers.extend(cubic_to_quads(cubic, resolution));
                current = Some(to);
            }
            PathEl::ClosePath => {
                let (Some(first), Some(last)) = (start, current) else {
                    return Err(Error::malformed_outline("close before move"));
                };
                if last != first {
                    beziers.push(Bezier2::line(last, first));
                }
                current = start;
            }
        }
    }
    ensure_closed(start, current)?;

    if outline.orientation == Orientation::CounterClockwise {
        for bezier in &mut beziers {
            *bezier = bezier.reversed();
        }
    }

    Ok(beziers)
}

fn ensure_closed(start: Option<Point>, current: Option<Point>) -> Result<(), Error> {
    match (start, current) {
        (Some(start), Some(current)) if start != current => {
            Err(Error::malformed_outline("contour does not return to its start"))
        }
        _ => Ok(()),
    }
}
