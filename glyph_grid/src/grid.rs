// Copyright 2025 the Glyph Grid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A coarse acceleration grid overlaid on a glyph.

use alloc::vec;
use alloc::vec::Vec;
use peniko::kurbo::Size;
use smallvec::SmallVec;

#[cfg(not(feature = "std"))]
use peniko::kurbo::common::FloatFuncs as _;

use crate::bezier::Bezier2;

/// Indices of the beziers passing through one grid cell, sorted ascending and
/// without duplicates.
pub type CellBeziers = SmallVec<[u32; 4]>;

/// A grid laid over a glyph's bounding box.
///
/// For every cell it records the beziers that touch the cell and whether the
/// cell's center is inside the glyph. The origin is the bottom-left corner and
/// cells are stored row by row.
#[derive(Clone, Debug, PartialEq)]
pub struct VGrid {
    width: u32,
    height: u32,
    cell_beziers: Vec<CellBeziers>,
    cell_mids: Vec<bool>,
}

impl VGrid {
    /// Builds the grid for `beziers`, which must already be translated so that
    /// the glyph's bounding box starts at the origin and spans `glyph_size`.
    ///
    /// `width` and `height` are clamped to at least one cell.
    pub fn new(beziers: &[Bezier2], glyph_size: Size, width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mut grid = Self {
            width,
            height,
            cell_beziers: vec![CellBeziers::new(); width as usize * height as usize],
            cell_mids: vec![false; width as usize * height as usize],
        };
        grid.find_cell_intersections(beziers, glyph_size);
        grid.find_cell_mids_inside(beziers, glyph_size);
        grid
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major index of the cell at column `x` and row `y`.
    #[inline]
    pub fn cell_index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height, "cell out of range");
        y as usize * self.width as usize + x as usize
    }

    /// The beziers passing through the cell at column `x` and row `y`.
    #[inline]
    pub fn beziers_at(&self, x: u32, y: u32) -> &CellBeziers {
        &self.cell_beziers[self.cell_index(x, y)]
    }

    /// Whether the center of the cell at column `x` and row `y` is inside the glyph.
    #[inline]
    pub fn mid_inside(&self, x: u32, y: u32) -> bool {
        self.cell_mids[self.cell_index(x, y)]
    }

    /// All cells in row-major order as `(beziers, mid_inside)` pairs.
    pub fn cells(&self) -> impl Iterator<Item = (&CellBeziers, bool)> + '_ {
        self.cell_beziers.iter().zip(self.cell_mids.iter().copied())
    }

    /// Registers `bezier` in the cell at `(x, y)`, clamping to the grid.
    fn mark(&mut self, x: i64, y: i64, bezier: u32) {
        let x = x.clamp(0, i64::from(self.width) - 1) as u32;
        let y = y.clamp(0, i64::from(self.height) - 1) as u32;
        let index = self.cell_index(x, y);
        let cell = &mut self.cell_beziers[index];
        if let Err(at) = cell.binary_search(&bezier) {
            cell.insert(at, bezier);
        }
    }

    /// Registers every bezier in the cells on both sides of each grid line it
    /// crosses, edges included, and in the cells holding its endpoints.
    ///
    /// A curve that leaves its start cell exactly through a grid corner only
    /// produces crossings in the three cells around that corner, so the
    /// endpoint cells are always marked.
    fn find_cell_intersections(&mut self, beziers: &[Bezier2], glyph_size: Size) {
        let (grid_w, grid_h) = (f64::from(self.width), f64::from(self.height));
        for (i, bezier) in beziers.iter().enumerate() {
            let index = i as u32;

            for x in 0..=i64::from(self.width) {
                let line = x as f64 * glyph_size.width / grid_w;
                for hit in bezier.intersect_vertical(line) {
                    let y = (hit * grid_h / glyph_size.height) as i64;
                    self.mark(x, y, index);
                    self.mark(x - 1, y, index);
                }
            }

            for y in 0..=i64::from(self.height) {
                let line = y as f64 * glyph_size.height / grid_h;
                for hit in bezier.intersect_horizontal(line) {
                    let x = (hit * grid_w / glyph_size.width) as i64;
                    self.mark(x, y, index);
                    self.mark(x, y - 1, index);
                }
            }

            for end in [bezier.e0, bezier.e1] {
                let x = (end.x * grid_w / glyph_size.width) as i64;
                let y = (end.y * grid_h / glyph_size.height) as i64;
                self.mark(x, y, index);
            }
        }
    }

    /// Scans the horizontal midline of every row with the even-odd rule.
    ///
    /// Crossings are sorted left to right with duplicates removed; between an
    /// odd crossing and the following even one, every cell whose center falls
    /// in the span is inside.
    fn find_cell_mids_inside(&mut self, beziers: &[Bezier2], glyph_size: Size) {
        let (grid_w, grid_h) = (f64::from(self.width), f64::from(self.height));
        let mut crossings: Vec<f64> = Vec::new();

        for y in 0..self.height {
            crossings.clear();
            let line = (f64::from(y) + 0.5) * glyph_size.height / grid_h;
            for bezier in beziers {
                crossings.extend(
                    bezier
                        .intersect_horizontal(line)
                        .into_iter()
                        .map(|x| x * grid_w / glyph_size.width),
                );
            }
            crossings.sort_by(f64::total_cmp);
            crossings.dedup();

            let row = y as usize * self.width as usize;
            for span in crossings.chunks_exact(2) {
                let start = (span[0].round() as i64).clamp(0, i64::from(self.width)) as usize;
                let end = (span[1].round() as i64).clamp(0, i64::from(self.width)) as usize;
                for mid in &mut self.cell_mids[row + start.min(end)..row + end] {
                    *mid = true;
                }
            }
        }
    }
}
