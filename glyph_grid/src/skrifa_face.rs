// Copyright 2025 the Glyph Grid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reading glyph outlines from font data with skrifa.

use core::fmt::{Debug, Formatter};
use peniko::FontData;
use peniko::kurbo::{BezPath, Rect};
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::{DrawSettings, OutlinePen};
use skrifa::{FontRef, GlyphId, MetadataProvider};

use crate::cache::GlyphSource;
use crate::error::Error;
use crate::outline::GlyphOutline;

/// An [`OutlinePen`] that records a path and its control box.
#[derive(Clone, Debug)]
pub struct OutlineRecorder {
    path: BezPath,
    bbox: Rect,
}

impl Default for OutlineRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl OutlineRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self {
            path: BezPath::new(),
            bbox: Rect {
                x0: f64::INFINITY,
                y0: f64::INFINITY,
                x1: f64::NEG_INFINITY,
                y1: f64::NEG_INFINITY,
            },
        }
    }

    /// The recorded path.
    #[inline]
    pub fn path(&self) -> &BezPath {
        &self.path
    }

    /// The box around every recorded point, or `None` if nothing was drawn.
    pub fn bbox(&self) -> Option<Rect> {
        (self.bbox.x0 <= self.bbox.x1).then_some(self.bbox)
    }

    /// Turns the recording into a glyph outline with the given advance.
    pub fn into_outline(self, advance: f64) -> GlyphOutline {
        let bounds = self.bbox().unwrap_or(Rect::ZERO);
        GlyphOutline::with_bounds(self.path, bounds, advance)
    }
}

// Coordinates are recorded in font units with the y-axis pointing up.
impl OutlinePen for OutlineRecorder {
    #[inline]
    fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to((x, y));
        self.bbox = self.bbox.union_pt((x, y));
    }

    #[inline]
    fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to((x, y));
        self.bbox = self.bbox.union_pt((x, y));
    }

    #[inline]
    fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        self.path.quad_to((cx, cy), (x, y));
        self.bbox = self.bbox.union_pt((cx, cy));
        self.bbox = self.bbox.union_pt((x, y));
    }

    #[inline]
    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.path.curve_to((cx0, cy0), (cx1, cy1), (x, y));
        self.bbox = self.bbox.union_pt((cx0, cy0));
        self.bbox = self.bbox.union_pt((cx1, cy1));
        self.bbox = self.bbox.union_pt((x, y));
    }

    #[inline]
    fn close(&mut self) {
        self.path.close_path();
    }
}

/// A font face backed by shared font data.
///
/// Outlines are drawn unhinted at the default location of variable fonts, in
/// font units.
#[derive(Clone)]
pub struct SkrifaFace {
    font: FontData,
    id: u64,
}

impl Debug for SkrifaFace {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SkrifaFace")
            .field("id", &self.id)
            .field("index", &self.font.index)
            .finish_non_exhaustive()
    }
}

impl SkrifaFace {
    /// Wraps `font`, checking that it can be read.
    pub fn new(font: FontData) -> Result<Self, Error> {
        FontRef::from_index(font.data.as_ref(), font.index)
            .map_err(|_| Error::font_load_failure("font data could not be read"))?;
        // Blob ids are unique per blob; the index tells faces of a collection apart.
        let id = (font.data.id() << 16) | u64::from(font.index & 0xFFFF);
        Ok(Self { font, id })
    }

    /// The underlying font data.
    #[inline]
    pub fn font(&self) -> &FontData {
        &self.font
    }

    fn font_ref(&self) -> Result<FontRef<'_>, Error> {
        FontRef::from_index(self.font.data.as_ref(), self.font.index)
            .map_err(|_| Error::font_load_failure("font data could not be read"))
    }
}

impl GlyphSource for SkrifaFace {
    fn font_id(&self) -> u64 {
        self.id
    }

    /// Codepoint 0 requests the font's `.notdef` glyph.
    fn outline(&self, codepoint: u32) -> Result<GlyphOutline, Error> {
        let font = self.font_ref()?;
        let glyph_id = if codepoint == 0 {
            GlyphId::NOTDEF
        } else {
            font.charmap()
                .map(codepoint)
                .ok_or(Error::font_load_failure("codepoint is not mapped"))?
        };
        let glyph = font
            .outline_glyphs()
            .get(glyph_id)
            .ok_or(Error::font_load_failure("glyph has no outline"))?;

        let mut recorder = OutlineRecorder::new();
        glyph
            .draw(
                DrawSettings::unhinted(Size::unscaled(), LocationRef::default()),
                &mut recorder,
            )
            .map_err(|_| Error::font_load_failure("glyph outline could not be drawn"))?;

        let advance = font
            .glyph_metrics(Size::unscaled(), LocationRef::default())
            .advance_width(glyph_id)
            .unwrap_or_default();
        Ok(recorder.into_outline(f64::from(advance)))
    }
}
