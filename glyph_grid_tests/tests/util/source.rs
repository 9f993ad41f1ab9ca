// Copyright 2025 the Glyph Grid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::Cell;
use std::collections::HashMap;

use glyph_grid::kurbo::BezPath;
use glyph_grid::{Error, GlyphOutline, GlyphSource};

/// A font built from synthetic outlines that counts outline requests.
pub(crate) struct TestFont {
    id: u64,
    glyphs: HashMap<u32, (BezPath, f64)>,
    requests: Cell<usize>,
}

impl TestFont {
    pub(crate) fn new(id: u64) -> Self {
        Self {
            id,
            glyphs: HashMap::new(),
            requests: Cell::new(0),
        }
    }

    pub(crate) fn with_glyph(mut self, ch: char, path: BezPath, advance: f64) -> Self {
        self.glyphs.insert(u32::from(ch), (path, advance));
        self
    }

    pub(crate) fn requests(&self) -> usize {
        self.requests.get()
    }
}

impl GlyphSource for TestFont {
    fn font_id(&self) -> u64 {
        self.id
    }

    fn outline(&self, codepoint: u32) -> Result<GlyphOutline, Error> {
        self.requests.set(self.requests.get() + 1);
        let (path, advance) = self
            .glyphs
            .get(&codepoint)
            .ok_or(Error::font_load_failure("codepoint is not mapped"))?;
        Ok(GlyphOutline::new(path.clone(), *advance))
    }
}
