// Copyright 2025 the Glyph Grid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph cache behavior with synthetic fonts.

use glyph_grid::kurbo::{BezPath, Point};
use glyph_grid::{AtlasConfig, GlyphCache, GlyphKey, GlyphRecord};

use crate::util::TestFont;
use crate::util::samples::{ring, square};

fn cache() -> GlyphCache {
    GlyphCache::new(AtlasConfig::default()).unwrap()
}

#[test]
fn cache_returns_the_same_record() {
    let path = ring(Point::new(500.0, 500.0), 500.0, 300.0);
    let font = TestFont::new(3).with_glyph('O', path, 1100.0);
    let mut cache = cache();

    let first = cache.get_glyph(&font, u32::from('O'));
    let used = cache.atlases().group(0).unwrap().data_used();
    let again = cache.get_glyph(&font, u32::from('O'));
    assert_eq!(first, again);
    assert!(first.is_visible());
    assert_eq!(font.requests(), 1, "outline is decomposed once");
    assert_eq!(cache.cache_misses(), 1);
    assert_eq!(cache.cache_hits(), 1);
    assert_eq!(
        cache.atlases().group(0).unwrap().data_used(),
        used,
        "a hit packs nothing"
    );
}

#[test]
fn cache_memoizes_missing_glyphs() {
    let font = TestFont::new(3);
    let mut cache = cache();

    let record = cache.get_glyph(&font, u32::from('?'));
    assert_eq!(record, GlyphRecord::default());
    cache.get_glyph(&font, u32::from('?'));
    assert_eq!(font.requests(), 1, "a missing glyph is looked up once");
    let key = GlyphKey {
        font_id: 3,
        codepoint: u32::from('?'),
    };
    assert_eq!(cache.peek(&key), Some(&GlyphRecord::default()));
}

#[test]
fn cache_preloads_ascii() {
    let font = TestFont::new(9)
        .with_glyph('A', square(0.0, 0.0, 500.0), 600.0)
        .with_glyph('B', square(50.0, 0.0, 450.0), 560.0);
    let mut cache = cache();
    cache.preload_ascii(&font);

    assert_eq!(cache.len(), 97);
    assert_eq!(font.requests(), 97);
    let visible = (0..128)
        .filter_map(|codepoint| cache.peek(&GlyphKey { font_id: 9, codepoint }))
        .filter(|record| record.is_visible())
        .count();
    assert_eq!(visible, 2, "only A and B draw anything");

    // Both glyphs share the first group.
    let a = cache.get_glyph(&font, u32::from('A')).location.unwrap();
    let b = cache.get_glyph(&font, u32::from('B')).location.unwrap();
    assert_eq!((a.group, b.group), (0, 0));
    assert_eq!(b.offset, 2 + 3 * 4);
    assert_eq!(font.requests(), 97, "preloaded glyphs are hits");
}

#[test]
fn cache_keeps_advance_of_undrawable_outline() {
    let mut open = BezPath::new();
    open.move_to((0.0, 0.0));
    open.line_to((100.0, 0.0));
    open.line_to((100.0, 100.0));
    let font = TestFont::new(1)
        .with_glyph('~', open, 300.0)
        .with_glyph(' ', BezPath::new(), 250.0);
    let mut cache = cache();

    let tilde = cache.get_glyph(&font, u32::from('~'));
    assert!(!tilde.is_visible(), "open contour is rejected");
    assert_eq!(tilde.advance, 300.0);

    let space = cache.get_glyph(&font, u32::from(' '));
    assert!(!space.is_visible(), "space has no outline");
    assert_eq!(space.advance, 250.0);

    assert!(cache.atlases().groups().is_empty(), "nothing was packed");
}
