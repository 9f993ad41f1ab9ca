// Copyright 2025 the Glyph Grid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quads for prepared glyphs.

use glyph_grid::kurbo::Point;
use glyph_grid::peniko::Color;
use glyph_grid::{AtlasConfig, GlyphCache, GlyphVertex, glyph_quad, vertices_as_bytes};

use crate::util::TestFont;
use crate::util::samples::square;

#[test]
fn vertex_quad_of_cached_glyph() {
    let font = TestFont::new(1)
        .with_glyph('a', square(0.0, 0.0, 100.0), 120.0)
        .with_glyph('b', square(20.0, -10.0, 300.0), 340.0);
    let mut cache = GlyphCache::new(AtlasConfig::default()).unwrap();
    cache.get_glyph(&font, u32::from('a'));
    let record = cache.get_glyph(&font, u32::from('b'));
    let offset = record.location.unwrap().offset;

    let quad = glyph_quad(&record, Point::new(10.0, 20.0), Color::BLACK).unwrap();
    assert_eq!(quad[0].position, [30.0, 10.0], "lower-left corner");
    assert_eq!(quad[3].position, [330.0, 310.0], "upper-right corner");
    assert!(quad.iter().all(|v| v.data >> 2 == offset));
    assert!(quad.iter().all(|v| v.color == [0, 0, 0, 255]));
    assert_eq!(vertices_as_bytes(&quad).len(), 96);
}

#[test]
fn vertex_quads_follow_the_advance() {
    let font = TestFont::new(1).with_glyph('l', square(10.0, 0.0, 80.0), 100.0);
    let mut cache = GlyphCache::new(AtlasConfig::default()).unwrap();

    let mut pen = Point::ZERO;
    let mut vertices: Vec<GlyphVertex> = Vec::new();
    for ch in "ll l".chars() {
        let record = cache.get_glyph(&font, u32::from(ch));
        if let Some(quad) = glyph_quad(&record, pen, Color::WHITE) {
            vertices.extend(quad);
        }
        pen.x += record.advance;
    }

    // The unmapped space has no advance, so the last glyph follows directly.
    assert_eq!(vertices.len(), 18);
    let lefts: Vec<f32> = vertices.chunks_exact(6).map(|quad| quad[0].position[0]).collect();
    assert_eq!(lefts, [10.0, 110.0, 210.0]);
    assert_eq!(vertices_as_bytes(&vertices).len(), 18 * 16);
}
