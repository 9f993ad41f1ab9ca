// Copyright 2025 the Glyph Grid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Memoized glyph preparation.

use alloc::vec::Vec;
use core::fmt::{Debug, Formatter};
use hashbrown::HashMap;
use peniko::kurbo::{Size, Vec2};

use crate::atlas::{AtlasConfig, AtlasLocation, GlyphAtlases};
use crate::error::Error;
use crate::grid::VGrid;
use crate::outline::{DecomposeOptions, GlyphOutline, decompose};

/// A font that can hand out glyph outlines.
pub trait GlyphSource {
    /// Identifier that distinguishes this font from every other font used with
    /// the same cache.
    fn font_id(&self) -> u64;

    /// The outline of the glyph mapped to `codepoint`, in font units.
    ///
    /// Returns an error of kind [`FontLoadFailure`](crate::ErrorKind::FontLoadFailure)
    /// when the font has no glyph for the codepoint or cannot be read.
    fn outline(&self, codepoint: u32) -> Result<GlyphOutline, Error>;
}

impl<T: GlyphSource + ?Sized> GlyphSource for &T {
    fn font_id(&self) -> u64 {
        (**self).font_id()
    }

    fn outline(&self, codepoint: u32) -> Result<GlyphOutline, Error> {
        (**self).outline(codepoint)
    }
}

/// Key for a cached glyph.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GlyphKey {
    /// The font's [`GlyphSource::font_id`].
    pub font_id: u64,
    /// The Unicode codepoint.
    pub codepoint: u32,
}

/// Everything needed to lay out and draw a prepared glyph.
///
/// All measurements are in font units.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct GlyphRecord {
    /// Where the glyph's data lives, or `None` if it draws nothing.
    pub location: Option<AtlasLocation>,
    /// Size of the glyph's bounding box.
    pub size: Size,
    /// Offset from the pen position to the bounding box's lower-left corner.
    pub bearing: Vec2,
    /// Horizontal advance.
    pub advance: f64,
}

impl GlyphRecord {
    /// Whether the glyph has anything to draw.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.location.is_some()
    }

    fn from_outline(outline: &GlyphOutline) -> Self {
        let metrics = &outline.metrics;
        Self {
            location: None,
            size: metrics.bounds.size(),
            bearing: metrics.bearing(),
            advance: metrics.advance,
        }
    }
}

/// Prepares glyphs on first use and remembers the result.
///
/// A miss runs the outline through decomposition, grid construction and atlas
/// packing. Failures never propagate: the glyph is recorded as invisible, with
/// its metrics kept where they are known, and a warning is logged.
pub struct GlyphCache {
    atlases: GlyphAtlases,
    options: DecomposeOptions,
    records: HashMap<GlyphKey, GlyphRecord>,
    /// Number of cache hits since last `clear_stats()`.
    cache_hits: u64,
    /// Number of cache misses since last `clear_stats()`.
    cache_misses: u64,
}

impl Debug for GlyphCache {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GlyphCache")
            .field("glyphs", &self.records.len())
            .field("groups", &self.atlases.groups().len())
            .field("cache_hits", &self.cache_hits)
            .field("cache_misses", &self.cache_misses)
            .finish_non_exhaustive()
    }
}

impl GlyphCache {
    /// Creates an empty cache with the given atlas configuration.
    pub fn new(config: AtlasConfig) -> Result<Self, Error> {
        Self::with_options(config, DecomposeOptions::default())
    }

    /// Creates an empty cache with custom decomposition options.
    pub fn with_options(config: AtlasConfig, options: DecomposeOptions) -> Result<Self, Error> {
        Ok(Self {
            atlases: GlyphAtlases::new(config)?,
            options,
            records: HashMap::new(),
            cache_hits: 0,
            cache_misses: 0,
        })
    }

    /// Returns the record for `codepoint` in `source`, preparing it on first use.
    pub fn get_glyph(&mut self, source: &impl GlyphSource, codepoint: u32) -> GlyphRecord {
        let key = GlyphKey {
            font_id: source.font_id(),
            codepoint,
        };
        if let Some(record) = self.records.get(&key) {
            self.cache_hits += 1;
            return *record;
        }
        self.cache_misses += 1;

        let record = self.prepare(source, codepoint);
        self.records.insert(key, record);
        record
    }

    /// Prepares codepoint 0 and the printable ASCII range.
    pub fn preload_ascii(&mut self, source: &impl GlyphSource) {
        for codepoint in core::iter::once(0).chain(32..128) {
            self.get_glyph(source, codepoint);
        }
    }

    /// The record for `key`, if it has been prepared.
    pub fn peek(&self, key: &GlyphKey) -> Option<&GlyphRecord> {
        self.records.get(key)
    }

    fn prepare(&mut self, source: &impl GlyphSource, codepoint: u32) -> GlyphRecord {
        let outline = match source.outline(codepoint) {
            Ok(outline) => outline,
            Err(err) => {
                log::warn!("no glyph for U+{codepoint:04X}: {err}");
                return GlyphRecord::default();
            }
        };

        let mut record = GlyphRecord::from_outline(&outline);
        let beziers = match decompose(&outline, &self.options) {
            Ok(beziers) => beziers,
            Err(err) => {
                log::warn!("skipping outline of U+{codepoint:04X}: {err}");
                return record;
            }
        };
        if beziers.is_empty() {
            return record;
        }

        let config = self.atlases.config();
        let grid = VGrid::new(
            &beziers,
            record.size,
            u32::from(config.grid_width),
            u32::from(config.grid_height),
        );
        match self.atlases.insert(&beziers, &grid, record.size) {
            Ok((location, _)) => record.location = Some(location),
            Err(err) => log::warn!("glyph U+{codepoint:04X} is not drawable: {err}"),
        }
        record
    }

    /// Get the number of cached glyphs.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the cache is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get the number of cache hits since last `clear_stats()`.
    #[inline]
    pub fn cache_hits(&self) -> u64 {
        self.cache_hits
    }

    /// Get the number of cache misses since last `clear_stats()`.
    #[inline]
    pub fn cache_misses(&self) -> u64 {
        self.cache_misses
    }

    /// Clear cache hit/miss statistics without clearing the cache itself.
    pub fn clear_stats(&mut self) {
        self.cache_hits = 0;
        self.cache_misses = 0;
    }

    /// The atlases glyphs are packed into.
    #[inline]
    pub fn atlases(&self) -> &GlyphAtlases {
        &self.atlases
    }

    /// Returns the groups that changed since the last call and marks them as
    /// uploaded.
    pub fn take_dirty_groups(&mut self) -> Vec<usize> {
        let dirty: Vec<usize> = self.atlases.dirty_groups().collect();
        for &group in &dirty {
            self.atlases.mark_uploaded(group);
        }
        dirty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use core::cell::Cell;
    use peniko::kurbo::{BezPath, Rect, Shape};

    /// Serves the same square for every codepoint except `'x'`, counting
    /// outline requests.
    struct Squares {
        id: u64,
        requests: Cell<usize>,
    }

    impl Squares {
        fn new(id: u64) -> Self {
            Self {
                id,
                requests: Cell::new(0),
            }
        }
    }

    impl GlyphSource for Squares {
        fn font_id(&self) -> u64 {
            self.id
        }

        fn outline(&self, codepoint: u32) -> Result<GlyphOutline, Error> {
            self.requests.set(self.requests.get() + 1);
            if codepoint == u32::from('x') {
                return Err(Error::font_load_failure("codepoint not mapped"));
            }
            if codepoint == u32::from(' ') {
                return Ok(GlyphOutline::new(BezPath::new(), 250.0));
            }
            let path = Rect::new(50.0, -10.0, 450.0, 690.0).to_path(0.1);
            Ok(GlyphOutline::new(path, 500.0))
        }
    }

    #[test]
    fn hits_return_the_stored_record() {
        let mut cache = GlyphCache::new(AtlasConfig::default()).unwrap();
        let font = Squares::new(1);

        let first = cache.get_glyph(&font, u32::from('a'));
        let second = cache.get_glyph(&font, u32::from('a'));
        assert_eq!(first, second);
        assert_eq!(font.requests.get(), 1, "outline is read once");
        assert_eq!((cache.cache_hits(), cache.cache_misses()), (1, 1));

        assert!(first.is_visible(), "square is drawable");
        assert_eq!(first.size, Size::new(400.0, 700.0));
        assert_eq!(first.bearing, Vec2::new(50.0, -10.0));
        assert_eq!(first.advance, 500.0);
    }

    #[test]
    fn fonts_are_cached_separately() {
        let mut cache = GlyphCache::new(AtlasConfig::default()).unwrap();
        let a = cache.get_glyph(&Squares::new(1), u32::from('a'));
        let b = cache.get_glyph(&Squares::new(2), u32::from('a'));
        assert_eq!(cache.len(), 2);
        assert_ne!(a.location, b.location, "each font gets its own data");
    }

    #[test]
    fn failures_become_invisible_records() {
        let mut cache = GlyphCache::new(AtlasConfig::default()).unwrap();
        let font = Squares::new(1);

        let missing = cache.get_glyph(&font, u32::from('x'));
        assert_eq!(missing, GlyphRecord::default());

        let space = cache.get_glyph(&font, u32::from(' '));
        assert!(!space.is_visible(), "space draws nothing");
        assert_eq!(space.advance, 250.0, "space keeps its advance");

        // Failures are memoized too.
        cache.get_glyph(&font, u32::from('x'));
        assert_eq!(font.requests.get(), 2);
        assert!(cache.atlases().groups().is_empty(), "nothing was packed");
    }

    #[test]
    fn preload_covers_printable_ascii() {
        let mut cache = GlyphCache::new(AtlasConfig::default()).unwrap();
        let font = Squares::new(7);
        cache.preload_ascii(&font);
        assert_eq!(cache.len(), 97);
        assert_eq!(cache.cache_misses(), 97);
        let key = GlyphKey {
            font_id: 7,
            codepoint: u32::from('~'),
        };
        assert!(cache.peek(&key).is_some_and(GlyphRecord::is_visible));

        cache.clear_stats();
        assert_eq!((cache.cache_hits(), cache.cache_misses()), (0, 0));
        assert_eq!(cache.len(), 97, "clearing stats keeps glyphs");
    }

    #[test]
    fn dirty_groups_are_taken_once() {
        let mut cache = GlyphCache::new(AtlasConfig::default()).unwrap();
        let font = Squares::new(1);
        cache.get_glyph(&font, u32::from('a'));
        assert_eq!(cache.take_dirty_groups(), [0]);
        assert!(cache.take_dirty_groups().is_empty(), "already uploaded");
        cache.get_glyph(&font, u32::from('a'));
        assert!(cache.take_dirty_groups().is_empty(), "hits do not dirty groups");
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = AtlasConfig {
            depth: 1,
            ..Default::default()
        };
        let err = GlyphCache::new(config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }
}
