// Copyright 2025 the Glyph Grid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Byte atlases holding packed glyph grids and bezier data.
//!
//! Glyphs are stored in [`AtlasGroup`]s, each of which pairs a *grid atlas*
//! (a 2D texture with one `grid_width x grid_height` block per glyph) with a
//! *data atlas* (a linear buffer of 4-byte texels). The glyph data run in the
//! data atlas starts with a header locating the glyph's grid block, followed
//! by its beziers:
//!
//! ```text
//! texel 0: grid x (u16 LE), grid y (u16 LE)
//! texel 1: grid width (u16 LE), grid height (u16 LE)
//! texel 2 + 3i .. 2 + 3i + 3: e0.x, e0.y, c.x, c.y, e1.x, e1.y (u16 LE each)
//! ```
//!
//! Bezier coordinates are normalized to `[0, 65535]` over the glyph's size.
//!
//! Each grid cell texel holds up to `depth` bezier references, stored as
//! `index + 2`. Whether the cell's center is inside the glyph is encoded in the
//! order of the first two bytes: the cell is inside exactly when
//! `byte0 > byte1`.

use alloc::vec;
use alloc::vec::Vec;
use peniko::kurbo::Size;
use smallvec::SmallVec;

use crate::bezier::Bezier2;
use crate::error::Error;
use crate::grid::{CellBeziers, VGrid};

/// Channels per texel of the data atlas.
pub const DATA_ATLAS_CHANNELS: u8 = 4;

/// Data atlas texels used by a glyph's header.
pub const HEADER_TEXELS: u32 = 2;

/// Data atlas texels used by one bezier.
pub const TEXELS_PER_BEZIER: u32 = 3;

/// Offset added to a bezier index when it is stored in a grid cell.
///
/// Byte values below this are reserved: `0` marks an unused slot and
/// [`MID_INSIDE_SENTINEL`] marks an inside cell with no beziers.
pub const INDEX_OFFSET: u8 = 2;

/// Byte stored in an otherwise empty cell whose center is inside the glyph.
pub const MID_INSIDE_SENTINEL: u8 = 1;

/// Largest data atlas, in texels, whose offsets still fit in the vertex data
/// word next to the two corner bits.
const MAX_DATA_TEXELS: u64 = 1 << 30;

/// Sizes of the atlases and of the per-glyph grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AtlasConfig {
    /// Width and height of each grid atlas, in texels.
    pub grid_atlas_size: u16,
    /// Width and height of each data atlas, in texels.
    pub data_atlas_size: u16,
    /// Bytes per grid atlas texel, which is the number of bezier references a
    /// cell can hold.
    pub depth: u8,
    /// Columns of each glyph's grid.
    pub grid_width: u16,
    /// Rows of each glyph's grid.
    pub grid_height: u16,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            grid_atlas_size: 256,
            data_atlas_size: 256,
            depth: 4,
            grid_width: 20,
            grid_height: 20,
        }
    }
}

impl AtlasConfig {
    /// Checks that the configuration can hold at least one glyph.
    pub fn validate(&self) -> Result<(), Error> {
        if !(2..=4).contains(&self.depth) {
            return Err(Error::invalid_config(
                "grid atlas depth must be between 2 and 4",
            ));
        }
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(Error::invalid_config("glyph grid must have at least one cell"));
        }
        if self.grid_width > self.grid_atlas_size || self.grid_height > self.grid_atlas_size {
            return Err(Error::invalid_config(
                "glyph grid does not fit in the grid atlas",
            ));
        }
        let data_texels = self.data_texels();
        if data_texels < u64::from(HEADER_TEXELS + TEXELS_PER_BEZIER) {
            return Err(Error::invalid_config(
                "data atlas cannot hold a single bezier",
            ));
        }
        if data_texels > MAX_DATA_TEXELS {
            return Err(Error::invalid_config(
                "data atlas offsets do not fit in vertex data",
            ));
        }
        Ok(())
    }

    /// Number of texels in each data atlas.
    #[inline]
    pub fn data_texels(&self) -> u64 {
        u64::from(self.data_atlas_size) * u64::from(self.data_atlas_size)
    }
}

/// An owned byte texture.
///
/// Texel `(x, y)` is stored at `(y * width + x) * depth`, with `y = 0` as the
/// bottom row.
#[derive(Clone, PartialEq, Eq)]
pub struct Atlas {
    width: u32,
    height: u32,
    depth: u8,
    data: Vec<u8>,
}

impl core::fmt::Debug for Atlas {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Atlas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

impl Atlas {
    /// Creates a zeroed atlas.
    pub fn new(width: u32, height: u32, depth: u8) -> Self {
        let len = width as usize * height as usize * usize::from(depth);
        Self {
            width,
            height,
            depth,
            data: vec![0; len],
        }
    }

    /// Width in texels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in texels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per texel.
    #[inline]
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// The raw texel bytes, ready for upload.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// The bytes of the texel at column `x` and row `y`.
    #[inline]
    pub fn texel(&self, x: u32, y: u32) -> &[u8] {
        self.texel_at(y * self.width + x)
    }

    /// Mutable bytes of the texel at column `x` and row `y`.
    #[inline]
    pub fn texel_mut(&mut self, x: u32, y: u32) -> &mut [u8] {
        let index = y * self.width + x;
        self.texels_mut(index, 1)
    }

    /// The bytes of the texel at linear `index`.
    #[inline]
    pub fn texel_at(&self, index: u32) -> &[u8] {
        let depth = usize::from(self.depth);
        let start = index as usize * depth;
        &self.data[start..start + depth]
    }

    fn texels_mut(&mut self, index: u32, count: u32) -> &mut [u8] {
        let depth = usize::from(self.depth);
        let start = index as usize * depth;
        &mut self.data[start..start + count as usize * depth]
    }

    #[cfg(feature = "png")]
    fn save_png(&self, path: &std::path::Path) -> std::io::Result<()> {
        use std::fs::File;
        use std::io::BufWriter;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        let w = BufWriter::new(file);

        let mut encoder = png::Encoder::new(w, self.width, self.height);
        encoder.set_color(match self.depth {
            1 => png::ColorType::Grayscale,
            2 => png::ColorType::GrayscaleAlpha,
            3 => png::ColorType::Rgb,
            _ => png::ColorType::Rgba,
        });
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header().map_err(std::io::Error::other)?;
        // PNG rows run top to bottom.
        let stride = self.width as usize * usize::from(self.depth);
        let flipped: Vec<u8> = self.data.rchunks_exact(stride).flatten().copied().collect();
        writer
            .write_image_data(&flipped)
            .map_err(std::io::Error::other)?;

        Ok(())
    }
}

/// Where a glyph's data lives.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AtlasLocation {
    /// Index of the atlas group.
    pub group: usize,
    /// Texel offset of the glyph's header in the group's data atlas.
    pub offset: u32,
}

/// Totals from encoding grid cells.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CellWrite {
    /// Bezier references stored.
    pub written: usize,
    /// Bezier references that did not fit and were dropped.
    pub dropped: usize,
}

impl CellWrite {
    /// The overflow as an error of kind
    /// [`CellOverflow`](crate::ErrorKind::CellOverflow), if any reference was
    /// dropped.
    pub fn overflow(&self) -> Option<Error> {
        (self.dropped > 0)
            .then(|| Error::cell_overflow(self.written + self.dropped, self.written))
    }
}

impl core::ops::AddAssign for CellWrite {
    fn add_assign(&mut self, rhs: Self) {
        self.written += rhs.written;
        self.dropped += rhs.dropped;
    }
}

/// Normalizes `value` from `[0, extent]` to `[0, 65535]`.
///
/// A zero extent maps every value to 0.
#[inline]
pub fn encode_coord(value: f64, extent: f64) -> u16 {
    if extent > 0.0 {
        // Float to int casts saturate.
        (value * f64::from(u16::MAX) / extent) as u16
    } else {
        0
    }
}

/// Encodes a cell's sorted bezier indices and its inside flag into `out`.
///
/// `out` must hold at least two bytes. References that do not fit in `out`, or
/// whose stored value would exceed a byte, are dropped and counted.
pub fn encode_cell(indices: &[u32], mid_inside: bool, out: &mut [u8]) -> CellWrite {
    debug_assert!(out.len() >= 2, "a cell needs two bytes to encode its inside flag");
    out.fill(0);

    let mut write = CellWrite::default();
    let mut bytes: SmallVec<[u8; 4]> = SmallVec::new();
    for &index in indices {
        let byte = index
            .checked_add(u32::from(INDEX_OFFSET))
            .and_then(|value| u8::try_from(value).ok());
        match byte {
            Some(byte) if bytes.len() < out.len() => bytes.push(byte),
            _ => write.dropped += 1,
        }
    }
    bytes.sort_unstable();
    bytes.dedup();
    write.written = bytes.len();

    match (bytes.as_slice(), mid_inside) {
        ([], true) => out[0] = MID_INSIDE_SENTINEL,
        ([], false) => {}
        ([only], true) => out[0] = *only,
        ([only], false) => out[1] = *only,
        (many, inside) => {
            out[..many.len()].copy_from_slice(many);
            if inside {
                out.swap(0, 1);
            }
        }
    }
    write
}

/// Decodes a grid cell texel into its inside flag and bezier indices.
pub fn decode_cell(texel: &[u8]) -> (bool, CellBeziers) {
    let inside = texel[0] > texel[1];
    let mut indices: CellBeziers = texel
        .iter()
        .filter(|&&byte| byte >= INDEX_OFFSET)
        .map(|&byte| u32::from(byte - INDEX_OFFSET))
        .collect();
    indices.sort_unstable();
    (inside, indices)
}

/// A position reserved in an [`AtlasGroup`].
#[derive(Copy, Clone, Debug)]
struct Reservation {
    grid_x: u32,
    grid_y: u32,
    offset: u32,
}

/// A grid atlas and a data atlas filled together.
///
/// Grid blocks are placed left to right in rows of `grid_height`; glyph data is
/// appended to the data atlas. Once either runs out of room the group is full
/// and never receives another glyph.
#[derive(Clone, Debug)]
pub struct AtlasGroup {
    grid: Atlas,
    data: Atlas,
    next_grid_x: u32,
    next_grid_y: u32,
    data_offset: u32,
    full: bool,
    dirty: bool,
}

impl AtlasGroup {
    fn new(config: &AtlasConfig) -> Self {
        let grid_size = u32::from(config.grid_atlas_size);
        let data_size = u32::from(config.data_atlas_size);
        Self {
            grid: Atlas::new(grid_size, grid_size, config.depth),
            data: Atlas::new(data_size, data_size, DATA_ATLAS_CHANNELS),
            next_grid_x: 0,
            next_grid_y: 0,
            data_offset: 0,
            full: false,
            dirty: false,
        }
    }

    /// The grid atlas.
    #[inline]
    pub fn grid_atlas(&self) -> &Atlas {
        &self.grid
    }

    /// The data atlas.
    #[inline]
    pub fn data_atlas(&self) -> &Atlas {
        &self.data
    }

    /// Data atlas texels in use.
    #[inline]
    pub fn data_used(&self) -> u32 {
        self.data_offset
    }

    /// Whether the group has stopped accepting glyphs.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Whether the group changed since it was last uploaded.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Writes both atlases of this group to PNG files.
    #[cfg(feature = "png")]
    pub fn save_png(
        &self,
        grid_path: &std::path::Path,
        data_path: &std::path::Path,
    ) -> std::io::Result<()> {
        self.grid.save_png(grid_path)?;
        self.data.save_png(data_path)
    }

    /// Finds room for a grid block and `texels` of glyph data, advancing the
    /// cursors on success.
    fn reserve(&mut self, config: &AtlasConfig, texels: u32) -> Option<Reservation> {
        if self.full {
            return None;
        }
        let capacity = self.data.width() * self.data.height();
        if u64::from(self.data_offset) + u64::from(texels) > u64::from(capacity) {
            return None;
        }

        let (block_w, block_h) = (u32::from(config.grid_width), u32::from(config.grid_height));
        let (mut x, mut y) = (self.next_grid_x, self.next_grid_y);
        if x + block_w > self.grid.width() {
            x = 0;
            y += block_h;
        }
        if y + block_h > self.grid.height() {
            return None;
        }

        let reservation = Reservation {
            grid_x: x,
            grid_y: y,
            offset: self.data_offset,
        };
        self.next_grid_x = x + block_w;
        self.next_grid_y = y;
        self.data_offset += texels;
        Some(reservation)
    }

    /// Writes a glyph's header, beziers and grid at a reserved position.
    fn write_glyph(
        &mut self,
        at: Reservation,
        beziers: &[Bezier2],
        grid: &VGrid,
        glyph_size: Size,
    ) -> CellWrite {
        // Header values are bounded by the grid atlas size, which is a u16.
        let header = [at.grid_x, at.grid_y, grid.width(), grid.height()].map(|v| v as u16);
        let coords = beziers
            .iter()
            .flat_map(|b| [b.e0, b.c, b.e1])
            .flat_map(|p| {
                [
                    encode_coord(p.x, glyph_size.width),
                    encode_coord(p.y, glyph_size.height),
                ]
            });
        let texels = HEADER_TEXELS + TEXELS_PER_BEZIER * beziers.len() as u32;
        let bytes = self.data.texels_mut(at.offset, texels);
        for (chunk, word) in bytes.chunks_exact_mut(2).zip(header.into_iter().chain(coords)) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }

        let mut write = CellWrite::default();
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let texel = self.grid.texel_mut(at.grid_x + x, at.grid_y + y);
                write += encode_cell(grid.beziers_at(x, y), grid.mid_inside(x, y), texel);
            }
        }

        self.dirty = true;
        write
    }
}

/// The ordered list of atlas groups.
///
/// Only the last group is open for new glyphs.
#[derive(Clone, Debug)]
pub struct GlyphAtlases {
    config: AtlasConfig,
    groups: Vec<AtlasGroup>,
}

impl GlyphAtlases {
    /// Creates an empty set of atlases after validating `config`.
    pub fn new(config: AtlasConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            config,
            groups: Vec::new(),
        })
    }

    /// The configuration the atlases were created with.
    #[inline]
    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    /// All groups, in creation order.
    #[inline]
    pub fn groups(&self) -> &[AtlasGroup] {
        &self.groups
    }

    /// The group at `index`.
    #[inline]
    pub fn group(&self, index: usize) -> Option<&AtlasGroup> {
        self.groups.get(index)
    }

    /// Packs a glyph's beziers and grid, opening a new group when the current
    /// one cannot take it.
    ///
    /// `beziers` must be relative to the glyph's bounding box, which spans
    /// `glyph_size`. The grid and the data always land in the same group.
    pub fn insert(
        &mut self,
        beziers: &[Bezier2],
        grid: &VGrid,
        glyph_size: Size,
    ) -> Result<(AtlasLocation, CellWrite), Error> {
        let needed = u64::from(HEADER_TEXELS)
            + u64::from(TEXELS_PER_BEZIER) * beziers.len() as u64;
        let capacity = self.config.data_texels();
        if needed > capacity {
            return Err(Error::too_many_curves(needed as usize, capacity as usize));
        }
        if grid.width() > u32::from(self.config.grid_width)
            || grid.height() > u32::from(self.config.grid_height)
        {
            return Err(Error::invalid_config(
                "glyph grid is larger than the configured grid block",
            ));
        }
        // Bounded by the capacity check and `MAX_DATA_TEXELS`.
        let texels = needed as u32;
        let config = self.config;

        let (group, reservation) = match self.open_group().reserve(&config, texels) {
            Some(reservation) => (self.groups.len() - 1, reservation),
            None => {
                if let Some(last) = self.groups.last_mut() {
                    last.full = true;
                }
                let reservation = self
                    .open_group()
                    .reserve(&config, texels)
                    .ok_or(Error::too_many_curves(needed as usize, capacity as usize))?;
                (self.groups.len() - 1, reservation)
            }
        };

        let write = self.groups[group].write_glyph(reservation, beziers, grid, glyph_size);
        if let Some(overflow) = write.overflow() {
            log::warn!("{overflow}");
        }
        Ok((
            AtlasLocation {
                group,
                offset: reservation.offset,
            },
            write,
        ))
    }

    /// The last group, or a new one if there is none or it is full.
    fn open_group(&mut self) -> &mut AtlasGroup {
        if self.groups.last().is_none_or(|group| group.full) {
            log::debug!("opening atlas group {}", self.groups.len());
            self.groups.push(AtlasGroup::new(&self.config));
        }
        let last = self.groups.len() - 1;
        &mut self.groups[last]
    }

    /// Indices of the groups changed since their last upload.
    pub fn dirty_groups(&self) -> impl Iterator<Item = usize> + '_ {
        self.groups
            .iter()
            .enumerate()
            .filter(|(_, group)| group.dirty)
            .map(|(index, _)| index)
    }

    /// Marks a group as uploaded.
    pub fn mark_uploaded(&mut self, group: usize) {
        if let Some(group) = self.groups.get_mut(group) {
            group.dirty = false;
        }
    }
}
