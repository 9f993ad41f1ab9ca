// Copyright 2025 the Glyph Grid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vertices for drawing prepared glyphs as quads.

use bytemuck::{Pod, Zeroable};
use peniko::Color;
use peniko::kurbo::Point;

use crate::cache::GlyphRecord;

/// One corner of a glyph quad, laid out for direct upload.
///
/// `data` packs the glyph's data atlas offset together with the corner's
/// position within the glyph's bounding box (see [`pack_vertex_data`]).
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct GlyphVertex {
    /// Position in the caller's coordinate space.
    pub position: [f32; 2],
    /// Packed data atlas offset and corner bits.
    pub data: u32,
    /// Color as non-premultiplied RGBA8.
    pub color: [u8; 4],
}

/// Packs a data atlas `offset` with the corner of vertex `corner` of a quad.
///
/// The vertices of the two triangles of a quad visit corners 0, 1, 2, 3, 2, 1,
/// where bit 0 of the corner is the x coordinate and bit 1 the y coordinate in
/// the normalized glyph box. The low two bits of the result are `x << 1 | y`.
#[inline]
pub fn pack_vertex_data(offset: u32, corner: usize) -> u32 {
    let k = if corner < 4 { corner } else { 6 - corner };
    let norm_x = (k & 1) as u32;
    let norm_y = u32::from(k > 1);
    (offset << 2) | (norm_x << 1) | norm_y
}

/// Builds the six vertices covering `record`'s bounding box with the pen at
/// `origin`.
///
/// Returns `None` for glyphs that draw nothing.
pub fn glyph_quad(record: &GlyphRecord, origin: Point, color: Color) -> Option<[GlyphVertex; 6]> {
    let location = record.location?;
    let base = origin + record.bearing;
    let color = color.to_rgba8();
    let color = [color.r, color.g, color.b, color.a];

    Some(core::array::from_fn(|j| {
        let data = pack_vertex_data(location.offset, j);
        let (norm_x, norm_y) = ((data >> 1) & 1, data & 1);
        let x = base.x + record.size.width * f64::from(norm_x);
        let y = base.y + record.size.height * f64::from(norm_y);
        GlyphVertex {
            position: [x as f32, y as f32],
            data,
            color,
        }
    }))
}

/// Views vertices as bytes for upload.
#[inline]
pub fn vertices_as_bytes(vertices: &[GlyphVertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}
