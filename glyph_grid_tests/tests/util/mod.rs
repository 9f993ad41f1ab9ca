// Copyright 2025 the Glyph Grid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Utility functions and types shared across tests.

pub(crate) mod samples;
mod source;

pub(crate) use source::TestFont;

use glyph_grid::{Atlas, AtlasGroup, AtlasLocation, Bezier2};

/// Reads the 16-bit value in the `half`-th half of data atlas texel `texel`.
pub(crate) fn read_u16(atlas: &Atlas, texel: u32, half: usize) -> u16 {
    let bytes = atlas.texel_at(texel);
    u16::from_le_bytes([bytes[half * 2], bytes[half * 2 + 1]])
}

/// The grid block origin and size stored in a glyph's header.
pub(crate) fn read_header(group: &AtlasGroup, location: AtlasLocation) -> [u16; 4] {
    let data = group.data_atlas();
    [
        read_u16(data, location.offset, 0),
        read_u16(data, location.offset, 1),
        read_u16(data, location.offset + 1, 0),
        read_u16(data, location.offset + 1, 1),
    ]
}

/// Twice the signed area enclosed by closed bezier chains, using control
/// polygons. Negative for clockwise fill in y-up space.
pub(crate) fn signed_area(beziers: &[Bezier2]) -> f64 {
    beziers
        .iter()
        .map(|b| {
            (b.e0.x * b.c.y - b.c.x * b.e0.y) + (b.c.x * b.e1.y - b.e1.x * b.c.y)
        })
        .sum()
}
