// Copyright 2025 the Glyph Grid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph Grid turns font outlines into compact GPU-friendly data for
//! resolution-independent text rendering.
//!
//! A glyph goes through four stages:
//!
//! 1. Its outline is decomposed into a flat list of clockwise quadratic
//!    beziers ([`decompose`]), approximating cubics along the way
//!    ([`cubic_to_quads`]).
//! 2. A fixed-size [`VGrid`] is overlaid on the glyph's bounding box, recording
//!    which beziers cross each cell and whether each cell's center is inside
//!    the glyph.
//! 3. The beziers and the grid are packed into a pair of byte atlases
//!    ([`GlyphAtlases`]) that can be uploaded as textures.
//! 4. A fragment shader reads those atlases to compute coverage per pixel.
//!
//! [`GlyphCache`] runs the first three stages on demand for each
//! `(font, codepoint)` pair and memoizes the resulting [`GlyphRecord`].
//!
//! ## Features
//!
//! - `std` (enabled by default): Get floating point functions from the standard library
//!   (likely using your target's libc).
//! - `libm`: Use floating point implementations from [libm].
//! - `png`: Enables dumping atlas groups to PNG files for debugging.
//!
//! At least one of `std` and `libm` is required; `std` overrides `libm`.
//!
//! [libm]: https://crates.io/crates/libm

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub use peniko::{self, kurbo};
pub use skrifa;

mod atlas;
mod bezier;
mod cache;
mod cubic;
mod error;
mod grid;
mod math;
mod outline;
mod skrifa_face;
mod vertex;

pub use atlas::{
    Atlas, AtlasConfig, AtlasGroup, AtlasLocation, CellWrite, DATA_ATLAS_CHANNELS,
    GlyphAtlases, HEADER_TEXELS, INDEX_OFFSET, MID_INSIDE_SENTINEL, TEXELS_PER_BEZIER,
    decode_cell, encode_cell, encode_coord,
};
pub use bezier::{Bezier2, Intersections};
pub use cache::{GlyphCache, GlyphKey, GlyphRecord, GlyphSource};
pub use cubic::{MAX_QUADS, cubic_to_quads};
pub use error::{Error, ErrorKind};
pub use grid::{CellBeziers, VGrid};
pub use outline::{
    DecomposeOptions, GlyphMetrics, GlyphOutline, Orientation, cubic_resolution, decompose,
};
pub use skrifa_face::{OutlineRecorder, SkrifaFace};
pub use vertex::{GlyphVertex, glyph_quad, pack_vertex_data, vertices_as_bytes};
