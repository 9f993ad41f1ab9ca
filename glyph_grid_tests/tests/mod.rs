// Copyright 2025 the Glyph Grid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! This crate contains the integration test suite for `glyph_grid`.
//!
//! - The `util` module contains synthetic outlines and a test font shared by the
//!   different test modules.
//! - We do not use the default Rust test harness, but instead use this `mod.rs` file as the
//!   entry point to run all other tests, which makes the shared utilities easy to reach.
//! - For test naming, try to put the "topic" of the test at the start of the name, e.g.
//!   `packing_overflow_opens_new_group` rather than `new_group_on_packing_overflow`.

#![allow(missing_docs, reason = "we don't need docs for testing")]
#![allow(clippy::cast_possible_truncation, reason = "not critical for testing")]

mod cache;
mod util;
mod vertex;
