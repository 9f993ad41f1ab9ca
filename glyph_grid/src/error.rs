// Copyright 2025 the Glyph Grid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Error produced while preparing a glyph.
///
/// Carries a non-exhaustive [`ErrorKind`] plus a short description and, for
/// capacity errors, the offending count and the limit it was checked against.
///
/// None of these errors abort a [`GlyphCache`](crate::GlyphCache) lookup: the
/// cache degrades them to an invisible glyph and logs them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    /// The non-exhaustive category describing this error.
    kind: ErrorKind,

    /// What was being processed when the error occurred.
    detail: &'static str,

    /// The count that exceeded `limit`, for capacity errors.
    count: Option<usize>,

    /// The limit that `count` was checked against.
    limit: Option<usize>,
}

impl Error {
    /// The machine-readable category for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// A short description of what was being processed.
    pub fn detail(&self) -> &'static str {
        self.detail
    }

    /// The count that exceeded the limit, for capacity errors.
    pub fn count(&self) -> Option<usize> {
        self.count
    }

    /// The limit that was exceeded, for capacity errors.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// An outline whose contours cannot be decomposed.
    pub fn malformed_outline(detail: &'static str) -> Self {
        Self {
            kind: ErrorKind::MalformedOutline,
            detail,
            count: None,
            limit: None,
        }
    }

    /// A glyph needing `count` data texels when only `limit` are available.
    pub fn too_many_curves(count: usize, limit: usize) -> Self {
        Self {
            kind: ErrorKind::TooManyCurves,
            detail: "glyph data does not fit in an empty atlas group",
            count: Some(count),
            limit: Some(limit),
        }
    }

    /// Grid cells of one glyph that held `count` bezier references when only
    /// `limit` of them could be stored.
    pub fn cell_overflow(count: usize, limit: usize) -> Self {
        Self {
            kind: ErrorKind::CellOverflow,
            detail: "bezier references dropped from grid cells",
            count: Some(count),
            limit: Some(limit),
        }
    }

    /// A font that cannot be read or that lacks a requested glyph.
    pub fn font_load_failure(detail: &'static str) -> Self {
        Self {
            kind: ErrorKind::FontLoadFailure,
            detail,
            count: None,
            limit: None,
        }
    }

    /// An atlas configuration that cannot hold a glyph.
    pub fn invalid_config(detail: &'static str) -> Self {
        Self {
            kind: ErrorKind::InvalidConfig,
            detail,
            count: None,
            limit: None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            ErrorKind::MalformedOutline => write!(f, "malformed outline: {}", self.detail),
            ErrorKind::TooManyCurves => match (self.count, self.limit) {
                (Some(count), Some(limit)) => write!(
                    f,
                    "too many curves: {} needs {count} texels, limit is {limit}",
                    self.detail
                ),
                _ => write!(f, "too many curves: {}", self.detail),
            },
            ErrorKind::CellOverflow => match (self.count, self.limit) {
                (Some(count), Some(limit)) => write!(
                    f,
                    "grid cell overflow: {}, kept {limit} of {count}",
                    self.detail
                ),
                _ => write!(f, "grid cell overflow: {}", self.detail),
            },
            ErrorKind::FontLoadFailure => write!(f, "font load failure: {}", self.detail),
            ErrorKind::InvalidConfig => write!(f, "invalid atlas configuration: {}", self.detail),
        }
    }
}

impl core::error::Error for Error {}

/// The non-exhaustive category of an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A contour did not return to its start, or a drawing command came before
    /// any move.
    MalformedOutline,

    /// The glyph's curves do not fit into one atlas group.
    TooManyCurves,

    /// A grid cell referenced more curves than a grid texel can hold.
    ///
    /// This is a soft degradation: the excess references are dropped and the
    /// glyph is still packed. It is never returned from a fallible operation;
    /// [`GlyphAtlases::insert`](crate::GlyphAtlases::insert) logs it and counts
    /// the dropped references in [`CellWrite`](crate::CellWrite).
    CellOverflow,

    /// The font could not be read or has no glyph for the codepoint.
    FontLoadFailure,

    /// The atlas configuration cannot hold a single glyph grid or cannot encode
    /// the inside flag.
    InvalidConfig,
}
