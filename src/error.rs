// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors
//!
//! Everything that can go wrong while measuring, finding, or removing
//! a seam.  Validation always happens before an image is touched, so
//! any of these leaves the carver's image exactly as it was.

use failure::Fail;

/// The failure modes of the seam carver.
#[derive(Debug, Fail, Clone, PartialEq)]
pub enum SeamError {
    /// A pixel address outside the image.
    #[fail(display = "pixel ({}, {}) is outside a {}x{} image", x, y, width, height)]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// The seam does not have one entry per row (or column).
    #[fail(display = "seam has {} entries, expected {}", actual, expected)]
    SeamLength { expected: usize, actual: usize },

    /// A seam entry names a pixel that isn't there.
    #[fail(display = "seam entry {} is {}, but must be less than {}", index, value, limit)]
    SeamOutOfRange { index: usize, value: u32, limit: u32 },

    /// Entries `index` and `index + 1` are more than one pixel apart.
    #[fail(display = "seam entries {} and {} are more than one pixel apart", index, next)]
    DisjointSeam { index: usize, next: usize },

    /// Removing the seam would leave an image with no columns (or rows).
    #[fail(display = "cannot remove the only remaining {} of the image", line)]
    SoleLine { line: &'static str },

    /// The solver exhausted its frontier, or its cost bound, without
    /// reaching the goal.  For a seam graph this is a bug.
    #[fail(display = "no path found between the source and the goal")]
    NoPathFound,

    /// `carve` only ever shrinks an image.
    #[fail(
        display = "cannot upscale a {}x{} image to {}x{}",
        width, height, new_width, new_height
    )]
    Upscale {
        width: u32,
        height: u32,
        new_width: u32,
        new_height: u32,
    },
}

impl SeamError {
    /// True for the errors a caller causes by handing over a bad seam.
    pub fn is_validation(&self) -> bool {
        match self {
            SeamError::SeamLength { .. }
            | SeamError::SeamOutOfRange { .. }
            | SeamError::DisjointSeam { .. }
            | SeamError::SoleLine { .. } => true,
            _ => false,
        }
    }
}

/// The crate-wide result type.
pub type Result<T> = std::result::Result<T, SeamError>;
