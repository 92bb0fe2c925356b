// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calculate the energy of a pixel
//!
//! The dual-gradient energy: the square root of the summed squared
//! per-channel differences between a pixel's left and right
//! neighbors, plus those between its upper and lower neighbors.  The
//! image is treated as a torus, so a pixel on the left edge uses the
//! rightmost pixel of its row as its left neighbor, and so on.
//!
//! ```text
//!        |Δx|² = (Δrx)²+(Δgx)²+(Δbx)²
//!        |Δy|² = (Δry)²+(Δgy)²+(Δby)²
//!       e(x,y) = √(|Δx|²+|Δy|²)
//! ```

use crate::cq;
use crate::error::{Result, SeamError};
use image::{GenericImageView, Pixel, Primitive};
use num_traits::{NumCast, ToPrimitive};

// Every image primitive fits in an f64.
#[inline]
fn channel<S: ToPrimitive>(s: S) -> f64 {
    <f64 as NumCast>::from(s).unwrap_or(0.0)
}

// (Pixel, Pixel) -> summed squared channel difference, over RGB.
#[inline]
fn gradient_of_pair<P, S>(p1: &P, p2: &P) -> f64
where
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    p1.to_rgb()
        .0
        .iter()
        .zip(p2.to_rgb().0.iter())
        .map(|(c1, c2)| {
            let d = channel(*c1) - channel(*c2);
            d * d
        })
        .sum()
}

/// The dual-gradient energy of the pixel at `(x, y)`.  Always finite
/// and non-negative; a uniformly colored image has zero energy
/// everywhere.
///
/// Fails with `SeamError::OutOfBounds` if `(x, y)` isn't in the image.
pub fn dual_gradient_energy<I, P, S>(image: &I, x: u32, y: u32) -> Result<f64>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    let (width, height) = image.dimensions();
    if x >= width || y >= height {
        return Err(SeamError::OutOfBounds {
            x,
            y,
            width,
            height,
        });
    }
    let (mw, mh) = (width - 1, height - 1);

    let (leftpixel, rightpixel, uppixel, downpixel) = (
        image.get_pixel(cq!(x == 0, mw, x - 1), y),
        image.get_pixel(cq!(x == mw, 0, x + 1), y),
        image.get_pixel(x, cq!(y == 0, mh, y - 1)),
        image.get_pixel(x, cq!(y == mh, 0, y + 1)),
    );

    Ok((gradient_of_pair(&rightpixel, &leftpixel) + gradient_of_pair(&uppixel, &downpixel)).sqrt())
}
