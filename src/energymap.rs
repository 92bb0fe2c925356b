// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Energy maps
//!
//! The energy of every pixel in an image at once, and a greyscale
//! rendering of that map for eyeballing what the carver will avoid.

use crate::cq;
use crate::energy::dual_gradient_energy;
use crate::error::Result;
use crate::twodmap::TwoDimensionalMap;
use image::{GenericImageView, GrayImage, Luma, Pixel, Primitive};
use itertools::iproduct;

/// Compute the dual-gradient energy of every pixel in an image.
pub fn energy_map<I, P, S>(image: &I) -> Result<TwoDimensionalMap<f64>>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    let (width, height) = image.dimensions();
    let mut emap = TwoDimensionalMap::new(width, height);
    for (y, x) in iproduct!(0..height, 0..width) {
        emap[(x, y)] = dual_gradient_energy(image, x, y)?;
    }
    Ok(emap)
}

/// Render an energy map as an 8-bit greyscale image, with the most
/// energetic pixel at full white.  An all-zero map renders black.
pub fn energy_to_image(energy: &TwoDimensionalMap<f64>) -> GrayImage {
    let factor = energy.as_slice().iter().cloned().fold(0.0, f64::max);
    GrayImage::from_fn(energy.width(), energy.height(), |x, y| {
        let e = energy[(x, y)];
        let level = cq!(factor > 0.0, (e / factor * 255.0).round(), 0.0);
        Luma([level.max(0.0).min(255.0) as u8])
    })
}
