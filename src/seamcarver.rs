// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seamcarver - finding and removing seams
//!
//! The carver owns its image outright.  Seams are found by building a
//! fresh seam graph over the image and handing it to the A* solver;
//! horizontal seams are found by rotating a copy of the image a
//! quarter turn clockwise and looking for a vertical seam in that.
//! Removing a seam validates it completely before building the
//! narrower image, so a bad seam never leaves a half-carved picture
//! behind.

use crate::astar::AStarSolver;
use crate::cq;
use crate::energy::dual_gradient_energy;
use crate::error::{Result, SeamError};
use crate::seamfinder::SeamFinder;
use crate::seamgraph::{SeamGraph, SeamNode};
use image::imageops::rotate90;
use image::{GenericImageView, ImageBuffer, Pixel, Primitive};
use log::debug;

// The shortest top-to-bottom path through an image's seam graph,
// sentinels stripped: one x coordinate per row.
fn vertical_seam_of<I, P, S>(image: &I) -> Result<Vec<u32>>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    let graph = SeamGraph::new(image)?;
    let solver = AStarSolver::solve(&graph, SeamNode::Source, SeamNode::Sink, f64::INFINITY)?;
    debug!(
        "seam of energy {} found in a {}x{} image",
        solver.solution_weight(),
        graph.width(),
        graph.height()
    );
    Ok(solver
        .into_solution()
        .into_iter()
        .filter_map(|node| match node {
            SeamNode::Pixel(p) => Some(p.x()),
            _ => None,
        })
        .collect())
}

// A seam is removable if there's something left after removing it, it
// has one entry per line it crosses, every entry names a real pixel,
// and no two neighboring entries are more than one pixel apart.
fn validate_seam(seam: &[u32], length: u32, limit: u32, line: &'static str) -> Result<()> {
    if limit <= 1 {
        return Err(SeamError::SoleLine { line });
    }
    if seam.len() != length as usize {
        return Err(SeamError::SeamLength {
            expected: length as usize,
            actual: seam.len(),
        });
    }
    if let Some((index, &value)) = seam.iter().enumerate().find(|(_, &v)| v >= limit) {
        return Err(SeamError::SeamOutOfRange {
            index,
            value,
            limit,
        });
    }
    if let Some(index) = seam
        .windows(2)
        .position(|pair| cq!(pair[0] > pair[1], pair[0] - pair[1], pair[1] - pair[0]) > 1)
    {
        return Err(SeamError::DisjointSeam {
            index,
            next: index + 1,
        });
    }
    Ok(())
}

// This is silly and basically a reimplementation of `bool` and `not`,
// but it makes it much clearer in `carve` what's going on.
#[derive(PartialEq, Copy, Clone, Debug)]
enum Carve {
    Width,
    Height,
}

impl Carve {
    fn turn(self) -> Self {
        cq!(self == Carve::Width, Carve::Height, Carve::Width)
    }
}

/// Holds an image and carves seams out of it.
#[derive(Debug, Clone)]
pub struct SeamCarver<P, S>
where
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    image: ImageBuffer<P, Vec<S>>,
}

impl<P, S> SeamCarver<P, S>
where
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    /// Creates a new SeamCarver holding its own copy of the image.
    pub fn new<I>(image: &I) -> Self
    where
        I: GenericImageView<Pixel = P>,
    {
        let (width, height) = image.dimensions();
        SeamCarver {
            image: ImageBuffer::from_fn(width, height, |x, y| image.get_pixel(x, y)),
        }
    }

    /// Creates a new SeamCarver that takes over an existing buffer.
    pub fn from_buffer(image: ImageBuffer<P, Vec<S>>) -> Self {
        SeamCarver { image }
    }

    /// A copy of the current image.  Changes to it don't reach the
    /// carver.
    pub fn picture(&self) -> ImageBuffer<P, Vec<S>> {
        self.image.clone()
    }

    /// Replace the current image.
    pub fn set_picture(&mut self, image: ImageBuffer<P, Vec<S>>) {
        self.image = image;
    }

    /// Give up the carver, keeping the image.
    pub fn into_picture(self) -> ImageBuffer<P, Vec<S>> {
        self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn in_bounds(&self, x: u32, y: u32) -> bool {
        x < self.width() && y < self.height()
    }

    /// The color of the pixel at `(x, y)`.
    pub fn get(&self, x: u32, y: u32) -> Result<P> {
        if !self.in_bounds(x, y) {
            return Err(SeamError::OutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            });
        }
        Ok(*self.image.get_pixel(x, y))
    }

    /// The dual-gradient energy of the pixel at `(x, y)`.
    pub fn energy(&self, x: u32, y: u32) -> Result<f64> {
        dual_gradient_energy(&self.image, x, y)
    }

    /// Remove one pixel from every row, shifting everything to the
    /// right of it one column left.  `seam[y]` is the column of the
    /// pixel to remove from row `y`.
    pub fn remove_vertical_seam(&mut self, seam: &[u32]) -> Result<()> {
        let (width, height) = self.image.dimensions();
        validate_seam(seam, height, width, "column")?;

        let image = &self.image;
        let carved = ImageBuffer::from_fn(width - 1, height, |x, y| {
            *image.get_pixel(cq!(x < seam[y as usize], x, x + 1), y)
        });
        self.image = carved;
        debug!("vertical seam removed, now {}x{}", width - 1, height);
        Ok(())
    }

    /// Remove one pixel from every column, shifting everything below
    /// it one row up.  `seam[x]` is the row of the pixel to remove
    /// from column `x`.
    pub fn remove_horizontal_seam(&mut self, seam: &[u32]) -> Result<()> {
        let (width, height) = self.image.dimensions();
        validate_seam(seam, width, height, "row")?;

        let image = &self.image;
        let carved = ImageBuffer::from_fn(width, height - 1, |x, y| {
            *image.get_pixel(x, cq!(y < seam[x as usize], y, y + 1))
        });
        self.image = carved;
        debug!("horizontal seam removed, now {}x{}", width, height - 1);
        Ok(())
    }

    // It's absurdly inefficient to rebuild the whole seam graph for
    // every seam, but each pass is exact and independent.

    /// Given a desired new width and height, repeatedly find and remove
    /// seams, alternating directions while both dimensions need to
    /// shrink.
    pub fn carve(&mut self, new_width: u32, new_height: u32) -> Result<()> {
        let (width, height) = self.image.dimensions();
        if width < new_width || height < new_height {
            return Err(SeamError::Upscale {
                width,
                height,
                new_width,
                new_height,
            });
        }
        if new_width == 0 {
            return Err(SeamError::SoleLine { line: "column" });
        }
        if new_height == 0 {
            return Err(SeamError::SoleLine { line: "row" });
        }

        let mut direction = Carve::Width;
        while self.width() > new_width && self.height() > new_height {
            self.carve_once(direction)?;
            direction = direction.turn();
        }
        while self.width() > new_width {
            self.carve_once(Carve::Width)?;
        }
        while self.height() > new_height {
            self.carve_once(Carve::Height)?;
        }
        Ok(())
    }

    fn carve_once(&mut self, direction: Carve) -> Result<()> {
        match direction {
            Carve::Width => {
                let seam = self.find_vertical_seam()?;
                self.remove_vertical_seam(&seam)
            }
            Carve::Height => {
                let seam = self.find_horizontal_seam()?;
                self.remove_horizontal_seam(&seam)
            }
        }
    }
}

impl<P, S> SeamFinder for SeamCarver<P, S>
where
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    /// Rotate a private copy of the image clockwise, so that column
    /// `x` of the original becomes row `x` read right to left, find a
    /// vertical seam there, and mirror the coordinates back.  The
    /// carver's own image is never turned.
    fn find_horizontal_seam(&self) -> Result<Vec<u32>> {
        let rotated = rotate90(&self.image);
        let last = rotated.width().saturating_sub(1);
        Ok(vertical_seam_of(&rotated)?.into_iter().map(|v| last - v).collect())
    }

    fn find_vertical_seam(&self) -> Result<Vec<u32>> {
        vertical_seam_of(&self.image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use image::{Rgb, RgbImage};

    const IMAGE_DATA: [u8; 36] = [
        255, 101, 51, 255, 101, 153, 255, 101, 255, //
        255, 153, 51, 255, 153, 153, 255, 153, 255, //
        255, 203, 51, 255, 204, 153, 255, 205, 255, //
        255, 255, 51, 255, 255, 153, 255, 255, 255, //
    ];

    fn sample() -> RgbImage {
        ImageBuffer::from_raw(3, 4, IMAGE_DATA.to_vec()).unwrap()
    }

    // Busy enough that no two pixels share an energy by accident.
    fn noisy(width: u32, height: u32) -> RgbImage {
        ImageBuffer::from_fn(width, height, |x, y| {
            Rgb([
                ((x * 37 + y * 91 + 11) % 256) as u8,
                ((x * x * 13 + y * 7) % 256) as u8,
                ((x * 53 + y * y * 29 + 5) % 256) as u8,
            ])
        })
    }

    fn checkerboard() -> RgbImage {
        ImageBuffer::from_fn(3, 3, |x, y| {
            cq!((x + y) % 2 == 0, Rgb([0, 0, 0]), Rgb([255, 255, 255]))
        })
    }

    // Try every 8-connected path of `len` steps through values
    // `0..span`, and return the cheapest total.
    fn brute_force(len: u32, span: u32, cost: &dyn Fn(u32, u32) -> f64) -> f64 {
        fn cheapest_from(i: u32, v: u32, len: u32, span: u32, cost: &dyn Fn(u32, u32) -> f64) -> f64 {
            let here = cost(i, v);
            if i + 1 == len {
                return here;
            }
            let (lo, hi) = (cq!(v == 0, 0, v - 1), cq!(v + 1 == span, v, v + 1));
            here + (lo..=hi)
                .map(|next| cheapest_from(i + 1, next, len, span, cost))
                .fold(f64::INFINITY, f64::min)
        }
        (0..span)
            .map(|v| cheapest_from(0, v, len, span, cost))
            .fold(f64::INFINITY, f64::min)
    }

    fn vertical_cost(carver: &SeamCarver<Rgb<u8>, u8>, seam: &[u32]) -> f64 {
        seam.iter()
            .enumerate()
            .map(|(y, &x)| carver.energy(x, y as u32).unwrap())
            .sum()
    }

    fn horizontal_cost(carver: &SeamCarver<Rgb<u8>, u8>, seam: &[u32]) -> f64 {
        seam.iter()
            .enumerate()
            .map(|(x, &y)| carver.energy(x as u32, y).unwrap())
            .sum()
    }

    fn assert_well_formed(seam: &[u32], length: u32, limit: u32) {
        assert_eq!(seam.len(), length as usize);
        assert!(seam.iter().all(|&v| v < limit), "{:?} leaves the image", seam);
        assert!(
            seam.windows(2).all(|p| cq!(p[0] > p[1], p[0] - p[1], p[1] - p[0]) <= 1),
            "{:?} is not connected",
            seam
        );
    }

    fn assert_optimal(carver: &SeamCarver<Rgb<u8>, u8>) {
        let (width, height) = (carver.width(), carver.height());

        let seam = carver.find_vertical_seam().unwrap();
        assert_well_formed(&seam, height, width);
        let best = brute_force(height, width, &|y, x| carver.energy(x, y).unwrap());
        assert_relative_eq!(vertical_cost(carver, &seam), best, epsilon = 1e-9);

        let seam = carver.find_horizontal_seam().unwrap();
        assert_well_formed(&seam, width, height);
        let best = brute_force(width, height, &|x, y| carver.energy(x, y).unwrap());
        assert_relative_eq!(horizontal_cost(carver, &seam), best, epsilon = 1e-9);
    }

    #[test]
    fn sample_vertical_seam_hugs_the_left_edge() {
        let carver = SeamCarver::new(&sample());
        assert_eq!(carver.find_vertical_seam().unwrap(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn sample_horizontal_seam_crosses_the_top() {
        let carver = SeamCarver::new(&sample());
        let seam = carver.find_horizontal_seam().unwrap();
        assert_eq!(&seam[1..], &[0, 0]);
        assert!(seam[0] <= 1);
    }

    #[test]
    fn seams_are_as_cheap_as_brute_force() {
        assert_optimal(&SeamCarver::new(&sample()));
        assert_optimal(&SeamCarver::new(&checkerboard()));
        for &(w, h) in &[(1, 5), (5, 1), (2, 2), (7, 4), (4, 7), (6, 5)] {
            assert_optimal(&SeamCarver::new(&noisy(w, h)));
        }
    }

    #[test]
    fn one_pixel_image() {
        let carver = SeamCarver::new(&ImageBuffer::from_pixel(1, 1, Rgb([9u8, 9, 9])));
        assert_eq!(carver.find_vertical_seam().unwrap(), vec![0]);
        assert_eq!(carver.find_horizontal_seam().unwrap(), vec![0]);
    }

    #[test]
    fn degenerate_images_have_no_seams() {
        for &(w, h) in &[(0, 3), (3, 0), (0, 0)] {
            let carver = SeamCarver::new(&RgbImage::new(w, h));
            assert_eq!((carver.width(), carver.height()), (w, h));
            assert_eq!(carver.find_vertical_seam(), Err(SeamError::NoPathFound));
            assert_eq!(carver.find_horizontal_seam(), Err(SeamError::NoPathFound));
        }
    }

    #[test]
    fn horizontal_search_leaves_the_image_alone() {
        let carver = SeamCarver::new(&noisy(5, 3));
        let before = carver.picture();
        carver.find_horizontal_seam().unwrap();
        assert_eq!(carver.picture(), before);
        assert_eq!((carver.width(), carver.height()), (5, 3));
    }

    #[test]
    fn the_carver_keeps_its_own_copy() {
        let mut original = noisy(3, 3);
        let carver = SeamCarver::new(&original);
        original.put_pixel(0, 0, Rgb([1, 2, 3]));
        assert_ne!(carver.get(0, 0).unwrap(), Rgb([1, 2, 3]));

        let mut copy = carver.picture();
        copy.put_pixel(1, 1, Rgb([1, 2, 3]));
        assert_ne!(carver.get(1, 1).unwrap(), Rgb([1, 2, 3]));
    }

    #[test]
    fn get_and_energy_check_bounds() {
        let carver = SeamCarver::new(&sample());
        assert!(carver.in_bounds(2, 3));
        assert!(!carver.in_bounds(3, 3));
        assert_eq!(carver.get(0, 1).unwrap(), Rgb([255, 153, 51]));
        assert_eq!(
            carver.get(0, 4),
            Err(SeamError::OutOfBounds {
                x: 0,
                y: 4,
                width: 3,
                height: 4
            })
        );
        assert!(carver.energy(3, 0).is_err());
        assert!(carver.energy(2, 3).unwrap() >= 0.0);
    }

    #[test]
    fn removal_shrinks_one_dimension() {
        let mut carver = SeamCarver::new(&noisy(6, 5));
        let seam = carver.find_vertical_seam().unwrap();
        carver.remove_vertical_seam(&seam).unwrap();
        assert_eq!((carver.width(), carver.height()), (5, 5));

        let seam = carver.find_horizontal_seam().unwrap();
        carver.remove_horizontal_seam(&seam).unwrap();
        assert_eq!((carver.width(), carver.height()), (5, 4));
    }

    #[test]
    fn vertical_removal_is_lossless_elsewhere() {
        let original = noisy(6, 5);
        let mut carver = SeamCarver::new(&original);
        let seam = carver.find_vertical_seam().unwrap();
        carver.remove_vertical_seam(&seam).unwrap();
        let carved = carver.picture();

        let rebuilt = ImageBuffer::from_fn(6, 5, |x, y| {
            let s = seam[y as usize];
            if x < s {
                *carved.get_pixel(x, y)
            } else if x == s {
                *original.get_pixel(x, y)
            } else {
                *carved.get_pixel(x - 1, y)
            }
        });
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn horizontal_removal_is_lossless_elsewhere() {
        let original = noisy(4, 6);
        let mut carver = SeamCarver::new(&original);
        let seam = carver.find_horizontal_seam().unwrap();
        carver.remove_horizontal_seam(&seam).unwrap();
        let carved = carver.picture();

        let rebuilt = ImageBuffer::from_fn(4, 6, |x, y| {
            let s = seam[x as usize];
            if y < s {
                *carved.get_pixel(x, y)
            } else if y == s {
                *original.get_pixel(x, y)
            } else {
                *carved.get_pixel(x, y - 1)
            }
        });
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn carve_down_to_one_column_and_no_further() {
        let mut carver = SeamCarver::new(&noisy(4, 3));
        while carver.width() > 1 {
            let seam = carver.find_vertical_seam().unwrap();
            carver.remove_vertical_seam(&seam).unwrap();
            assert_eq!(carver.height(), 3);
        }
        let seam = carver.find_vertical_seam().unwrap();
        assert_eq!(seam, vec![0, 0, 0]);
        let before = carver.picture();
        let err = carver.remove_vertical_seam(&seam).unwrap_err();
        assert_eq!(err, SeamError::SoleLine { line: "column" });
        assert!(err.is_validation());
        assert_eq!(carver.picture(), before);
    }

    #[test]
    fn carve_down_to_one_row_and_no_further() {
        let mut carver = SeamCarver::new(&noisy(3, 3));
        carver.carve(3, 1).unwrap();
        let seam = carver.find_horizontal_seam().unwrap();
        assert_eq!(
            carver.remove_horizontal_seam(&seam),
            Err(SeamError::SoleLine { line: "row" })
        );
    }

    #[test]
    fn bad_seams_are_rejected_untouched() {
        let mut carver = SeamCarver::new(&noisy(4, 4));
        let before = carver.picture();

        assert_eq!(
            carver.remove_vertical_seam(&[0, 0, 0]),
            Err(SeamError::SeamLength {
                expected: 4,
                actual: 3
            })
        );
        assert_eq!(
            carver.remove_vertical_seam(&[1, 2, 0, 0]),
            Err(SeamError::DisjointSeam { index: 1, next: 2 })
        );
        assert_eq!(
            carver.remove_horizontal_seam(&[0, 1, 2, 4]),
            Err(SeamError::SeamOutOfRange {
                index: 3,
                value: 4,
                limit: 4
            })
        );
        assert_eq!(
            carver.remove_horizontal_seam(&[]),
            Err(SeamError::SeamLength {
                expected: 4,
                actual: 0
            })
        );
        assert_eq!(carver.picture(), before);
    }

    #[test]
    fn carve_hits_the_target() {
        let mut carver = SeamCarver::new(&noisy(8, 6));
        carver.carve(5, 4).unwrap();
        assert_eq!((carver.width(), carver.height()), (5, 4));
        carver.carve(5, 4).unwrap();
        assert_eq!(carver.into_picture().dimensions(), (5, 4));
    }

    #[test]
    fn carve_refuses_to_grow_or_vanish() {
        let mut carver = SeamCarver::new(&noisy(4, 4));
        assert_eq!(
            carver.carve(5, 4),
            Err(SeamError::Upscale {
                width: 4,
                height: 4,
                new_width: 5,
                new_height: 4
            })
        );
        assert!(carver.carve(0, 4).is_err());
        assert!(carver.carve(4, 0).is_err());
        assert_eq!((carver.width(), carver.height()), (4, 4));
    }

    #[test]
    fn set_picture_replaces_the_image() {
        let mut carver = SeamCarver::new(&sample());
        carver.set_picture(noisy(2, 7));
        assert_eq!((carver.width(), carver.height()), (2, 7));
        let carver = SeamCarver::from_buffer(sample());
        assert_eq!(carver.picture(), sample());
    }
}
