use crate::cq;
use std::ops::{Index, IndexMut};

/// An addressable two-dimensional field, laid out row-major like an
/// `image::ImageBuffer`.  Used for the per-pixel energy cache that
/// backs one seam search.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoDimensionalMap<P: Default + Copy> {
    width: u32,
    height: u32,
    data: Vec<P>,
}

impl<P: Default + Copy> TwoDimensionalMap<P> {
    /// A map full of `P::default()`.
    pub fn new(width: u32, height: u32) -> Self {
        TwoDimensionalMap {
            width,
            height,
            data: vec![P::default(); width as usize * height as usize],
        }
    }

    /// A map whose every cell is `f(x, y)`.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> P,
    {
        let mut map = TwoDimensionalMap::new(width, height);
        for y in 0..height {
            for x in 0..width {
                map[(x, y)] = f(x, y);
            }
        }
        map
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The cells, in row-major order.
    pub fn as_slice(&self) -> &[P] {
        &self.data
    }

    /// The value at `(x, y)`, or `None` off the edge of the map.
    pub fn get(&self, x: u32, y: u32) -> Option<P> {
        cq!(
            x < self.width && y < self.height,
            Some(self.data[self.get_index(x, y)]),
            None
        )
    }

    // Keep the index math in one place and never, ever mess with it.
    fn get_index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }
}

impl<P: Default + Copy> Index<(u32, u32)> for TwoDimensionalMap<P> {
    type Output = P;

    fn index(&self, (x, y): (u32, u32)) -> &P {
        let index = self.get_index(x, y);
        &self.data[index]
    }
}

impl<P: Default + Copy> IndexMut<(u32, u32)> for TwoDimensionalMap<P> {
    fn index_mut(&mut self, (x, y): (u32, u32)) -> &mut P {
        let index = self.get_index(x, y);
        &mut self.data[index]
    }
}
