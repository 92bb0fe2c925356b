// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The seam graph
//!
//! A vertical seam is a path from the top row to the bottom row in
//! which every step goes down one row and at most one column sideways.
//! Laid over the pixels, those steps form a directed acyclic graph.
//! Add a virtual source above the top row and a virtual sink below
//! the bottom row, weight every edge by the energy of the pixel it
//! enters, and the cheapest seam is the shortest source-to-sink path.
//!
//! The graph is implicit: edges are generated on request from a cached
//! energy map, and nothing outlives the search that built it.

use crate::astar::{WeightedEdge, WeightedGraph};
use crate::cq;
use crate::energymap::energy_map;
use crate::error::Result;
use crate::twodmap::TwoDimensionalMap;
use image::{GenericImageView, Pixel, Primitive};
use std::hash::{Hash, Hasher};

/// A real pixel, carrying its energy along for the ride.  Two pixel
/// nodes are the same node if they have the same coordinates; the
/// energy is derived data and takes no part in identity.
#[derive(Debug, Clone, Copy)]
pub struct PixelNode {
    x: u32,
    y: u32,
    energy: f64,
}

impl PixelNode {
    pub fn new(x: u32, y: u32, energy: f64) -> Self {
        PixelNode { x, y, energy }
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }
}

impl PartialEq for PixelNode {
    fn eq(&self, other: &Self) -> bool {
        (self.x, self.y) == (other.x, other.y)
    }
}

impl Eq for PixelNode {}

impl Hash for PixelNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.hash(state);
        self.y.hash(state);
    }
}

/// A vertex of the seam graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeamNode {
    /// Above the image; leads to every pixel of the top row.
    Source,
    Pixel(PixelNode),
    /// Below the image; every pixel of the bottom row leads here.
    Sink,
}

/// The implicit top-to-bottom seam graph over one image.
#[derive(Debug, Clone)]
pub struct SeamGraph {
    energy: TwoDimensionalMap<f64>,
}

impl SeamGraph {
    /// Build the graph for an image, computing every pixel's energy
    /// up front.
    pub fn new<I, P, S>(image: &I) -> Result<Self>
    where
        I: GenericImageView<Pixel = P>,
        P: Pixel<Subpixel = S> + 'static,
        S: Primitive + 'static,
    {
        Ok(SeamGraph::from_energy(energy_map(image)?))
    }

    /// Build the graph over an energy map that's already been computed.
    pub fn from_energy(energy: TwoDimensionalMap<f64>) -> Self {
        SeamGraph { energy }
    }

    pub fn width(&self) -> u32 {
        self.energy.width()
    }

    pub fn height(&self) -> u32 {
        self.energy.height()
    }

    fn pixel(&self, x: u32, y: u32) -> SeamNode {
        SeamNode::Pixel(PixelNode::new(x, y, self.energy[(x, y)]))
    }

    fn edge_into(&self, from: SeamNode, x: u32, y: u32) -> WeightedEdge<SeamNode> {
        let to = self.pixel(x, y);
        WeightedEdge::new(from, to, self.energy[(x, y)])
    }
}

impl WeightedGraph for SeamGraph {
    type Vertex = SeamNode;

    fn neighbors(&self, v: &SeamNode) -> Vec<WeightedEdge<SeamNode>> {
        let (width, height) = (self.width(), self.height());
        match *v {
            SeamNode::Source => {
                let top_row = cq!(height == 0, 0, width);
                (0..top_row).map(|x| self.edge_into(*v, x, 0)).collect()
            }

            // Not a pixel of this image; it leads nowhere.
            SeamNode::Pixel(p) if p.x >= width || p.y >= height => Vec::new(),

            SeamNode::Pixel(p) if p.y + 1 == height => vec![WeightedEdge::new(*v, SeamNode::Sink, 0.0)],

            // Down-left, down, down-right, clipped at the image's edges.
            SeamNode::Pixel(p) => {
                let (left, right) = (
                    cq!(p.x == 0, 0, p.x - 1),
                    cq!(p.x + 1 >= width, p.x, p.x + 1),
                );
                (left..=right).map(|x| self.edge_into(*v, x, p.y + 1)).collect()
            }

            SeamNode::Sink => Vec::new(),
        }
    }

    fn estimated_distance_to_goal(&self, _v: &SeamNode, _goal: &SeamNode) -> f64 {
        0.0
    }
}
