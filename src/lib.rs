// #![deny(missing_docs)]

//! Content-aware image resizing by seam carving, with seams found as
//! shortest paths through a graph laid over the image.

pub mod ternary;

pub mod error;
pub use error::{Result, SeamError};

pub mod twodmap;
pub use twodmap::TwoDimensionalMap;

pub mod energy;
pub use energy::dual_gradient_energy;

pub mod energymap;
pub use energymap::{energy_map, energy_to_image};

pub mod astar;
pub use astar::{AStarSolver, WeightedEdge, WeightedGraph};

pub mod seamgraph;
pub use seamgraph::{PixelNode, SeamGraph, SeamNode};

pub mod seamfinder;
pub use seamfinder::SeamFinder;

pub mod seamcarver;
pub use seamcarver::SeamCarver;
