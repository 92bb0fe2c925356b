// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A best-first shortest path solver
//!
//! Classic A*, knowing nothing about images.  Anything that can list
//! the weighted edges leaving a vertex and estimate the remaining
//! distance to a goal can be searched.  Edge weights must be
//! non-negative.  With an estimate of zero everywhere (as the seam
//! graph uses) this is Dijkstra's algorithm.

use crate::error::{Result, SeamError};
use log::{debug, trace};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::hash::Hash;

/// A directed edge and what it costs to traverse it.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedEdge<V> {
    pub from: V,
    pub to: V,
    pub weight: f64,
}

impl<V> WeightedEdge<V> {
    pub fn new(from: V, to: V, weight: f64) -> Self {
        WeightedEdge { from, to, weight }
    }
}

/// The capabilities the solver needs from a graph.
pub trait WeightedGraph {
    /// The vertex type.  Identity is whatever `Eq` and `Hash` say it is.
    type Vertex: Clone + Eq + Hash;

    /// Every edge leaving `v`.
    fn neighbors(&self, v: &Self::Vertex) -> Vec<WeightedEdge<Self::Vertex>>;

    /// A guess at the cost from `v` to `goal`.  To get a shortest path
    /// back, it must never overestimate.
    fn estimated_distance_to_goal(&self, v: &Self::Vertex, goal: &Self::Vertex) -> f64;
}

// A frontier entry.  The heap is a max-heap, so the ordering is
// inverted: lowest priority first, and among equals, earliest pushed
// first.
struct Frontier<V> {
    priority: f64,
    sequence: u64,
    vertex: V,
}

impl<V> Ord for Frontier<V> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl<V> PartialOrd for Frontier<V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<V> PartialEq for Frontier<V> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<V> Eq for Frontier<V> {}

/// A solved search: the path from source to goal, both included.
#[derive(Debug, Clone)]
pub struct AStarSolver<V> {
    solution: Vec<V>,
    solution_weight: f64,
    num_states_explored: usize,
}

impl<V: Clone + Eq + Hash> AStarSolver<V> {
    /// Search `graph` for the cheapest path from `source` to `goal`.
    ///
    /// Fails with `SeamError::NoPathFound` if the goal is unreachable,
    /// or if every remaining route's estimated cost is above `bound`.
    /// Pass `f64::INFINITY` for an unbounded search.
    pub fn solve<G>(graph: &G, source: V, goal: V, bound: f64) -> Result<Self>
    where
        G: WeightedGraph<Vertex = V>,
    {
        let mut frontier = BinaryHeap::new();
        let mut dist_to: HashMap<V, f64> = HashMap::new();
        let mut edge_to: HashMap<V, V> = HashMap::new();
        let mut settled: HashSet<V> = HashSet::new();
        let mut sequence = 0u64;

        dist_to.insert(source.clone(), 0.0);
        frontier.push(Frontier {
            priority: graph.estimated_distance_to_goal(&source, &goal),
            sequence,
            vertex: source.clone(),
        });

        while let Some(Frontier {
            priority, vertex, ..
        }) = frontier.pop()
        {
            if priority > bound {
                debug!("search abandoned: best candidate {} exceeds bound {}", priority, bound);
                return Err(SeamError::NoPathFound);
            }

            // A vertex may have been queued more than once, if a cheaper
            // route to it turned up after the first push.  Only the
            // first pop counts.
            if !settled.insert(vertex.clone()) {
                continue;
            }

            let distance = dist_to[&vertex];
            if vertex == goal {
                let solution = Self::walk_back(&edge_to, &source, vertex)?;
                debug!(
                    "solved: {} vertices in path, weight {}, {} states explored",
                    solution.len(),
                    distance,
                    settled.len()
                );
                return Ok(AStarSolver {
                    solution,
                    solution_weight: distance,
                    num_states_explored: settled.len(),
                });
            }

            for edge in graph.neighbors(&vertex) {
                if settled.contains(&edge.to) {
                    continue;
                }
                let candidate = distance + edge.weight;
                let improved = dist_to.get(&edge.to).map_or(true, |best| candidate < *best);
                if improved {
                    sequence += 1;
                    trace!("relaxing edge, new distance {}", candidate);
                    frontier.push(Frontier {
                        priority: candidate + graph.estimated_distance_to_goal(&edge.to, &goal),
                        sequence,
                        vertex: edge.to.clone(),
                    });
                    dist_to.insert(edge.to.clone(), candidate);
                    edge_to.insert(edge.to, edge.from);
                }
            }
        }

        debug!("search failed: goal unreachable after {} states", settled.len());
        Err(SeamError::NoPathFound)
    }

    // Follow the predecessors from the goal back to the source, then
    // turn the result around.  A broken chain means the graph lied
    // about its edges.
    fn walk_back(edge_to: &HashMap<V, V>, source: &V, goal: V) -> Result<Vec<V>> {
        let mut path = vec![goal.clone()];
        let mut current = &goal;
        while current != source {
            match edge_to.get(current) {
                Some(parent) => {
                    path.push(parent.clone());
                    current = parent;
                }
                None => {
                    debug!("predecessor chain broken after {} vertices", path.len());
                    return Err(SeamError::NoPathFound);
                }
            }
        }
        path.reverse();
        Ok(path)
    }

    /// The vertices of the cheapest path, source first, goal last.
    pub fn solution(&self) -> &[V] {
        &self.solution
    }

    /// Consume the solver, keeping only the path.
    pub fn into_solution(self) -> Vec<V> {
        self.solution
    }

    /// The summed edge weights along the path.
    pub fn solution_weight(&self) -> f64 {
        self.solution_weight
    }

    /// How many vertices were settled before the goal was reached,
    /// the goal included.
    pub fn num_states_explored(&self) -> usize {
        self.num_states_explored
    }
}
