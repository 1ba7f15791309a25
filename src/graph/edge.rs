//! Edges: unordered node pairs with cached distance and mutable pheromone.

use super::node::NodeId;
use serde::{Deserialize, Serialize};

/// Unordered pair of distinct node ids.
///
/// Construction sorts the endpoints, so `EdgeKey::new(a, b)` and
/// `EdgeKey::new(b, a)` compare equal. A key never pairs a node with itself;
/// the graph rejects that before a key is ever built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeKey {
    lo: NodeId,
    hi: NodeId,
}

impl EdgeKey {
    /// Build the canonical key for an unordered pair.
    #[must_use]
    pub fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    /// Lower endpoint (by id).
    #[must_use]
    pub const fn lo(self) -> NodeId {
        self.lo
    }

    /// Higher endpoint (by id).
    #[must_use]
    pub const fn hi(self) -> NodeId {
        self.hi
    }
}

/// A single edge of the complete graph.
///
/// `distance` is the rounded Euclidean distance between the endpoints,
/// computed once at creation. `pheromone` is the shared stigmergy channel:
/// written by the local/global pheromone updates, read by every agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    key: EdgeKey,
    distance: u64,
    pheromone: f64,
}

impl Edge {
    pub(crate) fn new(key: EdgeKey, distance: u64, initial_pheromone: f64) -> Self {
        Self {
            key,
            distance,
            pheromone: initial_pheromone,
        }
    }

    /// The unordered endpoint pair.
    #[must_use]
    pub const fn key(&self) -> EdgeKey {
        self.key
    }

    /// Endpoints as `(lo, hi)`.
    #[must_use]
    pub const fn endpoints(&self) -> (NodeId, NodeId) {
        (self.key.lo(), self.key.hi())
    }

    /// Immutable rounded Euclidean distance.
    #[must_use]
    pub const fn distance(&self) -> u64 {
        self.distance
    }

    /// Current pheromone weight.
    #[must_use]
    pub const fn pheromone(&self) -> f64 {
        self.pheromone
    }

    /// Overwrite the pheromone weight.
    pub fn set_pheromone(&mut self, weight: f64) {
        self.pheromone = weight;
    }
}
