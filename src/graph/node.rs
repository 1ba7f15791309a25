//! Nodes: integer 2-D points in a stable arena.

use serde::{Deserialize, Serialize};

/// Stable arena index of a node.
///
/// Ids are assigned in creation order and remain valid until
/// [`crate::graph::Graph::clear`]. Nodes never hold references to edges or to
/// each other; all structure lives in the graph's edge table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Raw arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Integer (x, y) coordinates. Immutable once created.
///
/// Two nodes at identical coordinates are the same node; the graph enforces
/// this by rejecting creation within a minimum distance of an existing node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate.
    pub y: i32,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Rounded Euclidean distance to another point.
    #[must_use]
    pub fn distance(&self, other: &Self) -> u64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        dx.hypot(dy).round() as u64
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
