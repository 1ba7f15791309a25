//! Weighted complete graph over 2-D points.
//!
//! Owns the node arena, the complete edge table (distances + pheromone), the
//! memoized greedy tour, and the best-path registry. Nodes are plain points
//! indexed by [`NodeId`]; edges live in an insertion-ordered table keyed by
//! the unordered endpoint pair, so nothing in the model is cyclic.

pub mod edge;
pub mod node;

pub use edge::{Edge, EdgeKey};
pub use node::{NodeId, Point};

use crate::error::{SolverError, SolverResult};
use indexmap::IndexMap;
use std::collections::HashSet;

/// A tour is an ordered closed cycle: the first node repeated at the end,
/// every other node visited exactly once in between.
pub type Tour = Vec<NodeId>;

/// Default minimum distance between two nodes. Creation closer than this to
/// an existing node is rejected to avoid degenerate near-zero edges.
pub const DEFAULT_MIN_NODE_DISTANCE: u64 = 5;

/// Default initial pheromone weight for freshly created edges.
pub const DEFAULT_INITIAL_PHEROMONE: f64 = 1.0;

/// Complete weighted graph with pheromone state and result caches.
///
/// Invariant: the edge table is always complete over the node set
/// (`|E| = |V|·(|V|-1)/2`). `create_node` wires the new node to every
/// existing node; there is no way to add a partial edge set.
#[derive(Debug, Clone)]
pub struct Graph {
    /// Node arena; `NodeId` is an index into this vector.
    nodes: Vec<Point>,
    /// Complete edge table, insertion-ordered for deterministic iteration.
    edges: IndexMap<EdgeKey, Edge>,
    /// Pheromone weight assigned to new edges.
    initial_pheromone: f64,
    /// Proximity threshold for `create_node` rejection.
    min_node_distance: u64,
    /// Memoized greedy tour (empty = not computed or invalidated).
    greedy_path: Tour,
    greedy_path_length: u64,
    /// Best complete tour observed so far.
    best_path: Tour,
    best_path_length: u64,
    /// Wall-clock milliseconds from strategy start to the current best path,
    /// stamped by the driver when it detects improvement.
    elapsed_to_best_ms: u64,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_PHEROMONE, DEFAULT_MIN_NODE_DISTANCE)
    }
}

impl Graph {
    /// Create an empty graph.
    #[must_use]
    pub fn new(initial_pheromone: f64, min_node_distance: u64) -> Self {
        Self {
            nodes: Vec::new(),
            edges: IndexMap::new(),
            initial_pheromone,
            min_node_distance,
            greedy_path: Vec::new(),
            greedy_path_length: 0,
            best_path: Vec::new(),
            best_path_length: 0,
            elapsed_to_best_ms: 0,
        }
    }

    /// Erase all nodes, edges and cached paths.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.reset_caches();
    }

    fn reset_caches(&mut self) {
        self.greedy_path.clear();
        self.greedy_path_length = 0;
        self.best_path.clear();
        self.best_path_length = 0;
        self.elapsed_to_best_ms = 0;
    }

    /// Create a new node and wire it to every existing node.
    ///
    /// Returns `None` (node count unchanged) if the point falls within the
    /// minimum distance of an existing node; this covers exact duplicates
    /// since their distance is zero. Side effect of success: `n` new edges
    /// and invalidated greedy/best caches.
    pub fn create_node(&mut self, x: i32, y: i32) -> Option<NodeId> {
        let point = Point::new(x, y);
        if self
            .nodes
            .iter()
            .any(|existing| point.distance(existing) < self.min_node_distance)
        {
            return None;
        }

        let id = NodeId(self.nodes.len());
        for (index, existing) in self.nodes.iter().enumerate() {
            let key = EdgeKey::new(NodeId(index), id);
            let distance = existing.distance(&point);
            self.edges
                .insert(key, Edge::new(key, distance, self.initial_pheromone));
        }
        self.nodes.push(point);
        self.reset_caches();
        Some(id)
    }

    /// Point of a node, or `None` for an id outside the arena.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<Point> {
        self.nodes.get(id.index()).copied()
    }

    /// All node ids in arena order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges (always `n·(n-1)/2`).
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Rounded Euclidean distance between two nodes.
    ///
    /// # Panics
    ///
    /// Panics if either id is outside the arena. Distance sits on the hot
    /// path of every neighborhood scan, so unlike [`Graph::edge`] it does
    /// not return a `Result`; callers pass ids obtained from this graph.
    #[must_use]
    pub fn distance(&self, a: NodeId, b: NodeId) -> u64 {
        self.nodes[a.index()].distance(&self.nodes[b.index()])
    }

    /// Total length of an ordered node sequence (sum of consecutive-pair
    /// distances). Zero for sequences of length 0 or 1.
    ///
    /// # Panics
    ///
    /// Panics if the sequence contains an id outside the arena, like
    /// [`Graph::distance`].
    #[must_use]
    pub fn path_length(&self, path: &[NodeId]) -> u64 {
        path.windows(2)
            .map(|pair| self.distance(pair[0], pair[1]))
            .sum()
    }

    /// The edge between two distinct nodes.
    ///
    /// # Errors
    ///
    /// `SelfLoop` if `a == b` (invariant violation, fail-fast);
    /// `UnknownNode` if either id is outside the arena.
    pub fn edge(&self, a: NodeId, b: NodeId) -> SolverResult<&Edge> {
        let key = self.edge_key_checked(a, b)?;
        self.edges
            .get(&key)
            .ok_or(SolverError::UnknownNode(a, self.nodes.len()))
    }

    /// Mutable access to the edge between two distinct nodes.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Graph::edge`].
    pub fn edge_mut(&mut self, a: NodeId, b: NodeId) -> SolverResult<&mut Edge> {
        let key = self.edge_key_checked(a, b)?;
        let count = self.nodes.len();
        self.edges
            .get_mut(&key)
            .ok_or(SolverError::UnknownNode(a, count))
    }

    fn edge_key_checked(&self, a: NodeId, b: NodeId) -> SolverResult<EdgeKey> {
        if a == b {
            return Err(SolverError::SelfLoop(a));
        }
        let count = self.nodes.len();
        for id in [a, b] {
            if id.index() >= count {
                return Err(SolverError::UnknownNode(id, count));
            }
        }
        Ok(EdgeKey::new(a, b))
    }

    /// All edges in creation order, for per-edge introspection (pheromone
    /// weight and distance) by a rendering driver.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub(crate) fn edges_mut(&mut self) -> impl Iterator<Item = &mut Edge> {
        self.edges.values_mut()
    }

    // =========================================================================
    // Greedy seeder
    // =========================================================================

    /// The memoized nearest-neighbor tour: nearest-neighbor construction from
    /// every candidate start node, keeping the shortest result.
    ///
    /// Empty for fewer than 3 nodes. Recomputed from scratch whenever node
    /// creation invalidates the cache; node generation is infrequent relative
    /// to solving, so correctness wins over incrementality here.
    pub fn greedy_tour(&mut self) -> Tour {
        if self.greedy_path.is_empty() && self.nodes.len() >= 3 {
            for start in 0..self.nodes.len() {
                let tour = self.nearest_neighbor_tour(NodeId(start));
                let length = self.path_length(&tour);
                if self.greedy_path.is_empty() || length < self.greedy_path_length {
                    self.greedy_path = tour;
                    self.greedy_path_length = length;
                }
            }
        }
        self.greedy_path.clone()
    }

    /// Length of the memoized greedy tour (computing it if necessary).
    pub fn greedy_tour_length(&mut self) -> u64 {
        if self.greedy_path.is_empty() {
            self.greedy_tour();
        }
        self.greedy_path_length
    }

    /// Nearest-neighbor construction from a fixed start. Ties break to the
    /// first candidate in ascending arena order.
    fn nearest_neighbor_tour(&self, start: NodeId) -> Tour {
        let mut remaining: Vec<NodeId> = self.node_ids().filter(|&id| id != start).collect();
        let mut tour = Vec::with_capacity(self.nodes.len() + 1);
        tour.push(start);

        let mut current = start;
        while !remaining.is_empty() {
            let mut closest_index = 0;
            let mut closest_distance = self.distance(current, remaining[0]);
            for (index, &candidate) in remaining.iter().enumerate().skip(1) {
                let distance = self.distance(current, candidate);
                if distance < closest_distance {
                    closest_index = index;
                    closest_distance = distance;
                }
            }
            current = remaining.remove(closest_index);
            tour.push(current);
        }

        tour.push(start);
        tour
    }

    // =========================================================================
    // Best-path registry
    // =========================================================================

    /// Offer a tour to the best-path registry.
    ///
    /// Accepts (and returns `true`) only if no best path exists yet or the
    /// offered tour is strictly shorter than the cached one; otherwise the
    /// registry is left unchanged and `false` is returned. Best-path length
    /// is therefore monotonically non-increasing for a fixed node set.
    pub fn set_best_path(&mut self, path: &[NodeId]) -> bool {
        if path.is_empty() {
            return false;
        }
        let length = self.path_length(path);
        if self.best_path.is_empty() || length < self.best_path_length {
            self.best_path = path.to_vec();
            self.best_path_length = length;
            return true;
        }
        false
    }

    /// The best complete tour observed so far.
    ///
    /// Self-invalidates (returns empty and clears the cache) if the cached
    /// tour no longer covers exactly the current node set, e.g. after nodes
    /// were added since it was recorded.
    pub fn best_path(&mut self) -> Tour {
        if !self.best_path.is_empty() && !self.covers_all_nodes(&self.best_path) {
            self.best_path.clear();
            self.best_path_length = 0;
        }
        self.best_path.clone()
    }

    /// Length of the cached best path (0 when none exists).
    #[must_use]
    pub fn best_path_length(&self) -> u64 {
        self.best_path_length
    }

    /// Record the wall-clock milliseconds it took to find the current best
    /// path. Set by the driver when it observes an improvement.
    pub fn set_elapsed_to_best(&mut self, millis: u64) {
        self.elapsed_to_best_ms = millis;
    }

    /// Wall-clock milliseconds to the current best path.
    #[must_use]
    pub fn elapsed_to_best(&self) -> u64 {
        self.elapsed_to_best_ms
    }

    /// True iff the closed tour's interior node set equals the graph's node
    /// set exactly.
    fn covers_all_nodes(&self, tour: &[NodeId]) -> bool {
        if tour.len() < 2 {
            return false;
        }
        let interior: HashSet<NodeId> = tour[..tour.len() - 1].iter().copied().collect();
        interior.len() == self.nodes.len() && interior.iter().all(|id| id.index() < self.nodes.len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn square_graph() -> (Graph, Vec<NodeId>) {
        let mut graph = Graph::default();
        let ids = vec![
            graph.create_node(0, 0).unwrap(),
            graph.create_node(0, 10).unwrap(),
            graph.create_node(10, 10).unwrap(),
            graph.create_node(10, 0).unwrap(),
        ];
        (graph, ids)
    }

    #[test]
    fn test_create_node_wires_complete_edge_set() {
        let (graph, _) = square_graph();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 6); // 4 * 3 / 2
    }

    #[test]
    fn test_create_node_rejects_duplicate_coordinates() {
        let mut graph = Graph::default();
        assert!(graph.create_node(50, 50).is_some());
        assert!(graph.create_node(50, 50).is_none());
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_create_node_rejects_too_close() {
        let mut graph = Graph::default();
        assert!(graph.create_node(0, 0).is_some());
        // Distance 4 < default minimum 5
        assert!(graph.create_node(4, 0).is_none());
        // Distance exactly 5 is allowed
        assert!(graph.create_node(5, 0).is_some());
    }

    #[test]
    fn test_edge_rejects_self_loop() {
        let (graph, ids) = square_graph();
        let err = graph.edge(ids[0], ids[0]).unwrap_err();
        assert!(err.is_invariant_violation());
    }

    #[test]
    fn test_edge_rejects_unknown_node() {
        let (graph, ids) = square_graph();
        let err = graph.edge(ids[0], NodeId(99)).unwrap_err();
        assert!(matches!(err, SolverError::UnknownNode(NodeId(99), 4)));
    }

    #[test]
    fn test_edge_distance_cached_at_creation() {
        let (graph, ids) = square_graph();
        let edge = graph.edge(ids[0], ids[2]).unwrap();
        assert_eq!(edge.distance(), 14); // hypot(10, 10) rounded
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn test_distance_panics_on_out_of_arena_id() {
        let (graph, ids) = square_graph();
        let _ = graph.distance(ids[0], NodeId(99));
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn test_path_length_panics_on_out_of_arena_id() {
        let (graph, ids) = square_graph();
        let _ = graph.path_length(&[ids[0], NodeId(99)]);
    }

    #[test]
    fn test_path_length_degenerate_sequences() {
        let (graph, ids) = square_graph();
        assert_eq!(graph.path_length(&[]), 0);
        assert_eq!(graph.path_length(&[ids[0]]), 0);
    }

    #[test]
    fn test_path_length_square_tour() {
        let (graph, ids) = square_graph();
        let tour = vec![ids[0], ids[1], ids[2], ids[3], ids[0]];
        assert_eq!(graph.path_length(&tour), 40);
    }

    #[test]
    fn test_path_length_reversal_invariant() {
        let (graph, ids) = square_graph();
        let tour = vec![ids[0], ids[2], ids[1], ids[3], ids[0]];
        let mut reversed = tour.clone();
        reversed.reverse();
        assert_eq!(graph.path_length(&tour), graph.path_length(&reversed));
    }

    #[test]
    fn test_path_length_is_order_sensitive() {
        let (graph, ids) = square_graph();
        let uncrossed = vec![ids[0], ids[1], ids[2], ids[3], ids[0]];
        let crossed = vec![ids[0], ids[2], ids[1], ids[3], ids[0]];
        assert!(graph.path_length(&crossed) > graph.path_length(&uncrossed));
    }

    #[test]
    fn test_greedy_tour_empty_below_three_nodes() {
        let mut graph = Graph::default();
        assert!(graph.greedy_tour().is_empty());
        graph.create_node(0, 0);
        assert!(graph.greedy_tour().is_empty());
        graph.create_node(100, 0);
        assert!(graph.greedy_tour().is_empty());
        graph.create_node(0, 100);
        assert_eq!(graph.greedy_tour().len(), 4);
    }

    #[test]
    fn test_greedy_tour_square_is_optimal() {
        let (mut graph, _) = square_graph();
        let tour = graph.greedy_tour();
        assert_eq!(tour.len(), 5);
        assert_eq!(tour.first(), tour.last());
        assert_eq!(graph.greedy_tour_length(), 40);
    }

    #[test]
    fn test_greedy_tour_covers_node_set_exactly() {
        let mut graph = Graph::default();
        graph.create_node(0, 0);
        graph.create_node(37, 91);
        graph.create_node(120, 5);
        graph.create_node(64, 200);
        graph.create_node(200, 150);

        let tour = graph.greedy_tour();
        let mut interior: Vec<NodeId> = tour[..tour.len() - 1].to_vec();
        interior.sort_unstable();
        let all: Vec<NodeId> = graph.node_ids().collect();
        assert_eq!(interior, all);
    }

    #[test]
    fn test_greedy_cache_invalidated_by_create_node() {
        let (mut graph, _) = square_graph();
        assert_eq!(graph.greedy_tour_length(), 40);
        graph.create_node(100, 100).unwrap();
        let tour = graph.greedy_tour();
        assert_eq!(tour.len(), 6);
        assert!(graph.greedy_tour_length() > 40);
    }

    #[test]
    fn test_set_best_path_accepts_first_then_only_shorter() {
        let (mut graph, ids) = square_graph();
        let crossed = vec![ids[0], ids[2], ids[1], ids[3], ids[0]];
        let uncrossed = vec![ids[0], ids[1], ids[2], ids[3], ids[0]];

        assert!(graph.set_best_path(&crossed));
        let crossed_len = graph.best_path_length();

        // Equal length is rejected
        assert!(!graph.set_best_path(&crossed));
        assert_eq!(graph.best_path_length(), crossed_len);

        // Strictly shorter replaces
        assert!(graph.set_best_path(&uncrossed));
        assert_eq!(graph.best_path_length(), 40);

        // Longer is rejected
        assert!(!graph.set_best_path(&crossed));
        assert_eq!(graph.best_path_length(), 40);
    }

    #[test]
    fn test_set_best_path_rejects_empty() {
        let (mut graph, _) = square_graph();
        assert!(!graph.set_best_path(&[]));
    }

    #[test]
    fn test_best_path_self_invalidates_on_node_set_change() {
        let (mut graph, ids) = square_graph();
        let tour = vec![ids[0], ids[1], ids[2], ids[3], ids[0]];
        graph.set_best_path(&tour);
        assert_eq!(graph.best_path().len(), 5);

        // create_node resets the cache eagerly; re-seed a stale best path to
        // exercise the lazy read-side check as well.
        graph.create_node(200, 200).unwrap();
        graph.set_best_path(&tour);
        assert!(graph.best_path().is_empty());
        assert_eq!(graph.best_path_length(), 0);
    }

    #[test]
    fn test_clear_resets_everything() {
        let (mut graph, ids) = square_graph();
        let tour = vec![ids[0], ids[1], ids[2], ids[3], ids[0]];
        graph.set_best_path(&tour);
        graph.set_elapsed_to_best(1234);

        graph.clear();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.best_path().is_empty());
        assert_eq!(graph.elapsed_to_best(), 0);
        assert!(graph.greedy_tour().is_empty());
    }

    #[test]
    fn test_edges_iterator_exposes_pheromone_and_distance() {
        let (graph, _) = square_graph();
        for edge in graph.edges() {
            assert!(edge.distance() >= 10);
            assert!((edge.pheromone() - DEFAULT_INITIAL_PHEROMONE).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_elapsed_to_best_roundtrip() {
        let mut graph = Graph::default();
        graph.set_elapsed_to_best(512);
        assert_eq!(graph.elapsed_to_best(), 512);
    }
}
