//! Local search optimizers: hill climbing, 2-opt and 3-opt.
//!
//! All three share one shape: take the working tour, scan a full neighborhood
//! once (best-improvement, not first-improvement), and either replace the
//! working tour with the best strictly-improving neighbor or declare a local
//! optimum and restart from a randomized tour. One call is exactly one pass,
//! so per-call latency stays predictable for a driver that interleaves
//! solving with rendering; convergence across many calls is the driver's
//! concern.

pub mod hill_climb;
pub mod three_opt;
pub mod two_opt;

pub use hill_climb::HillClimb;
pub use three_opt::ThreeOpt;
pub use two_opt::TwoOpt;

use crate::engine::rng::SolverRng;
use crate::graph::{Graph, NodeId, Tour};

/// One optimization strategy with a single capability: advance the working
/// tour by one neighborhood pass.
pub trait LocalSearch {
    /// Random-choice probability used when rebuilding the working tour after
    /// a local optimum.
    fn restart_bias(&self) -> f64;

    /// Best strictly-improving neighbor of `working`, with its length, or
    /// `None` when the tour is a local optimum of this neighborhood.
    fn best_neighbor(&self, graph: &Graph, working: &[NodeId]) -> Option<(Tour, u64)>;

    /// Advance the working tour by one full neighborhood pass.
    ///
    /// An empty working tour is seeded from the best path, or the greedy tour
    /// when no best path exists yet; the seed is offered to the best-path
    /// registry so a seed that is already a local optimum still counts. An
    /// improving pass replaces the working tour and offers it to the
    /// registry; a local optimum replaces it with a randomized restart tour.
    /// Returns whether an improving neighbor was found.
    fn step(&self, graph: &mut Graph, working: &mut Tour, rng: &mut SolverRng) -> bool {
        if working.is_empty() {
            *working = seed_tour(graph);
            if working.is_empty() {
                // Fewer than 3 nodes: a defined no-op, not an error.
                return false;
            }
            graph.set_best_path(working);
        }

        match self.best_neighbor(graph, working) {
            Some((neighbor, _)) => {
                *working = neighbor;
                graph.set_best_path(working);
                true
            }
            None => {
                *working = randomized_restart_tour(graph, rng, self.restart_bias());
                false
            }
        }
    }
}

/// Initial working tour: the best path when one exists, else the greedy tour.
fn seed_tour(graph: &mut Graph) -> Tour {
    let best = graph.best_path();
    if best.is_empty() {
        graph.greedy_tour()
    } else {
        best
    }
}

/// Randomized tour used to escape a local optimum.
///
/// Built node by node: with probability `bias` (and always for the first
/// node) the next node is drawn uniformly from the remaining set; otherwise
/// the tour follows the best path's successor of the current node when that
/// successor is still unvisited, falling back to the nearest remaining
/// neighbor. Higher biases restart further from the current basin.
pub fn randomized_restart_tour(graph: &mut Graph, rng: &mut SolverRng, bias: f64) -> Tour {
    let mut remaining: Vec<NodeId> = graph.node_ids().collect();
    if remaining.is_empty() {
        return Vec::new();
    }
    let best_path = graph.best_path();

    let mut tour: Tour = Vec::with_capacity(remaining.len() + 1);
    while !remaining.is_empty() {
        let next = if tour.is_empty() || rng.gen_f64() < bias {
            remaining[rng.gen_index(remaining.len())]
        } else {
            let current = tour[tour.len() - 1];
            best_successor(&best_path, current)
                .filter(|candidate| remaining.contains(candidate))
                .unwrap_or_else(|| nearest_remaining(graph, current, &remaining))
        };
        tour.push(next);
        remaining.retain(|&id| id != next);
    }

    tour.push(tour[0]);
    tour
}

/// Successor of `current` along the closed best path, if `current` appears
/// before the closing segment.
fn best_successor(best_path: &[NodeId], current: NodeId) -> Option<NodeId> {
    best_path
        .iter()
        .position(|&id| id == current)
        .filter(|&index| index + 2 < best_path.len())
        .map(|index| best_path[index + 1])
}

/// Closest unvisited node by raw distance; ties break to the first candidate
/// in iteration order.
fn nearest_remaining(graph: &Graph, current: NodeId, remaining: &[NodeId]) -> NodeId {
    let mut closest = remaining[0];
    let mut closest_distance = graph.distance(current, closest);
    for &candidate in &remaining[1..] {
        let distance = graph.distance(current, candidate);
        if distance < closest_distance {
            closest = candidate;
            closest_distance = distance;
        }
    }
    closest
}
