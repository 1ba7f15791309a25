//! Hill climbing over interior pair swaps.

use super::LocalSearch;
use crate::graph::{Graph, NodeId, Tour};

/// Hill climbing: neighborhood = swapping the nodes at two interior positions
/// of the closed tour. The first and last (closing) positions are never
/// touched, keeping the cycle intact.
#[derive(Debug, Clone, Copy)]
pub struct HillClimb {
    restart_bias: f64,
}

impl Default for HillClimb {
    fn default() -> Self {
        Self { restart_bias: 0.05 }
    }
}

impl HillClimb {
    /// Hill climbing with the given restart bias.
    #[must_use]
    pub const fn new(restart_bias: f64) -> Self {
        Self { restart_bias }
    }
}

impl LocalSearch for HillClimb {
    fn restart_bias(&self) -> f64 {
        self.restart_bias
    }

    /// Scan every interior pair `i < k`, evaluate the full tour after the
    /// swap, and keep the best strictly-improving swap over the whole scan.
    fn best_neighbor(&self, graph: &Graph, working: &[NodeId]) -> Option<(Tour, u64)> {
        let n = working.len();
        if n < 4 {
            return None;
        }

        let current_length = graph.path_length(working);
        let mut best: Option<(Tour, u64)> = None;
        let mut trial = working.to_vec();

        for i in 1..=n - 3 {
            for k in i + 1..=n - 2 {
                trial.swap(i, k);
                let length = graph.path_length(&trial);
                let threshold = best.as_ref().map_or(current_length, |&(_, len)| len);
                if length < threshold {
                    best = Some((trial.clone(), length));
                }
                trial.swap(i, k);
            }
        }

        best
    }
}
