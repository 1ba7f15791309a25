//! 2-opt: segment reversal local search.

use super::LocalSearch;
use crate::graph::{Graph, NodeId, Tour};

/// 2-opt: remove two non-adjacent edges and reconnect the tour the single way
/// that does not recreate it, which on a node sequence is reversing the
/// segment between the two cut points. The closing duplicate at the end of
/// the tour is never inside a reversed range.
#[derive(Debug, Clone, Copy)]
pub struct TwoOpt {
    restart_bias: f64,
}

impl Default for TwoOpt {
    fn default() -> Self {
        Self { restart_bias: 0.20 }
    }
}

impl TwoOpt {
    /// 2-opt with the given restart bias.
    #[must_use]
    pub const fn new(restart_bias: f64) -> Self {
        Self { restart_bias }
    }
}

impl LocalSearch for TwoOpt {
    fn restart_bias(&self) -> f64 {
        self.restart_bias
    }

    /// Try every reversal `[i, j)` with `1 <= i <= n-3`, `i+2 <= j <= n-1`;
    /// each trial is reverted before the next (reversing the same range twice
    /// restores the tour exactly), and the best strictly-improving reversal
    /// over the whole scan wins.
    fn best_neighbor(&self, graph: &Graph, working: &[NodeId]) -> Option<(Tour, u64)> {
        let n = working.len();
        if n < 5 {
            return None;
        }

        let current_length = graph.path_length(working);
        let mut best: Option<(Tour, u64)> = None;
        let mut trial = working.to_vec();

        for i in 1..=n - 3 {
            for j in i + 2..=n - 1 {
                trial[i..j].reverse();
                let length = graph.path_length(&trial);
                let threshold = best.as_ref().map_or(current_length, |&(_, len)| len);
                if length < threshold {
                    best = Some((trial.clone(), length));
                }
                trial[i..j].reverse();
            }
        }

        best
    }
}
