//! 3-opt: seven-case segment reversal local search.

use super::LocalSearch;
use crate::graph::{Graph, NodeId, Tour};

/// 3-opt: remove three edges and reconnect the three resulting segments. On a
/// node sequence every non-identity reconnection is expressible as a
/// combination of reversals of the ranges `[i, j)`, `[j, k)` and `[i, k)`,
/// giving seven distinct moves per cut triple.
#[derive(Debug, Clone, Copy)]
pub struct ThreeOpt {
    restart_bias: f64,
}

impl Default for ThreeOpt {
    fn default() -> Self {
        Self { restart_bias: 0.20 }
    }
}

impl ThreeOpt {
    /// 3-opt with the given restart bias.
    #[must_use]
    pub const fn new(restart_bias: f64) -> Self {
        Self { restart_bias }
    }

    /// The seven non-trivial reconnections for cut points `i < j < k`,
    /// expressed as reversal sequences applied to a copy of `working`.
    fn seven_moves(working: &[NodeId], i: usize, j: usize, k: usize) -> [Tour; 7] {
        let mut moves: [Tour; 7] = [
            working.to_vec(),
            working.to_vec(),
            working.to_vec(),
            working.to_vec(),
            working.to_vec(),
            working.to_vec(),
            working.to_vec(),
        ];

        moves[0][i..j].reverse();

        moves[1][j..k].reverse();

        moves[2][i..j].reverse();
        moves[2][j..k].reverse();

        moves[3][i..k].reverse();

        moves[4][i..k].reverse();
        moves[4][i..j].reverse();

        moves[5][i..k].reverse();
        moves[5][j..k].reverse();

        moves[6][i..k].reverse();
        moves[6][i..j].reverse();
        moves[6][j..k].reverse();

        moves
    }
}

impl LocalSearch for ThreeOpt {
    fn restart_bias(&self) -> f64 {
        self.restart_bias
    }

    /// Scan every cut triple `i < j < k` with `i+2 <= j`, `j+2 <= k <= n-1`
    /// (so no reversal ever touches the closing duplicate), evaluate all
    /// seven reconnections per triple, and keep the best strictly-improving
    /// move over the entire scan.
    fn best_neighbor(&self, graph: &Graph, working: &[NodeId]) -> Option<(Tour, u64)> {
        let n = working.len();
        if n < 6 {
            return None;
        }

        let current_length = graph.path_length(working);
        let mut best: Option<(Tour, u64)> = None;

        for i in 1..=n - 5 {
            for j in i + 2..=n - 3 {
                for k in j + 2..=n - 1 {
                    for candidate in Self::seven_moves(working, i, j, k) {
                        let length = graph.path_length(&candidate);
                        let threshold = best.as_ref().map_or(current_length, |&(_, len)| len);
                        if length < threshold {
                            best = Some((candidate, length));
                        }
                    }
                }
            }
        }

        best
    }
}
