//! Solver driver: strategy selection and the tick loop.
//!
//! The engine owns no threads and performs no I/O. An external driver (UI,
//! CLI, test harness) selects a strategy and calls [`Solver::tick`] as often
//! as it likes; each tick is one bounded unit of work (one ant-wave slice or
//! one neighborhood pass), so ticks interleave cleanly with rendering. The
//! driver reads the graph's best path, greedy path and per-edge pheromone
//! levels for display.

pub mod rng;

pub use rng::SolverRng;

use crate::colony::Colony;
use crate::config::SolverConfig;
use crate::graph::{Graph, NodeId, Tour};
use crate::search::{HillClimb, LocalSearch, ThreeOpt, TwoOpt};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// The four interchangeable solving strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Ant colony construction waves.
    Ants,
    /// Interior pair-swap hill climbing.
    HillClimb,
    /// 2-opt segment reversal.
    TwoOpt,
    /// 3-opt seven-case segment reversal.
    ThreeOpt,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Ants => "ants",
            Self::HillClimb => "hill_climb",
            Self::TwoOpt => "two_opt",
            Self::ThreeOpt => "three_opt",
        };
        write!(f, "{name}")
    }
}

/// Result of one driver tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// Whether this tick improved the best path.
    pub improved: bool,
    /// Whether an ant wave completed this tick (always `false` for the
    /// local-search strategies).
    pub wave_completed: bool,
    /// Best path length after the tick (0 when none exists yet).
    pub best_length: u64,
}

/// Strategy-agnostic solver loop around one [`Graph`].
#[derive(Debug)]
pub struct Solver {
    config: SolverConfig,
    graph: Graph,
    colony: Colony,
    rng: SolverRng,
    strategy: Option<Strategy>,
    working_tour: Tour,
    hill_climb: HillClimb,
    two_opt: TwoOpt,
    three_opt: ThreeOpt,
    /// Wall-clock anchor set when a strategy is selected; used to stamp
    /// elapsed-time-to-best on the graph.
    started_at: Option<Instant>,
}

impl Solver {
    /// Create a solver with an empty graph.
    #[must_use]
    pub fn new(config: SolverConfig) -> Self {
        let mut rng = SolverRng::new(config.seed);
        let colony = Colony::new(config.clone(), &mut rng);
        let graph = Graph::new(config.initial_pheromone, config.min_node_distance);
        let hill_climb = HillClimb::new(config.hill_climb_restart_bias);
        let two_opt = TwoOpt::new(config.opt_restart_bias);
        let three_opt = ThreeOpt::new(config.opt_restart_bias);
        Self {
            config,
            graph,
            colony,
            rng,
            strategy: None,
            working_tour: Vec::new(),
            hill_climb,
            two_opt,
            three_opt,
            started_at: None,
        }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// The currently selected strategy, if any.
    #[must_use]
    pub const fn strategy(&self) -> Option<Strategy> {
        self.strategy
    }

    /// Shared access to the graph for queries and per-edge introspection.
    #[must_use]
    pub const fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Mutable access to the graph (caching queries such as
    /// [`Graph::best_path`] and [`Graph::greedy_tour`] need it).
    #[must_use]
    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    /// The working tour the local-search strategies persist between ticks.
    #[must_use]
    pub fn working_tour(&self) -> &[NodeId] {
        &self.working_tour
    }

    /// Create a node, wiring it into the complete graph. `None` when the
    /// point is too close to an existing node.
    pub fn create_node(&mut self, x: i32, y: i32) -> Option<NodeId> {
        self.graph.create_node(x, y)
    }

    /// Scatter up to `count` random nodes over `[0, width) x [0, height)`.
    ///
    /// Placements rejected by the minimum-distance rule are simply skipped;
    /// the attempt budget bounds the loop when the area saturates. A zero
    /// dimension means an empty area: no nodes are created. Returns the
    /// number of nodes actually created.
    pub fn generate_random_nodes(&mut self, count: usize, width: u32, height: u32) -> usize {
        if width == 0 || height == 0 {
            return 0;
        }
        let mut created = 0;
        let mut attempts = count.saturating_mul(50);
        while created < count && attempts > 0 {
            let x = self.rng.gen_index(width as usize) as i32;
            let y = self.rng.gen_index(height as usize) as i32;
            if self.graph.create_node(x, y).is_some() {
                created += 1;
            }
            attempts -= 1;
        }
        created
    }

    /// Drop all nodes and stop the running strategy.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.working_tour.clear();
        self.strategy = None;
        self.started_at = None;
    }

    /// Select a strategy and restart its state: the working tour is dropped,
    /// colony agents are replaced with fresh ones, and the elapsed-time
    /// clock restarts.
    pub fn select(&mut self, strategy: Strategy) {
        self.strategy = Some(strategy);
        self.working_tour.clear();
        self.colony.reset(&mut self.rng);
        self.started_at = Some(Instant::now());
    }

    /// Stop advancing without discarding the graph or its best path.
    pub fn stop(&mut self) {
        self.strategy = None;
    }

    /// Advance the selected strategy by one bounded unit of work.
    ///
    /// No-op when no strategy is selected. When the tick improves the best
    /// path, the wall-clock time since [`Solver::select`] is stamped on the
    /// graph as elapsed-time-to-best.
    pub fn tick(&mut self) -> TickOutcome {
        let previous_best = self.graph.best_path_length();

        let mut wave_completed = false;
        match self.strategy {
            None => {}
            Some(Strategy::Ants) => {
                wave_completed = self.colony.advance_wave(&mut self.graph);
            }
            Some(Strategy::HillClimb) => {
                self.hill_climb
                    .step(&mut self.graph, &mut self.working_tour, &mut self.rng);
            }
            Some(Strategy::TwoOpt) => {
                self.two_opt
                    .step(&mut self.graph, &mut self.working_tour, &mut self.rng);
            }
            Some(Strategy::ThreeOpt) => {
                self.three_opt
                    .step(&mut self.graph, &mut self.working_tour, &mut self.rng);
            }
        }

        let best_length = self.graph.best_path_length();
        let improved = best_length > 0 && (previous_best == 0 || best_length < previous_best);
        if improved {
            if let Some(started_at) = self.started_at {
                self.graph
                    .set_elapsed_to_best(started_at.elapsed().as_millis() as u64);
            }
        }

        TickOutcome {
            improved,
            wave_completed,
            best_length,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn seeded_solver(seed: u64, nodes: usize) -> Solver {
        let config = SolverConfig::builder().seed(seed).build();
        let mut solver = Solver::new(config);
        let created = solver.generate_random_nodes(nodes, 400, 400);
        assert_eq!(created, nodes);
        solver
    }

    #[test]
    fn test_tick_without_strategy_is_noop() {
        let mut solver = seeded_solver(1, 8);
        let outcome = solver.tick();
        assert!(!outcome.improved);
        assert!(!outcome.wave_completed);
        assert_eq!(outcome.best_length, 0);
    }

    #[test]
    fn test_ants_strategy_finds_a_best_path() {
        let mut solver = seeded_solver(42, 8);
        solver.select(Strategy::Ants);

        let mut improved_once = false;
        let mut wave_completed_once = false;
        for _ in 0..100 {
            let outcome = solver.tick();
            improved_once |= outcome.improved;
            wave_completed_once |= outcome.wave_completed;
        }
        assert!(wave_completed_once, "a wave should complete within 100 ticks");
        assert!(improved_once, "some tick should publish a best path");
        assert_eq!(solver.graph_mut().best_path().len(), 9);
    }

    #[test]
    fn test_two_opt_never_worse_than_greedy() {
        let mut solver = seeded_solver(7, 12);
        solver.select(Strategy::TwoOpt);
        for _ in 0..50 {
            solver.tick();
        }
        let greedy = solver.graph_mut().greedy_tour_length();
        let best = solver.graph().best_path_length();
        assert!(best > 0);
        assert!(best <= greedy);
    }

    #[test]
    fn test_hill_climb_and_three_opt_run() {
        for strategy in [Strategy::HillClimb, Strategy::ThreeOpt] {
            let mut solver = seeded_solver(11, 9);
            solver.select(strategy);
            for _ in 0..20 {
                solver.tick();
            }
            assert!(solver.graph().best_path_length() > 0, "{strategy} found no path");
        }
    }

    #[test]
    fn test_best_length_monotone_under_fixed_node_set() {
        let mut solver = seeded_solver(3, 10);
        solver.select(Strategy::HillClimb);

        let mut previous = u64::MAX;
        for _ in 0..60 {
            let outcome = solver.tick();
            if outcome.best_length > 0 {
                assert!(outcome.best_length <= previous);
                previous = outcome.best_length;
            }
        }
    }

    #[test]
    fn test_improvement_stamps_elapsed_time() {
        let mut solver = seeded_solver(5, 8);
        solver.select(Strategy::TwoOpt);
        let mut improved = false;
        for _ in 0..20 {
            improved |= solver.tick().improved;
        }
        assert!(improved);
        // Stamped, possibly 0 ms on a fast machine; read access suffices.
        let _ = solver.graph().elapsed_to_best();
    }

    #[test]
    fn test_select_clears_working_tour() {
        let mut solver = seeded_solver(9, 8);
        solver.select(Strategy::TwoOpt);
        for _ in 0..5 {
            solver.tick();
        }
        assert!(!solver.working_tour().is_empty());

        solver.select(Strategy::HillClimb);
        assert!(solver.working_tour().is_empty());
    }

    #[test]
    fn test_clear_resets_strategy_and_graph() {
        let mut solver = seeded_solver(13, 8);
        solver.select(Strategy::Ants);
        solver.tick();

        solver.clear();
        assert_eq!(solver.strategy(), None);
        assert_eq!(solver.graph().node_count(), 0);
        let outcome = solver.tick();
        assert_eq!(outcome.best_length, 0);
    }

    #[test]
    fn test_stop_preserves_best_path() {
        let mut solver = seeded_solver(17, 8);
        solver.select(Strategy::TwoOpt);
        for _ in 0..20 {
            solver.tick();
        }
        let best = solver.graph().best_path_length();
        assert!(best > 0);

        solver.stop();
        solver.tick();
        assert_eq!(solver.graph().best_path_length(), best);
    }

    #[test]
    fn test_generate_random_nodes_respects_min_distance() {
        let config = SolverConfig::builder().seed(1).min_node_distance(50).build();
        let mut solver = Solver::new(config);
        // A 100x100 area cannot hold 20 nodes spaced 50 apart; the attempt
        // budget must still terminate the loop.
        let created = solver.generate_random_nodes(20, 100, 100);
        assert!(created < 20);
        assert!(created >= 1);
    }

    #[test]
    fn test_generate_random_nodes_zero_area_creates_nothing() {
        let mut solver = Solver::new(SolverConfig::default());
        assert_eq!(solver.generate_random_nodes(10, 0, 480), 0);
        assert_eq!(solver.generate_random_nodes(10, 640, 0), 0);
        assert_eq!(solver.graph().node_count(), 0);
    }

    #[test]
    fn test_strategy_display() {
        assert_eq!(Strategy::Ants.to_string(), "ants");
        assert_eq!(Strategy::ThreeOpt.to_string(), "three_opt");
    }
}
