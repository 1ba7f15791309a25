//! Ant colony: wave scheduling and the global pheromone update.
//!
//! A colony drives a fixed set of [`Agent`]s through construction "waves".
//! Agents are activated in bounded rounds per tick so a driver can interleave
//! solving with rendering; when every agent has closed its cycle, completed
//! tours are offered to the best-path registry, local pheromone deposits are
//! applied, and the agents reset for the next wave. Evaporation runs once per
//! tick across the whole edge table.

pub mod agent;

pub use agent::{Agent, AgentState};

use crate::config::SolverConfig;
use crate::engine::rng::SolverRng;
use crate::graph::{EdgeKey, Graph};
use std::collections::HashSet;

/// A wave of independent construction agents sharing one pheromone table.
#[derive(Debug, Clone)]
pub struct Colony {
    agents: Vec<Agent>,
    config: SolverConfig,
}

impl Colony {
    /// Create a colony with `config.num_agents` agents, each on its own
    /// partitioned RNG stream.
    #[must_use]
    pub fn new(config: SolverConfig, rng: &mut SolverRng) -> Self {
        let agents = rng
            .partition(config.num_agents)
            .into_iter()
            .map(Agent::new)
            .collect();
        Self { agents, config }
    }

    /// Replace all agents with fresh idle ones on new RNG streams. Used when
    /// the driver restarts the ants strategy.
    pub fn reset(&mut self, rng: &mut SolverRng) {
        self.agents = rng
            .partition(self.config.num_agents)
            .into_iter()
            .map(Agent::new)
            .collect();
    }

    /// The agents of the current wave.
    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Advance the wave by at most `wave_updates_per_tick` activation rounds.
    ///
    /// When the wave completes within this call, each agent's tour is offered
    /// to the best-path registry, local pheromone updates are applied and the
    /// agents reset to start the next wave. The global update runs once per
    /// call either way. Returns whether the wave completed.
    pub fn advance_wave(&mut self, graph: &mut Graph) -> bool {
        let mut all_complete = false;
        for _ in 0..self.config.wave_updates_per_tick {
            all_complete = true;
            for agent in &mut self.agents {
                if !agent.complete() {
                    agent.advance(graph, &self.config);
                    all_complete = false;
                }
            }
            if all_complete {
                break;
            }
        }

        if all_complete {
            for agent in &mut self.agents {
                let tour = agent.tour().to_vec();
                graph.set_best_path(&tour);
                agent::deposit_local(agent, graph, &self.config);
                agent.reset();
            }
        }

        self.evaporate_global(graph);
        all_complete
    }

    /// Global pheromone update: evaporate every used edge and reinforce the
    /// edges of the current best tour.
    ///
    /// For every edge with `τ > 0`, `τ <- (1-ρ)·τ`; edges on the best tour
    /// additionally gain `ρ·(1/best_length)`, so shorter best tours reinforce
    /// more strongly. Edges with `τ == 0` have never been used and are left
    /// untouched.
    pub fn evaporate_global(&self, graph: &mut Graph) {
        let best_path = graph.best_path();
        let best_length = graph.best_path_length();

        let mut best_edges: HashSet<EdgeKey> = HashSet::new();
        for pair in best_path.windows(2) {
            if pair[0] != pair[1] {
                best_edges.insert(EdgeKey::new(pair[0], pair[1]));
            }
        }

        let reinforcement = if best_length > 0 {
            self.config.decay * (1.0 / best_length as f64)
        } else {
            0.0
        };

        for edge in graph.edges_mut() {
            let tau = edge.pheromone();
            if tau > 0.0 {
                let mut updated = (1.0 - self.config.decay) * tau;
                if best_edges.contains(&edge.key()) {
                    updated += reinforcement;
                }
                edge.set_pheromone(updated);
            }
        }
    }
}
