//! Solver configuration with YAML schema and validation.
//!
//! Mistake-proofing through type-safe configuration structs, compile-time
//! schema via serde and runtime semantic validation. All algorithm tunables
//! (agent count, `q0`, β, ρ, pheromone constants, restart biases) live here;
//! nothing is negotiated at runtime.

use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::error::{SolverError, SolverResult};
use crate::graph::{DEFAULT_INITIAL_PHEROMONE, DEFAULT_MIN_NODE_DISTANCE};

/// Top-level solver configuration.
///
/// Loaded from YAML files with full schema validation, or built
/// programmatically via [`SolverConfig::builder`].
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SolverConfig {
    /// Master random seed; every stochastic decision derives from it.
    #[serde(default)]
    pub seed: u64,

    /// Number of construction agents per wave.
    #[validate(range(min = 1, max = 10_000))]
    #[serde(default = "default_num_agents")]
    pub num_agents: usize,

    /// Exploitation probability `q0`: chance to follow the highest adjusted
    /// pheromone weight instead of sampling the proportional distribution.
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_q0")]
    pub q0: f64,

    /// Inverse-distance exponent β. Lower values weight pheromone over
    /// distance.
    #[validate(range(min = 0.0, max = 16.0))]
    #[serde(default = "default_distance_weight")]
    pub distance_weight: f64,

    /// Pheromone decay constant ρ, shared by the local and global updates.
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_decay")]
    pub decay: f64,

    /// Pheromone weight assigned to freshly created edges.
    #[validate(range(min = 0.0))]
    #[serde(default = "default_initial_pheromone")]
    pub initial_pheromone: f64,

    /// Fixed reinforcement Δ added by the local update to each edge of a
    /// completed tour.
    #[validate(range(min = 0.0))]
    #[serde(default = "default_reinforcement")]
    pub reinforcement: f64,

    /// Minimum distance between nodes; `create_node` rejects closer points.
    #[serde(default = "default_min_node_distance")]
    pub min_node_distance: u64,

    /// Activation rounds per ant-wave tick, bounding per-tick latency.
    #[validate(range(min = 1, max = 1_000))]
    #[serde(default = "default_wave_updates_per_tick")]
    pub wave_updates_per_tick: usize,

    /// Random-choice probability for the restart tour after a hill-climbing
    /// local optimum.
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_hill_climb_restart_bias")]
    pub hill_climb_restart_bias: f64,

    /// Random-choice probability for the restart tour after a 2-opt/3-opt
    /// local optimum.
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_opt_restart_bias")]
    pub opt_restart_bias: f64,
}

fn default_num_agents() -> usize {
    10
}

fn default_q0() -> f64 {
    0.25
}

fn default_distance_weight() -> f64 {
    2.0
}

fn default_decay() -> f64 {
    0.10
}

fn default_initial_pheromone() -> f64 {
    DEFAULT_INITIAL_PHEROMONE
}

fn default_reinforcement() -> f64 {
    1.0
}

fn default_min_node_distance() -> u64 {
    DEFAULT_MIN_NODE_DISTANCE
}

fn default_wave_updates_per_tick() -> usize {
    5
}

fn default_hill_climb_restart_bias() -> f64 {
    0.05
}

fn default_opt_restart_bias() -> f64 {
    0.20
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            num_agents: default_num_agents(),
            q0: default_q0(),
            distance_weight: default_distance_weight(),
            decay: default_decay(),
            initial_pheromone: default_initial_pheromone(),
            reinforcement: default_reinforcement(),
            min_node_distance: default_min_node_distance(),
            wave_updates_per_tick: default_wave_updates_per_tick(),
            hill_climb_restart_bias: default_hill_climb_restart_bias(),
            opt_restart_bias: default_opt_restart_bias(),
        }
    }
}

impl SolverConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, YAML parsing fails or
    /// validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> SolverResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> SolverResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        config.validate_semantic()?;
        Ok(config)
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> SolverConfigBuilder {
        SolverConfigBuilder::default()
    }

    /// Validate semantic constraints beyond per-field ranges.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error describing the violated constraint.
    pub fn validate_semantic(&self) -> SolverResult<()> {
        // Full decay would zero every trail each round and stall the search.
        if (self.decay - 1.0).abs() < f64::EPSILON {
            return Err(SolverError::config("decay of exactly 1.0 erases all pheromone"));
        }
        if self.initial_pheromone == 0.0 && self.reinforcement == 0.0 {
            return Err(SolverError::config(
                "initial_pheromone and reinforcement cannot both be zero: trails could never form",
            ));
        }
        Ok(())
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct SolverConfigBuilder {
    seed: Option<u64>,
    num_agents: Option<usize>,
    q0: Option<f64>,
    distance_weight: Option<f64>,
    decay: Option<f64>,
    initial_pheromone: Option<f64>,
    reinforcement: Option<f64>,
    min_node_distance: Option<u64>,
    wave_updates_per_tick: Option<usize>,
    hill_climb_restart_bias: Option<f64>,
    opt_restart_bias: Option<f64>,
}

impl SolverConfigBuilder {
    /// Set the master random seed.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of agents per wave.
    #[must_use]
    pub const fn num_agents(mut self, num_agents: usize) -> Self {
        self.num_agents = Some(num_agents);
        self
    }

    /// Set the exploitation probability `q0`.
    #[must_use]
    pub const fn q0(mut self, q0: f64) -> Self {
        self.q0 = Some(q0);
        self
    }

    /// Set the inverse-distance exponent β.
    #[must_use]
    pub const fn distance_weight(mut self, beta: f64) -> Self {
        self.distance_weight = Some(beta);
        self
    }

    /// Set the pheromone decay constant ρ.
    #[must_use]
    pub const fn decay(mut self, rho: f64) -> Self {
        self.decay = Some(rho);
        self
    }

    /// Set the initial edge pheromone weight.
    #[must_use]
    pub const fn initial_pheromone(mut self, weight: f64) -> Self {
        self.initial_pheromone = Some(weight);
        self
    }

    /// Set the local-update reinforcement constant Δ.
    #[must_use]
    pub const fn reinforcement(mut self, delta: f64) -> Self {
        self.reinforcement = Some(delta);
        self
    }

    /// Set the minimum distance between nodes.
    #[must_use]
    pub const fn min_node_distance(mut self, distance: u64) -> Self {
        self.min_node_distance = Some(distance);
        self
    }

    /// Set the bound on activation rounds per ant-wave tick.
    #[must_use]
    pub const fn wave_updates_per_tick(mut self, rounds: usize) -> Self {
        self.wave_updates_per_tick = Some(rounds);
        self
    }

    /// Set the restart bias used after a hill-climbing local optimum.
    #[must_use]
    pub const fn hill_climb_restart_bias(mut self, bias: f64) -> Self {
        self.hill_climb_restart_bias = Some(bias);
        self
    }

    /// Set the restart bias used after a 2-opt/3-opt local optimum.
    #[must_use]
    pub const fn opt_restart_bias(mut self, bias: f64) -> Self {
        self.opt_restart_bias = Some(bias);
        self
    }

    /// Build the configuration, falling back to defaults for unset fields.
    #[must_use]
    pub fn build(self) -> SolverConfig {
        let defaults = SolverConfig::default();
        SolverConfig {
            seed: self.seed.unwrap_or(defaults.seed),
            num_agents: self.num_agents.unwrap_or(defaults.num_agents),
            q0: self.q0.unwrap_or(defaults.q0),
            distance_weight: self.distance_weight.unwrap_or(defaults.distance_weight),
            decay: self.decay.unwrap_or(defaults.decay),
            initial_pheromone: self.initial_pheromone.unwrap_or(defaults.initial_pheromone),
            reinforcement: self.reinforcement.unwrap_or(defaults.reinforcement),
            min_node_distance: self.min_node_distance.unwrap_or(defaults.min_node_distance),
            wave_updates_per_tick: self
                .wave_updates_per_tick
                .unwrap_or(defaults.wave_updates_per_tick),
            hill_climb_restart_bias: self
                .hill_climb_restart_bias
                .unwrap_or(defaults.hill_climb_restart_bias),
            opt_restart_bias: self.opt_restart_bias.unwrap_or(defaults.opt_restart_bias),
        }
    }
}
