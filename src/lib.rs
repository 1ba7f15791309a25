//! # recorrer
//!
//! Heuristic Traveling Salesman engine over 2-D point sets.
//!
//! Four interchangeable strategies incrementally improve a tour and publish a
//! running best path:
//! - Ant colony construction (pseudo-random proportional rule + pheromone
//!   evaporation/reinforcement)
//! - Hill climbing (interior pair swaps)
//! - 2-opt (segment reversal)
//! - 3-opt (seven-case segment reversal)
//!
//! The engine performs no I/O and owns no threads: an external driver selects
//! a strategy and repeatedly calls [`engine::Solver::tick`], then reads the
//! best tour and per-edge pheromone levels for display.
//!
//! ## Example
//!
//! ```rust
//! use recorrer::prelude::*;
//!
//! let config = SolverConfig::builder().seed(42).build();
//! let mut solver = Solver::new(config);
//! solver.generate_random_nodes(25, 640, 480);
//! solver.select(Strategy::TwoOpt);
//! for _ in 0..100 {
//!     solver.tick();
//! }
//! assert!(solver.graph().best_path_length() > 0);
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_const_for_fn, // Many functions can't be const in stable Rust
    clippy::needless_range_loop   // Index loops are clearer in neighborhood scans
)]

pub mod colony;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod search;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::colony::{Agent, AgentState, Colony};
    pub use crate::config::{SolverConfig, SolverConfigBuilder};
    pub use crate::engine::rng::SolverRng;
    pub use crate::engine::{Solver, Strategy, TickOutcome};
    pub use crate::error::{SolverError, SolverResult};
    pub use crate::graph::{Graph, NodeId, Point, Tour};
    pub use crate::search::{HillClimb, LocalSearch, ThreeOpt, TwoOpt};
}

/// Re-export for public API
pub use error::{SolverError, SolverResult};
