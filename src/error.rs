//! Error types for recorrer.
//!
//! All fallible operations return `Result<T, SolverError>` instead of
//! panicking. Degenerate inputs (empty graphs, tours shorter than three
//! nodes) are deliberately *not* errors: they surface as no-ops or empty
//! results so the stochastic search always makes forward progress.

use crate::graph::NodeId;
use thiserror::Error;

/// Result type alias for recorrer operations.
pub type SolverResult<T> = Result<T, SolverError>;

/// Unified error type for all recorrer operations.
#[derive(Debug, Error)]
pub enum SolverError {
    // ===== Invariant Violations =====
    /// Edge requested between a node and itself. This is a programmer error:
    /// the complete graph never contains self-loops.
    #[error("invariant violation: edge from node {0:?} to itself")]
    SelfLoop(NodeId),

    /// Node id does not exist in the graph arena.
    #[error("unknown node {0:?} (arena holds {1} nodes)")]
    UnknownNode(NodeId, usize),

    // ===== Configuration Errors =====
    /// Invalid configuration parameter.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Validation error.
    #[error("validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== I/O Errors =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SolverError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Check if this error is an invariant violation (programmer error,
    /// fail-fast, not recoverable by retrying).
    #[must_use]
    pub const fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::SelfLoop(_) | Self::UnknownNode(..))
    }
}
