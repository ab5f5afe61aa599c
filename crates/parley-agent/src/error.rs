//! Error types for parley-agent.

use parley_core::CoreError;
use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, AgentError>;

/// Errors that can occur while deciding a turn.
///
/// Not having enough history to judge an opponent's rigidity is not an error;
/// [`crate::OpponentModel::rigidity`] reports it as `None`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AgentError {
    /// A host utility query (e.g. the maximum-utility bid) failed.
    #[error("domain query failed: {0}")]
    DomainQuery(#[from] CoreError),

    /// The sampler found no bid above the floor within its retry budget.
    #[error("no bid above utility {floor} after {attempts} attempts")]
    SamplerExhausted {
        /// Attempts made before giving up.
        attempts: u32,
        /// The utility floor that could not be exceeded.
        floor: f64,
    },

    /// An opponent model cannot be seeded from a bid with no issues.
    #[error("reference bid has no issues")]
    EmptyReferenceBid,

    /// Engine configuration is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Why the configuration was rejected.
        reason: String,
    },

    /// None of the offered action kinds can be taken this turn.
    #[error("no available action can be taken")]
    NoActionAvailable,
}
