//! Error types for parley-core.

use thiserror::Error;

/// Errors that can occur while building or querying negotiation primitives.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// The domain description is malformed.
    #[error("invalid domain: {0}")]
    InvalidDomain(String),

    /// A utility profile does not fit its domain.
    #[error("invalid utility profile: {0}")]
    InvalidProfile(String),

    /// The maximum-utility bid could not be determined.
    #[error("no maximum-utility bid: {0}")]
    NoMaxBid(String),

    /// The outcome space contains no bids.
    #[error("outcome space is empty")]
    EmptyOutcomeSpace,
}
