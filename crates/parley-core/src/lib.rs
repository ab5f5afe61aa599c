//! # parley-core
//!
//! Negotiation primitives shared by the decision engine and its host platform.
//!
//! This crate provides:
//!
//! - [`Domain`]: the negotiable issues and their discrete value sets
//! - [`Bid`]: one concrete assignment of a value to every issue
//! - [`UtilitySpace`], [`OutcomeIndex`], [`Timeline`]: the narrow contracts the
//!   engine consumes from the host
//! - Reference in-memory implementations of those contracts
//!   ([`AdditiveUtilitySpace`], [`SortedOutcomeSpace`], [`ManualTimeline`],
//!   [`RoundTimeline`], [`DeadlineTimeline`])
//!
//! ## Example
//!
//! ```rust
//! use parley_core::{AdditiveUtilitySpace, Domain, Issue, OutcomeIndex, SortedOutcomeSpace, UtilitySpace};
//!
//! let domain = Domain::new(vec![
//!     Issue::new(1, "price", ["low", "high"]),
//!     Issue::new(2, "delivery", ["fast", "slow"]),
//! ])
//! .unwrap();
//!
//! let space = AdditiveUtilitySpace::builder(domain)
//!     .weight(1, 0.7)
//!     .weight(2, 0.3)
//!     .evaluation(1, "high", 1.0)
//!     .evaluation(1, "low", 0.2)
//!     .evaluation(2, "fast", 1.0)
//!     .evaluation(2, "slow", 0.5)
//!     .build()
//!     .unwrap();
//!
//! let best = space.max_utility_bid().unwrap();
//! assert!((space.utility(&best) - 1.0).abs() < 1e-9);
//!
//! let index = SortedOutcomeSpace::new(&space).unwrap();
//! assert_eq!(index.len(), 4);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bid;
pub mod domain;
pub mod error;
pub mod outcome;
pub mod party;
pub mod timeline;
pub mod utility;

pub use bid::Bid;
pub use domain::{Domain, Issue, IssueId, Value};
pub use error::CoreError;
pub use outcome::{OutcomeIndex, SortedOutcomeSpace};
pub use party::PartyId;
pub use timeline::{DeadlineTimeline, ManualTimeline, RoundTimeline, Timeline};
pub use utility::{AdditiveUtilitySpace, AdditiveUtilitySpaceBuilder, UtilitySpace};
