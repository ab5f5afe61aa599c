//! # parley-agent
//!
//! Decision engine for automated bilateral negotiation.
//!
//! This crate provides:
//!
//! - **Opponent modelling**: [`OpponentModel`] estimates each counterpart's
//!   issue weights, value utilities and rigidity from the offers it makes
//! - **Bid search**: [`NashBidOptimizer`] samples bids above a floor with
//!   [`BidSpaceSampler`] and keeps the best joint-score ones in a
//!   [`CandidatePool`]
//! - **Concession**: [`ConcessionController`] lowers the acceptable utility
//!   over time, faster late in the session against rigid opponents
//! - **Strategy**: [`StrategyController`] turns all of the above into one
//!   Accept/Offer decision per turn; [`SharedController`] serializes access
//!   for concurrent hosts
//!
//! ## Example
//!
//! ```rust
//! use parley_agent::{ActionKind, EngineConfig, Message, StrategyController};
//! use parley_core::{
//!     AdditiveUtilitySpace, Bid, Domain, Issue, IssueId, ManualTimeline, PartyId,
//!     SortedOutcomeSpace, Value,
//! };
//!
//! let domain = Domain::new(vec![
//!     Issue::new(1, "price", ["low", "mid", "high"]),
//!     Issue::new(2, "delivery", ["fast", "slow"]),
//! ])
//! .unwrap();
//! let space = AdditiveUtilitySpace::builder(domain)
//!     .weight(1, 0.6)
//!     .weight(2, 0.4)
//!     .evaluation(1, "high", 1.0)
//!     .evaluation(1, "mid", 0.6)
//!     .evaluation(1, "low", 0.1)
//!     .evaluation(2, "fast", 1.0)
//!     .evaluation(2, "slow", 0.3)
//!     .build()
//!     .unwrap();
//! let index = SortedOutcomeSpace::new(&space).unwrap();
//!
//! let mut agent = StrategyController::new(
//!     space,
//!     index,
//!     ManualTimeline::at(0.5),
//!     EngineConfig::default().with_seed(7),
//! )
//! .unwrap();
//!
//! let offer = Bid::from_values([
//!     (IssueId::new(1), Value::from("low")),
//!     (IssueId::new(2), Value::from("slow")),
//! ]);
//! agent.on_message(PartyId::from("buyer"), Message::Offer(offer)).unwrap();
//!
//! let action = agent.decide(&[ActionKind::Accept, ActionKind::Offer]).unwrap();
//! assert_eq!(action.kind(), ActionKind::Offer);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod concession;
pub mod config;
pub mod error;
pub mod opponent;
pub mod optimizer;
pub mod pool;
pub mod sampler;
pub mod shared;
pub mod strategy;

#[cfg(test)]
mod test_support;

pub use error::{AgentError, Result};

// Re-exports for convenience
pub use concession::ConcessionController;
pub use config::{ConcessionConfig, EngineConfig, SearchConfig};
pub use opponent::{OpponentModel, OpponentTable};
pub use optimizer::{NashBidOptimizer, joint_score};
pub use pool::{CandidateBid, CandidatePool};
pub use sampler::BidSpaceSampler;
pub use shared::SharedController;
pub use strategy::{Action, ActionKind, Message, Phase, ReceivedOffer, SessionId, StrategyController};
