//! Candidate sampling above a utility floor.

use parley_core::{Bid, OutcomeIndex, UtilitySpace};
use rand::Rng;
use tracing::warn;

use crate::error::{AgentError, Result};

/// Draws bids whose own utility exceeds a floor, via the host's outcome index.
pub struct BidSpaceSampler<'a> {
    utility: &'a dyn UtilitySpace,
    index: &'a dyn OutcomeIndex,
    max_attempts: u32,
    fallback: Option<&'a Bid>,
}

impl<'a> BidSpaceSampler<'a> {
    /// Creates a sampler making at most `max_attempts` draws per sample.
    #[must_use]
    pub fn new(
        utility: &'a dyn UtilitySpace,
        index: &'a dyn OutcomeIndex,
        max_attempts: u32,
    ) -> Self {
        Self {
            utility,
            index,
            max_attempts,
            fallback: None,
        }
    }

    /// Uses `bid` instead of querying the utility space when sampling runs
    /// out of attempts.
    #[must_use]
    pub fn with_fallback(mut self, bid: Option<&'a Bid>) -> Self {
        self.fallback = bid;
        self
    }

    /// The own-utility function bids are checked against.
    #[must_use]
    pub fn utility(&self) -> &'a dyn UtilitySpace {
        self.utility
    }

    /// Draws a target utility uniformly in `[floor, 1]` and returns the
    /// nearest indexed bid if its own utility is strictly above `floor`.
    ///
    /// A floor below zero (late in the session) draws from `[0, 1]`.
    pub fn try_sample_above_floor<R: Rng + ?Sized>(&self, floor: f64, rng: &mut R) -> Result<Bid> {
        let low = if floor.is_nan() {
            0.0
        } else {
            floor.clamp(0.0, 1.0)
        };
        for _ in 0..self.max_attempts {
            let target = low + rng.gen_range(0.0..1.0) * (1.0 - low);
            let Some(bid) = self.index.nearest_to_utility(target) else {
                continue;
            };
            if self.utility.utility(&bid) > floor {
                return Ok(bid);
            }
        }
        Err(AgentError::SamplerExhausted {
            attempts: self.max_attempts,
            floor,
        })
    }

    /// Like [`BidSpaceSampler::try_sample_above_floor`], but falls back to the
    /// maximum-utility bid once the retry budget is spent.
    ///
    /// A bid set with [`BidSpaceSampler::with_fallback`] is returned as is;
    /// otherwise the utility space is queried.
    pub fn sample_above_floor<R: Rng + ?Sized>(&self, floor: f64, rng: &mut R) -> Result<Bid> {
        match self.try_sample_above_floor(floor, rng) {
            Err(AgentError::SamplerExhausted { attempts, floor }) => {
                warn!(attempts, floor, "sampler exhausted, falling back to maximum-utility bid");
                match self.fallback {
                    Some(bid) => Ok(bid.clone()),
                    None => Ok(self.utility.max_utility_bid()?),
                }
            }
            other => other,
        }
    }
}
