//! Joint-utility bid search.
//!
//! Candidates are scored by a Nash-product style objective: the agent's own
//! utility multiplied by every known opponent's estimated utility. Each
//! bargaining round samples a batch of candidates above the concession floor,
//! keeps the best of the batch, and feeds it into a bounded
//! [`CandidatePool`]. Because opponent models keep drifting as offers arrive,
//! pool scores are recomputed every few rounds.

use parley_core::{Bid, UtilitySpace};
use rand::Rng;
use tracing::debug;

use crate::config::SearchConfig;
use crate::error::{AgentError, Result};
use crate::opponent::OpponentTable;
use crate::pool::{CandidateBid, CandidatePool};
use crate::sampler::BidSpaceSampler;

/// Own utility times the product of all opponents' estimated utilities.
///
/// With no opponents the score is the own utility.
pub fn joint_score<U: UtilitySpace + ?Sized>(
    utility: &U,
    opponents: &OpponentTable,
    bid: &Bid,
) -> f64 {
    opponents
        .values()
        .fold(utility.utility(bid), |score, model| {
            score * model.estimate_utility(bid)
        })
}

/// Searches for high joint-score bids and maintains the candidate pool.
#[derive(Debug, Clone)]
pub struct NashBidOptimizer {
    config: SearchConfig,
    pool: CandidatePool,
    rounds: u64,
    round_best: Option<CandidateBid>,
}

impl NashBidOptimizer {
    /// Creates an optimizer with an empty pool.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            pool: CandidatePool::new(config.pool_capacity),
            config,
            rounds: 0,
            round_best: None,
        })
    }

    /// Runs one search round above `floor` and returns the round's best candidate.
    ///
    /// Every `rescore_interval` rounds the whole pool is rescored first.
    pub fn refresh_round<R: Rng + ?Sized>(
        &mut self,
        floor: f64,
        sampler: &BidSpaceSampler<'_>,
        opponents: &OpponentTable,
        rng: &mut R,
    ) -> Result<CandidateBid> {
        let utility = sampler.utility();
        self.rounds += 1;
        if self.rounds % self.config.rescore_interval == 0 {
            self.rescore(utility, opponents);
        }

        let mut best: Option<CandidateBid> = None;
        for _ in 0..self.config.samples_per_round {
            let bid = sampler.sample_above_floor(floor, rng)?;
            let score = joint_score(utility, opponents, &bid);
            if best.as_ref().is_none_or(|b| score > b.score) {
                best = Some(CandidateBid::new(bid, score));
            }
        }
        let Some(best) = best else {
            return Err(AgentError::SamplerExhausted { attempts: 0, floor });
        };

        let admitted = self.pool.insert(best.clone());
        debug!(
            round = self.rounds,
            floor,
            score = best.score,
            admitted,
            pool = self.pool.len(),
            "search round complete"
        );
        self.round_best = Some(best.clone());
        Ok(best)
    }

    /// Picks the bid to propose.
    ///
    /// A full pool yields a uniformly random pick among its `top_m` entries;
    /// before that, the best candidate of the latest round.
    pub fn select_offer<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Bid> {
        if self.pool.is_full() {
            let top = self.pool.top(self.config.top_m);
            if top.is_empty() {
                return None;
            }
            return Some(top[rng.gen_range(0..top.len())].bid.clone());
        }
        self.round_best.as_ref().map(|c| c.bid.clone())
    }

    /// Recomputes every pool score against the current opponent models.
    pub fn rescore<U: UtilitySpace + ?Sized>(&mut self, utility: &U, opponents: &OpponentTable) {
        self.pool
            .rescore(|bid| joint_score(utility, opponents, bid));
        debug!(round = self.rounds, pool = self.pool.len(), "rescored candidate pool");
    }

    /// Best candidate currently pooled.
    #[must_use]
    pub fn best_candidate(&self) -> Option<&CandidateBid> {
        self.pool.best()
    }

    /// The candidate pool.
    #[must_use]
    pub fn pool(&self) -> &CandidatePool {
        &self.pool
    }

    /// Search rounds run so far.
    #[must_use]
    pub const fn rounds(&self) -> u64 {
        self.rounds
    }
}
