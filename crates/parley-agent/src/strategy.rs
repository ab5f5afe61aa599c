//! Per-turn negotiation strategy.
//!
//! A [`StrategyController`] owns everything one negotiation session needs:
//! the opponent-model table, the bid optimizer with its candidate pool, and
//! the pseudo-random source. The host feeds it counterpart messages through
//! [`StrategyController::on_message`] and asks for a move with
//! [`StrategyController::decide`].
//!
//! The session has two phases:
//!
//! - **Opening**: before `opening_fraction` of the session has elapsed, the
//!   agent anchors by proposing its own maximum-utility bid.
//! - **Bargaining**: each turn the concession floor is recomputed, a search
//!   round refreshes the candidate pool, and the last received offer is
//!   accepted if it is at least as good as the candidate or as the floor.

use std::collections::BTreeMap;

use parley_core::{Bid, OutcomeIndex, PartyId, Timeline, UtilitySpace};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::concession::ConcessionController;
use crate::config::EngineConfig;
use crate::error::{AgentError, Result};
use crate::opponent::{OpponentModel, OpponentTable};
use crate::optimizer::NashBidOptimizer;
use crate::sampler::BidSpaceSampler;

/// Unique identifier for a negotiation session.
pub type SessionId = Uuid;

const DESCRIPTION: &str = "Frequency-model agent: anchors on its best bid, then searches \
                           for Nash-product bids above a log-time concession floor";

/// Phase of the session, derived from elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Anchoring on the maximum-utility bid.
    Opening,
    /// Searching, conceding and possibly accepting.
    Bargaining,
}

/// Kinds of action the host may allow on a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Accept the last received offer.
    Accept,
    /// Propose a bid.
    Offer,
}

/// The agent's move for a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Accept `bid`, the last offer received.
    Accept {
        /// The accepted bid.
        bid: Bid,
    },
    /// Propose `bid`.
    Offer {
        /// The proposed bid.
        bid: Bid,
    },
}

impl Action {
    /// Kind of this action.
    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::Accept { .. } => ActionKind::Accept,
            Self::Offer { .. } => ActionKind::Offer,
        }
    }

    /// The bid accepted or proposed.
    #[must_use]
    pub const fn bid(&self) -> &Bid {
        match self {
            Self::Accept { bid } | Self::Offer { bid } => bid,
        }
    }
}

/// An inbound event from a counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Message {
    /// The counterpart proposes a bid.
    Offer(Bid),
    /// The counterpart accepts a bid.
    Accept(Bid),
}

/// The most recent offer received from any counterpart.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceivedOffer {
    /// Who made the offer.
    pub sender: PartyId,
    /// The offered bid.
    pub bid: Bid,
    /// Own utility of the bid.
    pub own_utility: f64,
}

/// Decision engine for one negotiation session.
pub struct StrategyController<U, O, T> {
    session_id: SessionId,
    config: EngineConfig,
    utility: U,
    index: O,
    timeline: T,
    opponents: OpponentTable,
    optimizer: NashBidOptimizer,
    concession: ConcessionController,
    rng: StdRng,
    last_received: Option<ReceivedOffer>,
    acceptances: BTreeMap<PartyId, Vec<Bid>>,
    max_bid: Option<Bid>,
    turn: u64,
}

impl<U, O, T> StrategyController<U, O, T>
where
    U: UtilitySpace,
    O: OutcomeIndex,
    T: Timeline,
{
    /// Creates a controller for a new session.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidConfig`] if `config` fails validation.
    pub fn new(utility: U, index: O, timeline: T, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let session_id = Uuid::new_v4();

        let max_bid = match utility.max_utility_bid() {
            Ok(bid) => Some(bid),
            Err(e) => {
                warn!(session = %session_id, error = %e, "maximum-utility bid unavailable at start");
                None
            }
        };

        let domain = utility.domain();
        info!(
            session = %session_id,
            issues = domain.len(),
            outcomes = domain.outcome_count(),
            seeded = config.seed.is_some(),
            "negotiation session started"
        );
        for issue in domain.issues() {
            debug!(
                session = %session_id,
                issue = %issue.id,
                name = %issue.name,
                weight = ?utility.issue_weight(issue.id),
                values = issue.values.len(),
                "issue"
            );
        }

        Ok(Self {
            session_id,
            optimizer: NashBidOptimizer::new(config.search.clone())?,
            concession: ConcessionController::new(config.concession.clone()),
            config,
            utility,
            index,
            timeline,
            opponents: OpponentTable::new(),
            rng,
            last_received: None,
            acceptances: BTreeMap::new(),
            max_bid,
            turn: 0,
        })
    }

    /// Processes a message from `sender`.
    ///
    /// Offers update the sender's opponent model (created on first contact)
    /// and become the last received offer. Acceptances are only recorded.
    pub fn on_message(&mut self, sender: PartyId, message: Message) -> Result<()> {
        match message {
            Message::Offer(bid) => self.receive_offer(sender, bid),
            Message::Accept(bid) => {
                info!(session = %self.session_id, sender = %sender, bid = %bid, "counterpart accepted");
                self.acceptances.entry(sender).or_default().push(bid);
                Ok(())
            }
        }
    }

    /// Chooses this turn's action among the `available` kinds.
    ///
    /// # Errors
    ///
    /// - [`AgentError::NoActionAvailable`] if neither an offer nor an
    ///   acceptance can be made.
    /// - [`AgentError::DomainQuery`] if the opening bid cannot be determined
    ///   and no fallback exists, or a sampler fallback fails.
    pub fn decide(&mut self, available: &[ActionKind]) -> Result<Action> {
        self.turn += 1;
        let can_offer = available.contains(&ActionKind::Offer);
        let accept_target = if available.contains(&ActionKind::Accept) {
            self.last_received.clone()
        } else {
            None
        };
        if !can_offer && accept_target.is_none() {
            return Err(AgentError::NoActionAvailable);
        }

        let action = match self.phase() {
            Phase::Opening => self.decide_opening(can_offer, accept_target)?,
            Phase::Bargaining => self.decide_bargaining(can_offer, accept_target)?,
        };
        info!(
            session = %self.session_id,
            turn = self.turn,
            action = ?action.kind(),
            bid = %action.bid(),
            "decided"
        );
        Ok(action)
    }

    /// Current phase, from the timeline.
    pub fn phase(&self) -> Phase {
        if self.timeline.elapsed() < self.config.opening_fraction {
            Phase::Opening
        } else {
            Phase::Bargaining
        }
    }

    /// Concession floor at the current time.
    pub fn min_acceptable_utility(&self) -> f64 {
        self.concession
            .min_acceptable_utility(self.timeline.elapsed(), &self.opponents)
    }

    /// Session identifier.
    pub const fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Number of `decide` calls so far.
    pub const fn turn(&self) -> u64 {
        self.turn
    }

    /// Engine configuration.
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Model of `party`, if it has made an offer.
    pub fn opponent(&self, party: &PartyId) -> Option<&OpponentModel> {
        self.opponents.get(party)
    }

    /// All opponent models.
    pub const fn opponents(&self) -> &OpponentTable {
        &self.opponents
    }

    /// Bids each counterpart has accepted.
    pub const fn acceptances(&self) -> &BTreeMap<PartyId, Vec<Bid>> {
        &self.acceptances
    }

    /// Last offer received from any counterpart.
    pub const fn last_received_offer(&self) -> Option<&ReceivedOffer> {
        self.last_received.as_ref()
    }

    /// The bid optimizer and its candidate pool.
    pub const fn optimizer(&self) -> &NashBidOptimizer {
        &self.optimizer
    }

    /// Human-readable description of the agent.
    pub const fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn receive_offer(&mut self, sender: PartyId, bid: Bid) -> Result<()> {
        if !self.utility.domain().admits(&bid) {
            warn!(
                session = %self.session_id,
                sender = %sender,
                bid = %bid,
                "offer does not match the negotiation domain"
            );
        }
        let own_utility = self.utility.utility(&bid);
        if !self.opponents.contains_key(&sender) {
            let model = OpponentModel::new(&bid)?;
            info!(
                session = %self.session_id,
                opponent = %sender,
                issues = model.issue_ids().len(),
                "registered opponent"
            );
            self.opponents.insert(sender.clone(), model);
        }
        if let Some(model) = self.opponents.get_mut(&sender) {
            model.record_offer(bid.clone());
            model.record_own_utility(own_utility);
        }
        debug!(
            session = %self.session_id,
            sender = %sender,
            bid = %bid,
            own_utility,
            "received offer"
        );
        self.last_received = Some(ReceivedOffer {
            sender,
            bid,
            own_utility,
        });
        Ok(())
    }

    fn decide_opening(
        &mut self,
        can_offer: bool,
        accept_target: Option<ReceivedOffer>,
    ) -> Result<Action> {
        if can_offer {
            return Ok(Action::Offer {
                bid: self.opening_bid()?,
            });
        }
        accept_target
            .map(|offer| Action::Accept { bid: offer.bid })
            .ok_or(AgentError::NoActionAvailable)
    }

    /// Maximum-utility bid, falling back to the cached one and then to the
    /// best pooled candidate when the host query fails.
    fn opening_bid(&mut self) -> Result<Bid> {
        match self.utility.max_utility_bid() {
            Ok(bid) => {
                self.max_bid = Some(bid.clone());
                Ok(bid)
            }
            Err(e) => {
                let fallback = self
                    .max_bid
                    .clone()
                    .or_else(|| self.optimizer.best_candidate().map(|c| c.bid.clone()));
                match fallback {
                    Some(bid) => {
                        warn!(
                            session = %self.session_id,
                            error = %e,
                            bid = %bid,
                            "maximum-utility query failed, reusing cached bid"
                        );
                        Ok(bid)
                    }
                    None => Err(e.into()),
                }
            }
        }
    }

    fn decide_bargaining(
        &mut self,
        can_offer: bool,
        accept_target: Option<ReceivedOffer>,
    ) -> Result<Action> {
        let floor = self.min_acceptable_utility();
        let sampler = BidSpaceSampler::new(
            &self.utility,
            &self.index,
            self.config.search.sampler_max_attempts,
        )
        .with_fallback(self.max_bid.as_ref());
        let round_best =
            self.optimizer
                .refresh_round(floor, &sampler, &self.opponents, &mut self.rng)?;
        let candidate = self
            .optimizer
            .select_offer(&mut self.rng)
            .unwrap_or(round_best.bid);
        let candidate_utility = self.utility.utility(&candidate);

        let accept = accept_target.as_ref().is_some_and(|offer| {
            offer.own_utility >= candidate_utility || offer.own_utility >= floor
        });
        debug!(
            session = %self.session_id,
            turn = self.turn,
            floor,
            candidate_utility,
            received_utility = accept_target.as_ref().map(|o| o.own_utility),
            accept,
            "bargaining turn"
        );

        match accept_target {
            Some(offer) if accept || !can_offer => Ok(Action::Accept { bid: offer.bid }),
            _ => Ok(Action::Offer { bid: candidate }),
        }
    }
}

impl<U, O, T> std::fmt::Debug for StrategyController<U, O, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyController")
            .field("session_id", &self.session_id)
            .field("turn", &self.turn)
            .field("opponents", &self.opponents.len())
            .field("pool", &self.optimizer.pool().len())
            .finish_non_exhaustive()
    }
}
