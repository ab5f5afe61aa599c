//! Engine configuration.
//!
//! Every tunable constant of the decision engine lives here. Defaults
//! reproduce the reference behaviour: a 20% opening anchor, a 100-entry
//! candidate pool refreshed every 10 rounds, and a 0.9 base reservation.

use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Elapsed fraction below which the agent only proposes its best bid.
    pub opening_fraction: f64,
    /// Bid search parameters.
    pub search: SearchConfig,
    /// Concession schedule parameters.
    pub concession: ConcessionConfig,
    /// Seed for the pseudo-random source; entropy when unset.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            opening_fraction: 0.2,
            search: SearchConfig::default(),
            concession: ConcessionConfig::default(),
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Returns a copy with a fixed seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parses and validates a JSON configuration. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| AgentError::InvalidConfig {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every parameter is in range.
    pub fn validate(&self) -> Result<()> {
        check_fraction("opening_fraction", self.opening_fraction)?;
        self.search.validate()?;
        self.concession.validate()
    }
}

/// Parameters of the candidate search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum number of candidates kept in the pool.
    pub pool_capacity: usize,
    /// Candidates sampled per bargaining round.
    pub samples_per_round: usize,
    /// Pool entries are rescored every this many rounds.
    pub rescore_interval: u64,
    /// A full pool offers uniformly among this many best entries.
    pub top_m: usize,
    /// Draws the sampler makes before falling back to the best bid.
    pub sampler_max_attempts: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            pool_capacity: 100,
            samples_per_round: 100,
            rescore_interval: 10,
            top_m: 5,
            sampler_max_attempts: 50,
        }
    }
}

impl SearchConfig {
    /// Checks that every count is positive and `top_m` fits the pool.
    pub fn validate(&self) -> Result<()> {
        if self.pool_capacity == 0 {
            return Err(invalid("pool_capacity must be positive"));
        }
        if self.samples_per_round == 0 {
            return Err(invalid("samples_per_round must be positive"));
        }
        if self.rescore_interval == 0 {
            return Err(invalid("rescore_interval must be positive"));
        }
        if self.top_m == 0 || self.top_m > self.pool_capacity {
            return Err(invalid("top_m must be in 1..=pool_capacity"));
        }
        if self.sampler_max_attempts == 0 {
            return Err(invalid("sampler_max_attempts must be positive"));
        }
        Ok(())
    }
}

/// Parameters of the time- and rigidity-dependent concession floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcessionConfig {
    /// Floor at the start of the session.
    pub base_reservation: f64,
    /// Conceding factor before `late_phase_threshold` (steep, little concession).
    pub early_conceding_factor: f64,
    /// Late-phase factor against flexible opponents.
    pub medium_conceding_factor: f64,
    /// Late-phase factor against rigid opponents (concede faster).
    pub soft_conceding_factor: f64,
    /// Elapsed fraction at which opponent rigidity starts to matter.
    pub late_phase_threshold: f64,
    /// Rigidity above which an opponent counts as hard-headed.
    pub rigidity_threshold: f64,
    /// Trailing window (in offers) used to measure rigidity.
    pub rigidity_window: usize,
}

impl Default for ConcessionConfig {
    fn default() -> Self {
        Self {
            base_reservation: 0.9,
            early_conceding_factor: 13.0,
            medium_conceding_factor: 10.0,
            soft_conceding_factor: 7.0,
            late_phase_threshold: 0.9,
            rigidity_threshold: 0.6,
            rigidity_window: 10,
        }
    }
}

impl ConcessionConfig {
    /// Checks factor signs, fraction ranges and the rigidity window.
    pub fn validate(&self) -> Result<()> {
        if !self.base_reservation.is_finite() {
            return Err(invalid("base_reservation must be finite"));
        }
        for (name, factor) in [
            ("early_conceding_factor", self.early_conceding_factor),
            ("medium_conceding_factor", self.medium_conceding_factor),
            ("soft_conceding_factor", self.soft_conceding_factor),
        ] {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(invalid(&format!("{name} must be positive")));
            }
        }
        check_fraction("late_phase_threshold", self.late_phase_threshold)?;
        check_fraction("rigidity_threshold", self.rigidity_threshold)?;
        if self.rigidity_window == 0 {
            return Err(invalid("rigidity_window must be positive"));
        }
        Ok(())
    }
}

fn check_fraction(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(&format!("{name} must be within [0, 1], got {value}")))
    }
}

fn invalid(reason: &str) -> AgentError {
    AgentError::InvalidConfig {
        reason: reason.to_string(),
    }
}
