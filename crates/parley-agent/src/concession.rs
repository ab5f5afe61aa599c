//! Time- and rigidity-dependent concession floor.
//!
//! The floor starts at the base reservation and falls logarithmically with
//! elapsed time:
//!
//! ```text
//! floor(t) = log10(1 - t) / factor + base_reservation
//! ```
//!
//! The factor is steep for most of the session. Past the late-phase threshold
//! it softens, and softens further when some opponent has been rigid over its
//! recent offers. At `t = 1` the floor is negative infinity, so every offer is
//! acceptable at the deadline.

use tracing::trace;

use crate::config::ConcessionConfig;
use crate::opponent::OpponentTable;

/// Computes the minimum acceptable own utility for a turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ConcessionController {
    config: ConcessionConfig,
}

impl ConcessionController {
    /// Creates a controller with the given schedule.
    #[must_use]
    pub fn new(config: ConcessionConfig) -> Self {
        Self { config }
    }

    /// The schedule parameters.
    #[must_use]
    pub fn config(&self) -> &ConcessionConfig {
        &self.config
    }

    /// Highest rigidity among opponents with enough history, if any.
    #[must_use]
    pub fn max_rigidity(&self, opponents: &OpponentTable) -> Option<f64> {
        opponents
            .values()
            .filter_map(|model| model.rigidity(self.config.rigidity_window))
            .max_by(f64::total_cmp)
    }

    /// Divisor applied to the log-time term at `elapsed`.
    #[must_use]
    pub fn conceding_factor(&self, elapsed: f64, opponents: &OpponentTable) -> f64 {
        if elapsed < self.config.late_phase_threshold {
            return self.config.early_conceding_factor;
        }
        let rigid = self
            .max_rigidity(opponents)
            .is_some_and(|r| r > self.config.rigidity_threshold);
        if rigid {
            self.config.soft_conceding_factor
        } else {
            self.config.medium_conceding_factor
        }
    }

    /// Minimum own utility acceptable at `elapsed`.
    ///
    /// `elapsed` is clamped to [0, 1]; the floor itself is unbounded below and
    /// reaches negative infinity at the deadline.
    #[must_use]
    pub fn min_acceptable_utility(&self, elapsed: f64, opponents: &OpponentTable) -> f64 {
        let t = if elapsed.is_nan() {
            0.0
        } else {
            elapsed.clamp(0.0, 1.0)
        };
        let factor = self.conceding_factor(t, opponents);
        let floor = (1.0 - t).log10() / factor + self.config.base_reservation;
        trace!(elapsed = t, factor, floor, "concession floor");
        floor
    }
}

impl Default for ConcessionController {
    fn default() -> Self {
        Self::new(ConcessionConfig::default())
    }
}
