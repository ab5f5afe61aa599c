//! Normalized negotiation time.
//!
//! Every [`Timeline`] reports progress as a fraction in [0, 1], where 1 is the
//! deadline.

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;

/// Session clock supplied by the host. Monotonically non-decreasing.
pub trait Timeline: Send + Sync {
    /// Fraction of the session that has elapsed, in [0, 1].
    fn elapsed(&self) -> f64;
}

impl<T: Timeline + ?Sized> Timeline for &T {
    fn elapsed(&self) -> f64 {
        (**self).elapsed()
    }
}

impl<T: Timeline + ?Sized> Timeline for std::sync::Arc<T> {
    fn elapsed(&self) -> f64 {
        (**self).elapsed()
    }
}

/// A timeline advanced explicitly by the caller.
#[derive(Debug, Default)]
pub struct ManualTimeline {
    elapsed: RwLock<f64>,
}

impl ManualTimeline {
    /// Creates a timeline at the given fraction (clamped to [0, 1]).
    #[must_use]
    pub fn at(elapsed: f64) -> Self {
        Self {
            elapsed: RwLock::new(clamp_fraction(elapsed)),
        }
    }

    /// Moves the timeline to `elapsed` (clamped to [0, 1]).
    pub fn set(&self, elapsed: f64) {
        *self.elapsed.write() = clamp_fraction(elapsed);
    }
}

impl Timeline for ManualTimeline {
    fn elapsed(&self) -> f64 {
        *self.elapsed.read()
    }
}

/// A timeline measured in protocol rounds.
#[derive(Debug)]
pub struct RoundTimeline {
    total_rounds: u32,
    current: AtomicU32,
}

impl RoundTimeline {
    /// Creates a timeline with a fixed number of rounds.
    #[must_use]
    pub const fn new(total_rounds: u32) -> Self {
        Self {
            total_rounds,
            current: AtomicU32::new(0),
        }
    }

    /// Marks one more round as completed; saturates at the deadline.
    pub fn advance(&self) {
        let _ = self
            .current
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |r| {
                (r < self.total_rounds).then_some(r + 1)
            });
    }

    /// Rounds completed so far.
    #[must_use]
    pub fn current_round(&self) -> u32 {
        self.current.load(Ordering::Acquire)
    }

    /// Total rounds in the session.
    #[must_use]
    pub const fn total_rounds(&self) -> u32 {
        self.total_rounds
    }
}

impl Timeline for RoundTimeline {
    fn elapsed(&self) -> f64 {
        if self.total_rounds == 0 {
            return 1.0;
        }
        f64::from(self.current_round()) / f64::from(self.total_rounds)
    }
}

/// A wall-clock timeline between a start instant and a deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineTimeline {
    started_at: DateTime<Utc>,
    deadline: DateTime<Utc>,
}

impl DeadlineTimeline {
    /// Starts a session now that ends after `duration`.
    #[must_use]
    pub fn starting_now(duration: Duration) -> Self {
        let started_at = Utc::now();
        Self {
            started_at,
            deadline: started_at + duration,
        }
    }

    /// Creates a timeline with explicit bounds.
    #[must_use]
    pub const fn new(started_at: DateTime<Utc>, deadline: DateTime<Utc>) -> Self {
        Self {
            started_at,
            deadline,
        }
    }

    /// Elapsed fraction at a specific instant (for testing).
    #[must_use]
    pub fn elapsed_at(&self, now: DateTime<Utc>) -> f64 {
        let total = (self.deadline - self.started_at).num_milliseconds();
        if total <= 0 {
            return 1.0;
        }
        let spent = (now - self.started_at).num_milliseconds();
        clamp_fraction(spent as f64 / total as f64)
    }

    /// The session deadline.
    #[must_use]
    pub const fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }
}

impl Timeline for DeadlineTimeline {
    fn elapsed(&self) -> f64 {
        self.elapsed_at(Utc::now())
    }
}

fn clamp_fraction(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
