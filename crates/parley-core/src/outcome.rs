//! Outcome-space indexing by own utility.

use tracing::debug;

use crate::bid::Bid;
use crate::error::CoreError;
use crate::utility::UtilitySpace;

/// Lookup of bids by own utility, supplied by the host.
pub trait OutcomeIndex: Send + Sync {
    /// Returns the bid whose own utility is closest to `target`.
    ///
    /// `None` only when the index is empty.
    fn nearest_to_utility(&self, target: f64) -> Option<Bid>;
}

impl<O: OutcomeIndex + ?Sized> OutcomeIndex for std::sync::Arc<O> {
    fn nearest_to_utility(&self, target: f64) -> Option<Bid> {
        (**self).nearest_to_utility(target)
    }
}

/// A bid paired with its own utility.
#[derive(Debug, Clone, PartialEq)]
struct Outcome {
    utility: f64,
    bid: Bid,
}

/// Every bid of a domain, sorted ascending by own utility.
///
/// Built by full enumeration, so it is meant for domains whose outcome count
/// fits comfortably in memory.
#[derive(Debug, Clone)]
pub struct SortedOutcomeSpace {
    outcomes: Vec<Outcome>,
}

impl SortedOutcomeSpace {
    /// Enumerates and sorts the outcome space of `space`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyOutcomeSpace`] if the domain yields no bids.
    pub fn new<U: UtilitySpace + ?Sized>(space: &U) -> Result<Self, CoreError> {
        let mut outcomes: Vec<Outcome> = space
            .domain()
            .all_bids()
            .into_iter()
            .map(|bid| Outcome {
                utility: space.utility(&bid),
                bid,
            })
            .collect();
        if outcomes.is_empty() {
            return Err(CoreError::EmptyOutcomeSpace);
        }
        outcomes.sort_by(|a, b| a.utility.total_cmp(&b.utility));
        debug!(outcomes = outcomes.len(), "indexed outcome space");
        Ok(Self { outcomes })
    }

    /// Number of indexed bids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Always false for a successfully built index.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

impl OutcomeIndex for SortedOutcomeSpace {
    fn nearest_to_utility(&self, target: f64) -> Option<Bid> {
        let idx = self.outcomes.partition_point(|o| o.utility < target);
        let above = self.outcomes.get(idx);
        let below = idx.checked_sub(1).and_then(|i| self.outcomes.get(i));
        let nearest = match (below, above) {
            (Some(b), Some(a)) => {
                if target - b.utility < a.utility - target {
                    b
                } else {
                    a
                }
            }
            (Some(b), None) => b,
            (None, Some(a)) => a,
            (None, None) => return None,
        };
        Some(nearest.bid.clone())
    }
}
