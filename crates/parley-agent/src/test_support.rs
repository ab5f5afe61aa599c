//! Shared fixtures for unit tests.

use std::sync::atomic::{AtomicBool, Ordering};

use parley_core::{
    AdditiveUtilitySpace, Bid, CoreError, Domain, Issue, IssueId, OutcomeIndex,
    SortedOutcomeSpace, UtilitySpace, Value,
};

/// Three issues with three values each (27 outcomes).
pub fn domain() -> Domain {
    Domain::new(vec![
        Issue::new(1, "food", ["chips", "nuts", "catering"]),
        Issue::new(2, "drinks", ["water", "beer", "wine"]),
        Issue::new(3, "music", ["none", "dj", "band"]),
    ])
    .unwrap()
}

/// Own profile: prefers catering, wine and a band, food matters most.
pub fn own_space() -> AdditiveUtilitySpace {
    AdditiveUtilitySpace::builder(domain())
        .weight(1, 0.5)
        .weight(2, 0.3)
        .weight(3, 0.2)
        .evaluation(1, "chips", 0.2)
        .evaluation(1, "nuts", 0.5)
        .evaluation(1, "catering", 1.0)
        .evaluation(2, "water", 0.1)
        .evaluation(2, "beer", 0.6)
        .evaluation(2, "wine", 1.0)
        .evaluation(3, "none", 0.0)
        .evaluation(3, "dj", 0.7)
        .evaluation(3, "band", 1.0)
        .build()
        .unwrap()
}

pub fn index(space: &AdditiveUtilitySpace) -> SortedOutcomeSpace {
    SortedOutcomeSpace::new(space).unwrap()
}

/// Builds a bid over issues 1, 2, 3 in order.
pub fn bid(values: &[&str]) -> Bid {
    Bid::from_values(
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (IssueId::new(i as u32 + 1), Value::from(*v))),
    )
}

/// A profile whose maximum-utility query always fails.
pub struct BrokenMaxSpace {
    pub inner: AdditiveUtilitySpace,
}

impl UtilitySpace for BrokenMaxSpace {
    fn domain(&self) -> &Domain {
        self.inner.domain()
    }

    fn utility(&self, bid: &Bid) -> f64 {
        self.inner.utility(bid)
    }

    fn max_utility_bid(&self) -> Result<Bid, CoreError> {
        Err(CoreError::NoMaxBid("profile unavailable".into()))
    }
}

/// A profile whose maximum-utility query succeeds once and then fails.
pub struct FlakyMaxSpace {
    inner: AdditiveUtilitySpace,
    answered: AtomicBool,
}

impl FlakyMaxSpace {
    pub fn new(inner: AdditiveUtilitySpace) -> Self {
        Self {
            inner,
            answered: AtomicBool::new(false),
        }
    }
}

impl UtilitySpace for FlakyMaxSpace {
    fn domain(&self) -> &Domain {
        self.inner.domain()
    }

    fn utility(&self, bid: &Bid) -> f64 {
        self.inner.utility(bid)
    }

    fn max_utility_bid(&self) -> Result<Bid, CoreError> {
        if self.answered.swap(true, Ordering::SeqCst) {
            Err(CoreError::NoMaxBid("profile unavailable".into()))
        } else {
            self.inner.max_utility_bid()
        }
    }
}

/// An index that always answers with the same bid.
pub struct FixedIndex(pub Bid);

impl OutcomeIndex for FixedIndex {
    fn nearest_to_utility(&self, _target: f64) -> Option<Bid> {
        Some(self.0.clone())
    }
}
