//! Bounded pool of the best candidate bids found this session.

use parley_core::Bid;

/// A bid paired with the joint score it had when last scored.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateBid {
    /// The candidate bid.
    pub bid: Bid,
    /// Joint objective value; refreshed periodically, not own utility.
    pub score: f64,
}

impl CandidateBid {
    /// Creates a scored candidate.
    #[must_use]
    pub const fn new(bid: Bid, score: f64) -> Self {
        Self { bid, score }
    }
}

/// Fixed-capacity collection of candidates, always sorted ascending by score.
///
/// Once full, a new candidate is admitted only if it beats the current
/// minimum, which it then evicts.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidatePool {
    capacity: usize,
    entries: Vec<CandidateBid>,
}

impl CandidatePool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Offers a candidate to the pool. Returns true if it was admitted.
    pub fn insert(&mut self, candidate: CandidateBid) -> bool {
        if self.entries.len() < self.capacity {
            self.insert_sorted(candidate);
            return true;
        }
        let beats_minimum = self
            .entries
            .first()
            .is_some_and(|min| candidate.score > min.score);
        if beats_minimum {
            self.entries.remove(0);
            self.insert_sorted(candidate);
        }
        beats_minimum
    }

    /// Recomputes every score with `score` and restores the ordering.
    pub fn rescore(&mut self, mut score: impl FnMut(&Bid) -> f64) {
        for entry in &mut self.entries {
            entry.score = score(&entry.bid);
        }
        self.entries.sort_by(|a, b| a.score.total_cmp(&b.score));
    }

    /// Highest-scored candidate.
    #[must_use]
    pub fn best(&self) -> Option<&CandidateBid> {
        self.entries.last()
    }

    /// Lowest-scored candidate.
    #[must_use]
    pub fn worst(&self) -> Option<&CandidateBid> {
        self.entries.first()
    }

    /// The `m` highest-scored candidates, ascending.
    #[must_use]
    pub fn top(&self, m: usize) -> &[CandidateBid] {
        &self.entries[self.entries.len().saturating_sub(m)..]
    }

    /// All candidates, ascending by score.
    pub fn iter(&self) -> impl Iterator<Item = &CandidateBid> + '_ {
        self.entries.iter()
    }

    /// Number of candidates held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the pool holds no candidate.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True once the pool has reached capacity.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Maximum number of candidates.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    fn insert_sorted(&mut self, candidate: CandidateBid) {
        let at = self
            .entries
            .partition_point(|e| e.score.total_cmp(&candidate.score).is_le());
        self.entries.insert(at, candidate);
    }
}
