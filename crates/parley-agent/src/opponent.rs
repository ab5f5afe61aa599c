//! Frequency-based opponent preference modelling.
//!
//! An [`OpponentModel`] watches the bids one counterpart makes and estimates
//! two things from them:
//!
//! - **Preferences**: per-issue weights and per-value utilities. A value the
//!   opponent keeps offering is assumed to be one it likes; an issue whose
//!   offered values stay concentrated is assumed to matter more to it.
//! - **Rigidity**: how rarely the opponent changed any issue's value over a
//!   trailing window of offers. A rigid ("hard-headed") opponent is not
//!   conceding, which the concession schedule reacts to.
//!
//! Estimates are recomputed from the full history after every offer.

use std::collections::{BTreeMap, HashMap};

use parley_core::{Bid, IssueId, PartyId, Value};

use crate::error::{AgentError, Result};

/// Opponent models keyed by the counterpart's identity.
pub type OpponentTable = BTreeMap<PartyId, OpponentModel>;

/// Estimated preference profile of one opponent.
#[derive(Debug, Clone, PartialEq)]
pub struct OpponentModel {
    issue_ids: Vec<IssueId>,
    history: Vec<Bid>,
    issue_weights: Vec<f64>,
    value_utilities: Vec<HashMap<Value, f64>>,
    own_utility_history: Vec<f64>,
}

impl OpponentModel {
    /// Creates an empty model whose issue set is taken from `reference`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::EmptyReferenceBid`] if `reference` assigns no issue.
    pub fn new(reference: &Bid) -> Result<Self> {
        if reference.is_empty() {
            return Err(AgentError::EmptyReferenceBid);
        }
        let issue_ids: Vec<IssueId> = reference.issue_ids().collect();
        let issues = issue_ids.len();
        Ok(Self {
            issue_ids,
            history: Vec::new(),
            issue_weights: uniform(issues),
            value_utilities: vec![HashMap::new(); issues],
            own_utility_history: Vec::new(),
        })
    }

    /// Appends an offer to the history and re-estimates the profile.
    pub fn record_offer(&mut self, bid: Bid) {
        self.history.push(bid);
        self.reestimate();
    }

    /// Records the agent's own utility for an offer from this opponent.
    pub fn record_own_utility(&mut self, utility: f64) {
        self.own_utility_history.push(utility);
    }

    /// Estimated opponent utility of `bid`, in [0, 1].
    ///
    /// Values never observed from this opponent contribute nothing.
    #[must_use]
    pub fn estimate_utility(&self, bid: &Bid) -> f64 {
        self.issue_ids
            .iter()
            .zip(&self.issue_weights)
            .zip(&self.value_utilities)
            .map(|((issue, weight), utilities)| {
                bid.value(*issue)
                    .and_then(|value| utilities.get(value))
                    .map_or(0.0, |u| weight * u)
            })
            .sum()
    }

    /// Rigidity over the last `window` offers, in [0, 1].
    ///
    /// 1.0 means no issue changed value between consecutive offers in the
    /// window; 0.0 means every issue changed between every pair. Returns `None`
    /// while fewer than `window` offers have been seen.
    #[must_use]
    pub fn rigidity(&self, window: usize) -> Option<f64> {
        if self.history.len() < window {
            return None;
        }
        let transitions = window.saturating_sub(1);
        if transitions == 0 {
            return Some(1.0);
        }
        let recent = &self.history[self.history.len() - window..];
        let changes: usize = change_counts(recent, &self.issue_ids).iter().sum();
        Some(1.0 - changes as f64 / (self.issue_ids.len() * transitions) as f64)
    }

    /// Number of value changes between consecutive offers, per issue, over the
    /// whole history. Ordered like [`OpponentModel::issue_ids`].
    #[must_use]
    pub fn issue_change_counts(&self) -> Vec<usize> {
        change_counts(&self.history, &self.issue_ids)
    }

    /// Estimated weight of `issue`, or `None` for an issue outside the model.
    #[must_use]
    pub fn issue_weight(&self, issue: IssueId) -> Option<f64> {
        self.position(issue).map(|i| self.issue_weights[i])
    }

    /// Estimated utility of `value` for `issue`; `None` if never observed.
    #[must_use]
    pub fn value_utility(&self, issue: IssueId, value: &Value) -> Option<f64> {
        self.position(issue)
            .and_then(|i| self.value_utilities[i].get(value).copied())
    }

    /// Issues tracked by this model, in reference-bid order.
    #[must_use]
    pub fn issue_ids(&self) -> &[IssueId] {
        &self.issue_ids
    }

    /// Offers received from this opponent, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Bid] {
        &self.history
    }

    /// Number of offers received.
    #[must_use]
    pub fn rounds(&self) -> usize {
        self.history.len()
    }

    /// Own utility of each offer received from this opponent, oldest first.
    #[must_use]
    pub fn own_utility_history(&self) -> &[f64] {
        &self.own_utility_history
    }

    fn position(&self, issue: IssueId) -> Option<usize> {
        self.issue_ids.iter().position(|id| *id == issue)
    }

    fn reestimate(&mut self) {
        let rounds = self.history.len();
        let issues = self.issue_ids.len();
        if rounds == 0 {
            self.issue_weights = uniform(issues);
            self.value_utilities = vec![HashMap::new(); issues];
            return;
        }

        let mut raw_weights = Vec::with_capacity(issues);
        let mut value_utilities: Vec<HashMap<Value, f64>> = Vec::with_capacity(issues);
        for issue in &self.issue_ids {
            let counts = value_counts(&self.history, *issue);
            let max = counts.values().copied().max().unwrap_or(0);

            value_utilities.push(if max == 0 {
                HashMap::new()
            } else {
                counts
                    .iter()
                    .map(|(value, count)| ((*value).clone(), *count as f64 / max as f64))
                    .collect()
            });

            // Σ (frequency)^2 is larger when the offered values are concentrated.
            raw_weights.push(
                counts
                    .values()
                    .map(|count| {
                        let frequency = *count as f64 / rounds as f64;
                        frequency * frequency
                    })
                    .sum::<f64>(),
            );
        }

        let total: f64 = raw_weights.iter().sum();
        self.issue_weights = if total > 0.0 && total.is_finite() {
            raw_weights.iter().map(|w| w / total).collect()
        } else {
            uniform(issues)
        };
        self.value_utilities = value_utilities;
    }
}

fn uniform(issues: usize) -> Vec<f64> {
    if issues == 0 {
        return Vec::new();
    }
    vec![1.0 / issues as f64; issues]
}

fn value_counts(history: &[Bid], issue: IssueId) -> BTreeMap<&Value, usize> {
    let mut counts = BTreeMap::new();
    for value in history.iter().filter_map(|bid| bid.value(issue)) {
        *counts.entry(value).or_insert(0) += 1;
    }
    counts
}

fn change_counts(bids: &[Bid], issue_ids: &[IssueId]) -> Vec<usize> {
    issue_ids
        .iter()
        .map(|issue| {
            bids.windows(2)
                .filter(|pair| pair[0].value(*issue) != pair[1].value(*issue))
                .count()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bid(values: &[&str]) -> Bid {
        Bid::from_values(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| (IssueId::new(i as u32 + 1), Value::from(*v))),
        )
    }

    fn model_with<S: AsRef<[&'static str]>>(history: &[S]) -> OpponentModel {
        let mut model = OpponentModel::new(&bid(history[0].as_ref())).unwrap();
        for offer in history {
            model.record_offer(bid(offer.as_ref()));
        }
        model
    }

    fn issue(n: u32) -> IssueId {
        IssueId::new(n)
    }

    // ==========================================================================
    // Construction
    // ==========================================================================

    #[test]
    fn new_rejects_empty_reference() {
        let empty = Bid::from_values(std::iter::empty());
        assert_eq!(OpponentModel::new(&empty), Err(AgentError::EmptyReferenceBid));
    }

    #[test]
    fn new_model_has_uniform_weights_and_no_history() {
        let model = OpponentModel::new(&bid(&["a", "b", "c", "d"])).unwrap();
        assert_eq!(model.rounds(), 0);
        assert_eq!(model.issue_ids().len(), 4);
        for n in 1..=4 {
            assert!((model.issue_weight(issue(n)).unwrap() - 0.25).abs() < 1e-12);
        }
        assert!(model.estimate_utility(&bid(&["a", "b", "c", "d"])).abs() < f64::EPSILON);
    }

    // ==========================================================================
    // Frequency estimation
    // ==========================================================================

    #[test]
    fn single_offer_is_fully_liked() {
        let model = model_with(&[&["chips", "beer"]]);
        assert!((model.value_utility(issue(1), &"chips".into()).unwrap() - 1.0).abs() < 1e-12);
        assert!((model.issue_weight(issue(1)).unwrap() - 0.5).abs() < 1e-12);
        assert!((model.estimate_utility(&bid(&["chips", "beer"])) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn concentrated_issue_gets_more_weight() {
        // Issue 1 never moves, issue 2 alternates.
        let model = model_with(&[
            &["x", "a"],
            &["x", "b"],
            &["x", "a"],
            &["x", "b"],
        ]);
        // raw weights: 1.0 and 0.5^2 + 0.5^2 = 0.5
        assert!((model.issue_weight(issue(1)).unwrap() - 2.0 / 3.0).abs() < 1e-12);
        assert!((model.issue_weight(issue(2)).unwrap() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn value_utility_is_count_over_max_count() {
        let model = model_with(&[&["a"], &["a"], &["a"], &["b"]]);
        assert!((model.value_utility(issue(1), &"a".into()).unwrap() - 1.0).abs() < 1e-12);
        assert!((model.value_utility(issue(1), &"b".into()).unwrap() - 1.0 / 3.0).abs() < 1e-12);
        assert!(model.value_utility(issue(1), &"c".into()).is_none());
    }

    #[test]
    fn unseen_value_contributes_nothing() {
        let model = model_with(&[&["x", "a"], &["x", "a"]]);
        let estimate = model.estimate_utility(&bid(&["x", "never"]));
        assert!((estimate - model.issue_weight(issue(1)).unwrap()).abs() < 1e-12);
    }

    #[test]
    fn estimates_are_recomputed_from_whole_history() {
        let mut model = model_with(&[&["a"], &["a"]]);
        assert!((model.value_utility(issue(1), &"a".into()).unwrap() - 1.0).abs() < 1e-12);
        for _ in 0..3 {
            model.record_offer(bid(&["b"]));
        }
        assert!((model.value_utility(issue(1), &"b".into()).unwrap() - 1.0).abs() < 1e-12);
        assert!((model.value_utility(issue(1), &"a".into()).unwrap() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn own_utility_history_is_append_only() {
        let mut model = OpponentModel::new(&bid(&["a"])).unwrap();
        model.record_own_utility(0.4);
        model.record_own_utility(0.6);
        assert_eq!(model.own_utility_history(), &[0.4, 0.6]);
    }

    // ==========================================================================
    // Rigidity
    // ==========================================================================

    #[test]
    fn rigidity_undefined_with_short_history() {
        let model = model_with(&[&["a", "b"]; 9]);
        assert!(model.rigidity(10).is_none());
    }

    #[test]
    fn repeated_offer_is_fully_rigid() {
        let model = model_with(&[&["a", "b", "c"]; 10]);
        assert_eq!(model.rigidity(10), Some(1.0));
    }

    #[test]
    fn alternating_offers_are_fully_conceding() {
        let history: Vec<&[&str]> = (0..10)
            .map(|i| if i % 2 == 0 { &["a", "x"][..] } else { &["b", "y"][..] })
            .collect();
        let model = model_with(&history);
        assert_eq!(model.rigidity(10), Some(0.0));
    }

    #[test]
    fn rigidity_counts_only_trailing_window() {
        // Early churn followed by five identical offers.
        let mut history: Vec<&[&str]> = vec![&["a"][..], &["b"][..], &["c"][..], &["d"][..]];
        history.extend(std::iter::repeat_n(&["e"][..], 5));
        let model = model_with(&history);
        assert_eq!(model.rigidity(5), Some(1.0));
        assert!(model.rigidity(9).unwrap() < 1.0);
    }

    #[test]
    fn rigidity_with_one_moving_issue() {
        let history: Vec<&[&str]> = (0..4)
            .map(|i| if i % 2 == 0 { &["k", "a"][..] } else { &["k", "b"][..] })
            .collect();
        let model = model_with(&history);
        assert_eq!(model.rigidity(4), Some(0.5));
    }

    #[test]
    fn single_offer_window_is_rigid() {
        let model = model_with(&[&["a"]]);
        assert_eq!(model.rigidity(1), Some(1.0));
        assert_eq!(model.rigidity(0), Some(1.0));
    }

    #[test]
    fn issue_change_counts_cover_whole_history() {
        let model = model_with(&[&["a", "x"], &["b", "x"], &["a", "y"], &["a", "y"]]);
        assert_eq!(model.issue_change_counts(), vec![2, 1]);
    }

    // ==========================================================================
    // Property-based tests
    // ==========================================================================

    const VALUES: [&str; 3] = ["v0", "v1", "v2"];

    fn arb_history() -> impl Strategy<Value = Vec<Bid>> {
        prop::collection::vec(prop::collection::vec(0usize..3, 3), 1..30).prop_map(|rows| {
            rows.iter()
                .map(|row| {
                    let values: Vec<&str> = row.iter().map(|i| VALUES[*i]).collect();
                    bid(&values)
                })
                .collect()
        })
    }

    fn arb_bid() -> impl Strategy<Value = Bid> {
        prop::collection::vec(0usize..3, 3).prop_map(|row| {
            let values: Vec<&str> = row.iter().map(|i| VALUES[*i]).collect();
            bid(&values)
        })
    }

    fn build(history: &[Bid]) -> OpponentModel {
        let mut model = OpponentModel::new(&history[0]).unwrap();
        for b in history {
            model.record_offer(b.clone());
        }
        model
    }

    proptest! {
        #[test]
        fn issue_weights_sum_to_one(history in arb_history()) {
            let model = build(&history);
            let total: f64 = model
                .issue_ids()
                .iter()
                .filter_map(|id| model.issue_weight(*id))
                .sum();
            prop_assert!((total - 1.0).abs() < 1e-9);
        }

        #[test]
        fn best_observed_value_has_utility_one(history in arb_history()) {
            let model = build(&history);
            for id in model.issue_ids() {
                let max = VALUES
                    .iter()
                    .filter_map(|v| model.value_utility(*id, &Value::from(*v)))
                    .fold(0.0_f64, f64::max);
                prop_assert!((max - 1.0).abs() < 1e-12);
            }
        }

        #[test]
        fn estimate_is_in_unit_interval(history in arb_history(), target in arb_bid()) {
            let model = build(&history);
            let u = model.estimate_utility(&target);
            prop_assert!((0.0..=1.0 + 1e-9).contains(&u));
        }

        #[test]
        fn rigidity_defined_only_with_enough_history(
            history in arb_history(),
            window in 1usize..35,
        ) {
            let model = build(&history);
            match model.rigidity(window) {
                None => prop_assert!(history.len() < window),
                Some(r) => {
                    prop_assert!(history.len() >= window);
                    prop_assert!((0.0..=1.0).contains(&r));
                }
            }
        }
    }
}
