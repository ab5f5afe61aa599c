//! Own-utility functions.
//!
//! The engine only needs [`UtilitySpace`]; [`AdditiveUtilitySpace`] is the
//! linear additive profile most negotiation platforms ship with.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::bid::Bid;
use crate::domain::{Domain, IssueId, Value};
use crate::error::CoreError;

/// The agent's own preference profile, supplied by the host.
pub trait UtilitySpace: Send + Sync {
    /// The domain this profile is defined over.
    fn domain(&self) -> &Domain;

    /// Own utility of `bid`, in [0, 1].
    fn utility(&self, bid: &Bid) -> f64;

    /// The bid with the highest own utility.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NoMaxBid`] if the profile cannot determine one.
    fn max_utility_bid(&self) -> Result<Bid, CoreError>;

    /// Relative importance of `issue`, when the profile exposes it.
    fn issue_weight(&self, _issue: IssueId) -> Option<f64> {
        None
    }
}

impl<U: UtilitySpace + ?Sized> UtilitySpace for std::sync::Arc<U> {
    fn domain(&self) -> &Domain {
        (**self).domain()
    }

    fn utility(&self, bid: &Bid) -> f64 {
        (**self).utility(bid)
    }

    fn max_utility_bid(&self) -> Result<Bid, CoreError> {
        (**self).max_utility_bid()
    }

    fn issue_weight(&self, issue: IssueId) -> Option<f64> {
        (**self).issue_weight(issue)
    }
}

/// Linear additive utility: `u(b) = Σ weight[i] * eval[i][b_i]`.
///
/// Weights are normalized to sum to 1 and each issue's evaluations are
/// normalized by that issue's maximum evaluation, so utilities lie in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditiveUtilitySpace {
    domain: Domain,
    weights: BTreeMap<IssueId, f64>,
    evaluations: BTreeMap<IssueId, HashMap<Value, f64>>,
}

impl AdditiveUtilitySpace {
    /// Starts building a profile over `domain`.
    #[must_use]
    pub fn builder(domain: Domain) -> AdditiveUtilitySpaceBuilder {
        AdditiveUtilitySpaceBuilder {
            domain,
            weights: BTreeMap::new(),
            evaluations: BTreeMap::new(),
            error: None,
        }
    }

    /// Normalized evaluation of `value` for `issue`; 0 when unevaluated.
    #[must_use]
    pub fn evaluation(&self, issue: IssueId, value: &Value) -> f64 {
        self.evaluations
            .get(&issue)
            .and_then(|evals| evals.get(value))
            .copied()
            .unwrap_or(0.0)
    }
}

impl UtilitySpace for AdditiveUtilitySpace {
    fn domain(&self) -> &Domain {
        &self.domain
    }

    fn utility(&self, bid: &Bid) -> f64 {
        self.weights
            .iter()
            .map(|(issue, weight)| {
                bid.value(*issue)
                    .map_or(0.0, |value| weight * self.evaluation(*issue, value))
            })
            .sum()
    }

    fn max_utility_bid(&self) -> Result<Bid, CoreError> {
        let mut chosen = Vec::with_capacity(self.domain.len());
        for issue in self.domain.issues() {
            let best = self
                .evaluations
                .get(&issue.id)
                .and_then(|evals| {
                    issue
                        .values
                        .iter()
                        .filter_map(|v| evals.get(v).map(|e| (v, *e)))
                        .max_by(|(_, a), (_, b)| a.total_cmp(b))
                })
                .ok_or_else(|| {
                    CoreError::NoMaxBid(format!("issue {} has no evaluations", issue.id))
                })?;
            chosen.push((issue.id, best.0.clone()));
        }
        Ok(Bid::from_values(chosen))
    }

    fn issue_weight(&self, issue: IssueId) -> Option<f64> {
        self.weights.get(&issue).copied()
    }
}

/// Builder for [`AdditiveUtilitySpace`].
#[derive(Debug, Clone)]
pub struct AdditiveUtilitySpaceBuilder {
    domain: Domain,
    weights: BTreeMap<IssueId, f64>,
    evaluations: BTreeMap<IssueId, HashMap<Value, f64>>,
    error: Option<CoreError>,
}

impl AdditiveUtilitySpaceBuilder {
    /// Sets the raw (unnormalized) weight of the issue numbered `issue`.
    #[must_use]
    pub fn weight(mut self, issue: u32, weight: f64) -> Self {
        let issue = IssueId::new(issue);
        if self.error.is_none() && (!weight.is_finite() || weight < 0.0) {
            self.error = Some(CoreError::InvalidProfile(format!(
                "weight of issue {issue} must be finite and non-negative, got {weight}"
            )));
        }
        self.weights.insert(issue, weight);
        self
    }

    /// Sets the raw (unnormalized) evaluation of one value of the issue numbered `issue`.
    #[must_use]
    pub fn evaluation(mut self, issue: u32, value: impl Into<Value>, evaluation: f64) -> Self {
        let issue = IssueId::new(issue);
        if self.error.is_none() && (!evaluation.is_finite() || evaluation < 0.0) {
            self.error = Some(CoreError::InvalidProfile(format!(
                "evaluation for issue {issue} must be finite and non-negative, got {evaluation}"
            )));
        }
        self.evaluations
            .entry(issue)
            .or_default()
            .insert(value.into(), evaluation);
        self
    }

    /// Validates and normalizes the profile.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidProfile`] for negative or non-finite inputs,
    /// references to unknown issues or values, or an all-zero weight vector.
    pub fn build(self) -> Result<AdditiveUtilitySpace, CoreError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        for issue in self.weights.keys().chain(self.evaluations.keys()) {
            if self.domain.issue(*issue).is_none() {
                return Err(CoreError::InvalidProfile(format!(
                    "issue {issue} is not part of the domain"
                )));
            }
        }
        for (issue, evals) in &self.evaluations {
            let Some(domain_issue) = self.domain.issue(*issue) else {
                continue;
            };
            if let Some(unknown) = evals.keys().find(|v| !domain_issue.contains(v)) {
                return Err(CoreError::InvalidProfile(format!(
                    "value {unknown} is not part of issue {issue}"
                )));
            }
        }

        let total: f64 = self.weights.values().sum();
        if total <= 0.0 {
            return Err(CoreError::InvalidProfile(
                "issue weights sum to zero".into(),
            ));
        }
        let weights = self
            .weights
            .into_iter()
            .map(|(issue, w)| (issue, w / total))
            .collect();

        let evaluations = self
            .evaluations
            .into_iter()
            .map(|(issue, evals)| {
                let max = evals.values().copied().fold(0.0_f64, f64::max);
                let normalized = evals
                    .into_iter()
                    .map(|(v, e)| (v, if max > 0.0 { e / max } else { 0.0 }))
                    .collect();
                (issue, normalized)
            })
            .collect();

        Ok(AdditiveUtilitySpace {
            domain: self.domain,
            weights,
            evaluations,
        })
    }
}
