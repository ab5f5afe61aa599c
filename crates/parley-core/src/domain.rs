//! Negotiation domain: issues and their discrete value sets.
//!
//! A [`Domain`] is supplied by the host once per session and treated as
//! immutable afterwards.

use std::collections::HashSet;
use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::bid::Bid;
use crate::error::CoreError;

/// Identifier of a negotiable issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueId(u32);

impl IssueId {
    /// Creates an issue identifier from its number.
    #[must_use]
    pub const fn new(number: u32) -> Self {
        Self(number)
    }

    /// Returns the issue number.
    #[must_use]
    pub const fn number(self) -> u32 {
        self.0
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for IssueId {
    fn from(number: u32) -> Self {
        Self(number)
    }
}

/// A discrete value an issue can take.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Value(String);

impl Value {
    /// Creates a value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the value as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A negotiable dimension of a deal with a finite, unordered value set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue identifier.
    pub id: IssueId,
    /// Human-readable issue name.
    pub name: String,
    /// Values the issue can take.
    pub values: Vec<Value>,
}

impl Issue {
    /// Creates the issue numbered `number`.
    #[must_use]
    pub fn new<V: Into<Value>>(
        number: u32,
        name: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self {
            id: IssueId::new(number),
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if `value` belongs to this issue's value set.
    #[must_use]
    pub fn contains(&self, value: &Value) -> bool {
        self.values.contains(value)
    }
}

/// The ordered list of issues negotiated in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    issues: Vec<Issue>,
}

impl Domain {
    /// Creates a domain, validating its shape.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidDomain`] if there are no issues, an issue id
    /// repeats, or an issue has an empty or duplicated value set.
    pub fn new(issues: Vec<Issue>) -> Result<Self, CoreError> {
        if issues.is_empty() {
            return Err(CoreError::InvalidDomain("domain has no issues".into()));
        }

        let mut seen = HashSet::new();
        for issue in &issues {
            if !seen.insert(issue.id) {
                return Err(CoreError::InvalidDomain(format!(
                    "duplicate issue id {}",
                    issue.id
                )));
            }
            if issue.values.is_empty() {
                return Err(CoreError::InvalidDomain(format!(
                    "issue {} has no values",
                    issue.id
                )));
            }
            let distinct: HashSet<&Value> = issue.values.iter().collect();
            if distinct.len() != issue.values.len() {
                return Err(CoreError::InvalidDomain(format!(
                    "issue {} has duplicate values",
                    issue.id
                )));
            }
        }

        Ok(Self { issues })
    }

    /// Returns the issues in declaration order.
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Looks up an issue by id.
    #[must_use]
    pub fn issue(&self, id: IssueId) -> Option<&Issue> {
        self.issues.iter().find(|i| i.id == id)
    }

    /// Returns the issue ids in declaration order.
    pub fn issue_ids(&self) -> impl Iterator<Item = IssueId> + '_ {
        self.issues.iter().map(|i| i.id)
    }

    /// Number of issues.
    #[must_use]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Always false for a validated domain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Number of distinct bids in the outcome space (saturating).
    #[must_use]
    pub fn outcome_count(&self) -> u64 {
        self.issues
            .iter()
            .fold(1u64, |acc, i| acc.saturating_mul(i.values.len() as u64))
    }

    /// Returns true if `bid` assigns a legal value to every issue and nothing else.
    #[must_use]
    pub fn admits(&self, bid: &Bid) -> bool {
        bid.len() == self.issues.len()
            && self
                .issues
                .iter()
                .all(|i| bid.value(i.id).is_some_and(|v| i.contains(v)))
    }

    /// Draws a uniformly random bid.
    pub fn random_bid<R: Rng + ?Sized>(&self, rng: &mut R) -> Bid {
        Bid::from_values(self.issues.iter().filter_map(|issue| {
            issue
                .values
                .choose(&mut *rng)
                .map(|value| (issue.id, value.clone()))
        }))
    }

    /// Enumerates every bid of the outcome space.
    ///
    /// The result has [`Domain::outcome_count`] entries; callers are expected
    /// to use this only on domains small enough to enumerate.
    #[must_use]
    pub fn all_bids(&self) -> Vec<Bid> {
        let mut partial: Vec<Vec<(IssueId, Value)>> = vec![Vec::new()];
        for issue in &self.issues {
            let mut next = Vec::with_capacity(partial.len() * issue.values.len());
            for prefix in &partial {
                for value in &issue.values {
                    let mut assignment = prefix.clone();
                    assignment.push((issue.id, value.clone()));
                    next.push(assignment);
                }
            }
            partial = next;
        }
        partial.into_iter().map(Bid::from_values).collect()
    }
}
