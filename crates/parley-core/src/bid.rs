//! Bids: one concrete value assignment per issue.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{IssueId, Value};

/// An immutable mapping from issue id to the value chosen for that issue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bid {
    values: BTreeMap<IssueId, Value>,
}

impl Bid {
    /// Builds a bid from `(issue, value)` pairs. Later pairs win on repeated issues.
    #[must_use]
    pub fn from_values(values: impl IntoIterator<Item = (IssueId, Value)>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// Value assigned to `issue`, if any.
    #[must_use]
    pub fn value(&self, issue: IssueId) -> Option<&Value> {
        self.values.get(&issue)
    }

    /// Issue ids covered by this bid, ascending.
    pub fn issue_ids(&self) -> impl Iterator<Item = IssueId> + '_ {
        self.values.keys().copied()
    }

    /// Iterates `(issue, value)` pairs, ascending by issue id.
    pub fn iter(&self) -> impl Iterator<Item = (IssueId, &Value)> + '_ {
        self.values.iter().map(|(id, v)| (*id, v))
    }

    /// Number of issues this bid assigns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the bid assigns no issue at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for Bid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (id, value)) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{id}={value}")?;
        }
        f.write_str("}")
    }
}
