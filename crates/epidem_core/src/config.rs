//! Index configuration
//!
//! Nothing here changes which keys are read or how values are resolved; the
//! options cover load strictness and how result columns are labelled.

use serde::{Deserialize, Serialize};

/// Prefixes used to label result columns (`outcome3`, `age_group2`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLabels {
    pub outcome_prefix: String,
    pub age_group_prefix: String,
}

impl Default for ColumnLabels {
    fn default() -> Self {
        Self {
            outcome_prefix: "outcome".to_string(),
            age_group_prefix: "age_group".to_string(),
        }
    }
}

impl ColumnLabels {
    pub fn outcome(&self, outcome: usize) -> String {
        format!("{}{outcome}", self.outcome_prefix)
    }

    pub fn age_group(&self, age_group: usize) -> String {
        format!("{}{age_group}", self.age_group_prefix)
    }
}

/// Options for building a [`SweepIndex`](crate::index::SweepIndex)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Reject files whose runs disagree on the number of outcomes.
    ///
    /// Off by default: the outcome count is taken from the last focus run and
    /// a disagreement is only logged.
    pub strict_outcome_counts: bool,

    pub labels: ColumnLabels,
}

impl IndexConfig {
    /// A config that fails the load on outcome-count disagreement
    #[must_use]
    pub fn strict() -> Self {
        Self {
            strict_outcome_counts: true,
            ..Self::default()
        }
    }
}
