//! Run enumeration: how many runs exist and which of them carry data

use serde::{Deserialize, Serialize};

use super::{PolicyValue, RunId};
use crate::error::PolicyAxis;

/// Number of enumerated values per sweep axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunCounts {
    pub scenarios: u32,
    pub school_policies: u32,
    pub social_distancing_policies: u32,
    pub stochastic_iterations: u32,
    /// Whether the simulation repeated runs over stochastic iterations
    pub stochastic: bool,
}

/// Policy values that actually have populated data, per axis, in file order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FocusSelection {
    pub scenarios: Vec<PolicyValue>,
    pub school_policies: Vec<PolicyValue>,
    pub social_distancing_policies: Vec<PolicyValue>,
}

impl FocusSelection {
    pub fn values(&self, axis: PolicyAxis) -> &[PolicyValue] {
        match axis {
            PolicyAxis::Scenario => &self.scenarios,
            PolicyAxis::School => &self.school_policies,
            PolicyAxis::SocialDistancing => &self.social_distancing_policies,
        }
    }

    pub fn contains(&self, axis: PolicyAxis, value: PolicyValue) -> bool {
        self.values(axis).contains(&value)
    }

    /// A row is in focus when each of its three policy values is in its axis' set.
    pub fn admits(&self, row: &CaseRow) -> bool {
        self.contains(PolicyAxis::Scenario, row.scenario)
            && self.contains(PolicyAxis::School, row.school_policy)
            && self.contains(PolicyAxis::SocialDistancing, row.social_distancing_policy)
    }
}

/// One enumerated run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRow {
    pub run_id: RunId,
    pub scenario: PolicyValue,
    pub school_policy: PolicyValue,
    pub social_distancing_policy: PolicyValue,
    pub stochastic_iteration: i64,
}

impl CaseRow {
    pub fn matches(
        &self,
        scenario: PolicyValue,
        school_policy: PolicyValue,
        social_distancing_policy: PolicyValue,
    ) -> bool {
        self.scenario == scenario
            && self.school_policy == school_policy
            && self.social_distancing_policy == social_distancing_policy
    }
}
