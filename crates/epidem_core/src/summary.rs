//! Human- and machine-readable overview of a loaded sweep

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{FocusSelection, RunCounts, TensorShape};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSummary {
    pub counts: RunCounts,
    pub focus: FocusSelection,
    /// Rows in the case table
    pub total_runs: usize,
    /// Rows in the focus table
    pub focus_runs: usize,
    /// Focus runs whose outcome references resolved
    pub indexed_runs: usize,
    pub number_of_outcomes: usize,
    pub shape: Option<TensorShape>,
    pub locations: usize,
    pub groups: Vec<String>,
    pub datasets: Vec<String>,
}

fn join(values: &[i64]) -> String {
    values
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for SweepSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.counts;
        writeln!(
            f,
            "Runs: {} scenarios x {} school x {} social distancing ({} stochastic iterations, stochastic={})",
            c.scenarios,
            c.school_policies,
            c.social_distancing_policies,
            c.stochastic_iterations,
            c.stochastic
        )?;
        writeln!(
            f,
            "Case table: {} runs, {} in focus, {} indexed",
            self.total_runs, self.focus_runs, self.indexed_runs
        )?;
        writeln!(f, "Focus scenarios: [{}]", join(&self.focus.scenarios))?;
        writeln!(f, "Focus school policies: [{}]", join(&self.focus.school_policies))?;
        writeln!(
            f,
            "Focus social distancing: [{}]",
            join(&self.focus.social_distancing_policies)
        )?;
        writeln!(f, "Outcomes: {}", self.number_of_outcomes)?;
        match self.shape {
            Some(s) => writeln!(
                f,
                "Tensor: {} risks x {} age groups x {} locations x {} time points",
                s.risks, s.age_groups, s.locations, s.time_points
            )?,
            None => writeln!(f, "Tensor: unknown (no outcome data in focus)")?,
        }
        writeln!(f, "Location codes: {}", self.locations)?;
        writeln!(f, "Groups: {}", self.groups.join(", "))?;
        write!(f, "Datasets: {}", self.datasets.join(", "))
    }
}
