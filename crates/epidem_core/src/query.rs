//! Outcome queries against a [`SweepIndex`].
//!
//! A query names a policy triple, one or more outcomes, a risk class, an
//! age-group selection and a location code. The engine:
//! 1. checks each policy value against its focus set
//! 2. resolves the location code to a tensor index
//! 3. picks the first focus run matching the triple
//! 4. loads each selected outcome tensor and zeroes its NaNs
//! 5. slices at (risk, location), summing over age groups or keeping the
//!    requested ones
//!
//! Tensors are loaded on every call; nothing is cached.

use serde::{Deserialize, Serialize};

use crate::container::Container;
use crate::convention;
use crate::error::{PolicyAxis, QueryError, QueryResult, TensorAxis};
use crate::grid::Grid;
use crate::index::SweepIndex;
use crate::model::{LocationCode, PolicyValue, RunId, TensorShape};
use crate::table::{Column, ColumnKey, OutcomeTable};

/// Position of the time axis in an outcome tensor
const TIME_AXIS: usize = 3;

/// One index or an ordered list of indices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    Single(usize),
    Many(Vec<usize>),
}

impl Selection {
    pub fn indices(&self) -> &[usize] {
        match self {
            Selection::Single(index) => std::slice::from_ref(index),
            Selection::Many(indices) => indices,
        }
    }
}

impl From<usize> for Selection {
    fn from(index: usize) -> Self {
        Selection::Single(index)
    }
}

impl From<Vec<usize>> for Selection {
    fn from(indices: Vec<usize>) -> Self {
        Selection::Many(indices)
    }
}

impl From<&[usize]> for Selection {
    fn from(indices: &[usize]) -> Self {
        Selection::Many(indices.to_vec())
    }
}

/// A point on the three policy axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub scenario: PolicyValue,
    pub school_policy: PolicyValue,
    pub social_distancing_policy: PolicyValue,
}

impl Policy {
    pub fn new(
        scenario: PolicyValue,
        school_policy: PolicyValue,
        social_distancing_policy: PolicyValue,
    ) -> Self {
        Self {
            scenario,
            school_policy,
            social_distancing_policy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeQuery {
    pub outcomes: Selection,
    pub policy: Policy,
    pub risk: usize,
    /// `None` sums over all age groups
    pub ages: Option<Selection>,
    pub location: LocationCode,
}

impl OutcomeQuery {
    /// Risk class 0, all age groups summed
    pub fn new(outcomes: Selection, policy: Policy, location: LocationCode) -> Self {
        Self {
            outcomes,
            policy,
            risk: 0,
            ages: None,
            location,
        }
    }

    pub fn single(outcome: usize, policy: Policy, location: LocationCode) -> Self {
        Self::new(Selection::Single(outcome), policy, location)
    }

    pub fn many(outcomes: Vec<usize>, policy: Policy, location: LocationCode) -> Self {
        Self::new(Selection::Many(outcomes), policy, location)
    }

    #[must_use]
    pub fn risk(mut self, risk: usize) -> Self {
        self.risk = risk;
        self
    }

    #[must_use]
    pub fn age(mut self, age: usize) -> Self {
        self.ages = Some(Selection::Single(age));
        self
    }

    #[must_use]
    pub fn ages(mut self, ages: Vec<usize>) -> Self {
        self.ages = Some(Selection::Many(ages));
        self
    }

    /// Sum over all age groups
    #[must_use]
    pub fn all_ages(mut self) -> Self {
        self.ages = None;
        self
    }
}

impl<C: Container> SweepIndex<C> {
    /// Run an outcome query.
    ///
    /// When several focus runs share the policy triple (stochastic
    /// iterations), the first one in file order answers. Use
    /// [`SweepIndex::matching_runs`] and [`SweepIndex::outcome_for_run`] to
    /// pick another.
    pub fn get_outcome(&self, query: &OutcomeQuery) -> QueryResult<OutcomeTable> {
        self.validate_policy(&query.policy)?;
        let location = self.location_axis(query.location)?;

        let policy = &query.policy;
        let run = self
            .matching_runs(
                policy.scenario,
                policy.school_policy,
                policy.social_distancing_policy,
            )
            .next()
            .map(|row| row.run_id)
            .ok_or(QueryError::NoMatchingRun {
                scenario: policy.scenario,
                school: policy.school_policy,
                sodi: policy.social_distancing_policy,
            })?;

        tracing::debug!(%run, ?query, "resolved outcome query");
        self.assemble(run, query, location)
    }

    /// Run an outcome query against an explicit run. `query.policy` is not consulted.
    pub fn outcome_for_run(&self, run: RunId, query: &OutcomeQuery) -> QueryResult<OutcomeTable> {
        let location = self.location_axis(query.location)?;
        self.assemble(run, query, location)
    }

    fn validate_policy(&self, policy: &Policy) -> QueryResult<()> {
        let checks = [
            (PolicyAxis::Scenario, policy.scenario),
            (PolicyAxis::School, policy.school_policy),
            (PolicyAxis::SocialDistancing, policy.social_distancing_policy),
        ];
        for (axis, value) in checks {
            if !self.focus().contains(axis, value) {
                return Err(QueryError::NotInFocus { axis, value });
            }
        }
        Ok(())
    }

    fn location_axis(&self, code: LocationCode) -> QueryResult<usize> {
        let position = self
            .location_position(code)
            .ok_or(QueryError::UnknownLocation(code))?;
        let len = self.number_of_locations();
        convention::location_axis_index(position, len).ok_or(QueryError::IndexOutOfRange {
            axis: TensorAxis::Location,
            index: position,
            len,
        })
    }

    fn assemble(
        &self,
        run: RunId,
        query: &OutcomeQuery,
        location: usize,
    ) -> QueryResult<OutcomeTable> {
        let handles = self
            .outcome_locations
            .get(&run)
            .ok_or(QueryError::UnknownRun(run))?;

        let mut columns = Vec::new();
        // Stays 0 only when no outcome is selected
        let mut rows = 0;
        for &outcome in query.outcomes.indices() {
            let handle = handles.get(outcome).ok_or(QueryError::IndexOutOfRange {
                axis: TensorAxis::Outcome,
                index: outcome,
                len: handles.len(),
            })?;

            let mut tensor = self.container.load(handle)?;
            let replaced = tensor.sanitize_nan();
            if replaced > 0 {
                tracing::debug!(%run, outcome, replaced, "replaced NaN values with zero");
            }

            rows = self.outcome_columns(
                &mut columns,
                outcome,
                &tensor,
                query.risk,
                query.ages.as_ref(),
                location,
            )?;
        }
        Ok(OutcomeTable::from_columns(rows, columns))
    }

    /// Push one outcome's columns and return the tensor's time point count.
    fn outcome_columns(
        &self,
        columns: &mut Vec<Column>,
        outcome: usize,
        tensor: &Grid<f64>,
        risk: usize,
        ages: Option<&Selection>,
        location: usize,
    ) -> QueryResult<usize> {
        let shape =
            TensorShape::from_dims(tensor.shape()).ok_or(QueryError::TensorRank(tensor.ndim()))?;
        check_axis(TensorAxis::Risk, risk, shape.risks)?;
        check_axis(TensorAxis::Location, location, shape.locations)?;

        let labels = &self.config.labels;
        match ages {
            None => {
                let mut total = vec![0.0; shape.time_points];
                for age in 0..shape.age_groups {
                    let series = time_series(tensor, &shape, risk, age, location)?;
                    for (sum, value) in total.iter_mut().zip(series) {
                        *sum += value;
                    }
                }
                columns.push(Column {
                    key: ColumnKey {
                        outcome,
                        age_group: None,
                    },
                    outcome_label: labels.outcome(outcome),
                    age_group_label: None,
                    values: total,
                });
            }
            Some(selection) => {
                for &age in selection.indices() {
                    columns.push(Column {
                        key: ColumnKey {
                            outcome,
                            age_group: Some(age),
                        },
                        outcome_label: labels.outcome(outcome),
                        age_group_label: Some(labels.age_group(age)),
                        values: time_series(tensor, &shape, risk, age, location)?,
                    });
                }
            }
        }
        Ok(shape.time_points)
    }
}

fn check_axis(axis: TensorAxis, index: usize, len: usize) -> QueryResult<()> {
    if index < len {
        Ok(())
    } else {
        Err(QueryError::IndexOutOfRange { axis, index, len })
    }
}

/// Values at (risk, age, location) over the full time axis
fn time_series(
    tensor: &Grid<f64>,
    shape: &TensorShape,
    risk: usize,
    age: usize,
    location: usize,
) -> QueryResult<Vec<f64>> {
    check_axis(TensorAxis::AgeGroup, age, shape.age_groups)?;
    tensor
        .slice_1d(TIME_AXIS, &[Some(risk), Some(age), Some(location), None])
        .ok_or(QueryError::TensorRank(tensor.ndim()))
}
