//! Metadata extraction: run counts, focus sets and the case table.
//!
//! Everything here is read from fixed top-level names (see [`crate::keys`]).
//! A missing key aborts the load; there is no partial-metadata mode.

use serde::{Deserialize, Serialize};

use crate::container::{Container, Entry, EntryKind};
use crate::error::{LoadError, LoadResult};
use crate::grid::Grid;
use crate::keys;
use crate::model::{CaseRow, FocusSelection, RunCounts, RunId};

/// Number of columns in the case table
const CASE_COLUMNS: usize = 5;

/// Everything known about a sweep before any outcome reference is followed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub entries: Vec<Entry>,
    pub counts: RunCounts,
    pub focus: FocusSelection,
    pub cases: Vec<CaseRow>,
}

impl Metadata {
    /// Names of top-level groups
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.entries_of(EntryKind::Group)
    }

    /// Names of top-level datasets
    pub fn datasets(&self) -> impl Iterator<Item = &str> {
        self.entries_of(EntryKind::Dataset)
    }

    fn entries_of(&self, kind: EntryKind) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(move |e| e.kind == kind)
            .map(|e| e.name.as_str())
    }

    /// Fail unless `key` is a top-level dataset.
    pub fn require_dataset(&self, key: &'static str) -> LoadResult<()> {
        require_dataset(&self.entries, key)
    }
}

/// Classify the container's entries and read the fixed metadata arrays.
pub fn extract_metadata<C: Container>(container: &C) -> LoadResult<Metadata> {
    let entries = container.entries()?;
    tracing::debug!(entries = entries.len(), "classified top-level entries");

    let read = |key: &'static str| -> LoadResult<Grid<f64>> {
        require_dataset(&entries, key)?;
        Ok(container.read_array(key)?)
    };

    let counts = RunCounts {
        scenarios: count(keys::SCENARIO_COUNT, &read(keys::SCENARIO_COUNT)?)?,
        school_policies: count(keys::SCHOOL_COUNT, &read(keys::SCHOOL_COUNT)?)?,
        social_distancing_policies: count(
            keys::SOCIAL_DISTANCE_COUNT,
            &read(keys::SOCIAL_DISTANCE_COUNT)?,
        )?,
        stochastic_iterations: count(keys::STOCHASTIC_COUNT, &read(keys::STOCHASTIC_COUNT)?)?,
        stochastic: scalar(keys::STOCHASTIC_FLAG, &read(keys::STOCHASTIC_FLAG)?)? != 0,
    };

    let focus = FocusSelection {
        scenarios: integers(keys::SCENARIO_FOCUS, &read(keys::SCENARIO_FOCUS)?)?,
        school_policies: integers(keys::SCHOOL_FOCUS, &read(keys::SCHOOL_FOCUS)?)?,
        social_distancing_policies: integers(
            keys::SOCIAL_DISTANCE_FOCUS,
            &read(keys::SOCIAL_DISTANCE_FOCUS)?,
        )?,
    };

    let cases = case_table(&read(keys::CASE_TABLE)?)?;

    Ok(Metadata {
        entries,
        counts,
        focus,
        cases,
    })
}

fn require_dataset(entries: &[Entry], key: &'static str) -> LoadResult<()> {
    match entries.iter().find(|e| e.name == key) {
        None => Err(LoadError::MissingKey(key)),
        Some(entry) if entry.kind != EntryKind::Dataset => Err(LoadError::WrongEntryKind {
            key,
            expected: "dataset",
        }),
        Some(_) => Ok(()),
    }
}

/// Truncate a stored double toward zero, as the simulation's integers are
/// written as doubles. Fractional values are accepted and truncated; only
/// NaN and infinities are rejected.
fn to_int(key: &'static str, value: f64) -> LoadResult<i64> {
    if value.is_finite() {
        Ok(value.trunc() as i64)
    } else {
        Err(LoadError::NotAnInteger { key, value })
    }
}

fn scalar(key: &'static str, array: &Grid<f64>) -> LoadResult<i64> {
    let value = array.first().copied().ok_or(LoadError::WrongEntryKind {
        key,
        expected: "scalar",
    })?;
    to_int(key, value)
}

fn count(key: &'static str, array: &Grid<f64>) -> LoadResult<u32> {
    let value = scalar(key, array)?;
    u32::try_from(value).map_err(|_| LoadError::NotAnInteger {
        key,
        value: value as f64,
    })
}

/// Every element of `array` in storage order, as integers.
pub(crate) fn integers(key: &'static str, array: &Grid<f64>) -> LoadResult<Vec<i64>> {
    array.data().iter().map(|&v| to_int(key, v)).collect()
}

/// The stored array is 5×N; its transpose has one row per run.
fn case_table(array: &Grid<f64>) -> LoadResult<Vec<CaseRow>> {
    let key = keys::CASE_TABLE;
    let layout_error = || LoadError::CaseTableLayout {
        key,
        shape: array.shape().to_vec(),
    };
    if array.ndim() != 2 || array.shape()[0] != CASE_COLUMNS {
        return Err(layout_error());
    }
    let rows = array.transpose().ok_or_else(layout_error)?;

    let runs = rows.shape()[0];
    let mut cases = Vec::with_capacity(runs);
    for r in 0..runs {
        let row = rows.row(r).ok_or_else(layout_error)?;
        let [run_id, scenario, school, sodi, iteration] = row else {
            return Err(layout_error());
        };
        let run_id = to_int(key, *run_id)?;
        let run_id = u32::try_from(run_id).map_err(|_| LoadError::NotAnInteger {
            key,
            value: run_id as f64,
        })?;
        cases.push(CaseRow {
            run_id: RunId(run_id),
            scenario: to_int(key, *scenario)?,
            school_policy: to_int(key, *school)?,
            social_distancing_policy: to_int(key, *sodi)?,
            stochastic_iteration: to_int(key, *iteration)?,
        });
    }
    Ok(cases)
}
