//! The sweep index: everything needed to answer outcome queries.
//!
//! Built in one pass by [`SweepIndex::build`]:
//! 1. metadata (run counts, focus sets, case table)
//! 2. the focus table (case rows whose three policy values are all in focus)
//! 3. run id → per-outcome handles, following two levels of references
//! 4. the outcome tensor shape, read from one resolved array
//! 5. the location code list
//!
//! The result is immutable. Tensors themselves are not read until a query
//! asks for them, so the index keeps the container open.

use rustc_hash::FxHashMap;

use crate::config::IndexConfig;
use crate::container::Container;
use crate::convention;
use crate::error::{ContainerError, LoadError, LoadResult, PolicyAxis};
use crate::keys;
use crate::metadata::{Metadata, extract_metadata};
use crate::model::{
    CaseRow, FocusSelection, LocationCode, PolicyValue, RunCounts, RunId, TensorShape,
};
use crate::summary::SweepSummary;

/// Queryable view over one sweep output file
#[derive(Debug)]
pub struct SweepIndex<C: Container> {
    pub(crate) container: C,
    pub(crate) config: IndexConfig,
    metadata: Metadata,
    focus_table: Vec<CaseRow>,
    pub(crate) outcome_locations: FxHashMap<RunId, Vec<C::Handle>>,
    number_of_outcomes: usize,
    shape: Option<TensorShape>,
    locations: Vec<LocationCode>,
}

/// Per-run outcome handles plus what the pass learned about them
struct ResolvedOutcomes<H> {
    table: FxHashMap<RunId, Vec<H>>,
    number_of_outcomes: usize,
    last_handle: Option<H>,
}

impl<C: Container> SweepIndex<C> {
    /// Start a deferred load; nothing is read until
    /// [`IndexBuilder::parse_metadata`].
    pub fn builder() -> IndexBuilder<C> {
        IndexBuilder::new()
    }

    /// Read all metadata and resolve every focus run's outcome references.
    pub fn build(container: C, config: IndexConfig) -> LoadResult<Self> {
        let metadata = extract_metadata(&container)?;
        metadata.require_dataset(keys::OUTCOMES)?;
        metadata.require_dataset(keys::LOCATIONS)?;

        let focus_table: Vec<CaseRow> = metadata
            .cases
            .iter()
            .filter(|row| metadata.focus.admits(row))
            .copied()
            .collect();
        if focus_table.is_empty() {
            tracing::warn!("no case rows fall inside the focus sets");
        }

        let resolved = resolve_outcomes(&container, &focus_table, config.strict_outcome_counts)?;

        let shape = match &resolved.last_handle {
            Some(handle) => {
                let dims = container.shape(handle)?;
                Some(TensorShape::from_dims(&dims).ok_or(LoadError::TensorRank(dims.len()))?)
            }
            None => None,
        };

        let locations =
            crate::metadata::integers(keys::LOCATIONS, &container.read_array(keys::LOCATIONS)?)?;
        warn_duplicate_locations(&locations);

        tracing::info!(
            runs = metadata.cases.len(),
            focus_runs = focus_table.len(),
            indexed_runs = resolved.table.len(),
            outcomes = resolved.number_of_outcomes,
            shape = ?shape,
            locations = locations.len(),
            "sweep index built"
        );

        Ok(Self {
            container,
            config,
            metadata,
            focus_table,
            outcome_locations: resolved.table,
            number_of_outcomes: resolved.number_of_outcomes,
            shape,
            locations,
        })
    }

    // === Metadata ===

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn run_counts(&self) -> &RunCounts {
        &self.metadata.counts
    }

    pub fn focus(&self) -> &FocusSelection {
        &self.metadata.focus
    }

    /// Number of populated values on one policy axis
    pub fn focus_len(&self, axis: PolicyAxis) -> usize {
        self.metadata.focus.values(axis).len()
    }

    /// Every enumerated run, in file order
    pub fn cases(&self) -> &[CaseRow] {
        &self.metadata.cases
    }

    /// Runs inside the focus sets, in file order
    pub fn focus_table(&self) -> &[CaseRow] {
        &self.focus_table
    }

    /// All focus runs for a policy triple (several when the sweep is stochastic)
    pub fn matching_runs(
        &self,
        scenario: PolicyValue,
        school_policy: PolicyValue,
        social_distancing_policy: PolicyValue,
    ) -> impl Iterator<Item = &CaseRow> {
        self.focus_table
            .iter()
            .filter(move |row| row.matches(scenario, school_policy, social_distancing_policy))
    }

    // === Outcome layout ===

    pub fn number_of_outcomes(&self) -> usize {
        self.number_of_outcomes
    }

    /// Tensor dimensions; `None` when no focus run had outcome data
    pub fn shape(&self) -> Option<TensorShape> {
        self.shape
    }

    pub fn number_of_risks(&self) -> usize {
        self.shape.map_or(0, |s| s.risks)
    }

    pub fn number_of_age_groups(&self) -> usize {
        self.shape.map_or(0, |s| s.age_groups)
    }

    pub fn number_of_locations(&self) -> usize {
        self.shape.map_or(0, |s| s.locations)
    }

    pub fn number_of_time_points(&self) -> usize {
        self.shape.map_or(0, |s| s.time_points)
    }

    /// Location codes in file order
    pub fn location_codes(&self) -> &[LocationCode] {
        &self.locations
    }

    /// Position of `code` in the location list (first occurrence)
    pub fn location_position(&self, code: LocationCode) -> Option<usize> {
        self.locations.iter().position(|&c| c == code)
    }

    /// Outcome handles for a run, in file order
    pub fn outcome_handles(&self, run: RunId) -> Option<&[C::Handle]> {
        self.outcome_locations.get(&run).map(Vec::as_slice)
    }

    // === Misc ===

    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn summary(&self) -> SweepSummary {
        SweepSummary {
            counts: self.metadata.counts,
            focus: self.metadata.focus.clone(),
            total_runs: self.metadata.cases.len(),
            focus_runs: self.focus_table.len(),
            indexed_runs: self.outcome_locations.len(),
            number_of_outcomes: self.number_of_outcomes,
            shape: self.shape,
            locations: self.locations.len(),
            groups: self.metadata.groups().map(str::to_string).collect(),
            datasets: self.metadata.datasets().map(str::to_string).collect(),
        }
    }
}

#[cfg(feature = "hdf5")]
impl SweepIndex<crate::container::Hdf5Container> {
    /// Open a `.mat` file and build its index with default options.
    pub fn open(path: impl AsRef<std::path::Path>) -> LoadResult<Self> {
        Self::open_with_config(path, IndexConfig::default())
    }

    pub fn open_with_config(
        path: impl AsRef<std::path::Path>,
        config: IndexConfig,
    ) -> LoadResult<Self> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "opening sweep file");
        let container = crate::container::Hdf5Container::open(path)?;
        Self::build(container, config)
    }
}

/// Follow `FitnessEs3[run_id - 1]` to each focus run's per-outcome handles.
///
/// A run whose reference is missing or does not resolve is skipped. Backend
/// failures still abort the load.
///
/// `number_of_outcomes` is the count of the last indexed run, even when that
/// count is zero. The shape handle is the last outcome of the last run that
/// has any, so a trailing run with no outcomes leaves it on an earlier run.
fn resolve_outcomes<C: Container>(
    container: &C,
    focus_table: &[CaseRow],
    strict: bool,
) -> LoadResult<ResolvedOutcomes<C::Handle>> {
    let run_refs = container.references(keys::OUTCOMES)?;

    let mut table = FxHashMap::default();
    let mut number_of_outcomes = 0;
    let mut expected: Option<usize> = None;
    let mut last_handle = None;

    for row in focus_table {
        let Some(run_ref) = convention::run_slot(row.run_id).and_then(|slot| run_refs.get(slot))
        else {
            tracing::warn!(run = %row.run_id, "run has no outcome reference, skipping");
            continue;
        };

        let handles = match container.dereference(run_ref) {
            Ok(handles) => handles,
            Err(err @ ContainerError::Backend(_)) => return Err(err.into()),
            Err(err) => {
                tracing::warn!(run = %row.run_id, error = %err, "run reference does not resolve, skipping");
                continue;
            }
        };

        match expected {
            None => expected = Some(handles.len()),
            Some(n) if n != handles.len() => {
                if strict {
                    return Err(LoadError::OutcomeCountMismatch {
                        run: row.run_id,
                        expected: n,
                        found: handles.len(),
                    });
                }
                tracing::warn!(
                    run = %row.run_id,
                    expected = n,
                    found = handles.len(),
                    "run disagrees on the number of outcomes"
                );
            }
            Some(_) => {}
        }

        number_of_outcomes = handles.len();
        if let Some(last) = handles.last() {
            last_handle = Some(last.clone());
        }
        table.insert(row.run_id, handles);
    }

    Ok(ResolvedOutcomes {
        table,
        number_of_outcomes,
        last_handle,
    })
}

fn warn_duplicate_locations(locations: &[LocationCode]) {
    let mut seen = rustc_hash::FxHashSet::default();
    for code in locations {
        if !seen.insert(*code) {
            tracing::warn!(code, "duplicate location code, only the first is addressable");
        }
    }
}

/// Deferred construction of a [`SweepIndex`]
#[derive(Debug)]
pub struct IndexBuilder<C> {
    container: Option<C>,
    config: IndexConfig,
}

impl<C: Container> IndexBuilder<C> {
    pub fn new() -> Self {
        Self {
            container: None,
            config: IndexConfig::default(),
        }
    }

    #[must_use]
    pub fn container(mut self, container: C) -> Self {
        self.container = Some(container);
        self
    }

    #[must_use]
    pub fn config(mut self, config: IndexConfig) -> Self {
        self.config = config;
        self
    }

    /// Read the container and build the index.
    pub fn parse_metadata(self) -> LoadResult<SweepIndex<C>> {
        let container = self.container.ok_or(LoadError::NoContainer)?;
        SweepIndex::build(container, self.config)
    }
}

impl<C: Container> Default for IndexBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}
