use std::fmt;

use crate::model::{LocationCode, PolicyValue, RunId};

/// Failures raised by a [`Container`](crate::container::Container) backend.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("entry '{0}' not found")]
    NotFound(String),

    #[error("entry '{0}' is not a numeric array")]
    NotAnArray(String),

    #[error("entry '{0}' does not hold references")]
    NotReferences(String),

    #[error("reference {0} does not resolve to an array")]
    DanglingReference(String),

    #[error("container backend error: {0}")]
    Backend(String),
}

#[cfg(feature = "hdf5")]
impl From<hdf5::Error> for ContainerError {
    fn from(err: hdf5::Error) -> Self {
        ContainerError::Backend(err.to_string())
    }
}

/// Fatal errors while building a [`SweepIndex`](crate::index::SweepIndex).
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("required key '{0}' is missing from the container")]
    MissingKey(&'static str),

    #[error("key '{key}' should be a {expected}")]
    WrongEntryKind {
        key: &'static str,
        expected: &'static str,
    },

    #[error("case table '{key}' has shape {shape:?}, expected 5 rows")]
    CaseTableLayout {
        key: &'static str,
        shape: Vec<usize>,
    },

    /// Non-finite, or out of range for the count or id it holds. Fractional
    /// values are truncated rather than rejected.
    #[error("key '{key}' holds {value}, which is not a usable integer")]
    NotAnInteger { key: &'static str, value: f64 },

    #[error("outcome arrays have rank {0}, expected 4 (risk, age, location, time)")]
    TensorRank(usize),

    #[error("run {run} has {found} outcomes, expected {expected}")]
    OutcomeCountMismatch {
        run: RunId,
        expected: usize,
        found: usize,
    },

    #[error("no container was given to the index builder")]
    NoContainer,

    #[error(transparent)]
    Container(#[from] ContainerError),
}

/// The three policy axes a run is addressed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyAxis {
    Scenario,
    School,
    SocialDistancing,
}

impl fmt::Display for PolicyAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyAxis::Scenario => write!(f, "scenario"),
            PolicyAxis::School => write!(f, "school policy"),
            PolicyAxis::SocialDistancing => write!(f, "social distancing policy"),
        }
    }
}

/// Axes of an outcome tensor, plus the outcome list itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorAxis {
    Outcome,
    Risk,
    AgeGroup,
    Location,
}

impl fmt::Display for TensorAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TensorAxis::Outcome => write!(f, "outcome"),
            TensorAxis::Risk => write!(f, "risk"),
            TensorAxis::AgeGroup => write!(f, "age group"),
            TensorAxis::Location => write!(f, "location"),
        }
    }
}

/// Errors from a single query. A failed query returns nothing partial.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("{axis} {value} is not one of the populated focus values")]
    NotInFocus { axis: PolicyAxis, value: PolicyValue },

    #[error("location code {0} is not in the location list")]
    UnknownLocation(LocationCode),

    #[error("no run matches scenario {scenario}, school {school}, social distancing {sodi}")]
    NoMatchingRun {
        scenario: PolicyValue,
        school: PolicyValue,
        sodi: PolicyValue,
    },

    #[error("run {0} has no outcome data")]
    UnknownRun(RunId),

    #[error("{axis} index {index} is out of range (len {len})")]
    IndexOutOfRange {
        axis: TensorAxis,
        index: usize,
        len: usize,
    },

    #[error("outcome array has rank {0}, expected 4 (risk, age, location, time)")]
    TensorRank(usize),

    #[error(transparent)]
    Container(#[from] ContainerError),
}

pub type LoadResult<T> = std::result::Result<T, LoadError>;
pub type QueryResult<T> = std::result::Result<T, QueryError>;
