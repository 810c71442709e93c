//! Query library for epidemiology parameter-sweep output
//!
//! The simulation sweeps three policy axes (scenario, school policy, social
//! distancing policy), optionally repeating each run over stochastic
//! iterations, and saves one outcome tensor per run and outcome
//! (risk class × age group × location × time) in a MATLAB v7.3 `.mat` file.
//! Runs point at their outcomes through two levels of references.
//!
//! This crate:
//! - Reads the sweep metadata (run counts, focus sets, case table)
//! - Builds an index from policy triple to run, and run to outcome arrays
//! - Answers outcome queries as time-indexed tables, either summed over age
//!   groups or broken out per age group
//!
//! # Example
//!
//! ```ignore
//! use epidem_core::{OutcomeQuery, Policy, SweepIndex};
//!
//! let index = SweepIndex::open("sweep.mat")?;
//! let query = OutcomeQuery::single(0, Policy::new(6, 10, 2), 4013)
//!     .risk(0)
//!     .ages(vec![3, 4]);
//! let table = index.get_outcome(&query)?;
//! assert_eq!(table.num_rows(), index.number_of_time_points());
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod config;
pub mod container;
pub mod convention;
pub mod error;
pub mod grid;
pub mod index;
pub mod keys;
pub mod metadata;
pub mod query;
pub mod summary;
pub mod table;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{ColumnLabels, IndexConfig};
#[cfg(feature = "hdf5")]
pub use container::Hdf5Container;
pub use container::{Container, MemoryContainer};
pub use error::{ContainerError, LoadError, QueryError};
pub use index::{IndexBuilder, SweepIndex};
pub use query::{OutcomeQuery, Policy, Selection};
pub use summary::SweepSummary;
pub use table::OutcomeTable;
