//! Core data types for a loaded parameter sweep
//!
//! This module contains the plain data the index is built from:
//! - `ids` - Run identifiers and policy/location value aliases
//! - `runs` - Run counts, focus selections and the case table
//! - `shape` - Outcome tensor dimensions

mod ids;
mod runs;
mod shape;

pub use ids::*;
pub use runs::*;
pub use shape::*;
