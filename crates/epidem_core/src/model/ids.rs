//! Identifiers used to address runs and locations
//!
//! Run ids follow the simulation's 1-based numbering. Converting them to
//! 0-based positions happens only in [`crate::convention`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// A run identifier as written by the simulation (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunId(pub u32);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A value along one of the policy axes (scenario, school, social distancing)
pub type PolicyValue = i64;

/// A location code as listed in the file
pub type LocationCode = i64;
