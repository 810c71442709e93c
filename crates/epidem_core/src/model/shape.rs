use serde::{Deserialize, Serialize};

/// Dimensions of every outcome tensor in a file (risk × age × location × time)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TensorShape {
    pub risks: usize,
    pub age_groups: usize,
    pub locations: usize,
    pub time_points: usize,
}

impl TensorShape {
    /// Read the shape from an array's dimensions. `None` unless there are exactly four.
    pub fn from_dims(dims: &[usize]) -> Option<Self> {
        let [risks, age_groups, locations, time_points] = *dims else {
            return None;
        };
        Some(Self {
            risks,
            age_groups,
            locations,
            time_points,
        })
    }
}
