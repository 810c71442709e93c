//! Conversions between the simulation's 1-based numbering and 0-based positions.
//!
//! Each boundary has exactly one function here. Nothing else in the crate
//! adds or subtracts an index offset.

use crate::model::RunId;

/// Slot of `run` in the per-run reference array: `run_id - 1`.
///
/// `None` for run id 0, which has no slot.
pub fn run_slot(run: RunId) -> Option<usize> {
    (run.0 as usize).checked_sub(1)
}

/// Location-axis index for the code found at `position` in the location list.
///
/// The tensor index is `position - 1`. Position 0 maps to the last index
/// (`locations - 1`), the way a negative index wraps around. `None` only when
/// the axis is empty.
pub fn location_axis_index(position: usize, locations: usize) -> Option<usize> {
    match position.checked_sub(1) {
        Some(index) => Some(index),
        None => locations.checked_sub(1),
    }
}
