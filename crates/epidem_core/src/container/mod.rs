//! Access to the hierarchical container a sweep is stored in.
//!
//! The index only ever talks to a [`Container`]. The file format itself is
//! handled by a backend:
//! - [`Hdf5Container`] reads MATLAB v7.3 `.mat` files (feature `hdf5`)
//! - [`MemoryContainer`] keeps everything in memory (fixtures, tests, benches)
//!
//! Handles are opaque to the index. A handle names a reference stored in the
//! container; [`Container::dereference`] follows one level of indirection and
//! [`Container::load`] follows the last one to the numeric data.

#[cfg(feature = "hdf5")]
mod mat_file;
mod memory;

#[cfg(feature = "hdf5")]
pub use mat_file::Hdf5Container;
pub use memory::{MemoryContainer, MemoryEntry, MemoryObject, ObjectId};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ContainerError;
use crate::grid::Grid;

pub type ContainerResult<T> = std::result::Result<T, ContainerError>;

/// How a top-level entry is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    Group,
    Dataset,
}

/// A named top-level entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
}

/// Read-only view of a container of named arrays and reference arrays.
pub trait Container {
    /// Opaque reference to an object inside the container
    type Handle: Clone + fmt::Debug;

    /// All top-level entries with their kind.
    fn entries(&self) -> ContainerResult<Vec<Entry>>;

    /// Read a top-level numeric array, as `f64`, with its stored shape.
    fn read_array(&self, name: &str) -> ContainerResult<Grid<f64>>;

    /// Read a top-level array of references, flattened in storage order.
    fn references(&self, name: &str) -> ContainerResult<Vec<Self::Handle>>;

    /// Follow `handle` to an array of references and return those, in order.
    fn dereference(&self, handle: &Self::Handle) -> ContainerResult<Vec<Self::Handle>>;

    /// Dimensions of the numeric array `handle` points to, without reading it.
    fn shape(&self, handle: &Self::Handle) -> ContainerResult<Vec<usize>>;

    /// Read the numeric array `handle` points to.
    fn load(&self, handle: &Self::Handle) -> ContainerResult<Grid<f64>>;
}
