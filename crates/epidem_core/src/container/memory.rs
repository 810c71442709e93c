//! In-memory container backend.
//!
//! Mirrors the layout MATLAB writes: named top-level entries plus a pool of
//! anonymous objects (the `#refs#` group) that reference arrays point into.
//! Serializable, so a fixture can be kept as JSON.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Container, ContainerResult, Entry, EntryKind};
use crate::error::ContainerError;
use crate::grid::Grid;

/// Position of an object in the container's object pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub usize);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object {}", self.0)
    }
}

/// A named top-level entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MemoryEntry {
    Group,
    Array(Grid<f64>),
    References(Vec<ObjectId>),
}

/// An anonymous object that references resolve to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MemoryObject {
    Array(Grid<f64>),
    References(Vec<ObjectId>),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryContainer {
    entries: BTreeMap<String, MemoryEntry>,
    objects: Vec<MemoryObject>,
    /// Number of `load` calls served
    #[serde(skip)]
    loads: Cell<usize>,
}

impl MemoryContainer {
    pub fn new() -> Self {
        Self::default()
    }

    // === Top-level entries ===

    #[must_use]
    pub fn with_group(mut self, name: &str) -> Self {
        self.entries.insert(name.to_string(), MemoryEntry::Group);
        self
    }

    #[must_use]
    pub fn with_array(mut self, name: &str, array: Grid<f64>) -> Self {
        self.entries
            .insert(name.to_string(), MemoryEntry::Array(array));
        self
    }

    /// A scalar stored the MATLAB way, as a 1×1 array
    #[must_use]
    pub fn with_scalar(self, name: &str, value: f64) -> Self {
        self.with_array(name, Grid::scalar(value))
    }

    #[must_use]
    pub fn with_references(mut self, name: &str, targets: Vec<ObjectId>) -> Self {
        self.entries
            .insert(name.to_string(), MemoryEntry::References(targets));
        self
    }

    /// Remove a top-level entry, returning it if present
    pub fn remove(&mut self, name: &str) -> Option<MemoryEntry> {
        self.entries.remove(name)
    }

    // === Object pool ===

    pub fn add_object(&mut self, object: MemoryObject) -> ObjectId {
        self.objects.push(object);
        ObjectId(self.objects.len() - 1)
    }

    pub fn add_array(&mut self, array: Grid<f64>) -> ObjectId {
        self.add_object(MemoryObject::Array(array))
    }

    pub fn add_references(&mut self, targets: Vec<ObjectId>) -> ObjectId {
        self.add_object(MemoryObject::References(targets))
    }

    /// How many arrays have been loaded through [`Container::load`]
    pub fn load_count(&self) -> usize {
        self.loads.get()
    }

    fn object(&self, id: &ObjectId) -> ContainerResult<&MemoryObject> {
        self.objects
            .get(id.0)
            .ok_or_else(|| ContainerError::DanglingReference(id.to_string()))
    }

    fn object_array(&self, id: &ObjectId) -> ContainerResult<&Grid<f64>> {
        match self.object(id)? {
            MemoryObject::Array(array) => Ok(array),
            MemoryObject::References(_) => Err(ContainerError::NotAnArray(id.to_string())),
        }
    }

    fn entry(&self, name: &str) -> ContainerResult<&MemoryEntry> {
        self.entries
            .get(name)
            .ok_or_else(|| ContainerError::NotFound(name.to_string()))
    }
}

impl Container for MemoryContainer {
    type Handle = ObjectId;

    fn entries(&self) -> ContainerResult<Vec<Entry>> {
        Ok(self
            .entries
            .iter()
            .map(|(name, entry)| Entry {
                name: name.clone(),
                kind: match entry {
                    MemoryEntry::Group => EntryKind::Group,
                    MemoryEntry::Array(_) | MemoryEntry::References(_) => EntryKind::Dataset,
                },
            })
            .collect())
    }

    fn read_array(&self, name: &str) -> ContainerResult<Grid<f64>> {
        match self.entry(name)? {
            MemoryEntry::Array(array) => Ok(array.clone()),
            _ => Err(ContainerError::NotAnArray(name.to_string())),
        }
    }

    fn references(&self, name: &str) -> ContainerResult<Vec<ObjectId>> {
        match self.entry(name)? {
            MemoryEntry::References(targets) => Ok(targets.clone()),
            _ => Err(ContainerError::NotReferences(name.to_string())),
        }
    }

    fn dereference(&self, handle: &ObjectId) -> ContainerResult<Vec<ObjectId>> {
        match self.object(handle)? {
            MemoryObject::References(targets) => Ok(targets.clone()),
            MemoryObject::Array(_) => Err(ContainerError::NotReferences(handle.to_string())),
        }
    }

    fn shape(&self, handle: &ObjectId) -> ContainerResult<Vec<usize>> {
        Ok(self.object_array(handle)?.shape().to_vec())
    }

    fn load(&self, handle: &ObjectId) -> ContainerResult<Grid<f64>> {
        let array = self.object_array(handle)?.clone();
        self.loads.set(self.loads.get() + 1);
        Ok(array)
    }
}
