//! HDF5 backend for MATLAB v7.3 `.mat` files.
//!
//! MATLAB writes cell arrays as datasets of object references into the
//! `#refs#` group, so the sweep's run/outcome cells come out as
//! `ObjectReference1` values.

use std::path::Path;

use hdf5::{Dataset, File, LocationType, ObjectReference1, ReferencedObject};

use super::{Container, ContainerResult, Entry, EntryKind};
use crate::error::ContainerError;
use crate::grid::Grid;

/// A `.mat` file opened read-only. The file stays open for the container's lifetime.
#[derive(Debug)]
pub struct Hdf5Container {
    file: File,
}

impl Hdf5Container {
    pub fn open(path: impl AsRef<Path>) -> ContainerResult<Self> {
        let file = File::open(path)?;
        Ok(Self { file })
    }

    fn dataset(&self, name: &str) -> ContainerResult<Dataset> {
        if !self.file.link_exists(name) {
            return Err(ContainerError::NotFound(name.to_string()));
        }
        self.file
            .dataset(name)
            .map_err(|_| ContainerError::NotAnArray(name.to_string()))
    }

    fn resolve(&self, reference: &ObjectReference1) -> ContainerResult<Dataset> {
        match self.file.dereference(reference)? {
            ReferencedObject::Dataset(dataset) => Ok(dataset),
            _ => Err(ContainerError::DanglingReference(format!("{reference:?}"))),
        }
    }
}

fn read_grid(dataset: &Dataset) -> ContainerResult<Grid<f64>> {
    let shape = dataset.shape();
    let data = dataset.read_raw::<f64>()?;
    let found = data.len();
    Grid::from_data(shape.clone(), data).ok_or_else(|| {
        ContainerError::Backend(format!(
            "dataset {} has shape {shape:?} but {found} values",
            dataset.name()
        ))
    })
}

impl Container for Hdf5Container {
    type Handle = ObjectReference1;

    fn entries(&self) -> ContainerResult<Vec<Entry>> {
        let mut entries = Vec::new();
        for name in self.file.member_names()? {
            let kind = match self.file.loc_type_by_name(&name)? {
                LocationType::Group => EntryKind::Group,
                _ => EntryKind::Dataset,
            };
            entries.push(Entry { name, kind });
        }
        Ok(entries)
    }

    fn read_array(&self, name: &str) -> ContainerResult<Grid<f64>> {
        read_grid(&self.dataset(name)?)
    }

    fn references(&self, name: &str) -> ContainerResult<Vec<ObjectReference1>> {
        self.dataset(name)?
            .read_raw::<ObjectReference1>()
            .map_err(|_| ContainerError::NotReferences(name.to_string()))
    }

    fn dereference(&self, handle: &ObjectReference1) -> ContainerResult<Vec<ObjectReference1>> {
        let dataset = self.resolve(handle)?;
        dataset
            .read_raw::<ObjectReference1>()
            .map_err(|_| ContainerError::NotReferences(dataset.name()))
    }

    fn shape(&self, handle: &ObjectReference1) -> ContainerResult<Vec<usize>> {
        Ok(self.resolve(handle)?.shape())
    }

    fn load(&self, handle: &ObjectReference1) -> ContainerResult<Grid<f64>> {
        read_grid(&self.resolve(handle)?)
    }
}
