//! N-dimensional numeric storage with a flat backing array.
//!
//! Every array read out of a container (scalars, focus vectors, the case
//! table, outcome tensors) lands in a [`Grid`]. The shape is whatever the
//! container reports; nothing about dimensionality is declared up front.

use serde::{Deserialize, Serialize};

/// N-dimensional grid storage with flat backing array and stride-based indexing.
///
/// Stores values in row-major order where the last dimension varies fastest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "RawGrid<T>",
    into = "RawGrid<T>",
    bound(
        serialize = "T: Serialize + Clone",
        deserialize = "T: Deserialize<'de> + Clone"
    )
)]
pub struct Grid<T> {
    data: Vec<T>,
    shape: Vec<usize>,
    strides: Vec<usize>,
}

impl<T: Clone> Grid<T> {
    /// Create a new grid with the given shape, filled with `fill`.
    pub fn new(shape: Vec<usize>, fill: T) -> Self {
        let total_size: usize = shape.iter().product();
        let strides = compute_strides(&shape);
        Self {
            data: vec![fill; total_size],
            shape,
            strides,
        }
    }

    /// Create a grid from existing data. Data must be in row-major order.
    pub fn from_data(shape: Vec<usize>, data: Vec<T>) -> Option<Self> {
        let total_size: usize = shape.iter().product();
        if data.len() != total_size {
            return None;
        }
        let strides = compute_strides(&shape);
        Some(Self {
            data,
            shape,
            strides,
        })
    }

    /// A 1-D grid over `values`.
    pub fn vector(values: Vec<T>) -> Self {
        let len = values.len();
        Self {
            data: values,
            shape: vec![len],
            strides: vec![1],
        }
    }

    /// A 1×1 grid, the way scalars come out of a `.mat` file.
    pub fn scalar(value: T) -> Self {
        Self {
            data: vec![value],
            shape: vec![1, 1],
            strides: vec![1, 1],
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// First element in storage order, if any.
    pub fn first(&self) -> Option<&T> {
        self.data.first()
    }

    /// Convert multi-dimensional indices to flat index
    pub fn flat_index(&self, indices: &[usize]) -> Option<usize> {
        if indices.len() != self.shape.len() {
            return None;
        }
        let mut flat = 0;
        for (i, (&idx, &size)) in indices.iter().zip(&self.shape).enumerate() {
            if idx >= size {
                return None;
            }
            flat += idx * self.strides[i];
        }
        Some(flat)
    }

    pub fn get(&self, indices: &[usize]) -> Option<&T> {
        self.flat_index(indices).map(|i| &self.data[i])
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Extract a 1-D lane along `dim`, holding every other dimension at the
    /// index given in `fixed`. The entry of `fixed` at `dim` is ignored.
    ///
    /// Returns `None` when `fixed` has the wrong rank or any fixed index is
    /// out of range.
    pub fn slice_1d(&self, dim: usize, fixed: &[Option<usize>]) -> Option<Vec<T>> {
        if dim >= self.ndim() || fixed.len() != self.ndim() {
            return None;
        }
        for (i, f) in fixed.iter().enumerate() {
            if i != dim && f.is_none() {
                return None;
            }
        }

        let mut indices: Vec<usize> = fixed.iter().map(|f| f.unwrap_or(0)).collect();
        let mut result = Vec::with_capacity(self.shape[dim]);
        for idx in 0..self.shape[dim] {
            indices[dim] = idx;
            result.push(self.get(&indices)?.clone());
        }
        Some(result)
    }

    /// Swap the two axes of a 2-D grid. `None` for any other rank.
    pub fn transpose(&self) -> Option<Self> {
        let [rows, cols] = self.shape[..] else {
            return None;
        };
        let mut data = Vec::with_capacity(self.data.len());
        for c in 0..cols {
            for r in 0..rows {
                data.push(self.data[r * self.strides[0] + c].clone());
            }
        }
        Self::from_data(vec![cols, rows], data)
    }

    /// Row `r` of a 2-D grid.
    pub fn row(&self, r: usize) -> Option<&[T]> {
        let [rows, cols] = self.shape[..] else {
            return None;
        };
        if r >= rows {
            return None;
        }
        Some(&self.data[r * cols..(r + 1) * cols])
    }
}

impl Grid<f64> {
    /// Replace every NaN with zero. Returns how many values were replaced.
    pub fn sanitize_nan(&mut self) -> usize {
        let mut replaced = 0;
        for v in self.data.iter_mut().filter(|v| v.is_nan()) {
            *v = 0.0;
            replaced += 1;
        }
        replaced
    }
}

/// Compute strides for row-major order
fn compute_strides(shape: &[usize]) -> Vec<usize> {
    if shape.is_empty() {
        return Vec::new();
    }
    let mut strides = vec![1; shape.len()];
    for i in (0..shape.len() - 1).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

/// Serialized form: strides are derived, never stored.
#[derive(Serialize, Deserialize)]
struct RawGrid<T> {
    shape: Vec<usize>,
    data: Vec<T>,
}

impl<T: Clone> TryFrom<RawGrid<T>> for Grid<T> {
    type Error = String;

    fn try_from(raw: RawGrid<T>) -> Result<Self, Self::Error> {
        let expected: usize = raw.shape.iter().product();
        let found = raw.data.len();
        Grid::from_data(raw.shape, raw.data)
            .ok_or_else(|| format!("grid shape needs {expected} values, found {found}"))
    }
}

impl<T> From<Grid<T>> for RawGrid<T> {
    fn from(grid: Grid<T>) -> Self {
        Self {
            shape: grid.shape,
            data: grid.data,
        }
    }
}
