//! Two-dimensional pixel grids with explicit no-data.
//!
//! Pixels are stored row-major. Reflectance and index grids hold
//! `Option<f32>`, where `None` is the no-data marker; a numeric zero is
//! always a real reading.

use serde::{Deserialize, Serialize};

use crate::error::{EoError, EoResult};

/// Per-band reflectance grid for one timestep.
pub type BandGrid = Grid<Option<f32>>;

/// Derived scalar index grid for one timestep.
pub type IndexGrid = Grid<Option<f32>>;

/// Boolean classification grid for one timestep.
pub type MaskGrid = Grid<bool>;

/// Spatial shape of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridShape {
    pub rows: usize,
    pub cols: usize,
}

impl GridShape {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Fail with ShapeMismatch unless `other` is identical.
    pub fn ensure_matches(&self, other: &GridShape) -> EoResult<()> {
        if self == other {
            Ok(())
        } else {
            Err(EoError::shape_mismatch(
                (self.rows, self.cols),
                (other.rows, other.cols),
            ))
        }
    }
}

/// A row-major `rows x cols` grid of pixel values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T> Grid<T> {
    /// Create a grid from a row-major buffer.
    pub fn new(rows: usize, cols: usize, data: Vec<T>) -> EoResult<Self> {
        let grid = Self { rows, cols, data };
        grid.validate()?;
        Ok(grid)
    }

    /// Build a grid by evaluating `f(row, col)` for every pixel.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                data.push(f(row, col));
            }
        }
        Self { rows, cols, data }
    }

    /// Check that the buffer length agrees with the declared shape.
    ///
    /// Grids built through `new` or `from_fn` always pass; deserialized
    /// grids are checked here before use.
    pub fn validate(&self) -> EoResult<()> {
        // Dimensions may come from untrusted JSON
        let expected = self.rows.checked_mul(self.cols);
        if expected != Some(self.data.len()) {
            return Err(EoError::BufferLength {
                rows: self.rows,
                cols: self.cols,
                len: self.data.len(),
            });
        }
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> GridShape {
        GridShape::new(self.rows, self.cols)
    }

    /// Total number of pixels.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the value at a grid coordinate.
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col)
    }

    /// Row-major view of the pixels.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Fail with ShapeMismatch unless both grids share one shape.
    pub fn ensure_same_shape<U>(&self, other: &Grid<U>) -> EoResult<()> {
        self.shape().ensure_matches(&other.shape())
    }

    /// Apply `f` to every pixel, keeping the shape.
    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> Grid<U> {
        Grid {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Combine two equally shaped grids pixel by pixel.
    pub fn zip_map<U, V>(&self, other: &Grid<U>, f: impl Fn(&T, &U) -> V) -> EoResult<Grid<V>> {
        self.ensure_same_shape(other)?;
        Ok(Grid {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(a, b)| f(a, b))
                .collect(),
        })
    }
}

impl<T: Clone> Grid<T> {
    /// Create a grid with every pixel set to `value`.
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }
}

impl Grid<Option<f32>> {
    /// Convert a raw reader buffer into a grid with explicit no-data.
    ///
    /// NaN, infinities and `fill_value` (when given) become `None`.
    pub fn from_raw(
        rows: usize,
        cols: usize,
        values: Vec<f32>,
        fill_value: Option<f32>,
    ) -> EoResult<Self> {
        let data = values
            .into_iter()
            .map(|v| {
                if !v.is_finite() || fill_value == Some(v) {
                    None
                } else {
                    Some(v)
                }
            })
            .collect();
        Self::new(rows, cols, data)
    }

    /// Grid where every pixel is no-data.
    pub fn nodata(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, None)
    }

    /// Number of pixels carrying a value.
    pub fn valid_count(&self) -> usize {
        self.data.iter().filter(|v| v.is_some()).count()
    }

    /// True when no pixel carries a value.
    pub fn is_all_nodata(&self) -> bool {
        self.data.iter().all(Option::is_none)
    }

    /// Iterate over the values of valid pixels.
    pub fn valid_values(&self) -> impl Iterator<Item = f32> + '_ {
        self.data.iter().filter_map(|v| *v)
    }
}

impl Grid<bool> {
    /// Number of pixels set to true.
    pub fn count_true(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }
}
