//! Two-dimensional row-major grid with toroidal addressing.
//!
//! A `Grid<T>` stores `width * height` cells. Signed coordinate access wraps
//! around both axes, which matches the periodic nature of a spectral ocean
//! tile: cell `(-1, 0)` is the last cell of the first row.

use crate::error::OceanError;

/// A 2D grid of `T` with toroidal coordinate wrapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

/// Reserves and fills a buffer of `len` cells, reporting allocation failure
/// instead of aborting.
fn allocate<T: Clone>(len: usize, value: T) -> Result<Vec<T>, OceanError> {
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| OceanError::Allocation {
            bytes: len.saturating_mul(std::mem::size_of::<T>()),
        })?;
    data.resize(len, value);
    Ok(data)
}

fn checked_len(width: usize, height: usize) -> Result<usize, OceanError> {
    if width == 0 || height == 0 {
        return Err(OceanError::InvalidDimensions);
    }
    width
        .checked_mul(height)
        .ok_or(OceanError::InvalidDimensions)
}

impl<T: Copy + Default> Grid<T> {
    /// Creates a grid filled with `T::default()`.
    ///
    /// Returns `OceanError::InvalidDimensions` if either dimension is zero
    /// or if `width * height` overflows, and `OceanError::Allocation` if the
    /// buffer cannot be reserved.
    pub fn new(width: usize, height: usize) -> Result<Self, OceanError> {
        Self::filled(width, height, T::default())
    }

    /// Creates an `n × n` grid filled with `T::default()`.
    pub fn square(n: usize) -> Result<Self, OceanError> {
        Self::new(n, n)
    }

    /// Creates a grid with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: T) -> Result<Self, OceanError> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: allocate(len, value)?,
        })
    }

    /// Creates a grid from a pre-built row-major vector, validating that
    /// `data.len() == width * height`.
    pub fn from_data(width: usize, height: usize, data: Vec<T>) -> Result<Self, OceanError> {
        let expected = checked_len(width, height)?;
        if data.len() != expected {
            return Err(OceanError::DimensionMismatch {
                lhs_w: width,
                lhs_h: height,
                rhs_w: data.len(),
                rhs_h: 1,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Grid width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Read-only access to the underlying row-major data.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Mutable access to the underlying row-major data.
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Converts signed coordinates to a flat index using toroidal wrapping.
    fn index(&self, x: isize, y: isize) -> usize {
        let xi = x.rem_euclid(self.width as isize) as usize;
        let yi = y.rem_euclid(self.height as isize) as usize;
        yi * self.width + xi
    }

    /// Gets the value at `(x, y)` with toroidal wrapping.
    pub fn get(&self, x: isize, y: isize) -> T {
        self.data[self.index(x, y)]
    }

    /// Sets the value at `(x, y)` with toroidal wrapping.
    pub fn set(&mut self, x: isize, y: isize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Gets the value at in-range coordinates without wrapping.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height` maps past the buffer.
    pub fn at(&self, x: usize, y: usize) -> T {
        self.data[y * self.width + x]
    }

    /// Returns `true` if `other` has the same width and height.
    pub fn same_shape<U>(&self, other: &Grid<U>) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Returns `OceanError::DimensionMismatch` unless `other` has the same shape.
    pub fn check_same_shape<U>(&self, other: &Grid<U>) -> Result<(), OceanError> {
        if self.same_shape(other) {
            Ok(())
        } else {
            Err(OceanError::DimensionMismatch {
                lhs_w: self.width,
                lhs_h: self.height,
                rhs_w: other.width,
                rhs_h: other.height,
            })
        }
    }

    /// Overwrites every cell with the corresponding cell of `other`.
    ///
    /// # Panics
    ///
    /// Panics if the grids differ in shape.
    pub fn copy_from(&mut self, other: &Grid<T>) {
        assert!(
            self.same_shape(other),
            "copy_from: grid shapes differ ({}x{} vs {}x{})",
            self.width,
            self.height,
            other.width,
            other.height
        );
        self.data.copy_from_slice(&other.data);
    }

    /// Sets every cell to `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Builds a new grid of the same shape by applying `f` to every cell.
    pub fn map<U, F>(&self, f: F) -> Grid<U>
    where
        F: FnMut(&T) -> U,
    {
        Grid {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Iterates over all cells yielding `(x, y, value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        self.data.iter().enumerate().map(|(i, &v)| {
            let x = i % self.width;
            let y = i / self.width;
            (x, y, v)
        })
    }

    /// Iterates over the rows as slices.
    pub fn rows(&self) -> std::slice::ChunksExact<'_, T> {
        self.data.chunks_exact(self.width)
    }

    /// Iterates over the rows as mutable slices.
    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, T> {
        self.data.chunks_exact_mut(self.width)
    }
}
