//! Box-filtered mip chains over [`Grid`]s.
//!
//! Each level is half the size of the previous one (rounded down, never below
//! one cell) and every cell is the mean of the 2×2 block beneath it. Levels
//! are produced one at a time from the level directly above; there is no
//! multi-level-per-pass shortcut.

use std::ops::{Add, Mul};

use glam::Vec4;

use crate::error::OceanError;
use crate::grid::Grid;

/// Cell types that can be averaged by a 2×2 box filter.
pub trait BoxFilter: Copy + Default + Add<Output = Self> + Mul<f32, Output = Self> {}

impl BoxFilter for f32 {}
impl BoxFilter for Vec4 {}

/// Number of levels in a full chain for a `width × height` base, including
/// the base itself.
pub fn level_count(width: usize, height: usize) -> usize {
    let largest = width.max(height).max(1);
    (usize::BITS - largest.leading_zeros()) as usize
}

/// A base grid plus its successively downsampled levels.
#[derive(Debug, Clone)]
pub struct MipChain<T> {
    levels: Vec<Grid<T>>,
}

impl<T: BoxFilter> MipChain<T> {
    /// Allocates a full chain (down to 1×1) with every level default-filled.
    pub fn new(width: usize, height: usize) -> Result<Self, OceanError> {
        let count = level_count(width, height);
        let mut levels = Vec::with_capacity(count);
        let (mut w, mut h) = (width, height);
        for _ in 0..count {
            levels.push(Grid::new(w, h)?);
            w = (w / 2).max(1);
            h = (h / 2).max(1);
        }
        Ok(Self { levels })
    }

    /// Number of levels, including the base.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// A chain always has at least its base level.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// The full-resolution level.
    pub fn base(&self) -> &Grid<T> {
        &self.levels[0]
    }

    /// Mutable access to the full-resolution level.
    pub fn base_mut(&mut self) -> &mut Grid<T> {
        &mut self.levels[0]
    }

    /// Level `index`, or `None` past the end of the chain.
    pub fn level(&self, index: usize) -> Option<&Grid<T>> {
        self.levels.get(index)
    }

    /// Regenerates every level below the base, one level per pass.
    pub fn generate(&mut self) {
        for i in 1..self.levels.len() {
            let (upper, lower) = self.levels.split_at_mut(i);
            downsample_into(&upper[i - 1], &mut lower[0]);
        }
    }
}

/// Writes the 2×2 box-filtered reduction of `src` into `dst`.
///
/// Source coordinates are clamped, so a 1-wide axis averages the same texel
/// twice rather than reading past the edge.
pub fn downsample_into<T: BoxFilter>(src: &Grid<T>, dst: &mut Grid<T>) {
    let sw = src.width();
    let sh = src.height();
    for (y, row) in dst.rows_mut().enumerate() {
        let y0 = (2 * y).min(sh - 1);
        let y1 = (2 * y + 1).min(sh - 1);
        for (x, cell) in row.iter_mut().enumerate() {
            let x0 = (2 * x).min(sw - 1);
            let x1 = (2 * x + 1).min(sw - 1);
            *cell = (src.at(x0, y0) + src.at(x1, y0) + src.at(x0, y1) + src.at(x1, y1)) * 0.25;
        }
    }
}
