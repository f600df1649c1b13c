//! Separable 2D butterfly transforms over square complex grids.
//!
//! A transform runs `log2(N)` horizontal stages followed by `log2(N)`
//! vertical stages. Each stage reads the active buffer and writes the other
//! one; the stage functions return the buffer they wrote. After the passes the
//! result is guaranteed to sit in the caller's grid, then the optional
//! center-shift permutation and `1/N²` scaling are applied in place.
//!
//! Inverse transforms are unnormalized unless `scale` is requested:
//! `inverse(forward(x)) == N² · x`.

use num_complex::Complex32;
use swell_core::Grid;

use crate::ping_pong::ActiveBuffer;
use crate::tables::FftTables;

/// Sign of the exponent in the transform kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `exp(-2πi·kn/N)`.
    Forward,
    /// `exp(+2πi·kn/N)`; uses conjugated twiddles.
    Inverse,
}

/// Post-processing applied after both butterfly passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformOptions {
    /// Multiply cell `(x, y)` by `(-1)^(x+y)`, moving the zero frequency from
    /// the grid center to the origin.
    pub permute: bool,
    /// Divide every cell by `N²`.
    pub scale: bool,
}

impl TransformOptions {
    /// Options used for every per-frame ocean transform: centered spectrum,
    /// amplitudes already carry their own normalization.
    pub const OCEAN: Self = Self {
        permute: true,
        scale: false,
    };
}

fn twiddle_for(direction: Direction, twiddle: Complex32) -> Complex32 {
    match direction {
        Direction::Forward => twiddle,
        Direction::Inverse => twiddle.conj(),
    }
}

/// Splits the two buffers into (read, write) according to `active`.
fn read_write<'a>(
    input: &'a mut Grid<Complex32>,
    scratch: &'a mut Grid<Complex32>,
    active: ActiveBuffer,
) -> (&'a Grid<Complex32>, &'a mut Grid<Complex32>) {
    match active {
        ActiveBuffer::Input => (input, scratch),
        ActiveBuffer::Scratch => (scratch, input),
    }
}

/// One butterfly stage along rows. Returns the buffer that now holds the result.
pub fn horizontal_stage(
    tables: &FftTables,
    stage: usize,
    direction: Direction,
    input: &mut Grid<Complex32>,
    scratch: &mut Grid<Complex32>,
    active: ActiveBuffer,
) -> ActiveBuffer {
    let butterflies = tables.stage(stage);
    let (src, dst) = read_write(input, scratch, active);
    for (src_row, dst_row) in src.rows().zip(dst.rows_mut()) {
        for (out, b) in dst_row.iter_mut().zip(butterflies) {
            let w = twiddle_for(direction, b.twiddle);
            *out = src_row[b.source_a as usize] + w * src_row[b.source_b as usize];
        }
    }
    active.other()
}

/// One butterfly stage along columns. Returns the buffer that now holds the result.
pub fn vertical_stage(
    tables: &FftTables,
    stage: usize,
    direction: Direction,
    input: &mut Grid<Complex32>,
    scratch: &mut Grid<Complex32>,
    active: ActiveBuffer,
) -> ActiveBuffer {
    let butterflies = tables.stage(stage);
    let n = tables.size();
    let (src, dst) = read_write(input, scratch, active);
    let src = src.data();
    for (dst_row, b) in dst.rows_mut().zip(butterflies) {
        let w = twiddle_for(direction, b.twiddle);
        let row_a = &src[b.source_a as usize * n..(b.source_a as usize + 1) * n];
        let row_b = &src[b.source_b as usize * n..(b.source_b as usize + 1) * n];
        for ((out, &a), &bv) in dst_row.iter_mut().zip(row_a).zip(row_b) {
            *out = a + w * bv;
        }
    }
    active.other()
}

/// Multiplies every cell by `(-1)^(x+y)`.
pub fn permute(grid: &mut Grid<Complex32>) {
    for (y, row) in grid.rows_mut().enumerate() {
        for (x, cell) in row.iter_mut().enumerate() {
            if (x + y) % 2 == 1 {
                *cell = -*cell;
            }
        }
    }
}

/// Divides every cell by `N²` where `N` is the grid width.
pub fn scale(grid: &mut Grid<Complex32>) {
    let n = grid.width() as f32;
    let factor = 1.0 / (n * n);
    for cell in grid.data_mut() {
        *cell *= factor;
    }
}

/// Runs a full 2D transform in `direction`, leaving the result in `input`.
///
/// `scratch` is overwritten. `permute` and `scale` are applied after both
/// passes, to whichever buffer holds the result, so they compose in every
/// combination.
///
/// # Panics
///
/// Panics if `input` or `scratch` is not `N × N` for the tables' `N`. A size
/// mismatch is a configuration bug, not a recoverable condition.
pub fn transform_2d(
    tables: &FftTables,
    direction: Direction,
    input: &mut Grid<Complex32>,
    scratch: &mut Grid<Complex32>,
    options: TransformOptions,
) {
    let n = tables.size();
    assert!(
        input.width() == n && input.height() == n,
        "FFT input is {}x{}, tables are for {n}x{n}",
        input.width(),
        input.height()
    );
    assert!(
        scratch.width() == n && scratch.height() == n,
        "FFT scratch is {}x{}, tables are for {n}x{n}",
        scratch.width(),
        scratch.height()
    );

    let mut active = ActiveBuffer::Input;
    for stage in 0..tables.log_size() {
        active = horizontal_stage(tables, stage, direction, input, scratch, active);
    }
    for stage in 0..tables.log_size() {
        active = vertical_stage(tables, stage, direction, input, scratch, active);
    }
    if active == ActiveBuffer::Scratch {
        input.copy_from(scratch);
    }

    if options.permute {
        permute(input);
    }
    if options.scale {
        scale(input);
    }
}

/// Inverse 2D transform; see [`transform_2d`].
pub fn inverse_2d(
    tables: &FftTables,
    input: &mut Grid<Complex32>,
    scratch: &mut Grid<Complex32>,
    options: TransformOptions,
) {
    transform_2d(tables, Direction::Inverse, input, scratch, options);
}

/// Forward 2D transform; see [`transform_2d`].
pub fn forward_2d(
    tables: &FftTables,
    input: &mut Grid<Complex32>,
    scratch: &mut Grid<Complex32>,
    options: TransformOptions,
) {
    transform_2d(tables, Direction::Forward, input, scratch, options);
}
