//! Linear value-to-luminance conversion for scalar fields.
//!
//! Always available (no feature gate) so callers can inspect the normalized
//! buffer without pulling in the `image` crate.

use swell_core::Grid;

/// Smallest and largest finite value in `field`, or `None` if it has none.
pub fn value_range(field: &Grid<f32>) -> Option<(f32, f32)> {
    field
        .data()
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |range, v| match range {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Maps field values linearly onto `0..=255`, lowest value black.
///
/// A constant field maps to mid gray; non-finite values map to black. The
/// buffer is row-major with one byte per cell.
pub fn field_to_luma(field: &Grid<f32>) -> Vec<u8> {
    let Some((lo, hi)) = value_range(field) else {
        return vec![0; field.data().len()];
    };
    let span = hi - lo;
    field
        .data()
        .iter()
        .map(|&v| {
            if !v.is_finite() {
                0
            } else if span <= 0.0 {
                128
            } else {
                (((v - lo) / span) * 255.0).round().clamp(0.0, 255.0) as u8
            }
        })
        .collect()
}
