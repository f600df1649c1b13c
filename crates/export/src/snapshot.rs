//! Grayscale PNG output of a scalar field.
//!
//! Feature-gated behind `png` (default on). The value-to-luminance mapping
//! lives in [`crate::pixel`] and is always available.

use std::path::Path;

use swell_core::{Grid, OceanError};

use crate::pixel::field_to_luma;

/// Writes `field` as an 8-bit grayscale PNG, normalized to its value range.
///
/// Returns `OceanError::InvalidDimensions` if the field dimensions overflow
/// `u32`, or `OceanError::Io` on write failure.
pub fn write_png(field: &Grid<f32>, path: &Path) -> Result<(), OceanError> {
    let luma = field_to_luma(field);
    let w = u32::try_from(field.width()).map_err(|_| OceanError::InvalidDimensions)?;
    let h = u32::try_from(field.height()).map_err(|_| OceanError::InvalidDimensions)?;
    let img = image::GrayImage::from_raw(w, h, luma)
        .ok_or_else(|| OceanError::Io("luma buffer size mismatch".into()))?;
    img.save(path).map_err(|e| OceanError::Io(e.to_string()))
}
