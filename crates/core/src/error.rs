//! Error types shared by every swell crate.

use thiserror::Error;

/// Errors produced while configuring or constructing an ocean simulation.
///
/// Per-tick operations never fail; everything here is reported at
/// construction time so that no partially built simulation is ever returned.
#[derive(Debug, Error)]
pub enum OceanError {
    /// Width or height was zero, or `width * height` overflowed.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// The FFT grid size must be a power of two (and at least 2).
    #[error("grid size {size} is not a power of two >= 2")]
    NotPowerOfTwo { size: usize },

    /// Two grids that must agree in size do not.
    #[error("dimension mismatch: ({lhs_w}, {lhs_h}) vs ({rhs_w}, {rhs_h})")]
    DimensionMismatch {
        lhs_w: usize,
        lhs_h: usize,
        rhs_w: usize,
        rhs_h: usize,
    },

    /// A cascade set was configured with an unsupported number of cascades.
    #[error("unsupported cascade count {count}: expected between 2 and {max}")]
    InvalidCascadeCount { count: usize, max: usize },

    /// Length scales were non-positive, non-finite or not strictly decreasing.
    #[error("invalid length scales: {0}")]
    InvalidLengthScales(String),

    /// Cascade frequency bands overlap, leave a gap, or are empty.
    #[error("invalid cascade bands: {0}")]
    InvalidBands(String),

    /// A required spectrum component ("local" or "swell") was absent.
    #[error("missing spectrum component: {0}")]
    MissingComponent(String),

    /// A parameter value is outside its physically valid range.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Backing memory for a simulation buffer could not be reserved.
    #[error("failed to allocate {bytes} bytes for simulation buffers")]
    Allocation { bytes: usize },

    /// A requested output field name is not recognized.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// An I/O failure while exporting a field.
    #[error("i/o error: {0}")]
    Io(String),
}
