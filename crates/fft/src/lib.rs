#![deny(unsafe_code)]
//! Table-driven 2D FFT for square power-of-two complex grids.
//!
//! [`FftTables`] holds precomputed butterflies for one size and is shared
//! (via [`FftTableCache`]) by every cascade of that size. [`inverse_2d`] and
//! [`forward_2d`] run separable row/column passes that ping-pong between the
//! caller's grid and a scratch grid, then optionally apply the center-shift
//! permutation and `1/N²` scaling.

pub mod cache;
pub mod ping_pong;
pub mod tables;
pub mod transform;

pub use cache::FftTableCache;
pub use ping_pong::ActiveBuffer;
pub use tables::{Butterfly, FftTables};
pub use transform::{
    forward_2d, horizontal_stage, inverse_2d, permute, scale, transform_2d, vertical_stage,
    Direction, TransformOptions,
};
