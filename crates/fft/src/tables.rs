//! Precomputed twiddle factors and source indices for the butterfly passes.
//!
//! For a size `N = 2^L` the table holds `L × N` entries. Entry `(stage, j)`
//! tells output element `j` of that stage which two input elements to combine
//! and with which twiddle factor. Row `j + N/2` mirrors row `j` with the
//! twiddle negated. The layout is self-sorting (Stockham): after `L` stages
//! the result is in natural order, so no bit-reversal pass is needed.

use std::f64::consts::TAU;

use num_complex::Complex32;
use swell_core::seed::validate_fft_size;
use swell_core::OceanError;

/// One butterfly: `out = in[source_a] + twiddle * in[source_b]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Butterfly {
    pub twiddle: Complex32,
    pub source_a: u32,
    pub source_b: u32,
}

/// Immutable butterfly tables for one FFT size.
#[derive(Debug, Clone)]
pub struct FftTables {
    size: usize,
    log_size: usize,
    entries: Vec<Butterfly>,
}

impl FftTables {
    /// Builds the tables for an `size × size` transform.
    ///
    /// Returns `OceanError::NotPowerOfTwo` unless `size` is a power of two ≥ 2.
    pub fn precompute(size: usize) -> Result<Self, OceanError> {
        validate_fft_size(size)?;
        let log_size = size.trailing_zeros() as usize;
        let half = size / 2;

        let mut entries = Vec::new();
        entries
            .try_reserve_exact(log_size * size)
            .map_err(|_| OceanError::Allocation {
                bytes: log_size * size * std::mem::size_of::<Butterfly>(),
            })?;
        entries.resize(
            log_size * size,
            Butterfly {
                twiddle: Complex32::new(1.0, 0.0),
                source_a: 0,
                source_b: 0,
            },
        );

        for stage in 0..log_size {
            let span = size >> (stage + 1);
            let row = &mut entries[stage * size..(stage + 1) * size];
            for j in 0..half {
                let group = j / span;
                let source_a = (2 * span * group + j % span) % size;
                let angle = -TAU * (group * span) as f64 / size as f64;
                let twiddle = Complex32::new(angle.cos() as f32, angle.sin() as f32);
                let source_a = source_a as u32;
                let source_b = source_a + span as u32;
                row[j] = Butterfly {
                    twiddle,
                    source_a,
                    source_b,
                };
                row[j + half] = Butterfly {
                    twiddle: -twiddle,
                    source_a,
                    source_b,
                };
            }
        }

        log::debug!("precomputed FFT tables for size {size} ({log_size} stages)");

        Ok(Self {
            size,
            log_size,
            entries,
        })
    }

    /// Transform side length `N`.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of butterfly stages per axis, `log2(N)`.
    pub fn log_size(&self) -> usize {
        self.log_size
    }

    /// The butterfly for output element `index` of `stage`.
    pub fn entry(&self, stage: usize, index: usize) -> Butterfly {
        self.entries[stage * self.size + index]
    }

    /// All butterflies of one stage, indexed by output element.
    pub fn stage(&self, stage: usize) -> &[Butterfly] {
        &self.entries[stage * self.size..(stage + 1) * self.size]
    }
}
