//! Initial spectrum H0(k) for one cascade.
//!
//! Generation runs in two passes over the grid. The first samples the
//! directional JONSWAP spectrum at every wave vector inside the cascade's
//! band and scales the Gaussian noise by it. The second pairs every cell with
//! the conjugate of its mirror cell `-k`, which the time evolution needs to
//! produce a real-valued surface.
//!
//! Cell `(i, j)` holds the wave vector `k = (i − N/2, j − N/2) · 2π / L`, so
//! the zero frequency sits at the grid center. `L` is the side of the square
//! patch the cascade tiles, in metres. Row and column 0 hold the Nyquist wave
//! number, which has no distinct `-k` partner; they carry no energy.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use num_complex::Complex32;
use swell_core::{Grid, OceanError};

use crate::random_field::RandomField;
use crate::settings::{SpectrumParameters, WavesSettings};

/// Arguments to `tanh` are clamped here; `tanh(20)` is 1 in f32.
const TANH_CLAMP: f32 = 20.0;

/// Amplitude of one wave vector and of its mirror, conjugated.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpectrumSample {
    /// `h0(k)`
    pub h0: Complex32,
    /// `conj(h0(−k))`
    pub h0_minus_k_conj: Complex32,
}

/// Per-cell wave vector data consumed by the time evolution.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WaveVector {
    /// Wave vector `(kx, kz)` in rad/m.
    pub k: Vec2,
    /// `1 / |k|`, or `1` outside the band.
    pub inv_length: f32,
    /// Angular frequency from the dispersion relation, `0` outside the band.
    pub omega: f32,
}

/// Static complex amplitudes and wave vectors of one cascade.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialSpectrum {
    samples: Grid<SpectrumSample>,
    waves: Grid<WaveVector>,
    length_scale: f32,
    cutoff_low: f32,
    cutoff_high: f32,
}

impl InitialSpectrum {
    /// An all-zero spectrum; evolves to a flat sea.
    pub fn flat(size: usize) -> Result<Self, OceanError> {
        Ok(Self {
            samples: Grid::square(size)?,
            waves: Grid::filled(
                size,
                size,
                WaveVector {
                    k: Vec2::ZERO,
                    inv_length: 1.0,
                    omega: 0.0,
                },
            )?,
            length_scale: 1.0,
            cutoff_low: 0.0,
            cutoff_high: 0.0,
        })
    }

    /// Samples the spectrum for a patch of side `length_scale`, keeping only
    /// wave numbers in `[cutoff_low, cutoff_high)`.
    ///
    /// `cutoff_high` may be `f32::INFINITY`. The result depends only on its
    /// inputs, bit for bit.
    pub fn generate(
        noise: &RandomField,
        settings: &WavesSettings,
        length_scale: f32,
        cutoff_low: f32,
        cutoff_high: f32,
    ) -> Result<Self, OceanError> {
        settings.validate()?;
        if !(length_scale.is_finite() && length_scale > 0.0) {
            return Err(OceanError::InvalidLengthScales(format!(
                "length scale must be positive and finite, got {length_scale}"
            )));
        }
        if !(cutoff_low >= 0.0 && cutoff_high > cutoff_low) {
            return Err(OceanError::InvalidBands(format!(
                "band [{cutoff_low}, {cutoff_high}) is empty or negative"
            )));
        }

        let size = noise.size();
        let (h0k, waves) =
            sample_amplitudes(noise, settings, length_scale, cutoff_low, cutoff_high)?;
        let samples = pair_conjugates(&h0k)?;

        log::debug!(
            "initial spectrum computed: size {size}, length scale {length_scale}, band [{cutoff_low}, {cutoff_high})"
        );

        Ok(Self {
            samples,
            waves,
            length_scale,
            cutoff_low,
            cutoff_high,
        })
    }

    pub fn size(&self) -> usize {
        self.samples.width()
    }

    pub fn samples(&self) -> &Grid<SpectrumSample> {
        &self.samples
    }

    pub fn waves(&self) -> &Grid<WaveVector> {
        &self.waves
    }

    pub fn length_scale(&self) -> f32 {
        self.length_scale
    }

    pub fn cutoff_low(&self) -> f32 {
        self.cutoff_low
    }

    pub fn cutoff_high(&self) -> f32 {
        self.cutoff_high
    }
}

/// First pass: `h0(k)` and wave vector data for every cell.
fn sample_amplitudes(
    noise: &RandomField,
    settings: &WavesSettings,
    length_scale: f32,
    cutoff_low: f32,
    cutoff_high: f32,
) -> Result<(Grid<Complex32>, Grid<WaveVector>), OceanError> {
    let size = noise.size();
    let half = (size / 2) as f32;
    let delta_k = TAU / length_scale;
    let components = settings.spectrum_parameters();
    let (g, depth) = (settings.g, settings.depth);

    let mut h0k = Grid::<Complex32>::square(size)?;
    let mut waves = Grid::<WaveVector>::square(size)?;

    for ((idx, amplitude), wave) in h0k
        .data_mut()
        .iter_mut()
        .enumerate()
        .zip(waves.data_mut().iter_mut())
    {
        let x = idx % size;
        let y = idx / size;
        let k = Vec2::new(x as f32 - half, y as f32 - half) * delta_k;
        let k_length = k.length();

        // The Nyquist row and column are their own mirrors and stay empty.
        let nyquist = x == 0 || y == 0;
        if !nyquist && k_length > 0.0 && k_length >= cutoff_low && k_length < cutoff_high {
            let k_angle = k.y.atan2(k.x);
            let omega = frequency(k_length, g, depth);
            let d_omega_dk = frequency_derivative(k_length, g, depth);

            let mut spectrum = 0.0;
            for p in components.iter().filter(|p| p.scale != 0.0) {
                spectrum += jonswap(omega, g, depth, p)
                    * direction_spectrum(k_angle, omega, p)
                    * short_waves_fade(k_length, p);
            }

            let xi = noise.at(x, y);
            let factor = (2.0 * spectrum * d_omega_dk.abs() / k_length * delta_k * delta_k).sqrt();
            *amplitude = Complex32::new(xi.x, xi.y) * factor;
            *wave = WaveVector {
                k,
                inv_length: 1.0 / k_length,
                omega,
            };
        } else {
            *amplitude = Complex32::new(0.0, 0.0);
            *wave = WaveVector {
                k,
                inv_length: 1.0,
                omega: 0.0,
            };
        }
    }

    Ok((h0k, waves))
}

/// Second pass: pairs each `h0(k)` with `conj(h0(−k))`.
///
/// Reads a completed first-pass buffer; the mirror of cell `(i, j)` is
/// `((N − i) mod N, (N − j) mod N)`.
fn pair_conjugates(h0k: &Grid<Complex32>) -> Result<Grid<SpectrumSample>, OceanError> {
    let size = h0k.width();
    let mut samples = Grid::<SpectrumSample>::square(size)?;
    for (idx, sample) in samples.data_mut().iter_mut().enumerate() {
        let x = idx % size;
        let y = idx / size;
        let mirror = h0k.at((size - x) % size, (size - y) % size);
        *sample = SpectrumSample {
            h0: h0k.at(x, y),
            h0_minus_k_conj: mirror.conj(),
        };
    }
    Ok(samples)
}

/// Dispersion relation for finite depth: `ω = sqrt(g·k·tanh(k·h))`.
pub fn frequency(k: f32, g: f32, depth: f32) -> f32 {
    (g * k * (k * depth).min(TANH_CLAMP).tanh()).sqrt()
}

/// `dω/dk` of [`frequency`].
pub fn frequency_derivative(k: f32, g: f32, depth: f32) -> f32 {
    let th = (k * depth).min(TANH_CLAMP).tanh();
    let ch = (k * depth).cosh();
    g * (depth * k / ch / ch + th) / frequency(k, g, depth) / 2.0
}

/// Kitaigorodskii depth attenuation of a deep-water spectrum.
pub fn tma_correction(omega: f32, g: f32, depth: f32) -> f32 {
    let omega_h = omega * (depth / g).sqrt();
    if omega_h <= 1.0 {
        0.5 * omega_h * omega_h
    } else if omega_h < 2.0 {
        1.0 - 0.5 * (2.0 - omega_h) * (2.0 - omega_h)
    } else {
        1.0
    }
}

/// JONSWAP spectral density at `omega`, TMA-corrected for `depth`.
pub fn jonswap(omega: f32, g: f32, depth: f32, p: &SpectrumParameters) -> f32 {
    let sigma = if omega <= p.peak_omega { 0.07 } else { 0.09 };
    let r = (-(omega - p.peak_omega).powi(2) / 2.0 / sigma / sigma / p.peak_omega / p.peak_omega)
        .exp();
    let one_over_omega = 1.0 / omega;
    let peak_omega_over_omega = p.peak_omega / omega;
    p.scale
        * tma_correction(omega, g, depth)
        * p.alpha
        * g
        * g
        * one_over_omega.powi(5)
        * (-1.25 * peak_omega_over_omega.powi(4)).exp()
        * p.gamma.powf(r)
}

/// Polynomial fit of the `cos^2s` normalisation constant.
pub fn normalisation_factor(s: f32) -> f32 {
    let s2 = s * s;
    let s3 = s2 * s;
    let s4 = s3 * s;
    if s < 5.0 {
        -0.000564 * s4 + 0.00776 * s3 - 0.044 * s2 + 0.192 * s + 0.163
    } else {
        -4.80e-8 * s4 + 1.07e-5 * s3 - 9.53e-4 * s2 + 5.90e-2 * s + 3.93e-1
    }
}

/// Normalised `cos^2s(θ/2)` directional spreading.
pub fn cosine_2s(theta: f32, s: f32) -> f32 {
    normalisation_factor(s) * (theta / 2.0).cos().abs().powf(2.0 * s)
}

/// Spreading exponent as a function of frequency relative to the peak.
pub fn spread_power(omega: f32, peak_omega: f32) -> f32 {
    if omega > peak_omega {
        9.77 * (omega / peak_omega).abs().powf(-2.5)
    } else {
        6.97 * (omega / peak_omega).abs().powf(5.0)
    }
}

/// Directional distribution of energy at angle `theta` and frequency `omega`.
pub fn direction_spectrum(theta: f32, omega: f32, p: &SpectrumParameters) -> f32 {
    let s = spread_power(omega, p.peak_omega)
        + 16.0 * (omega / p.peak_omega).min(TANH_CLAMP).tanh() * p.swell * p.swell;
    let isotropic = 2.0 / PI * theta.cos() * theta.cos();
    let directional = cosine_2s(theta - p.angle, s);
    isotropic + (directional - isotropic) * p.spread_blend
}

/// `exp(−fade² · k²)`
pub fn short_waves_fade(k_length: f32, p: &SpectrumParameters) -> f32 {
    (-p.short_waves_fade * p.short_waves_fade * k_length * k_length).exp()
}
