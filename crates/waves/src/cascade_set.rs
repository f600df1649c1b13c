//! Several cascades at decreasing length scales, composed into one sea.
//!
//! Each cascade covers a contiguous band of wave numbers. The band boundary
//! between cascade `i` and `i + 1` is `2π / L_i · 6`: the largest patch keeps
//! everything from 0 up to that boundary, the smallest keeps everything above
//! its lower boundary. Cascades share one noise field and one set of FFT
//! tables and are advanced in parallel.

use std::f32::consts::TAU;
use std::sync::Arc;

use glam::Vec4;
use rayon::prelude::*;
use serde_json::{json, Value};
use swell_core::params::{param_bool, param_section};
use swell_core::seed::{validate_fft_size, DEFAULT_LENGTH_SCALES};
use swell_core::{Grid, MipChain, OceanError, Seed, Simulation};
use swell_fft::FftTableCache;

use crate::cascade::{Cascade, DisplacementReadback};
use crate::random_field::RandomField;
use crate::settings::{FoamSettings, WavesSettings};
use crate::spectrum::InitialSpectrum;

/// Fewest cascades a set may hold.
pub const MIN_CASCADES: usize = 2;
/// Most cascades a set may hold.
pub const MAX_CASCADES: usize = 4;
/// Band boundaries sit this many fundamental wave numbers above each patch's.
pub const BAND_BOUNDARY_FACTOR: f32 = 6.0;
/// Default FFT grid size.
pub const DEFAULT_SIZE: usize = 256;

/// Half-open wave number interval `[low, high)` in rad/m.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub low: f32,
    pub high: f32,
}

impl Band {
    pub fn contains(&self, k: f32) -> bool {
        k >= self.low && k < self.high
    }
}

/// Computes the band of every cascade from its length scale.
///
/// Length scales must be positive, finite and strictly decreasing, and there
/// must be between [`MIN_CASCADES`] and [`MAX_CASCADES`] of them. The bands
/// are contiguous, disjoint and together cover `[0, ∞)`.
pub fn cascade_bands(length_scales: &[f32]) -> Result<Vec<Band>, OceanError> {
    let count = length_scales.len();
    if !(MIN_CASCADES..=MAX_CASCADES).contains(&count) {
        return Err(OceanError::InvalidCascadeCount {
            count,
            max: MAX_CASCADES,
        });
    }
    if let Some(bad) = length_scales
        .iter()
        .find(|l| !(l.is_finite() && **l > 0.0))
    {
        return Err(OceanError::InvalidLengthScales(format!(
            "length scales must be positive and finite, got {bad}"
        )));
    }
    if let Some(pair) = length_scales.windows(2).find(|w| w[1] >= w[0]) {
        return Err(OceanError::InvalidLengthScales(format!(
            "length scales must strictly decrease, got {} then {}",
            pair[0], pair[1]
        )));
    }

    let boundary = |length: f32| TAU / length * BAND_BOUNDARY_FACTOR;
    let bands: Vec<Band> = (0..count)
        .map(|i| Band {
            low: if i == 0 {
                0.0
            } else {
                boundary(length_scales[i - 1])
            },
            high: if i + 1 == count {
                f32::INFINITY
            } else {
                boundary(length_scales[i])
            },
        })
        .collect();

    if let Some(empty) = bands.iter().find(|b| b.high <= b.low) {
        return Err(OceanError::InvalidBands(format!(
            "band [{}, {}) is empty",
            empty.low, empty.high
        )));
    }
    Ok(bands)
}

/// Everything needed to build a [`CascadeSet`].
#[derive(Debug, Clone, PartialEq)]
pub struct OceanConfig {
    /// FFT grid size shared by every cascade.
    pub size: usize,
    /// Seed of the Gaussian noise field.
    pub seed: u64,
    /// Patch side of each cascade in metres, largest first.
    pub length_scales: Vec<f32>,
    pub settings: WavesSettings,
    pub foam: FoamSettings,
    /// Regenerate the initial spectra every frame, not only on change.
    pub always_recalculate_initials: bool,
    pub generate_mips: bool,
}

impl Default for OceanConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            seed: 0,
            length_scales: DEFAULT_LENGTH_SCALES.to_vec(),
            settings: WavesSettings::default(),
            foam: FoamSettings::default(),
            always_recalculate_initials: false,
            generate_mips: true,
        }
    }
}

impl OceanConfig {
    /// Builds a config from a reproducible seed and its JSON parameters.
    pub fn from_seed(seed: &Seed) -> Result<Self, OceanError> {
        seed.validate()?;
        Ok(Self {
            size: seed.size,
            seed: seed.seed,
            length_scales: seed.length_scales.clone(),
            settings: WavesSettings::from_json(&seed.params),
            foam: FoamSettings::from_json(param_section(&seed.params, "foam")),
            always_recalculate_initials: param_bool(
                &seed.params,
                "always_recalculate_initials",
                false,
            ),
            generate_mips: param_bool(&seed.params, "generate_mips", true),
        })
    }

    pub fn validate(&self) -> Result<(), OceanError> {
        validate_fft_size(self.size)?;
        cascade_bands(&self.length_scales)?;
        self.settings.validate()?;
        self.foam.validate()
    }
}

/// A multi-cascade ocean.
pub struct CascadeSet {
    config: OceanConfig,
    tables: FftTableCache,
    noise: Arc<RandomField>,
    bands: Vec<Band>,
    cascades: Vec<Cascade>,
    /// Settings the current spectra were generated from.
    applied: Option<WavesSettings>,
}

impl CascadeSet {
    /// Validates `config`, allocates every cascade and computes the initial
    /// spectra. Nothing is returned unless all of it succeeded.
    pub fn new(config: OceanConfig) -> Result<Self, OceanError> {
        config.validate()?;
        let mut tables = FftTableCache::new();
        let noise = Arc::new(RandomField::generate(config.size, config.seed)?);
        let bands = cascade_bands(&config.length_scales)?;
        let cascades = build_cascades(&config, &mut tables, &noise)?;

        let mut set = Self {
            config,
            tables,
            noise,
            bands,
            cascades,
            applied: None,
        };
        set.calculate_initials()?;

        log::info!(
            "built cascade set: size {}, {} cascades, length scales {:?}",
            set.config.size,
            set.cascades.len(),
            set.config.length_scales
        );
        Ok(set)
    }

    /// Regenerates the initial spectrum of every cascade from the current settings.
    ///
    /// All spectra are generated before any cascade is touched; on error every
    /// cascade keeps the spectrum it had.
    pub fn calculate_initials(&mut self) -> Result<(), OceanError> {
        let settings = self.config.settings;
        let noise = &self.noise;
        let spectra = self
            .bands
            .par_iter()
            .zip(self.config.length_scales.par_iter())
            .map(|(band, &length_scale)| {
                InitialSpectrum::generate(noise, &settings, length_scale, band.low, band.high)
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (cascade, spectrum) in self.cascades.iter_mut().zip(spectra) {
            cascade.set_spectrum(spectrum, settings.lambda)?;
        }
        self.applied = Some(settings);
        Ok(())
    }

    /// Advances every cascade to `time`, `delta_time` seconds after the
    /// previous tick.
    ///
    /// Spectra are regenerated first when the settings changed since they were
    /// last computed, or on every call when always-recalculate is set. If that
    /// fails the error is returned and no cascade is advanced.
    ///
    /// `delta_time` must be non-negative; a negative step would grow foam on a
    /// calm sea.
    pub fn try_advance(&mut self, time: f32, delta_time: f32) -> Result<(), OceanError> {
        debug_assert!(
            delta_time >= 0.0,
            "delta_time must be non-negative, got {delta_time}"
        );
        if self.needs_initials() {
            self.calculate_initials()?;
        }
        self.cascades
            .par_iter_mut()
            .for_each(|cascade| cascade.calculate_waves_at_time(time, delta_time));
        log::trace!("advanced {} cascades to t = {time}", self.cascades.len());
        Ok(())
    }

    /// Infallible form of [`try_advance`](Self::try_advance): a tick whose
    /// spectra cannot be regenerated is skipped and logged, leaving every
    /// field as it was.
    pub fn advance(&mut self, time: f32, delta_time: f32) {
        if let Err(err) = self.try_advance(time, delta_time) {
            log::error!("skipped tick at t = {time}: {err}");
        }
    }

    fn needs_initials(&self) -> bool {
        self.config.always_recalculate_initials || self.applied != Some(self.config.settings)
    }

    /// Replaces the wave settings; spectra are regenerated on the next advance.
    pub fn set_settings(&mut self, settings: WavesSettings) -> Result<(), OceanError> {
        settings.validate()?;
        if settings != self.config.settings {
            log::debug!("wave settings changed; spectra will be regenerated");
        }
        self.config.settings = settings;
        Ok(())
    }

    pub fn set_always_recalculate_initials(&mut self, always: bool) {
        self.config.always_recalculate_initials = always;
    }

    /// Rebuilds noise, tables and cascades for a new grid size.
    ///
    /// Foam history is lost. On error the set is left unchanged.
    pub fn resize(&mut self, size: usize) -> Result<(), OceanError> {
        if size == self.config.size {
            return Ok(());
        }
        validate_fft_size(size)?;

        let mut config = self.config.clone();
        config.size = size;
        let noise = Arc::new(RandomField::generate(size, config.seed)?);
        let mut cascades = build_cascades(&config, &mut self.tables, &noise)?;
        for ((cascade, band), &length_scale) in cascades
            .iter_mut()
            .zip(&self.bands)
            .zip(&config.length_scales)
        {
            cascade.calculate_initials(&config.settings, length_scale, band.low, band.high)?;
        }

        self.tables.retain_only(size);
        self.config = config;
        self.noise = noise;
        self.cascades = cascades;
        self.applied = Some(self.config.settings);
        log::info!("resized cascade set to {size}x{size}");
        Ok(())
    }

    pub fn config(&self) -> &OceanConfig {
        &self.config
    }

    pub fn settings(&self) -> &WavesSettings {
        &self.config.settings
    }

    pub fn size(&self) -> usize {
        self.config.size
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    pub fn noise(&self) -> &RandomField {
        &self.noise
    }

    pub fn cascades(&self) -> &[Cascade] {
        &self.cascades
    }

    pub fn cascade(&self, index: usize) -> Option<&Cascade> {
        self.cascades.get(index)
    }

    /// Schema of every parameter accepted by [`OceanConfig::from_seed`].
    pub fn schema() -> Value {
        let mut schema = WavesSettings::schema();
        schema["size"] = json!({
            "type": "integer",
            "default": DEFAULT_SIZE,
            "min": 2,
            "max": 4096,
            "description": "FFT grid size (power of two)"
        });
        schema["seed"] = json!({
            "type": "integer",
            "default": 0,
            "description": "Seed of the Gaussian noise field"
        });
        schema["length_scales"] = json!({
            "type": "array",
            "default": DEFAULT_LENGTH_SCALES,
            "description": "Patch side of each cascade in metres, strictly decreasing"
        });
        schema["foam"] = json!({
            "type": "object",
            "description": "Foam accumulation",
            "properties": FoamSettings::schema()
        });
        schema["always_recalculate_initials"] = json!({
            "type": "boolean",
            "default": false,
            "description": "Regenerate the initial spectra every frame"
        });
        schema["generate_mips"] = json!({
            "type": "boolean",
            "default": true,
            "description": "Generate derivative and turbulence mip chains"
        });
        schema
    }

    /// Displacement readbacks of every cascade, largest patch first.
    pub fn readbacks(&self) -> Vec<DisplacementReadback<'_>> {
        self.cascades.iter().map(Cascade::readback).collect()
    }
}

fn build_cascades(
    config: &OceanConfig,
    tables: &mut FftTableCache,
    noise: &Arc<RandomField>,
) -> Result<Vec<Cascade>, OceanError> {
    let shared = tables.get_or_build(config.size)?;
    config
        .length_scales
        .iter()
        .map(|_| {
            Cascade::new(
                config.size,
                Arc::clone(&shared),
                Arc::clone(noise),
                config.foam,
                config.generate_mips,
            )
        })
        .collect()
}

impl Simulation for CascadeSet {
    /// Skips the tick, logging why, when the spectra cannot be regenerated.
    fn advance(&mut self, time: f32, delta_time: f32) {
        CascadeSet::advance(self, time, delta_time);
    }

    fn cascade_count(&self) -> usize {
        self.cascades.len()
    }

    fn displacement(&self, index: usize) -> Option<&Grid<Vec4>> {
        self.cascades.get(index).map(Cascade::displacement)
    }

    fn derivatives(&self, index: usize) -> Option<&MipChain<Vec4>> {
        self.cascades.get(index).map(Cascade::derivatives)
    }

    fn turbulence(&self, index: usize) -> Option<&MipChain<f32>> {
        self.cascades.get(index).map(Cascade::turbulence)
    }

    fn params(&self) -> Value {
        let mut params = self.config.settings.to_json();
        params["size"] = json!(self.config.size);
        params["seed"] = json!(self.config.seed);
        params["length_scales"] = json!(self.config.length_scales);
        params["foam"] = self.config.foam.to_json();
        params["always_recalculate_initials"] = json!(self.config.always_recalculate_initials);
        params["generate_mips"] = json!(self.config.generate_mips);
        params
    }

    fn param_schema(&self) -> Value {
        CascadeSet::schema()
    }
}
