//! One spectral synthesis pipeline covering a single length scale.
//!
//! Per frame a cascade runs, in order: time evolution of its initial spectrum,
//! four inverse FFTs, a fill pass producing displacement, derivatives and foam,
//! and (optionally) mip generation. Each pass fully writes its output before
//! the next one reads it.

use std::sync::Arc;

use glam::Vec4;
use num_complex::Complex32;
use swell_core::{Grid, MipChain, OceanError};
use swell_fft::{inverse_2d, FftTables, TransformOptions};

use crate::evolve::{evolve_into, unpack, PackedAmplitudes};
use crate::random_field::RandomField;
use crate::settings::{FoamSettings, WavesSettings};
use crate::spectrum::InitialSpectrum;

/// Borrowed view of a cascade's displacement, for height queries.
#[derive(Debug, Clone, Copy)]
pub struct DisplacementReadback<'a> {
    /// Row-major `(x, y, z, 0)` displacements, `size × size`.
    pub data: &'a [Vec4],
    pub size: usize,
    /// World-space side of the tiled patch.
    pub length_scale: f32,
}

pub struct Cascade {
    size: usize,
    tables: Arc<FftTables>,
    noise: Arc<RandomField>,
    foam: FoamSettings,
    generate_mips: bool,
    lambda: f32,
    spectrum: InitialSpectrum,
    amplitudes: PackedAmplitudes,
    scratch: Grid<Complex32>,
    displacement: Grid<Vec4>,
    derivatives: MipChain<Vec4>,
    turbulence: MipChain<f32>,
}

impl Cascade {
    /// Allocates every buffer of an `size × size` cascade.
    ///
    /// The cascade starts with a flat spectrum; call
    /// [`calculate_initials`](Self::calculate_initials) before the first frame.
    pub fn new(
        size: usize,
        tables: Arc<FftTables>,
        noise: Arc<RandomField>,
        foam: FoamSettings,
        generate_mips: bool,
    ) -> Result<Self, OceanError> {
        if tables.size() != size {
            return Err(OceanError::DimensionMismatch {
                lhs_w: size,
                lhs_h: size,
                rhs_w: tables.size(),
                rhs_h: tables.size(),
            });
        }
        if noise.size() != size {
            return Err(OceanError::DimensionMismatch {
                lhs_w: size,
                lhs_h: size,
                rhs_w: noise.size(),
                rhs_h: noise.size(),
            });
        }
        foam.validate()?;

        let mut turbulence = MipChain::new(size, size)?;
        turbulence.base_mut().fill(foam.min);

        Ok(Self {
            size,
            tables,
            noise,
            foam,
            generate_mips,
            lambda: WavesSettings::default().lambda,
            spectrum: InitialSpectrum::flat(size)?,
            amplitudes: PackedAmplitudes::new(size)?,
            scratch: Grid::square(size)?,
            displacement: Grid::square(size)?,
            derivatives: MipChain::new(size, size)?,
            turbulence,
        })
    }

    /// Regenerates the initial spectrum for the band `[cutoff_low, cutoff_high)`.
    pub fn calculate_initials(
        &mut self,
        settings: &WavesSettings,
        length_scale: f32,
        cutoff_low: f32,
        cutoff_high: f32,
    ) -> Result<(), OceanError> {
        let spectrum =
            InitialSpectrum::generate(&self.noise, settings, length_scale, cutoff_low, cutoff_high)?;
        self.set_spectrum(spectrum, settings.lambda)
    }

    /// Installs a spectrum generated elsewhere, together with the choppiness
    /// it was generated for.
    pub fn set_spectrum(
        &mut self,
        spectrum: InitialSpectrum,
        lambda: f32,
    ) -> Result<(), OceanError> {
        if spectrum.size() != self.size {
            return Err(OceanError::DimensionMismatch {
                lhs_w: self.size,
                lhs_h: self.size,
                rhs_w: spectrum.size(),
                rhs_h: spectrum.size(),
            });
        }
        self.spectrum = spectrum;
        self.lambda = lambda;
        Ok(())
    }

    /// Produces the fields for absolute time `time`, `delta_time` after the
    /// previous frame. `delta_time` only affects foam decay.
    pub fn calculate_waves_at_time(&mut self, time: f32, delta_time: f32) {
        evolve_into(&self.spectrum, time, &mut self.amplitudes);
        for grid in self.amplitudes.grids_mut() {
            inverse_2d(&self.tables, grid, &mut self.scratch, TransformOptions::OCEAN);
        }
        self.fill(delta_time);
        if self.generate_mips {
            self.derivatives.generate();
            self.turbulence.generate();
        }
    }

    fn fill(&mut self, delta_time: f32) {
        let lambda = self.lambda;
        let foam = self.foam;
        let packed = &self.amplitudes;

        let cells = self
            .displacement
            .data_mut()
            .iter_mut()
            .zip(self.derivatives.base_mut().data_mut())
            .zip(self.turbulence.base_mut().data_mut())
            .zip(packed.dx_dz.data())
            .zip(packed.dy_dxz.data())
            .zip(packed.dyx_dyz.data())
            .zip(packed.dxx_dzz.data());

        for ((((((displacement, derivatives), turbulence), dx_dz), dy_dxz), dyx_dyz), dxx_dzz) in
            cells
        {
            let (dx, dz) = unpack(*dx_dz);
            let (dy, dxz) = unpack(*dy_dxz);
            let (dyx, dyz) = unpack(*dyx_dyz);
            let (dxx, dzz) = unpack(*dxx_dzz);

            *displacement = Vec4::new(lambda * dx, dy, lambda * dz, 0.0);
            *derivatives = Vec4::new(dyx, dyz, lambda * dxx, lambda * dzz);

            let jacobian =
                (1.0 + lambda * dxx) * (1.0 + lambda * dzz) - lambda * lambda * dxz * dxz;
            *turbulence = foam_step(*turbulence, jacobian, delta_time, &foam);
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn spectrum(&self) -> &InitialSpectrum {
        &self.spectrum
    }

    pub fn length_scale(&self) -> f32 {
        self.spectrum.length_scale()
    }

    pub fn cutoff_low(&self) -> f32 {
        self.spectrum.cutoff_low()
    }

    pub fn cutoff_high(&self) -> f32 {
        self.spectrum.cutoff_high()
    }

    pub fn lambda(&self) -> f32 {
        self.lambda
    }

    pub fn displacement(&self) -> &Grid<Vec4> {
        &self.displacement
    }

    pub fn derivatives(&self) -> &MipChain<Vec4> {
        &self.derivatives
    }

    pub fn turbulence(&self) -> &MipChain<f32> {
        &self.turbulence
    }

    pub fn readback(&self) -> DisplacementReadback<'_> {
        DisplacementReadback {
            data: self.displacement.data(),
            size: self.size,
            length_scale: self.length_scale(),
        }
    }
}

/// One frame of foam accumulation.
///
/// Foam fades by `dt · decay_rate`, faster where the surface is compressed
/// (`J < 1`), and is raised to at least `1 − J` where crests fold.
pub fn foam_step(foam: f32, jacobian: f32, delta_time: f32, settings: &FoamSettings) -> f32 {
    let decayed = foam - delta_time * settings.decay_rate / jacobian.max(settings.jacobian_floor);
    decayed.max(1.0 - jacobian).clamp(settings.min, settings.max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cascade(size: usize, seed: u64) -> Cascade {
        let tables = Arc::new(FftTables::precompute(size).unwrap());
        let noise = Arc::new(RandomField::generate(size, seed).unwrap());
        Cascade::new(size, tables, noise, FoamSettings::default(), true).unwrap()
    }

    fn windy() -> WavesSettings {
        let mut s = WavesSettings::default();
        s.local.wind_speed = 10.0;
        s.local.fetch = 100_000.0;
        s.local.wind_direction = 0.0;
        s
    }

    fn calm() -> WavesSettings {
        let mut s = WavesSettings::default();
        s.local.scale = 0.0;
        s.swell.scale = 0.0;
        s
    }

    // -- spectrum installation --

    #[test]
    fn set_spectrum_installs_spectrum_and_lambda() {
        let mut c = cascade(16, 3);
        let spectrum =
            InitialSpectrum::generate(&c.noise, &windy(), 100.0, 0.0, f32::INFINITY).unwrap();
        c.set_spectrum(spectrum.clone(), 0.7).unwrap();
        assert_eq!(c.spectrum(), &spectrum);
        assert_eq!(c.lambda(), 0.7);
        assert_eq!(c.length_scale(), 100.0);
    }

    #[test]
    fn set_spectrum_rejects_other_size() {
        let mut c = cascade(16, 3);
        let before = c.spectrum().clone();
        let wrong = InitialSpectrum::flat(8).unwrap();
        assert!(matches!(
            c.set_spectrum(wrong, 0.5),
            Err(OceanError::DimensionMismatch { rhs_w: 8, .. })
        ));
        assert_eq!(c.spectrum(), &before);
        assert_eq!(c.lambda(), 1.0);
    }

    // -- construction --

    #[test]
    fn new_rejects_mismatched_tables() {
        let tables = Arc::new(FftTables::precompute(16).unwrap());
        let noise = Arc::new(RandomField::generate(32, 1).unwrap());
        assert!(matches!(
            Cascade::new(32, tables, noise, FoamSettings::default(), true),
            Err(OceanError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn new_rejects_mismatched_noise() {
        let tables = Arc::new(FftTables::precompute(32).unwrap());
        let noise = Arc::new(RandomField::generate(16, 1).unwrap());
        assert!(Cascade::new(32, tables, noise, FoamSettings::default(), true).is_err());
    }

    #[test]
    fn new_cascade_is_flat() {
        let mut c = cascade(16, 1);
        c.calculate_waves_at_time(1.0, 0.1);
        assert!(c.displacement().data().iter().all(|v| *v == Vec4::ZERO));
        assert_eq!(c.derivatives().len(), 5);
        assert_eq!(c.turbulence().len(), 5);
    }

    // -- fields --

    #[test]
    fn origin_displacement_equals_sum_of_time_zero_spectrum() {
        let n = 64;
        let mut c = cascade(n, 17);
        let settings = windy();
        c.calculate_initials(&settings, 250.0, 0.0, f32::INFINITY).unwrap();
        c.calculate_waves_at_time(0.0, 0.0);

        // The inverse transform at the origin is the plain sum of all bins.
        let packed = crate::evolve::evolve(c.spectrum(), 0.0).unwrap();
        let sum = |grid: &Grid<Complex32>| -> Complex32 { grid.data().iter().sum() };
        let dx_dz = sum(&packed.dx_dz);
        let dy_dxz = sum(&packed.dy_dxz);

        let origin = c.displacement().at(0, 0);
        let tolerance = 1e-3;
        assert!((origin.x - settings.lambda * dx_dz.re).abs() < tolerance);
        assert!((origin.y - dy_dxz.re).abs() < tolerance);
        assert!((origin.z - settings.lambda * dx_dz.im).abs() < tolerance);
        assert_eq!(origin.w, 0.0);
        assert!(origin.y != 0.0);
    }

    #[test]
    fn lambda_scales_horizontal_displacement_only() {
        let n = 32;
        let mut a = cascade(n, 4);
        let mut b = cascade(n, 4);
        let mut settings = windy();
        a.calculate_initials(&settings, 100.0, 0.0, f32::INFINITY).unwrap();
        settings.lambda = 0.5;
        b.calculate_initials(&settings, 100.0, 0.0, f32::INFINITY).unwrap();
        a.calculate_waves_at_time(2.0, 0.0);
        b.calculate_waves_at_time(2.0, 0.0);
        for (va, vb) in a.displacement().data().iter().zip(b.displacement().data()) {
            assert!((va.x * 0.5 - vb.x).abs() < 1e-5);
            assert_eq!(va.y.to_bits(), vb.y.to_bits());
        }
        assert_eq!(b.lambda(), 0.5);
    }

    #[test]
    fn surface_moves_over_time() {
        let mut c = cascade(32, 8);
        c.calculate_initials(&windy(), 100.0, 0.0, f32::INFINITY).unwrap();
        c.calculate_waves_at_time(0.0, 0.0);
        let before = c.displacement().clone();
        c.calculate_waves_at_time(1.0, 1.0);
        assert_ne!(&before, c.displacement());
    }

    #[test]
    fn same_inputs_give_bit_identical_frames() {
        let mut a = cascade(32, 21);
        let mut b = cascade(32, 21);
        for c in [&mut a, &mut b] {
            c.calculate_initials(&windy(), 17.0, 0.0, f32::INFINITY).unwrap();
            c.calculate_waves_at_time(4.5, 1.0 / 60.0);
        }
        for (x, y) in a.displacement().data().iter().zip(b.displacement().data()) {
            assert_eq!(x.to_array().map(f32::to_bits), y.to_array().map(f32::to_bits));
        }
    }

    #[test]
    fn readback_exposes_raw_displacement() {
        let mut c = cascade(16, 2);
        c.calculate_initials(&windy(), 42.0, 0.0, f32::INFINITY).unwrap();
        c.calculate_waves_at_time(0.5, 0.0);
        let readback = c.readback();
        assert_eq!(readback.size, 16);
        assert_eq!(readback.length_scale, 42.0);
        assert_eq!(readback.data, c.displacement().data());
    }

    #[test]
    fn derivative_mips_are_box_filtered() {
        let mut c = cascade(16, 3);
        c.calculate_initials(&windy(), 30.0, 0.0, f32::INFINITY).unwrap();
        c.calculate_waves_at_time(1.0, 0.0);
        let base = c.derivatives().base();
        let level1 = c.derivatives().level(1).unwrap();
        let expected = (base.at(0, 0) + base.at(1, 0) + base.at(0, 1) + base.at(1, 1)) * 0.25;
        assert!((level1.at(0, 0) - expected).length() < 1e-6);
    }

    #[test]
    fn mips_are_skipped_when_disabled() {
        let n = 16;
        let tables = Arc::new(FftTables::precompute(n).unwrap());
        let noise = Arc::new(RandomField::generate(n, 3).unwrap());
        let mut c = Cascade::new(n, tables, noise, FoamSettings::default(), false).unwrap();
        c.calculate_initials(&windy(), 30.0, 0.0, f32::INFINITY).unwrap();
        c.calculate_waves_at_time(1.0, 0.0);
        let level1 = c.derivatives().level(1).unwrap();
        assert!(level1.data().iter().all(|v| *v == Vec4::ZERO));
    }

    // -- foam --

    #[test]
    fn foam_step_decays_on_flat_surface() {
        let settings = FoamSettings::default();
        let next = foam_step(1.0, 1.0, 0.1, &settings);
        assert!((next - 0.95).abs() < 1e-6);
    }

    #[test]
    fn foam_step_rises_where_crests_fold() {
        let settings = FoamSettings::default();
        assert_eq!(foam_step(0.0, -0.5, 0.1, &settings), 1.0);
        assert!((foam_step(0.0, 0.6, 0.0, &settings) - 0.4).abs() < 1e-6);
    }

    #[test]
    fn foam_step_clamps_to_bounds() {
        let settings = FoamSettings {
            min: 0.1,
            max: 0.7,
            ..FoamSettings::default()
        };
        assert_eq!(foam_step(0.0, 1.0, 1.0, &settings), 0.1);
        assert_eq!(foam_step(0.0, -3.0, 0.0, &settings), 0.7);
    }

    #[test]
    fn turbulence_decays_monotonically_on_calm_sea() {
        let mut c = cascade(16, 5);
        c.calculate_initials(&calm(), 50.0, 0.0, f32::INFINITY).unwrap();
        c.turbulence.base_mut().fill(1.0);

        let dt = 0.25;
        let mut previous = 1.0;
        for step in 1..=10 {
            c.calculate_waves_at_time(step as f32 * dt, dt);
            let value = c.turbulence().base().at(3, 7);
            let expected = (1.0 - step as f32 * dt * 0.5).max(0.0);
            assert!(value <= previous, "step {step}: {value} > {previous}");
            assert!((value - expected).abs() < 1e-5, "step {step}: {value} vs {expected}");
            previous = value;
        }
        assert_eq!(previous, 0.0);
        assert!(c.turbulence().base().data().iter().all(|&f| f == 0.0));
    }
}
