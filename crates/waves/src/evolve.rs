//! Time evolution of the initial spectrum into packed FFT inputs.
//!
//! Eight real fields are needed per frame (three displacements and five
//! derivatives). Each of them is real in the spatial domain, so two of them
//! share one complex grid as `A + i·B`. After the inverse transform the real
//! part holds `A` and the imaginary part holds `B`; [`unpack`] reads them
//! back. The layout is:
//!
//! | grid       | real (A) | imaginary (B) |
//! |------------|----------|---------------|
//! | `dx_dz`    | Dx       | Dz            |
//! | `dy_dxz`   | Dy       | Dz/dx         |
//! | `dyx_dyz`  | Dy/dx    | Dy/dz         |
//! | `dxx_dzz`  | Dx/dx    | Dz/dz         |

use num_complex::Complex32;
use swell_core::{Grid, OceanError};

use crate::spectrum::InitialSpectrum;

const I: Complex32 = Complex32::new(0.0, 1.0);

/// The four packed frequency-domain grids of one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedAmplitudes {
    pub dx_dz: Grid<Complex32>,
    pub dy_dxz: Grid<Complex32>,
    pub dyx_dyz: Grid<Complex32>,
    pub dxx_dzz: Grid<Complex32>,
}

impl PackedAmplitudes {
    /// Zeroed grids for an `size × size` cascade.
    pub fn new(size: usize) -> Result<Self, OceanError> {
        Ok(Self {
            dx_dz: Grid::square(size)?,
            dy_dxz: Grid::square(size)?,
            dyx_dyz: Grid::square(size)?,
            dxx_dzz: Grid::square(size)?,
        })
    }

    pub fn size(&self) -> usize {
        self.dx_dz.width()
    }

    /// All four grids, in layout order, for passes that treat them alike.
    pub fn grids_mut(&mut self) -> [&mut Grid<Complex32>; 4] {
        [
            &mut self.dx_dz,
            &mut self.dy_dxz,
            &mut self.dyx_dyz,
            &mut self.dxx_dzz,
        ]
    }
}

/// Packs two fields into one complex value: `a + i·b`.
pub fn pack(a: Complex32, b: Complex32) -> Complex32 {
    a + I * b
}

/// Splits a transformed packed value into its `(A, B)` fields.
pub fn unpack(value: Complex32) -> (f32, f32) {
    (value.re, value.im)
}

/// Evolves `spectrum` to time `time` into freshly allocated grids.
pub fn evolve(spectrum: &InitialSpectrum, time: f32) -> Result<PackedAmplitudes, OceanError> {
    let mut out = PackedAmplitudes::new(spectrum.size())?;
    evolve_into(spectrum, time, &mut out);
    Ok(out)
}

/// Evolves `spectrum` to time `time`, overwriting `out`.
///
/// # Panics
///
/// Panics if `out` is not the same size as `spectrum`.
pub fn evolve_into(spectrum: &InitialSpectrum, time: f32, out: &mut PackedAmplitudes) {
    assert_eq!(
        out.size(),
        spectrum.size(),
        "packed amplitudes do not match spectrum size"
    );

    let cells = spectrum
        .samples()
        .data()
        .iter()
        .zip(spectrum.waves().data())
        .zip(out.dx_dz.data_mut())
        .zip(out.dy_dxz.data_mut())
        .zip(out.dyx_dyz.data_mut())
        .zip(out.dxx_dzz.data_mut());

    for (((((sample, wave), dx_dz), dy_dxz), dyx_dyz), dxx_dzz) in cells {
        let phase = wave.omega * time;
        let exponent = Complex32::new(phase.cos(), phase.sin());
        let h = sample.h0 * exponent + sample.h0_minus_k_conj * exponent.conj();
        let ih = I * h;

        let (kx, kz) = (wave.k.x, wave.k.y);
        let inv = wave.inv_length;

        let displacement_x = ih * kx * inv;
        let displacement_y = h;
        let displacement_z = ih * kz * inv;
        let displacement_x_dx = -h * kx * kx * inv;
        let displacement_y_dx = ih * kx;
        let displacement_z_dx = -h * kx * kz * inv;
        let displacement_y_dz = ih * kz;
        let displacement_z_dz = -h * kz * kz * inv;

        *dx_dz = pack(displacement_x, displacement_z);
        *dy_dxz = pack(displacement_y, displacement_z_dx);
        *dyx_dyz = pack(displacement_y_dx, displacement_y_dz);
        *dxx_dzz = pack(displacement_x_dx, displacement_z_dz);
    }
}
