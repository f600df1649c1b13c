//! Water height queries on top of a cascade's displacement readback.
//!
//! The surface point above world position `q` is the grid point `p` whose
//! displaced position `p + D(p)` lands on `q` horizontally. `p` is found by
//! fixed-point iteration `p ← q − D(p)`, then the height is `D(p).y`.

use glam::{Vec3, Vec4};
use swell_waves::{CascadeSet, DisplacementReadback};

/// Fixed-point refinements applied before the final sample.
const HEIGHT_ITERATIONS: usize = 3;

fn sample_repeat(readback: &DisplacementReadback<'_>, x: i64, y: i64) -> Vec4 {
    let n = readback.size as i64;
    let xi = x.rem_euclid(n) as usize;
    let yi = y.rem_euclid(n) as usize;
    readback.data[yi * readback.size + xi]
}

/// Bilinearly interpolated displacement at world position `(x, z)`.
///
/// The patch tiles the plane; coordinates outside `[0, L)` wrap around.
pub fn sample_displacement(readback: &DisplacementReadback<'_>, x: f32, z: f32) -> Vec3 {
    let size = readback.size as f32;
    let gx = x / readback.length_scale * size;
    let gy = z / readback.length_scale * size;
    let fx = gx.floor();
    let fy = gy.floor();
    let (tx, ty) = (gx - fx, gy - fy);
    let (xi, yi) = (fx as i64, fy as i64);

    let c00 = sample_repeat(readback, xi, yi);
    let c10 = sample_repeat(readback, xi + 1, yi);
    let c01 = sample_repeat(readback, xi, yi + 1);
    let c11 = sample_repeat(readback, xi + 1, yi + 1);

    let value = c00 * ((1.0 - tx) * (1.0 - ty))
        + c10 * (tx * (1.0 - ty))
        + c01 * ((1.0 - tx) * ty)
        + c11 * (tx * ty);
    value.truncate()
}

/// Height of the displaced surface above `(x, z)` in one cascade.
pub fn height_at(readback: &DisplacementReadback<'_>, x: f32, z: f32) -> f32 {
    let query = Vec3::new(x, 0.0, z);
    let mut displacement = sample_displacement(readback, x, z);
    for _ in 0..HEIGHT_ITERATIONS {
        let p = query - displacement;
        displacement = sample_displacement(readback, p.x, p.z);
    }
    displacement.y
}

/// Water height at `(x, z)` from the largest cascade, or `None` when the set
/// has no cascades.
pub fn try_get_height(set: &CascadeSet, x: f32, z: f32) -> Option<f32> {
    set.cascade(0).map(|c| height_at(&c.readback(), x, z))
}
