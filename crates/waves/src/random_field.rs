//! Gaussian noise that seeds the initial spectrum.
//!
//! One complex standard-normal sample per cell, stored as a `Vec2`
//! (real, imaginary). The field depends only on the grid size and seed and is
//! shared read-only by every cascade of that size.

use glam::Vec2;
use swell_core::{Grid, OceanError, Xorshift64};

#[derive(Debug, Clone, PartialEq)]
pub struct RandomField {
    seed: u64,
    samples: Grid<Vec2>,
}

impl RandomField {
    /// Draws an `size × size` field of Box-Muller samples from `seed`.
    ///
    /// Cells are filled in row-major order, real part first, so the same
    /// `(size, seed)` always gives the same field.
    pub fn generate(size: usize, seed: u64) -> Result<Self, OceanError> {
        let mut samples = Grid::square(size)?;
        let mut rng = Xorshift64::new(seed);
        for cell in samples.data_mut() {
            let re = rng.next_gaussian();
            let im = rng.next_gaussian();
            *cell = Vec2::new(re, im);
        }
        Ok(Self { seed, samples })
    }

    pub fn size(&self) -> usize {
        self.samples.width()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn samples(&self) -> &Grid<Vec2> {
        &self.samples
    }

    /// The sample at in-range cell `(x, y)`.
    pub fn at(&self, x: usize, y: usize) -> Vec2 {
        self.samples.at(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_has_requested_size() {
        let field = RandomField::generate(32, 7).unwrap();
        assert_eq!(field.size(), 32);
        assert_eq!(field.samples().height(), 32);
        assert_eq!(field.seed(), 7);
    }

    #[test]
    fn same_seed_same_field() {
        let a = RandomField::generate(16, 42).unwrap();
        let b = RandomField::generate(16, 42).unwrap();
        for (x, y) in a.samples().data().iter().zip(b.samples().data()) {
            assert_eq!(x.x.to_bits(), y.x.to_bits());
            assert_eq!(x.y.to_bits(), y.y.to_bits());
        }
    }

    #[test]
    fn different_seeds_differ() {
        let a = RandomField::generate(16, 1).unwrap();
        let b = RandomField::generate(16, 2).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn samples_are_roughly_standard_normal() {
        let field = RandomField::generate(128, 3).unwrap();
        let values: Vec<f32> = field
            .samples()
            .data()
            .iter()
            .flat_map(|v| [v.x, v.y])
            .collect();
        let n = values.len() as f32;
        let mean = values.iter().sum::<f32>() / n;
        let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / n;
        assert!(mean.abs() < 0.05, "mean {mean}");
        assert!((var - 1.0).abs() < 0.05, "variance {var}");
        assert!(values.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn invalid_size_is_rejected() {
        assert!(RandomField::generate(0, 1).is_err());
    }
}
