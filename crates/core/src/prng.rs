//! Deterministic PRNG based on the Xorshift64 algorithm, plus the Box-Muller
//! transform used to draw the Gaussian noise that seeds an ocean spectrum.
//!
//! Same seed always produces the same sequence on every platform, so a
//! simulation built from a [`Seed`](crate::Seed) is reproducible bit for bit.

use serde::{Deserialize, Serialize};

/// Xorshift64 deterministic PRNG with shift parameters (13, 7, 17).
///
/// A seed of 0 is replaced with a non-zero fallback to avoid the all-zeros
/// fixed point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    /// Creates a new PRNG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Advances the state and returns the next 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Returns a uniformly distributed f64 in [0, 1) from the upper 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Returns a uniformly distributed f64 in the open interval (0, 1).
    ///
    /// Used where a logarithm of the sample is taken.
    pub fn next_open_f64(&mut self) -> f64 {
        ((self.next_u64() >> 11) as f64 + 0.5) / (1u64 << 53) as f64
    }

    /// Returns one standard-normal sample via the Box-Muller transform.
    ///
    /// Consumes two uniform draws: `cos(2π·u1) · sqrt(-2·ln(u2))`.
    pub fn next_gaussian(&mut self) -> f32 {
        let u1 = self.next_f64();
        let u2 = self.next_open_f64();
        ((std::f64::consts::TAU * u1).cos() * (-2.0 * u2.ln()).sqrt()) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_u64_produces_known_golden_value_for_seed_42() {
        // If this breaks, every stored seed produces a different sea.
        let mut rng = Xorshift64::new(42);
        assert_eq!(rng.next_u64(), 45_454_805_674);
    }

    #[test]
    fn seed_zero_does_not_produce_all_zeros() {
        let mut rng = Xorshift64::new(0);
        assert_ne!(rng.next_u64(), 0);
        assert_ne!(rng.next_u64(), 0);
    }

    #[test]
    fn two_instances_with_same_seed_produce_identical_gaussians() {
        let mut a = Xorshift64::new(42);
        let mut b = Xorshift64::new(42);
        for i in 0..1000 {
            assert_eq!(
                a.next_gaussian().to_bits(),
                b.next_gaussian().to_bits(),
                "sequences diverged at index {i}"
            );
        }
    }

    #[test]
    fn next_open_f64_excludes_both_ends() {
        let mut rng = Xorshift64::new(12345);
        for _ in 0..10_000 {
            let v = rng.next_open_f64();
            assert!(v > 0.0 && v < 1.0, "next_open_f64() = {v}");
        }
    }

    #[test]
    fn gaussian_samples_are_finite() {
        let mut rng = Xorshift64::new(3);
        for _ in 0..10_000 {
            assert!(rng.next_gaussian().is_finite());
        }
    }

    #[test]
    fn gaussian_moments_match_standard_normal() {
        let mut rng = Xorshift64::new(2024);
        let n = 200_000;
        let samples: Vec<f64> = (0..n).map(|_| rng.next_gaussian() as f64).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|s| (s - mean) * (s - mean)).sum::<f64>() / n as f64;
        assert!(mean.abs() < 0.02, "mean {mean} too far from 0");
        assert!((var - 1.0).abs() < 0.03, "variance {var} too far from 1");
    }

    #[test]
    fn serialization_roundtrip_preserves_state() {
        let mut rng = Xorshift64::new(42);
        for _ in 0..50 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: Xorshift64 = serde_json::from_str(&json).unwrap();
        for _ in 0..100 {
            assert_eq!(rng.next_u64(), restored.next_u64());
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn next_f64_in_unit_interval_for_any_seed(seed: u64) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_f64();
                    prop_assert!((0.0..1.0).contains(&v), "next_f64() = {v} for seed {seed}");
                }
            }

            #[test]
            fn gaussian_is_finite_for_any_seed(seed: u64) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    prop_assert!(rng.next_gaussian().is_finite());
                }
            }
        }
    }
}
