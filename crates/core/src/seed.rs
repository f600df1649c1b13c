//! Reproducible description of an ocean simulation run.
//!
//! A [`Seed`] captures everything needed to recreate a sequence of frames:
//! grid size, noise seed, cascade length scales, spectrum parameters, and how
//! many ticks of which length to run.

use crate::error::OceanError;
use serde::{Deserialize, Serialize};

/// Default cascade length scales in world units (largest first).
pub const DEFAULT_LENGTH_SCALES: [f32; 3] = [250.0, 17.0, 5.0];

/// Reproducible specification for an ocean run.
///
/// Two identical `Seed` values produce bit-identical fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seed {
    pub size: usize,
    pub seed: u64,
    pub length_scales: Vec<f32>,
    pub params: serde_json::Value,
    pub ticks: usize,
    pub dt: f32,
}

impl Seed {
    /// Creates a Seed with default length scales, empty params and no ticks.
    pub fn new(size: usize, seed: u64) -> Self {
        Self {
            size,
            seed,
            length_scales: DEFAULT_LENGTH_SCALES.to_vec(),
            params: serde_json::Value::Object(serde_json::Map::new()),
            ticks: 0,
            dt: 1.0 / 60.0,
        }
    }

    /// Validates the grid size and tick length.
    ///
    /// Length scales and bands are validated when the cascade set is built,
    /// since their rules belong to the cascade layer.
    pub fn validate(&self) -> Result<(), OceanError> {
        validate_fft_size(self.size)?;
        if !(self.dt.is_finite() && self.dt >= 0.0) {
            return Err(OceanError::InvalidParameter {
                name: "dt".into(),
                reason: format!("must be finite and non-negative, got {}", self.dt),
            });
        }
        Ok(())
    }
}

/// Checks that `size` is a power of two no smaller than 2.
pub fn validate_fft_size(size: usize) -> Result<(), OceanError> {
    if size < 2 || !size.is_power_of_two() {
        return Err(OceanError::NotPowerOfTwo { size });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_creates_seed_with_defaults() {
        let s = Seed::new(256, 42);
        assert_eq!(s.size, 256);
        assert_eq!(s.seed, 42);
        assert_eq!(s.length_scales, vec![250.0, 17.0, 5.0]);
        assert_eq!(s.ticks, 0);
        assert_eq!(s.params, serde_json::json!({}));
    }

    #[test]
    fn json_round_trip_with_custom_params() {
        let mut s = Seed::new(64, 99);
        s.params = serde_json::json!({
            "lambda": 0.8,
            "local": {"wind_speed": 10.0, "fetch": 100000.0}
        });
        s.ticks = 120;
        s.length_scales = vec![100.0, 10.0];

        let json = serde_json::to_string_pretty(&s).unwrap();
        let restored: Seed = serde_json::from_str(&json).unwrap();
        assert_eq!(s, restored);
    }

    #[test]
    fn json_contains_expected_keys() {
        let v = serde_json::to_value(Seed::new(128, 1)).unwrap();
        for key in ["size", "seed", "length_scales", "params", "ticks", "dt"] {
            assert!(v.get(key).is_some(), "missing key {key}");
        }
    }

    #[test]
    fn validate_accepts_power_of_two() {
        assert!(Seed::new(64, 1).validate().is_ok());
        assert!(Seed::new(2, 1).validate().is_ok());
    }

    #[test]
    fn validate_rejects_non_power_of_two() {
        assert!(matches!(
            Seed::new(100, 1).validate(),
            Err(OceanError::NotPowerOfTwo { size: 100 })
        ));
    }

    #[test]
    fn validate_rejects_zero_and_one() {
        assert!(Seed::new(0, 1).validate().is_err());
        assert!(Seed::new(1, 1).validate().is_err());
    }

    #[test]
    fn validate_rejects_negative_dt() {
        let mut s = Seed::new(64, 1);
        s.dt = -0.1;
        assert!(matches!(
            s.validate(),
            Err(OceanError::InvalidParameter { .. })
        ));
    }
}
