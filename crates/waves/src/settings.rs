//! Wave spectrum settings: the user-facing component form, the derived form
//! consumed by the spectrum generator, and foam accumulation settings.
//!
//! Settings travel as JSON objects. Every reader falls back to the default
//! for a missing or wrongly typed key, so `{}` yields the default sea.

use std::f32::consts::PI;

use serde_json::{json, Value};
use swell_core::params::{param_f32, param_section};
use swell_core::OceanError;

/// Default gravitational acceleration in m/s².
pub const DEFAULT_GRAVITY: f32 = 9.81;
/// Default water depth in metres.
pub const DEFAULT_DEPTH: f32 = 500.0;
/// Default horizontal displacement multiplier ("choppiness").
pub const DEFAULT_LAMBDA: f32 = 1.0;

/// Lower clamp applied to `swell` before it reaches the spreading function.
const MIN_SWELL: f32 = 0.01;

/// Names of the two spectrum components every sea carries.
pub const COMPONENT_NAMES: [&str; 2] = ["local", "swell"];

/// One directional spectrum component as a user describes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumComponent {
    /// Energy multiplier, `0` disables the component.
    pub scale: f32,
    /// Wind speed in m/s.
    pub wind_speed: f32,
    /// Direction the waves travel towards, in degrees.
    pub wind_direction: f32,
    /// Distance in metres over which the wind has blown.
    pub fetch: f32,
    /// Blend between isotropic `cos²` spreading (0) and `cos^2s` spreading (1).
    pub spread_blend: f32,
    /// How much the spreading narrows around the peak frequency.
    pub swell: f32,
    /// JONSWAP peak enhancement factor γ.
    pub peak_enhancement: f32,
    /// Length scale below which waves are attenuated.
    pub short_waves_fade: f32,
}

impl SpectrumComponent {
    /// Wind sea generated by the local wind.
    pub const LOCAL: Self = Self {
        scale: 1.0,
        wind_speed: 0.5,
        wind_direction: 90.0,
        fetch: 100_000.0,
        spread_blend: 1.0,
        swell: 0.2,
        peak_enhancement: 3.3,
        short_waves_fade: 0.01,
    };

    /// Long-period swell arriving from far away; disabled by default.
    pub const SWELL: Self = Self {
        scale: 0.0,
        wind_speed: 1.0,
        wind_direction: 0.0,
        fetch: 300_000.0,
        spread_blend: 1.0,
        swell: 1.0,
        peak_enhancement: 3.3,
        short_waves_fade: 0.01,
    };

    /// Reads a component from a JSON object, using `defaults` for missing keys.
    pub fn from_json(params: &Value, defaults: &Self) -> Self {
        Self {
            scale: param_f32(params, "scale", defaults.scale),
            wind_speed: param_f32(params, "wind_speed", defaults.wind_speed),
            wind_direction: param_f32(params, "wind_direction", defaults.wind_direction),
            fetch: param_f32(params, "fetch", defaults.fetch),
            spread_blend: param_f32(params, "spread_blend", defaults.spread_blend),
            swell: param_f32(params, "swell", defaults.swell),
            peak_enhancement: param_f32(params, "peak_enhancement", defaults.peak_enhancement),
            short_waves_fade: param_f32(params, "short_waves_fade", defaults.short_waves_fade),
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "scale": self.scale,
            "wind_speed": self.wind_speed,
            "wind_direction": self.wind_direction,
            "fetch": self.fetch,
            "spread_blend": self.spread_blend,
            "swell": self.swell,
            "peak_enhancement": self.peak_enhancement,
            "short_waves_fade": self.short_waves_fade,
        })
    }

    /// Schema of a component, with `defaults` as the reported default values.
    pub fn schema(defaults: &Self) -> Value {
        json!({
            "scale": {
                "type": "number",
                "default": defaults.scale,
                "min": 0.0,
                "max": 1.0,
                "description": "Energy multiplier; 0 disables the component"
            },
            "wind_speed": {
                "type": "number",
                "default": defaults.wind_speed,
                "min": 0.0,
                "max": 60.0,
                "description": "Wind speed in m/s (must be positive)"
            },
            "wind_direction": {
                "type": "number",
                "default": defaults.wind_direction,
                "min": 0.0,
                "max": 360.0,
                "description": "Wave travel direction in degrees"
            },
            "fetch": {
                "type": "number",
                "default": defaults.fetch,
                "min": 0.0,
                "max": 1_000_000.0,
                "description": "Distance in metres over which the wind blows (must be positive)"
            },
            "spread_blend": {
                "type": "number",
                "default": defaults.spread_blend,
                "min": 0.0,
                "max": 1.0,
                "description": "Blend from isotropic cos^2 spreading (0) to directional cos^2s (1)"
            },
            "swell": {
                "type": "number",
                "default": defaults.swell,
                "min": 0.0,
                "max": 1.0,
                "description": "Narrowing of the spreading near the peak frequency"
            },
            "peak_enhancement": {
                "type": "number",
                "default": defaults.peak_enhancement,
                "min": 1.0,
                "max": 7.0,
                "description": "JONSWAP peak enhancement factor gamma"
            },
            "short_waves_fade": {
                "type": "number",
                "default": defaults.short_waves_fade,
                "min": 0.0,
                "max": 1.0,
                "description": "Attenuation length for short waves"
            }
        })
    }

    fn validate(&self, component: &str) -> Result<(), OceanError> {
        let invalid = |field: &str, reason: String| OceanError::InvalidParameter {
            name: format!("{component}.{field}"),
            reason,
        };
        let finite = [
            ("scale", self.scale),
            ("wind_speed", self.wind_speed),
            ("wind_direction", self.wind_direction),
            ("fetch", self.fetch),
            ("spread_blend", self.spread_blend),
            ("swell", self.swell),
            ("peak_enhancement", self.peak_enhancement),
            ("short_waves_fade", self.short_waves_fade),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(invalid(field, format!("must be finite, got {value}")));
            }
        }
        if self.scale < 0.0 {
            return Err(invalid("scale", format!("must be non-negative, got {}", self.scale)));
        }
        if self.wind_speed <= 0.0 {
            return Err(invalid(
                "wind_speed",
                format!("must be positive, got {}", self.wind_speed),
            ));
        }
        if self.fetch <= 0.0 {
            return Err(invalid("fetch", format!("must be positive, got {}", self.fetch)));
        }
        if !(0.0..=1.0).contains(&self.spread_blend) {
            return Err(invalid(
                "spread_blend",
                format!("must be in [0, 1], got {}", self.spread_blend),
            ));
        }
        if self.peak_enhancement <= 0.0 {
            return Err(invalid(
                "peak_enhancement",
                format!("must be positive, got {}", self.peak_enhancement),
            ));
        }
        if self.short_waves_fade < 0.0 {
            return Err(invalid(
                "short_waves_fade",
                format!("must be non-negative, got {}", self.short_waves_fade),
            ));
        }
        Ok(())
    }
}

/// Component parameters in the form the spectrum functions consume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumParameters {
    pub scale: f32,
    /// Wave direction in radians.
    pub angle: f32,
    pub spread_blend: f32,
    /// `swell` clamped to `[0.01, 1]`.
    pub swell: f32,
    /// JONSWAP energy scale α.
    pub alpha: f32,
    /// Peak angular frequency ωp in rad/s.
    pub peak_omega: f32,
    pub gamma: f32,
    pub short_waves_fade: f32,
}

impl SpectrumParameters {
    /// Derives the spectrum parameters of `component` under gravity `g`.
    pub fn derive(component: &SpectrumComponent, g: f32) -> Self {
        Self {
            scale: component.scale,
            angle: component.wind_direction / 180.0 * PI,
            spread_blend: component.spread_blend,
            swell: component.swell.clamp(MIN_SWELL, 1.0),
            alpha: jonswap_alpha(g, component.fetch, component.wind_speed),
            peak_omega: jonswap_peak_frequency(g, component.fetch, component.wind_speed),
            gamma: component.peak_enhancement,
            short_waves_fade: component.short_waves_fade,
        }
    }
}

/// `α = 0.076 · (g·F / U²)^-0.22`
pub fn jonswap_alpha(g: f32, fetch: f32, wind_speed: f32) -> f32 {
    0.076 * (g * fetch / wind_speed / wind_speed).powf(-0.22)
}

/// `ωp = 22 · (U·F / g²)^-0.33`
pub fn jonswap_peak_frequency(g: f32, fetch: f32, wind_speed: f32) -> f32 {
    22.0 * (wind_speed * fetch / g / g).powf(-0.33)
}

/// Everything that shapes the initial spectrum of every cascade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WavesSettings {
    /// Gravitational acceleration in m/s².
    pub g: f32,
    /// Water depth in metres.
    pub depth: f32,
    /// Horizontal displacement multiplier.
    pub lambda: f32,
    pub local: SpectrumComponent,
    pub swell: SpectrumComponent,
}

impl Default for WavesSettings {
    fn default() -> Self {
        Self {
            g: DEFAULT_GRAVITY,
            depth: DEFAULT_DEPTH,
            lambda: DEFAULT_LAMBDA,
            local: SpectrumComponent::LOCAL,
            swell: SpectrumComponent::SWELL,
        }
    }
}

impl WavesSettings {
    /// Extracts settings from a JSON object, falling back to defaults.
    ///
    /// Component settings live in the nested `local` and `swell` objects.
    pub fn from_json(params: &Value) -> Self {
        Self {
            g: param_f32(params, "gravity", DEFAULT_GRAVITY),
            depth: param_f32(params, "depth", DEFAULT_DEPTH),
            lambda: param_f32(params, "lambda", DEFAULT_LAMBDA),
            local: SpectrumComponent::from_json(
                param_section(params, "local"),
                &SpectrumComponent::LOCAL,
            ),
            swell: SpectrumComponent::from_json(
                param_section(params, "swell"),
                &SpectrumComponent::SWELL,
            ),
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "gravity": self.g,
            "depth": self.depth,
            "lambda": self.lambda,
            "local": self.local.to_json(),
            "swell": self.swell.to_json(),
        })
    }

    pub fn schema() -> Value {
        json!({
            "gravity": {
                "type": "number",
                "default": DEFAULT_GRAVITY,
                "min": 0.1,
                "max": 30.0,
                "description": "Gravitational acceleration in m/s^2"
            },
            "depth": {
                "type": "number",
                "default": DEFAULT_DEPTH,
                "min": 0.1,
                "max": 10_000.0,
                "description": "Water depth in metres"
            },
            "lambda": {
                "type": "number",
                "default": DEFAULT_LAMBDA,
                "min": 0.0,
                "max": 1.0,
                "description": "Horizontal displacement multiplier (choppiness)"
            },
            "local": {
                "type": "object",
                "description": "Wind sea component",
                "properties": SpectrumComponent::schema(&SpectrumComponent::LOCAL)
            },
            "swell": {
                "type": "object",
                "description": "Swell component",
                "properties": SpectrumComponent::schema(&SpectrumComponent::SWELL)
            }
        })
    }

    /// Checks that every value is physically meaningful.
    ///
    /// Wind speed and fetch must be positive: the JONSWAP fit divides by the
    /// wind speed and raises both to negative powers.
    pub fn validate(&self) -> Result<(), OceanError> {
        if !(self.g.is_finite() && self.g > 0.0) {
            return Err(OceanError::InvalidParameter {
                name: "gravity".into(),
                reason: format!("must be positive and finite, got {}", self.g),
            });
        }
        if !(self.depth.is_finite() && self.depth > 0.0) {
            return Err(OceanError::InvalidParameter {
                name: "depth".into(),
                reason: format!("must be positive and finite, got {}", self.depth),
            });
        }
        if !self.lambda.is_finite() {
            return Err(OceanError::InvalidParameter {
                name: "lambda".into(),
                reason: format!("must be finite, got {}", self.lambda),
            });
        }
        self.local.validate("local")?;
        self.swell.validate("swell")
    }

    /// Derived parameters for `[local, swell]`.
    pub fn spectrum_parameters(&self) -> [SpectrumParameters; 2] {
        [
            SpectrumParameters::derive(&self.local, self.g),
            SpectrumParameters::derive(&self.swell, self.g),
        ]
    }

    /// Looks up a component by name (`"local"` or `"swell"`).
    pub fn component(&self, name: &str) -> Result<&SpectrumComponent, OceanError> {
        match name {
            "local" => Ok(&self.local),
            "swell" => Ok(&self.swell),
            other => Err(OceanError::MissingComponent(other.to_string())),
        }
    }

    /// Mutable lookup of a component by name.
    pub fn component_mut(&mut self, name: &str) -> Result<&mut SpectrumComponent, OceanError> {
        match name {
            "local" => Ok(&mut self.local),
            "swell" => Ok(&mut self.swell),
            other => Err(OceanError::MissingComponent(other.to_string())),
        }
    }
}

/// Default foam decay per second on a flat sea.
pub const DEFAULT_FOAM_DECAY_RATE: f32 = 0.5;
/// Lower bound on the Jacobian when scaling the decay.
pub const DEFAULT_FOAM_JACOBIAN_FLOOR: f32 = 0.5;

/// Controls how the turbulence (foam) field accumulates and fades.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoamSettings {
    /// Foam lost per second where the surface is flat (`J = 1`).
    pub decay_rate: f32,
    /// The decay is divided by `max(J, jacobian_floor)`.
    pub jacobian_floor: f32,
    pub min: f32,
    pub max: f32,
}

impl Default for FoamSettings {
    fn default() -> Self {
        Self {
            decay_rate: DEFAULT_FOAM_DECAY_RATE,
            jacobian_floor: DEFAULT_FOAM_JACOBIAN_FLOOR,
            min: 0.0,
            max: 1.0,
        }
    }
}

impl FoamSettings {
    pub fn from_json(params: &Value) -> Self {
        let defaults = Self::default();
        Self {
            decay_rate: param_f32(params, "decay_rate", defaults.decay_rate),
            jacobian_floor: param_f32(params, "jacobian_floor", defaults.jacobian_floor),
            min: param_f32(params, "min", defaults.min),
            max: param_f32(params, "max", defaults.max),
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "decay_rate": self.decay_rate,
            "jacobian_floor": self.jacobian_floor,
            "min": self.min,
            "max": self.max,
        })
    }

    pub fn schema() -> Value {
        json!({
            "decay_rate": {
                "type": "number",
                "default": DEFAULT_FOAM_DECAY_RATE,
                "min": 0.0,
                "max": 10.0,
                "description": "Foam lost per second on a flat surface"
            },
            "jacobian_floor": {
                "type": "number",
                "default": DEFAULT_FOAM_JACOBIAN_FLOOR,
                "min": 0.01,
                "max": 1.0,
                "description": "Lower bound on the Jacobian used to scale decay"
            },
            "min": {
                "type": "number",
                "default": 0.0,
                "min": 0.0,
                "max": 1.0,
                "description": "Lowest foam value"
            },
            "max": {
                "type": "number",
                "default": 1.0,
                "min": 0.0,
                "max": 1.0,
                "description": "Highest foam value"
            }
        })
    }

    pub fn validate(&self) -> Result<(), OceanError> {
        if !(self.decay_rate.is_finite() && self.decay_rate >= 0.0) {
            return Err(OceanError::InvalidParameter {
                name: "foam.decay_rate".into(),
                reason: format!("must be non-negative, got {}", self.decay_rate),
            });
        }
        if !(self.jacobian_floor.is_finite() && self.jacobian_floor > 0.0) {
            return Err(OceanError::InvalidParameter {
                name: "foam.jacobian_floor".into(),
                reason: format!("must be positive, got {}", self.jacobian_floor),
            });
        }
        if !(self.min.is_finite() && self.max.is_finite() && self.min <= self.max) {
            return Err(OceanError::InvalidParameter {
                name: "foam.min".into(),
                reason: format!("min ({}) must not exceed max ({})", self.min, self.max),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- defaults --

    #[test]
    fn defaults_match_reference_sea() {
        let s = WavesSettings::default();
        assert_eq!(s.g, 9.81);
        assert_eq!(s.depth, 500.0);
        assert_eq!(s.lambda, 1.0);
        assert_eq!(s.local.wind_direction, 90.0);
        assert_eq!(s.local.fetch, 100_000.0);
        assert_eq!(s.swell.scale, 0.0);
        assert_eq!(s.swell.fetch, 300_000.0);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn empty_json_yields_defaults() {
        assert_eq!(WavesSettings::from_json(&json!({})), WavesSettings::default());
        assert_eq!(FoamSettings::from_json(&json!({})), FoamSettings::default());
    }

    // -- JSON --

    #[test]
    fn from_json_reads_nested_components() {
        let params = json!({
            "depth": 30.0,
            "local": {"wind_speed": 10.0, "wind_direction": 0.0},
            "swell": {"scale": 0.5}
        });
        let s = WavesSettings::from_json(&params);
        assert_eq!(s.depth, 30.0);
        assert_eq!(s.local.wind_speed, 10.0);
        assert_eq!(s.local.wind_direction, 0.0);
        assert_eq!(s.local.fetch, SpectrumComponent::LOCAL.fetch);
        assert_eq!(s.swell.scale, 0.5);
        assert_eq!(s.swell.wind_speed, SpectrumComponent::SWELL.wind_speed);
    }

    #[test]
    fn to_json_round_trips() {
        let mut s = WavesSettings::default();
        s.local.wind_speed = 7.5;
        s.swell.scale = 0.25;
        s.lambda = 0.8;
        assert_eq!(WavesSettings::from_json(&s.to_json()), s);
    }

    #[test]
    fn non_object_component_falls_back_to_defaults() {
        let s = WavesSettings::from_json(&json!({"local": 3}));
        assert_eq!(s.local, SpectrumComponent::LOCAL);
    }

    #[test]
    fn schema_describes_every_key() {
        let schema = WavesSettings::schema();
        for key in ["gravity", "depth", "lambda"] {
            assert!(schema[key].get("default").is_some(), "{key} missing default");
            assert!(schema[key].get("description").is_some());
        }
        for component in COMPONENT_NAMES {
            let props = &schema[component]["properties"];
            for key in ["scale", "wind_speed", "fetch", "peak_enhancement"] {
                assert_eq!(props[key]["type"], "number", "{component}.{key}");
            }
        }
        assert_eq!(schema["swell"]["properties"]["scale"]["default"], 0.0);
    }

    // -- derived parameters --

    #[test]
    fn derive_converts_degrees_and_clamps_swell() {
        let mut c = SpectrumComponent::LOCAL;
        c.wind_direction = 180.0;
        c.swell = 0.0;
        let p = SpectrumParameters::derive(&c, 9.81);
        assert!((p.angle - PI).abs() < 1e-6);
        assert_eq!(p.swell, 0.01);

        c.swell = 4.0;
        assert_eq!(SpectrumParameters::derive(&c, 9.81).swell, 1.0);
    }

    #[test]
    fn jonswap_fit_matches_closed_form() {
        let g = 9.81_f32;
        let (fetch, wind) = (100_000.0_f32, 10.0_f32);
        let alpha = jonswap_alpha(g, fetch, wind);
        let peak = jonswap_peak_frequency(g, fetch, wind);
        let expected_alpha = 0.076 * (g * fetch / (wind * wind)).powf(-0.22);
        let expected_peak = 22.0 * (wind * fetch / (g * g)).powf(-0.33);
        assert!((alpha - expected_alpha).abs() < 1e-6);
        assert!((peak - expected_peak).abs() < 1e-5);
        // Stronger wind moves the peak to lower frequencies.
        assert!(jonswap_peak_frequency(g, fetch, 20.0) < peak);
    }

    #[test]
    fn derived_parameters_are_stable() {
        let s = WavesSettings::default();
        assert_eq!(s.spectrum_parameters(), s.spectrum_parameters());
    }

    // -- validation --

    #[test]
    fn zero_wind_speed_is_rejected() {
        let mut s = WavesSettings::default();
        s.local.wind_speed = 0.0;
        let err = s.validate().unwrap_err();
        assert!(format!("{err}").contains("local.wind_speed"));
    }

    #[test]
    fn zero_fetch_is_rejected() {
        let mut s = WavesSettings::default();
        s.swell.fetch = 0.0;
        assert!(matches!(
            s.validate(),
            Err(OceanError::InvalidParameter { name, .. }) if name == "swell.fetch"
        ));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let mut s = WavesSettings::default();
        s.depth = f32::NAN;
        assert!(s.validate().is_err());

        let mut s = WavesSettings::default();
        s.local.scale = f32::INFINITY;
        assert!(s.validate().is_err());
    }

    #[test]
    fn foam_min_above_max_is_rejected() {
        let foam = FoamSettings {
            min: 0.8,
            max: 0.2,
            ..FoamSettings::default()
        };
        assert!(foam.validate().is_err());
        assert!(FoamSettings::default().validate().is_ok());
    }

    // -- component lookup --

    #[test]
    fn component_lookup_by_name() {
        let mut s = WavesSettings::default();
        assert_eq!(s.component("swell").unwrap().scale, 0.0);
        s.component_mut("local").unwrap().wind_speed = 12.0;
        assert_eq!(s.local.wind_speed, 12.0);
    }

    #[test]
    fn unknown_component_is_missing() {
        let s = WavesSettings::default();
        assert!(matches!(
            s.component("tide"),
            Err(OceanError::MissingComponent(name)) if name == "tide"
        ));
    }
}
