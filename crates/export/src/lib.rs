#![deny(unsafe_code)]
//! Field registry: maps field names to scalar channels of a simulation and
//! provides grayscale snapshot output.
//!
//! Both the CLI and any other consumer go through [`FieldKind`] so that the
//! set of exportable channels and their names are defined in one place.

pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

use glam::Vec4;
use swell_core::{Grid, OceanError, Simulation};

/// All exportable field names.
const FIELD_NAMES: &[&str] = &[
    "height",
    "displacement-x",
    "displacement-z",
    "slope-x",
    "slope-z",
    "dxx",
    "dzz",
    "foam",
];

/// One scalar channel of a cascade's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Vertical displacement (`Displacement.y`).
    Height,
    /// Horizontal displacement along x (`Displacement.x`).
    DisplacementX,
    /// Horizontal displacement along z (`Displacement.z`).
    DisplacementZ,
    /// `dDy/dx` (`Derivatives.x`).
    SlopeX,
    /// `dDy/dz` (`Derivatives.y`).
    SlopeZ,
    /// `λ·dDx/dx` (`Derivatives.z`).
    Dxx,
    /// `λ·dDz/dz` (`Derivatives.w`).
    Dzz,
    /// Foam accumulator (`Turbulence`).
    Foam,
}

impl FieldKind {
    /// Looks a field up by name.
    ///
    /// Returns `OceanError::UnknownField` if the name is not recognized.
    pub fn from_name(name: &str) -> Result<Self, OceanError> {
        match name {
            "height" => Ok(FieldKind::Height),
            "displacement-x" => Ok(FieldKind::DisplacementX),
            "displacement-z" => Ok(FieldKind::DisplacementZ),
            "slope-x" => Ok(FieldKind::SlopeX),
            "slope-z" => Ok(FieldKind::SlopeZ),
            "dxx" => Ok(FieldKind::Dxx),
            "dzz" => Ok(FieldKind::Dzz),
            "foam" => Ok(FieldKind::Foam),
            _ => Err(OceanError::UnknownField(name.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Height => "height",
            FieldKind::DisplacementX => "displacement-x",
            FieldKind::DisplacementZ => "displacement-z",
            FieldKind::SlopeX => "slope-x",
            FieldKind::SlopeZ => "slope-z",
            FieldKind::Dxx => "dxx",
            FieldKind::Dzz => "dzz",
            FieldKind::Foam => "foam",
        }
    }

    /// Returns a slice of all recognized field names.
    pub fn list_fields() -> &'static [&'static str] {
        FIELD_NAMES
    }

    /// Copies this channel of cascade `cascade` out of `sim`.
    ///
    /// Returns `None` if the cascade index is out of range.
    pub fn extract(self, sim: &dyn Simulation, cascade: usize) -> Option<Grid<f32>> {
        let channel = |grid: &Grid<Vec4>, pick: fn(&Vec4) -> f32| grid.map(pick);
        match self {
            FieldKind::Height => sim.displacement(cascade).map(|g| channel(g, |v| v.y)),
            FieldKind::DisplacementX => sim.displacement(cascade).map(|g| channel(g, |v| v.x)),
            FieldKind::DisplacementZ => sim.displacement(cascade).map(|g| channel(g, |v| v.z)),
            FieldKind::SlopeX => sim.derivatives(cascade).map(|m| channel(m.base(), |v| v.x)),
            FieldKind::SlopeZ => sim.derivatives(cascade).map(|m| channel(m.base(), |v| v.y)),
            FieldKind::Dxx => sim.derivatives(cascade).map(|m| channel(m.base(), |v| v.z)),
            FieldKind::Dzz => sim.derivatives(cascade).map(|m| channel(m.base(), |v| v.w)),
            FieldKind::Foam => sim.turbulence(cascade).map(|m| m.base().clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swell_waves::{CascadeSet, OceanConfig};

    fn ocean() -> CascadeSet {
        let mut config = OceanConfig {
            size: 16,
            seed: 3,
            ..OceanConfig::default()
        };
        config.settings.local.wind_speed = 8.0;
        let mut set = CascadeSet::new(config).unwrap();
        set.advance(1.0, 1.0 / 60.0);
        set
    }

    #[test]
    fn from_name_accepts_every_listed_field() {
        for name in FieldKind::list_fields() {
            let kind = FieldKind::from_name(name).unwrap();
            assert_eq!(kind.name(), *name);
        }
    }

    #[test]
    fn from_name_unknown_returns_error() {
        let result = FieldKind::from_name("vorticity");
        assert!(matches!(result, Err(OceanError::UnknownField(_))));
    }

    #[test]
    fn height_matches_displacement_y() {
        let set = ocean();
        let height = FieldKind::Height.extract(&set, 0).unwrap();
        let displacement = set.displacement(0).unwrap();
        for (h, d) in height.data().iter().zip(displacement.data()) {
            assert_eq!(h.to_bits(), d.y.to_bits());
        }
    }

    #[test]
    fn derivative_channels_come_from_base_level() {
        let set = ocean();
        let dzz = FieldKind::Dzz.extract(&set, 1).unwrap();
        assert_eq!(dzz.width(), 16);
        assert_eq!(dzz.at(5, 2), set.derivatives(1).unwrap().base().at(5, 2).w);
    }

    #[test]
    fn foam_is_copied_from_turbulence() {
        let set = ocean();
        let foam = FieldKind::Foam.extract(&set, 2).unwrap();
        assert_eq!(&foam, set.turbulence(2).unwrap().base());
    }

    #[test]
    fn out_of_range_cascade_is_none() {
        let set = ocean();
        assert!(FieldKind::Height.extract(&set, 9).is_none());
        assert!(FieldKind::Foam.extract(&set, 9).is_none());
    }
}
