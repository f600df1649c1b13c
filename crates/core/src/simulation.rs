//! The `Simulation` trait implemented by every ocean field generator.
//!
//! The trait is object-safe so consumers (the CLI, exporters) can drive a
//! `dyn Simulation` without knowing how the fields are synthesized.

use crate::grid::Grid;
use crate::mip::MipChain;
use glam::Vec4;
use serde_json::Value;

/// A tick-driven generator of per-cascade ocean fields.
///
/// Field references returned here are valid until the next [`advance`]
/// call overwrites them; the borrow checker enforces that callers re-fetch
/// them every tick.
///
/// [`advance`]: Simulation::advance
pub trait Simulation {
    /// Advances to absolute simulation time `time`, `delta_time` seconds after
    /// the previous tick. Never fails: a tick that cannot complete leaves every
    /// field as it was.
    fn advance(&mut self, time: f32, delta_time: f32);

    /// Number of cascades whose fields are exposed.
    fn cascade_count(&self) -> usize;

    /// Displacement `(x, y, z, 0)` of cascade `index`.
    fn displacement(&self, index: usize) -> Option<&Grid<Vec4>>;

    /// Slope derivatives of cascade `index`, with mip chain.
    fn derivatives(&self, index: usize) -> Option<&MipChain<Vec4>>;

    /// Foam accumulator of cascade `index`, with mip chain.
    fn turbulence(&self, index: usize) -> Option<&MipChain<f32>>;

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing all parameters, their types, ranges and defaults.
    fn param_schema(&self) -> Value;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Minimal implementation used to verify object safety.
    struct FlatSea {
        displacement: Grid<Vec4>,
        derivatives: MipChain<Vec4>,
        turbulence: MipChain<f32>,
        ticks: usize,
    }

    impl FlatSea {
        fn new() -> Self {
            Self {
                displacement: Grid::square(4).unwrap(),
                derivatives: MipChain::new(4, 4).unwrap(),
                turbulence: MipChain::new(4, 4).unwrap(),
                ticks: 0,
            }
        }
    }

    impl Simulation for FlatSea {
        fn advance(&mut self, _time: f32, _delta_time: f32) {
            self.ticks += 1;
        }

        fn cascade_count(&self) -> usize {
            1
        }

        fn displacement(&self, index: usize) -> Option<&Grid<Vec4>> {
            (index == 0).then_some(&self.displacement)
        }

        fn derivatives(&self, index: usize) -> Option<&MipChain<Vec4>> {
            (index == 0).then_some(&self.derivatives)
        }

        fn turbulence(&self, index: usize) -> Option<&MipChain<f32>> {
            (index == 0).then_some(&self.turbulence)
        }

        fn params(&self) -> Value {
            json!({"ticks": self.ticks})
        }

        fn param_schema(&self) -> Value {
            json!({"ticks": {"type": "integer", "default": 0, "description": "Ticks run"}})
        }
    }

    #[test]
    fn simulation_trait_is_object_safe() {
        let sim: Box<dyn Simulation> = Box::new(FlatSea::new());
        assert_eq!(sim.cascade_count(), 1);
        assert_eq!(sim.displacement(0).unwrap().width(), 4);
    }

    #[test]
    fn out_of_range_cascade_is_none() {
        let sim = FlatSea::new();
        assert!(sim.displacement(1).is_none());
        assert!(sim.derivatives(1).is_none());
        assert!(sim.turbulence(1).is_none());
    }

    #[test]
    fn dyn_mut_reference_advances() {
        let mut sim = FlatSea::new();
        let sim_ref: &mut dyn Simulation = &mut sim;
        sim_ref.advance(0.0, 0.0);
        sim_ref.advance(0.1, 0.1);
        assert_eq!(sim_ref.params()["ticks"], 2);
    }

    #[test]
    fn schema_has_expected_structure() {
        let schema = FlatSea::new().param_schema();
        assert_eq!(schema["ticks"]["type"], "integer");
    }
}
