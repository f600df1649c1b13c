#![deny(unsafe_code)]
//! Core types shared by the swell ocean synthesis crates.
//!
//! Provides the toroidal `Grid`, box-filtered `MipChain`, the `OceanError`
//! taxonomy, the `Xorshift64` PRNG with Gaussian sampling, the reproducible
//! `Seed`, JSON parameter helpers, and the `Simulation` trait.

pub mod error;
pub mod grid;
pub mod mip;
pub mod params;
pub mod prng;
pub mod seed;
pub mod simulation;

pub use error::OceanError;
pub use grid::Grid;
pub use mip::{BoxFilter, MipChain};
pub use prng::Xorshift64;
pub use seed::Seed;
pub use simulation::Simulation;
