#![deny(unsafe_code)]
//! Spectral (Tessendorf) ocean synthesis.
//!
//! A directional JONSWAP spectrum is sampled once into static complex
//! amplitudes ([`InitialSpectrum`]), evolved in time through the dispersion
//! relation ([`evolve`]), and brought back to the spatial domain by inverse
//! FFTs inside each [`Cascade`]. A [`CascadeSet`] runs several cascades at
//! different length scales over disjoint wave number bands.

pub mod cascade;
pub mod cascade_set;
pub mod evolve;
pub mod random_field;
pub mod settings;
pub mod spectrum;

pub use cascade::{foam_step, Cascade, DisplacementReadback};
pub use cascade_set::{cascade_bands, Band, CascadeSet, OceanConfig, MAX_CASCADES};
pub use evolve::{evolve, evolve_into, pack, unpack, PackedAmplitudes};
pub use random_field::RandomField;
pub use settings::{FoamSettings, SpectrumComponent, SpectrumParameters, WavesSettings};
pub use spectrum::{InitialSpectrum, SpectrumSample, WaveVector};
