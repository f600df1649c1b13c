//! CLI failures and the process exit code each one maps to.
//!
//! Clap exits with 2 on malformed arguments before `run` is reached; every
//! later failure is a `CliError`.

use swell_core::OceanError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// Rejected configuration, failed spectrum generation, unknown field.
    #[error(transparent)]
    Simulation(OceanError),
    /// Seed file or snapshot could not be read or written.
    #[error("{0}")]
    Io(String),
    /// Malformed `--params` or seed file, cascade index out of range.
    #[error("{0}")]
    Input(String),
    #[error("could not encode output: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Simulation(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl From<OceanError> for CliError {
    fn from(e: OceanError) -> Self {
        match e {
            // Snapshot writes report through the core error type.
            OceanError::Io(msg) => CliError::Io(msg),
            other => CliError::Simulation(other),
        }
    }
}
