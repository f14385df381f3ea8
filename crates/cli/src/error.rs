//! CLI-level errors with stable process exit codes.

use driftfield_core::DriftError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("engine error: {0}")]
    Engine(#[from] DriftError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid input: {0}")]
    Input(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CliError {
    /// Exit code reported to the shell; scripts key off these.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Engine(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}
