use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid roster: {0}")]
    InvalidRoster(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(#[from] validator::ValidationErrors),

    #[error("Invalid tuning: {0}")]
    InvalidTuning(String),

    #[error("Failed to read tuning file {path}: {source}")]
    TuningIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse tuning: {0}")]
    TuningParse(String),

    #[error("Simulation cancelled at minute {minute}")]
    Cancelled { minute: u16 },

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

impl EngineError {
    /// Errors the caller can fix by changing its input and running again.
    pub fn is_input_error(&self) -> bool {
        match self {
            EngineError::InvalidRoster(_)
            | EngineError::InvalidSettings(_)
            | EngineError::InvalidTuning(_)
            | EngineError::TuningIo { .. }
            | EngineError::TuningParse(_) => true,
            EngineError::Cancelled { .. } => false,
            // A defect in the engine, not in the request
            EngineError::InvariantViolation(_) => false,
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::TuningParse(err.to_string())
    }
}

impl From<serde_yaml::Error> for EngineError {
    fn from(err: serde_yaml::Error) -> Self {
        EngineError::TuningParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
