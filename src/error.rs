//! Error types for the monoikos crate

use thiserror::Error;

/// Main error type for the monoikos crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("optimizer requires at least 2 iterations, got {iterations}")]
    InvalidIterations { iterations: u32 },

    #[error("state '{state}' has no available actions")]
    NoActionsAvailable { state: String },

    #[error("action '{action}' does not recognize this episode context")]
    ContextMismatch { action: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
