//! Error types for the simulation harness.
//!
//! The engine itself never fails; these cover the edges of the harness
//! (config files, exports, command-line input).

use thiserror::Error;

/// Result alias for harness operations.
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors raised while loading configs or writing exports.
#[derive(Debug, Error)]
pub enum SimError {
    /// Reading or writing a file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config or export JSON could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Scenario name did not match any preset
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    /// Inconsistent command-line or config input
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SimError {
    /// Creates an I/O error tagged with the offending path.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid-configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
