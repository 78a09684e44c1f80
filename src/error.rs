//! Nexus Sim error types.
//!
//! Most failures in the simulation are recovered locally: generator
//! failures feed the retry/fallback path in the content pipeline, and
//! empty candidate sets are normal no-op outcomes handled by the
//! scheduler's priority policy. The variants here exist for the places
//! where an error genuinely crosses a module boundary (store writes,
//! configuration loading, selector contracts).

use thiserror::Error;

/// Nexus Sim errors.
#[derive(Error, Debug)]
pub enum SimError {
    /// Text generator call failed (timeout, connection, upstream status).
    #[error("Generator error: {0}")]
    Generator(String),

    /// Generator output could not be parsed or validated against the
    /// requested shape.
    #[error("Invalid generator response: {0}")]
    InvalidResponse(String),

    /// Weighted selection was asked to choose from an empty candidate set.
    #[error("Empty candidate set")]
    EmptyCandidateSet,

    /// Persistence operation failed.
    #[error("Store error: {0}")]
    Store(String),

    /// Referenced document does not exist.
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for simulation operations
pub type Result<T> = std::result::Result<T, SimError>;

impl From<reqwest::Error> for SimError {
    fn from(err: reqwest::Error) -> Self {
        SimError::Generator(err.to_string())
    }
}

impl From<toml::de::Error> for SimError {
    fn from(err: toml::de::Error) -> Self {
        SimError::Config(err.to_string())
    }
}

impl From<chrono::ParseError> for SimError {
    fn from(err: chrono::ParseError) -> Self {
        SimError::InvalidResponse(format!("Bad date: {err}"))
    }
}
