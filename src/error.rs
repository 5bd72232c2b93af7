//! Error types for the repertoire toolkit.
//!
//! All fallible operations return [`Result`], and every failure is one of the
//! [`RepertoireError`] variants. Errors are terminal for the invoking command:
//! the CLI prints the message and exits non-zero.

use std::io;

use thiserror::Error;

/// The main error type for repertoire operations.
#[derive(Error, Debug)]
pub enum RepertoireError {
    /// I/O errors (file operations).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A required column is absent from the input CSV.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Empty or ambiguous query input, or an unmatched record id.
    #[error("Input error: {0}")]
    Input(String),

    /// Unknown classifier choice or invalid hyperparameter.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Model artifact problems (unfitted components, load/save failures).
    #[error("Model error: {0}")]
    Model(String),

    /// Confusion-matrix rendering failures.
    #[error("Render error: {0}")]
    Render(String),

    /// CSV decoding errors.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with [`RepertoireError`].
pub type Result<T> = std::result::Result<T, RepertoireError>;

impl RepertoireError {
    /// Create a new schema error.
    pub fn schema<S: Into<String>>(msg: S) -> Self {
        RepertoireError::Schema(msg.into())
    }

    /// Create a new input error.
    pub fn input<S: Into<String>>(msg: S) -> Self {
        RepertoireError::Input(msg.into())
    }

    /// Create a new configuration error.
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        RepertoireError::Configuration(msg.into())
    }

    /// Create a new model error.
    pub fn model<S: Into<String>>(msg: S) -> Self {
        RepertoireError::Model(msg.into())
    }

    /// Create a new render error.
    pub fn render<S: Into<String>>(msg: S) -> Self {
        RepertoireError::Render(msg.into())
    }
}
