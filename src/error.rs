//! Error types for wine quality prediction.
//!
//! Startup errors (artifact loading) are fatal to the command that hit them;
//! input errors fail only the prediction they belong to.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for wine quality operations.
pub type Result<T> = std::result::Result<T, WineError>;

/// Errors that can occur while loading artifacts or predicting.
#[derive(Debug, Error)]
pub enum WineError {
    /// Artifact file not found at specified path.
    #[error("artifact not found: {path}")]
    ArtifactNotFound { path: PathBuf },

    /// Artifact loaded but cannot serve this feature layout.
    #[error("incompatible artifact: {reason}")]
    IncompatibleArtifact { reason: String },

    /// Wrong number of values for a feature row.
    #[error("shape mismatch: expected {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// A feature value below the 0.0 minimum.
    #[error("{feature} must be >= 0.0, got {value}")]
    NegativeValue { feature: String, value: f64 },

    /// A feature value that is not a finite number.
    #[error("{feature} is not a number: {input:?}")]
    NotNumeric { feature: String, input: String },

    /// A field name that matches no feature.
    #[error("unknown feature: {0}")]
    UnknownFeature(String),

    /// A navigation direction other than next/previous.
    #[error("unknown direction: {0}")]
    UnknownDirection(String),

    /// I/O error during file or socket operations.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Underlying aprender error.
    #[error("aprender error: {0}")]
    Aprender(String),

    /// HTTP server failure.
    #[error("server error: {0}")]
    Server(String),
}

impl WineError {
    /// Create a new incompatible artifact error.
    #[must_use]
    pub fn incompatible(reason: impl Into<String>) -> Self {
        Self::IncompatibleArtifact {
            reason: reason.into(),
        }
    }

    /// Create a shape mismatch error against the given expected width.
    #[must_use]
    pub fn shape(expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch { expected, actual }
    }

    /// Create a not-numeric error for a feature.
    #[must_use]
    pub fn not_numeric(feature: impl Into<String>, input: impl Into<String>) -> Self {
        Self::NotNumeric {
            feature: feature.into(),
            input: input.into(),
        }
    }

    /// Whether this error belongs to a single request rather than startup.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::ShapeMismatch { .. }
                | Self::NegativeValue { .. }
                | Self::NotNumeric { .. }
                | Self::UnknownFeature(_)
                | Self::UnknownDirection(_)
        )
    }
}

impl From<serde_json::Error> for WineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
