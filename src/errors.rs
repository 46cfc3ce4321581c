//! Error types for the triage service.
//!
//! Classification failures are absorbed by the classifier itself and never
//! reach this type; everything here is a genuine service failure that the
//! caller must see.

use thiserror::Error;

/// Main error type for the triage pipeline
#[derive(Error, Debug)]
pub enum TriageError {
    /// Chat provider errors (connection refused, non-success status,
    /// unreadable reply)
    #[error("chat provider error: {0}")]
    Provider(String),

    /// The backing similarity index cannot be reached or is missing a
    /// collection. Distinct from an empty search result, which is a normal
    /// outcome handled by the composer.
    #[error("vector index unavailable: {0}")]
    IndexUnavailable(String),

    /// Query embedding failed
    #[error("embedding failed: {0}")]
    Embedding(String),

    /// The answer-producing generation call failed. Never silently
    /// defaulted: there is no safe synthetic answer.
    #[error("answer generation failed: {0}")]
    Generation(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for triage operations
pub type Result<T> = std::result::Result<T, TriageError>;

impl From<anyhow::Error> for TriageError {
    fn from(err: anyhow::Error) -> Self {
        TriageError::Provider(err.to_string())
    }
}
