//! Error types for the wire codec.

use thiserror::Error;

use designer_model::ModelError;

/// Failure to read or write a wire payload.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum WireError {
    /// Payload is not valid JSON or does not have the expected shape.
    #[error("Malformed payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Model operation rejected the decoded data.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, WireError>;
