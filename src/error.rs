//! Error types for the agriculture vision pipeline.
//!
//! Uses thiserror for ergonomic error definitions. The first four kinds are
//! request-time failures caught at the analysis facade; `ModelLoadDegraded` is
//! a non-fatal startup condition.

use thiserror::Error;

/// Main error type for analysis pipeline operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Input bytes are not a valid image, or a data URI is malformed
    #[error("Image decode error: {0}")]
    Decode(String),

    /// Failure transforming a decoded image into the input tensor
    #[error("Preprocess error: {0}")]
    Preprocess(String),

    /// Shape mismatch or device failure during the forward pass
    #[error("Inference error: {0}")]
    Inference(String),

    /// Unknown analysis mode string
    #[error("Unsupported analysis mode: '{0}'")]
    UnsupportedMode(String),

    /// Weights file missing or unreadable; the service keeps serving with an
    /// untrained model
    #[error("Model weights unavailable, serving untrained fallback: {0}")]
    ModelLoadDegraded(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Decode(err.to_string())
    }
}

/// Specialized Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
