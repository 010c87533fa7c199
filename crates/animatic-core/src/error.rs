//! Error types for the animatic engine.

use thiserror::Error;

/// Main error type for animatic operations.
#[derive(Error, Debug)]
pub enum AnimaticError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Asset error: {0}")]
    Asset(String),

    #[error("Encoder error: {0}")]
    Encoder(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Timeline error: {0}")]
    Timeline(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Export cancelled")]
    Cancelled,

    #[error("An export is already in progress")]
    Busy,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AnimaticError {
    /// Whether this error represents user-initiated cancellation rather
    /// than a real failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AnimaticError::Cancelled)
    }
}

/// Result type alias for animatic operations.
pub type Result<T> = std::result::Result<T, AnimaticError>;
