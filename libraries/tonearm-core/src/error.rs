//! Core error types for Tonearm

use thiserror::Error;

/// Result type alias using `TonearmError`
pub type Result<T> = std::result::Result<T, TonearmError>;

/// Core error type for Tonearm
#[derive(Error, Debug)]
pub enum TonearmError {
    /// Collection-store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Metadata lookup errors from the matching engine
    #[error("Matching error: {0}")]
    Matching(String),

    /// Embedded-tag read/write errors
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// Artwork fetch errors
    #[error("Artwork error: {0}")]
    Artwork(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The operator cancelled the operation
    #[error("Aborted by the operator")]
    Aborted,

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl TonearmError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a matching error
    pub fn matching(msg: impl Into<String>) -> Self {
        Self::Matching(msg.into())
    }

    /// Create a metadata error
    pub fn metadata(msg: impl Into<String>) -> Self {
        Self::Metadata(msg.into())
    }

    /// Create an artwork error
    pub fn artwork(msg: impl Into<String>) -> Self {
        Self::Artwork(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
