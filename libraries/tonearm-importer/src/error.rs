//! Error types for the importer

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("invalid file path: {0}")]
    InvalidPath(String),

    #[error(transparent)]
    Core(#[from] tonearm_core::TonearmError),

    #[error("import aborted")]
    Aborted,

    #[error("unknown error: {0}")]
    Unknown(String),
}
