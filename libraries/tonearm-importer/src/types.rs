//! Common types for the importer

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Configuration for import operations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportConfig {
    /// Path to the managed library folder (e.g., ~/Music/tonearm/library)
    pub library_path: PathBuf,

    /// Whether to copy items into the library during commit
    pub copy_files: bool,

    /// Whether to persist matched metadata into the files' embedded tags
    pub write_tags: bool,

    /// Whether to fetch cover art for matched albums
    pub fetch_art: bool,

    /// Whether to delete originals that were actually relocated
    pub delete_originals: bool,

    /// Whether to checkpoint resume progress after each task
    pub track_progress: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            library_path: PathBuf::from("~/Music/tonearm/library"),
            copy_files: true,
            write_tags: true,
            fetch_art: true,
            delete_originals: false,
            track_progress: true,
        }
    }
}

/// How to treat saved progress for a root directory that has an interrupted
/// import on record.
pub enum ResumePolicy {
    /// Resume silently from the recorded subpath
    Always,

    /// Discard the recorded progress and start from the top
    Never,

    /// Ask the operator per root; `false` discards the recorded progress
    Ask(Box<dyn FnMut(&Path) -> bool + Send>),
}

impl fmt::Debug for ResumePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => write!(f, "Always"),
            Self::Never => write!(f, "Never"),
            Self::Ask(_) => write!(f, "Ask(..)"),
        }
    }
}

/// Summary of an import run
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Album structures committed to the collection
    pub albums_imported: usize,

    /// Unaffiliated tracks committed to the collection
    pub tracks_imported: usize,

    /// Tasks skipped, whether by choice or duplicate suppression
    pub skipped: usize,
}

impl ImportSummary {
    pub fn summary_text(&self) -> String {
        format!(
            "Import complete: {} albums, {} tracks, {} skipped",
            self.albums_imported, self.tracks_imported, self.skipped
        )
    }
}
