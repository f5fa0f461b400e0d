//! Track item types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One track record flowing through the import pipeline.
///
/// The `path` field always points at the item's current on-disk location; it
/// is updated when the commit stage relocates the file into the library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Current file path on disk
    pub path: PathBuf,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: Option<String>,

    /// Album name
    pub album: Option<String>,

    /// Album artist
    pub album_artist: Option<String>,

    /// Track number
    pub track_number: Option<u32>,

    /// Disc number
    pub disc_number: Option<u32>,

    /// Release year
    pub year: Option<u32>,

    /// Genre
    pub genre: Option<String>,

    /// When the item entered the pipeline
    pub added_at: DateTime<Utc>,
}

impl Item {
    /// Create an item from a file path and tags read from it. A missing tag
    /// title falls back to the file stem.
    pub fn with_tags(path: impl Into<PathBuf>, tags: ItemTags) -> Self {
        let path = path.into();
        let title = tags.title.unwrap_or_else(|| stem_title(&path));
        Self {
            path,
            title,
            artist: tags.artist,
            album: tags.album,
            album_artist: tags.album_artist,
            track_number: tags.track_number,
            disc_number: tags.disc_number,
            year: tags.year,
            genre: tags.genre,
            added_at: Utc::now(),
        }
    }

    /// Create an untagged item; the file stem becomes the title.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::with_tags(path, ItemTags::default())
    }
}

fn stem_title(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Unknown")
        .to_string()
}

/// Tag fields as read from (or written to) a file's embedded metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemTags {
    /// Track title
    pub title: Option<String>,

    /// Artist name
    pub artist: Option<String>,

    /// Album name
    pub album: Option<String>,

    /// Album artist
    pub album_artist: Option<String>,

    /// Track number
    pub track_number: Option<u32>,

    /// Disc number
    pub disc_number: Option<u32>,

    /// Release year
    pub year: Option<u32>,

    /// Genre
    pub genre: Option<String>,
}
