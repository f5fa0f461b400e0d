//! Album types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Identifier assigned by the collection store
pub type AlbumId = i64;

/// An album entry in the collection store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    /// Store-assigned identifier
    pub id: AlbumId,

    /// Album artist, if one is known or was inferred
    pub artist: Option<String>,

    /// Album title
    pub title: String,

    /// Release year
    pub year: Option<u32>,

    /// Local path of attached cover art, if any
    pub art_path: Option<PathBuf>,

    /// When the album was added to the collection
    pub added_at: DateTime<Utc>,
}
