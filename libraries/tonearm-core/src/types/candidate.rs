//! Match candidate types returned by the matching engine

use crate::types::Item;
use serde::{Deserialize, Serialize};

/// Album-level metadata for one candidate release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumInfo {
    /// Album artist
    pub artist: String,

    /// Album title
    pub album: String,

    /// Release year
    pub year: Option<u32>,

    /// Per-track metadata, in release order
    pub tracks: Vec<TrackInfo>,
}

/// Track-level metadata within an [`AlbumInfo`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackInfo {
    /// Track title
    pub title: String,

    /// Track artist, when it differs from the album artist
    pub artist: Option<String>,

    /// Track number on the release
    pub track_number: Option<u32>,
}

/// One candidate release, with the task's items reordered (and possibly
/// merged) to line up with the candidate's track order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// The candidate's album metadata
    pub info: AlbumInfo,

    /// The task's items, reordered to match `info.tracks`
    pub items: Vec<Item>,

    /// Match distance; lower is better
    pub distance: f32,
}

/// Confidence signal guiding automatic vs. manual resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    /// The top candidate is almost certainly right
    Strong,

    /// The top candidate is plausible but should be reviewed
    Medium,

    /// Candidates exist but none is convincing
    Weak,

    /// No usable candidate was found
    None,
}

/// Everything the matching engine learned about one directory's items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// Artist of the top-ranked candidate, if identifiable
    pub artist: Option<String>,

    /// Album title of the top-ranked candidate, if identifiable
    pub album: Option<String>,

    /// Candidate releases, best first
    pub candidates: Vec<Candidate>,

    /// Confidence in the top candidate
    pub recommendation: Recommendation,
}
