//! The operator's (or automatic policy's) choice for one task

use crate::types::{AlbumInfo, Item};
use serde::{Deserialize, Serialize};

/// The resolved disposition of one directory's items, as returned by a
/// [`DecisionPolicy`](crate::traits::DecisionPolicy).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Choice {
    /// Do nothing with this directory
    Skip,

    /// Import with the existing metadata, unmodified by matching
    AsIs,

    /// Import each item as an independent track, no album structure
    Tracks,

    /// Import as the given candidate release. `items` is the task's item
    /// sequence reordered to line up with `info.tracks`; it replaces the
    /// original sequence.
    Album {
        /// The chosen candidate's album metadata
        info: AlbumInfo,
        /// Items reordered to match the candidate's track order
        items: Vec<Item>,
    },
}
