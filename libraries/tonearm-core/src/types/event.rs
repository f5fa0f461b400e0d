//! Lifecycle events emitted after a successful commit

use crate::types::{Album, Item};
use serde::{Deserialize, Serialize};

/// A lifecycle event handed to the [`EventSink`](crate::traits::EventSink).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ImportEvent {
    /// An album structure was committed to the collection
    AlbumImported {
        /// The newly created album
        album: Album,
    },

    /// A single unaffiliated track was committed to the collection
    ItemImported {
        /// The newly created item
        item: Item,
    },
}
