//! Collaborator traits at the pipeline's external boundaries

use crate::error::Result;
use crate::types::{Album, AlbumId, AlbumInfo, Choice, ImportEvent, Item, ItemTags, MatchOutcome};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// External metadata-matching engine.
///
/// Given one directory's items it returns ranked candidate releases; all
/// ranking and scoring happens on the other side of this boundary.
#[async_trait]
pub trait MatchingEngine: Send + Sync {
    /// Look up candidate releases for the given items.
    ///
    /// # Errors
    /// Returns an error on unrecoverable lookup failure. The pipeline
    /// converts this into a null match rather than propagating it.
    async fn match_album(&self, items: &[Item]) -> Result<MatchOutcome>;
}

/// A handle to the persistent collection.
///
/// Handles have thread affinity: a handle must only be used from the worker
/// that opened it. Obtain one per stage via [`StoreOpener`] and never pass a
/// handle across worker boundaries.
#[async_trait]
pub trait CollectionStore: Send {
    /// All albums by the given artist (exact, case-sensitive name match).
    async fn albums_by_artist(&self, artist: &str) -> Result<Vec<Album>>;

    /// Insert one album built from `items`. With `infer_artist`, the album
    /// artist is inferred from the plurality of the items' track artists;
    /// otherwise it is taken from the items' album-artist fields.
    async fn insert_album(&mut self, items: &[Item], infer_artist: bool) -> Result<Album>;

    /// Insert one item as an unaffiliated track.
    async fn insert_item(&mut self, item: &Item) -> Result<()>;

    /// Attach a local cover-art image to an existing album.
    async fn set_album_art(&mut self, album: AlbumId, art: &Path) -> Result<()>;

    /// Flush pending changes to the backing location.
    async fn persist(&mut self) -> Result<()>;
}

/// Factory producing independently opened [`CollectionStore`] handles bound
/// to one backing location.
///
/// Opening must be cheap and must tolerate multiple opens of the same
/// location from different workers; it happens once per stage, not per task.
#[async_trait]
pub trait StoreOpener: Send + Sync {
    /// The handle type produced by this opener
    type Handle: CollectionStore;

    /// Open a fresh handle bound to this opener's backing location.
    async fn open(&self) -> Result<Self::Handle>;
}

/// Resolves what to do with one directory's worth of items: an interactive
/// operator prompt or an automatic rule.
#[async_trait]
pub trait DecisionPolicy: Send + Sync {
    /// Choose a disposition for the directory at `path`. May await external
    /// input indefinitely.
    ///
    /// # Errors
    /// Returning [`TonearmError::Aborted`](crate::TonearmError::Aborted)
    /// stops the whole pipeline as an operator abort.
    async fn decide(
        &self,
        path: &Path,
        items: &[Item],
        outcome: Option<&MatchOutcome>,
    ) -> Result<Choice>;
}

/// Fetches cover art for a matched release.
#[async_trait]
pub trait ArtworkService: Send + Sync {
    /// Fetch art for the given release. Returns a local image path, or
    /// `None` when no art was found; failures are treated as "no art".
    async fn fetch_art(&self, info: &AlbumInfo) -> Option<PathBuf>;
}

/// Fire-and-forget lifecycle event sink (plugin notifications and the like).
pub trait EventSink: Send + Sync {
    /// Deliver one event. No return value is consumed.
    fn emit(&self, event: &ImportEvent);
}

/// Reads and writes a file's embedded metadata tags.
pub trait TagCodec: Send + Sync {
    /// Read tags from an audio file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    fn read(&self, path: &Path) -> Result<ItemTags>;

    /// Persist the item's in-memory metadata fields to its on-disk file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    fn write(&self, item: &Item) -> Result<()>;
}
