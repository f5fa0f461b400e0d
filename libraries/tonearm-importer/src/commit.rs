//! Commit stage
//!
//! Applies each decided task to the filesystem and the collection store:
//! metadata, file placement, database rows, cover art, events, original
//! cleanup, and the resume checkpoint, in that order. File operations happen
//! before database writes so an interruption leaves stray copies rather than
//! rows pointing at missing files.

use crate::destination::{
    apply_metadata, destination_for, relocate, remove_superseded_originals, snapshot_real_paths,
};
use crate::progress::ProgressStore;
use crate::task::{DecidedAlbum, Decision, Task};
use crate::{ImportConfig, ImportSummary, Result};
use tonearm_core::{ArtworkService, CollectionStore, EventSink, ImportEvent, TagCodec};
use tracing::{debug, info};

pub struct CommitStage<'a, S: CollectionStore> {
    store: S,
    config: ImportConfig,
    tags: &'a dyn TagCodec,
    events: &'a dyn EventSink,
    artwork: Option<&'a dyn ArtworkService>,
    progress: ProgressStore,
    summary: ImportSummary,
}

impl<'a, S: CollectionStore> CommitStage<'a, S> {
    /// `store` must be a handle opened by this stage's worker.
    pub fn new(
        store: S,
        config: ImportConfig,
        tags: &'a dyn TagCodec,
        events: &'a dyn EventSink,
        artwork: Option<&'a dyn ArtworkService>,
        progress: ProgressStore,
    ) -> Self {
        Self {
            store,
            config,
            tags,
            events,
            artwork,
            progress,
            summary: ImportSummary::default(),
        }
    }

    /// Commit one task. A sentinel clears its root's resume record; a skip
    /// only advances the checkpoint.
    pub async fn process(&mut self, task: Task<DecidedAlbum>) -> Result<()> {
        let mut album = match task {
            Task::Done { root } => {
                if self.config.track_progress {
                    self.progress.set(&root, None)?;
                }
                info!("finished importing {}", root.display());
                return Ok(());
            }
            Task::Album(album) => album,
        };

        if album.decision == Decision::Skip {
            self.summary.skipped += 1;
            self.checkpoint(&album)?;
            return Ok(());
        }

        if let Decision::Album(info) = &album.decision {
            apply_metadata(info, &mut album.items);
        }

        // Old locations must be captured before any file moves, or the
        // delete pass below cannot tell moved originals from preserved ones.
        let old_paths = if self.config.copy_files && self.config.delete_originals {
            Some(snapshot_real_paths(&album.items))
        } else {
            None
        };

        let in_album = album.decision.creates_album();
        for item in &mut album.items {
            if self.config.copy_files {
                let dest = destination_for(&self.config.library_path, item, in_album);
                item.path = relocate(&item.path, &dest)?;
            }
            if self.config.write_tags && album.decision.writes_tags() {
                self.tags.write(item)?;
            }
        }

        if in_album {
            let mut stored = self
                .store
                .insert_album(&album.items, album.decision.infers_album_artist())
                .await?;

            if self.config.fetch_art && album.decision.fetches_art() {
                if let (Decision::Album(info), Some(artwork)) = (&album.decision, self.artwork) {
                    match artwork.fetch_art(info).await {
                        Some(art) => {
                            self.store.set_album_art(stored.id, &art).await?;
                            stored.art_path = Some(art);
                        }
                        None => debug!("no art found for {}", album.path.display()),
                    }
                }
            }

            self.store.persist().await?;
            self.summary.albums_imported += 1;
            self.events.emit(&ImportEvent::AlbumImported { album: stored });
        } else {
            for item in &album.items {
                self.store.insert_item(item).await?;
            }
            self.store.persist().await?;
            self.summary.tracks_imported += album.items.len();
            for item in &album.items {
                self.events
                    .emit(&ImportEvent::ItemImported { item: item.clone() });
            }
        }

        // A failed delete must not be checkpointed as complete: propagate and
        // leave the resume marker at the previous task.
        if let Some(old_paths) = old_paths {
            remove_superseded_originals(&old_paths, &album.items)?;
        }

        self.checkpoint(&album)?;
        Ok(())
    }

    fn checkpoint(&self, album: &DecidedAlbum) -> Result<()> {
        if self.config.track_progress {
            self.progress.set(&album.root, Some(&album.path))?;
        }
        Ok(())
    }

    /// Consume the stage after the run, yielding the run's totals.
    pub fn into_summary(self) -> ImportSummary {
        self.summary
    }
}
