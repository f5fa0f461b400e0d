//! Pipeline assembly and driver
//!
//! Wires the scanner and the three stages together and drives one task at a
//! time from scan to commit. Exactly one task is in flight, so the resume
//! checkpoint written by the commit stage is always truthful: everything
//! before it is committed, everything after it untouched.

use crate::activity::ActivityLog;
use crate::commit::CommitStage;
use crate::decision::DecisionStage;
use crate::destination::{destination_for, relocate, remove_superseded_originals, snapshot_real_paths};
use crate::lookup::MatchStage;
use crate::progress::ProgressStore;
use crate::scanner::DirectoryScanner;
use crate::task::Task;
use crate::{ImportConfig, ImportSummary, ResumePolicy, Result};
use std::path::PathBuf;
use tonearm_core::{
    ArtworkService, CollectionStore, DecisionPolicy, EventSink, ImportEvent, MatchingEngine,
    StoreOpener, TagCodec,
};
use tracing::info;

/// A configured import pipeline, reusable across runs.
pub struct ImportPipeline<'a, O: StoreOpener> {
    opener: O,
    config: ImportConfig,
    engine: &'a dyn MatchingEngine,
    policy: &'a dyn DecisionPolicy,
    tags: &'a dyn TagCodec,
    events: &'a dyn EventSink,
    artwork: Option<&'a dyn ArtworkService>,
    activity: Option<ActivityLog>,
    progress: ProgressStore,
}

impl<'a, O: StoreOpener> ImportPipeline<'a, O> {
    pub fn new(
        opener: O,
        config: ImportConfig,
        engine: &'a dyn MatchingEngine,
        policy: &'a dyn DecisionPolicy,
        tags: &'a dyn TagCodec,
        events: &'a dyn EventSink,
        progress: ProgressStore,
    ) -> Self {
        Self {
            opener,
            config,
            engine,
            policy,
            tags,
            events,
            artwork: None,
            activity: None,
            progress,
        }
    }

    /// Attach a cover-art source. Without one, matched albums are committed
    /// without art.
    pub fn with_artwork(mut self, artwork: &'a dyn ArtworkService) -> Self {
        self.artwork = Some(artwork);
        self
    }

    /// Attach an activity log recording skip, as-is and duplicate outcomes.
    pub fn with_activity_log(mut self, log: ActivityLog) -> Self {
        self.activity = Some(log);
        self
    }

    /// Run the full pipeline over the given root directories.
    ///
    /// Each store-touching stage opens its own collection handle. An
    /// operator abort surfaces as [`ImportError::Aborted`] after the
    /// already-committed tasks have been checkpointed.
    ///
    /// [`ImportError::Aborted`]: crate::ImportError::Aborted
    pub async fn run(&mut self, roots: &[PathBuf], resume: ResumePolicy) -> Result<ImportSummary> {
        let scanner = DirectoryScanner::new(roots, resume, &self.progress, self.tags)?;
        let matcher = MatchStage::new(self.engine);
        let mut decision = DecisionStage::new(
            self.opener.open().await?,
            self.policy,
            self.activity.as_mut(),
        );
        let mut commit = CommitStage::new(
            self.opener.open().await?,
            self.config.clone(),
            self.tags,
            self.events,
            self.artwork,
            self.progress.clone(),
        );

        for task in scanner {
            let task = matcher.process(task?).await;
            let task = decision.process(task).await?;
            commit.process(task).await?;
        }

        let summary = commit.into_summary();
        info!("{}", summary.summary_text());
        Ok(summary)
    }

    /// Run the simplified pathway: no lookup, no prompting, no tag writes.
    /// Every directory is committed as-is as one album, with the album
    /// artist inferred from its items.
    pub async fn run_simple(
        &mut self,
        roots: &[PathBuf],
        resume: ResumePolicy,
    ) -> Result<ImportSummary> {
        let mut store = self.opener.open().await?;
        let mut summary = ImportSummary::default();

        for task in DirectoryScanner::new(roots, resume, &self.progress, self.tags)? {
            let mut album = match task? {
                Task::Done { root } => {
                    if self.config.track_progress {
                        self.progress.set(&root, None)?;
                    }
                    info!("finished importing {}", root.display());
                    continue;
                }
                Task::Album(album) => album,
            };

            let old_paths = if self.config.copy_files && self.config.delete_originals {
                Some(snapshot_real_paths(&album.items))
            } else {
                None
            };
            if self.config.copy_files {
                for item in &mut album.items {
                    let dest = destination_for(&self.config.library_path, item, true);
                    item.path = relocate(&item.path, &dest)?;
                }
            }

            let stored = store.insert_album(&album.items, true).await?;
            store.persist().await?;
            summary.albums_imported += 1;
            info!(
                "added album: {} - {}",
                stored.artist.as_deref().unwrap_or("Unknown Artist"),
                stored.title
            );
            self.events.emit(&ImportEvent::AlbumImported { album: stored });

            if let Some(old_paths) = old_paths {
                remove_superseded_originals(&old_paths, &album.items)?;
            }
            if self.config.track_progress {
                self.progress.set(&album.root, Some(&album.path))?;
            }
        }

        info!("{}", summary.summary_text());
        Ok(summary)
    }
}
