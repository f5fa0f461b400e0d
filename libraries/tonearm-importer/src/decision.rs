//! Decision stage
//!
//! Presents each matched directory to the decision policy (an interactive
//! prompt or an automatic rule), records the choice, and suppresses
//! duplicates already present in the collection by downgrading the choice
//! to a skip.

use crate::activity::ActivityLog;
use crate::task::{DecidedAlbum, MatchedAlbum, Task};
use crate::{ImportError, Result};
use tonearm_core::{Choice, CollectionStore, DecisionPolicy, TonearmError};
use tracing::warn;

pub struct DecisionStage<'a, S: CollectionStore> {
    store: S,
    policy: &'a dyn DecisionPolicy,
    log: Option<&'a mut ActivityLog>,
}

impl<'a, S: CollectionStore> DecisionStage<'a, S> {
    /// `store` must be a handle opened by this stage's worker.
    pub fn new(store: S, policy: &'a dyn DecisionPolicy, log: Option<&'a mut ActivityLog>) -> Self {
        Self { store, policy, log }
    }

    /// Resolve a choice for the task. Sentinels pass through without any
    /// operator interaction. An abort from the policy stops the pipeline.
    pub async fn process(&mut self, task: Task<MatchedAlbum>) -> Result<Task<DecidedAlbum>> {
        let album = match task {
            Task::Done { root } => return Ok(Task::Done { root }),
            Task::Album(album) => album,
        };

        let choice = self
            .policy
            .decide(&album.path, &album.items, album.outcome.as_ref())
            .await
            .map_err(|e| match e {
                TonearmError::Aborted => ImportError::Aborted,
                other => ImportError::Core(other),
            })?;

        match &choice {
            Choice::AsIs => self.record("asis", &album),
            Choice::Skip => self.record("skip", &album),
            _ => {}
        }

        // Choices that resolve to a concrete (artist, album) pair are checked
        // against the existing collection.
        let dup_key = match &choice {
            Choice::AsIs => album
                .outcome
                .as_ref()
                .map(|o| (o.artist.clone(), o.album.clone())),
            Choice::Album { info, .. } => {
                Some((Some(info.artist.clone()), Some(info.album.clone())))
            }
            _ => None,
        };

        let mut decided = album.into_decided(choice);
        if let Some((artist, title)) = dup_key {
            if self.is_duplicate(artist.as_deref(), title.as_deref()).await? {
                warn!(
                    "{} is already in the collection, skipping",
                    decided.path.display()
                );
                if let Some(log) = self.log.as_deref_mut() {
                    log.record("duplicate", &decided.path);
                }
                decided = decided.skip();
            }
        }
        Ok(Task::Album(decided))
    }

    /// An import with no identifiable artist cannot be meaningfully
    /// deduplicated. Album titles match case-sensitively.
    async fn is_duplicate(&self, artist: Option<&str>, album: Option<&str>) -> Result<bool> {
        let (Some(artist), Some(album)) = (artist, album) else {
            return Ok(false);
        };
        let existing = self.store.albums_by_artist(artist).await?;
        Ok(existing.iter().any(|a| a.title == album))
    }

    fn record(&mut self, status: &str, album: &MatchedAlbum) {
        if let Some(log) = self.log.as_deref_mut() {
            log.record(status, &album.path);
        }
    }
}
