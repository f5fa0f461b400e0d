//! Initial lookup stage
//!
//! Matches each scanned directory against external metadata candidates. A
//! directory that cannot be matched must still flow downstream for manual
//! handling, so lookup failures become a null match instead of propagating.

use crate::task::{MatchedAlbum, ScannedAlbum, Task};
use tonearm_core::MatchingEngine;
use tracing::debug;

pub struct MatchStage<'a> {
    engine: &'a dyn MatchingEngine,
}

impl<'a> MatchStage<'a> {
    pub fn new(engine: &'a dyn MatchingEngine) -> Self {
        Self { engine }
    }

    /// Annotate the task with its match state. Sentinels pass through
    /// untouched.
    pub async fn process(&self, task: Task<ScannedAlbum>) -> Task<MatchedAlbum> {
        let album = match task {
            Task::Done { root } => return Task::Done { root },
            Task::Album(album) => album,
        };

        debug!("looking up: {}", album.path.display());
        let outcome = match self.engine.match_album(&album.items).await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                debug!("no match for {}: {}", album.path.display(), e);
                None
            }
        };
        Task::Album(album.into_matched(outcome))
    }
}
