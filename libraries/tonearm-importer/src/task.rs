//! The import task model
//!
//! A task represents one directory's worth of items (or the marker that a
//! root directory is fully scanned) together with its intermediate state.
//! Each stage consumes the previous stage's type and produces the next, so
//! "a sentinel never receives a choice" and "a choice is set exactly once"
//! hold by construction rather than by runtime assertion.

use std::path::PathBuf;
use tonearm_core::types::{AlbumInfo, Choice, Item, MatchOutcome};

/// A unit of pipeline work: one album directory in stage `A`, or the
/// sentinel marking that a root directory has no more album directories.
#[derive(Debug)]
pub enum Task<A> {
    /// One directory's worth of items
    Album(A),

    /// Sentinel: the scan of `root` is finished
    Done {
        /// The root directory whose scan completed
        root: PathBuf,
    },
}

/// A directory of items as produced by the scanner.
#[derive(Debug, Clone)]
pub struct ScannedAlbum {
    /// Root directory this task originates from
    pub root: PathBuf,

    /// The specific subdirectory being processed
    pub path: PathBuf,

    /// Track records found directly in `path`, in name order
    pub items: Vec<Item>,
}

impl ScannedAlbum {
    /// Attach the lookup result. `None` is the null match: the directory
    /// still flows downstream for manual handling.
    pub fn into_matched(self, outcome: Option<MatchOutcome>) -> MatchedAlbum {
        MatchedAlbum {
            root: self.root,
            path: self.path,
            items: self.items,
            outcome,
        }
    }
}

/// A task after lookup, carrying the match state.
#[derive(Debug, Clone)]
pub struct MatchedAlbum {
    /// Root directory this task originates from
    pub root: PathBuf,

    /// The specific subdirectory being processed
    pub path: PathBuf,

    /// Track records to import
    pub items: Vec<Item>,

    /// What the matching engine found, or `None` for a null match
    pub outcome: Option<MatchOutcome>,
}

impl MatchedAlbum {
    /// Apply the resolved choice. A `Skip` discards the items (no longer
    /// needed downstream); an album match replaces them with the candidate's
    /// reordered sequence.
    pub fn into_decided(self, choice: Choice) -> DecidedAlbum {
        let (items, decision) = match choice {
            Choice::Skip => (Vec::new(), Decision::Skip),
            Choice::AsIs => (self.items, Decision::AsIs),
            Choice::Tracks => (self.items, Decision::Tracks),
            Choice::Album { info, items } => (items, Decision::Album(info)),
        };
        DecidedAlbum {
            root: self.root,
            path: self.path,
            items,
            decision,
        }
    }
}

/// The disposition recorded on a decided task.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Do nothing with this directory
    Skip,

    /// Import with existing metadata
    AsIs,

    /// Import items as independent tracks
    Tracks,

    /// Import as the chosen candidate release
    Album(AlbumInfo),
}

impl Decision {
    /// Should an album structure be created for these items?
    pub fn creates_album(&self) -> bool {
        matches!(self, Decision::Album(_) | Decision::AsIs)
    }

    /// Should matched metadata be written to the files?
    pub fn writes_tags(&self) -> bool {
        matches!(self, Decision::Album(_))
    }

    /// Should album art be fetched for this album?
    pub fn fetches_art(&self) -> bool {
        self.writes_tags()
    }

    /// When an album structure is created, should the album artist be
    /// inferred from the plurality of track artists? Matched albums carry an
    /// explicit album artist; as-is imports usually do not.
    pub fn infers_album_artist(&self) -> bool {
        matches!(self, Decision::AsIs)
    }
}

/// A fully decided task, ready for commit.
#[derive(Debug)]
pub struct DecidedAlbum {
    /// Root directory this task originates from
    pub root: PathBuf,

    /// The specific subdirectory being processed
    pub path: PathBuf,

    /// Track records to commit; empty after a skip
    pub items: Vec<Item>,

    /// The resolved disposition
    pub decision: Decision,
}

impl DecidedAlbum {
    /// Downgrade this task to a skip, discarding the previously selected
    /// outcome (used by duplicate suppression).
    pub fn skip(mut self) -> Self {
        self.items.clear();
        self.decision = Decision::Skip;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanned(n: usize) -> ScannedAlbum {
        ScannedAlbum {
            root: PathBuf::from("/music"),
            path: PathBuf::from("/music/album"),
            items: (0..n)
                .map(|i| Item::from_path(format!("/music/album/{i}.mp3")))
                .collect(),
        }
    }

    fn info() -> AlbumInfo {
        AlbumInfo {
            artist: "Artist".to_string(),
            album: "Album".to_string(),
            year: Some(1999),
            tracks: Vec::new(),
        }
    }

    #[test]
    fn decision_predicates() {
        let album = Decision::Album(info());
        assert!(album.creates_album());
        assert!(album.writes_tags());
        assert!(album.fetches_art());
        assert!(!album.infers_album_artist());

        assert!(Decision::AsIs.creates_album());
        assert!(!Decision::AsIs.writes_tags());
        assert!(!Decision::AsIs.fetches_art());
        assert!(Decision::AsIs.infers_album_artist());

        for decision in [Decision::Tracks, Decision::Skip] {
            assert!(!decision.creates_album());
            assert!(!decision.writes_tags());
            assert!(!decision.fetches_art());
        }
    }

    #[test]
    fn skip_discards_items() {
        let task = scanned(3).into_matched(None).into_decided(Choice::Skip);
        assert!(task.items.is_empty());
        assert_eq!(task.decision, Decision::Skip);
    }

    #[test]
    fn album_choice_replaces_items() {
        let reordered = vec![
            Item::from_path("/music/album/2.mp3"),
            Item::from_path("/music/album/1.mp3"),
        ];
        let task = scanned(2).into_matched(None).into_decided(Choice::Album {
            info: info(),
            items: reordered.clone(),
        });
        assert_eq!(task.items, reordered);
        assert_eq!(task.decision, Decision::Album(info()));
    }

    #[test]
    fn duplicate_downgrade_clears_items() {
        let task = scanned(2)
            .into_matched(None)
            .into_decided(Choice::AsIs)
            .skip();
        assert!(task.items.is_empty());
        assert_eq!(task.decision, Decision::Skip);
    }
}
