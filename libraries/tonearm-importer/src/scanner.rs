//! Directory scanning
//!
//! Turns one or more root paths into an ordered, lazy stream of import
//! tasks, honoring saved resume state. Every directory that directly
//! contains audio files becomes one task; after a root is exhausted a
//! sentinel task is emitted so downstream stages can clear its progress.

use crate::progress::ProgressStore;
use crate::task::{ScannedAlbum, Task};
use crate::{ImportError, ResumePolicy, Result};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use tonearm_core::{Item, TagCodec};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Supported audio file extensions
const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "flac", "ogg", "wav", "aac", "m4a", "opus", "aiff", "wma",
];

/// Check if a file is a supported audio file
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| AUDIO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Lazy, single-pass task source over one or more root directories.
pub struct DirectoryScanner<'a> {
    codec: &'a dyn TagCodec,
    pending: VecDeque<(PathBuf, Option<PathBuf>)>,
    current: Option<RootWalk>,
}

struct RootWalk {
    root: PathBuf,
    resume_point: Option<PathBuf>,
    walker: walkdir::IntoIter,
}

impl<'a> DirectoryScanner<'a> {
    /// Validate the roots and resolve resume state for each.
    ///
    /// Fails fast with [`ImportError::NotADirectory`] if any root is not an
    /// existing directory. Depending on `resume`, recorded progress is
    /// either honored (the scan fast-forwards past it) or cleared.
    pub fn new(
        roots: &[PathBuf],
        mut resume: ResumePolicy,
        progress: &ProgressStore,
        codec: &'a dyn TagCodec,
    ) -> Result<Self> {
        let mut pending = VecDeque::with_capacity(roots.len());

        for root in roots {
            let root = fs::canonicalize(root)
                .map_err(|_| ImportError::NotADirectory(root.clone()))?;
            if !root.is_dir() {
                return Err(ImportError::NotADirectory(root));
            }

            let mut resume_point = None;
            if let Some(recorded) = progress.get(&root) {
                let keep = match &mut resume {
                    ResumePolicy::Always => {
                        info!("resuming interrupted import of {}", root.display());
                        true
                    }
                    ResumePolicy::Never => false,
                    ResumePolicy::Ask(prompt) => prompt(&root),
                };
                if keep {
                    resume_point = Some(recorded);
                } else {
                    progress.set(&root, None)?;
                }
            }

            pending.push_back((root, resume_point));
        }

        Ok(Self {
            codec,
            pending,
            current: None,
        })
    }
}

impl Iterator for DirectoryScanner<'_> {
    type Item = Result<Task<ScannedAlbum>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current.is_none() {
                let (root, resume_point) = self.pending.pop_front()?;
                let walker = WalkDir::new(&root).sort_by_file_name().into_iter();
                self.current = Some(RootWalk {
                    root,
                    resume_point,
                    walker,
                });
            }
            let Some(walk) = self.current.as_mut() else {
                return None;
            };

            for entry in walk.walker.by_ref() {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => return Some(Err(ImportError::Io(e.into()))),
                };
                if !entry.file_type().is_dir() {
                    continue;
                }

                let dir = entry.path();
                let files = match audio_files_in(dir) {
                    Ok(files) => files,
                    Err(e) => return Some(Err(e.into())),
                };
                if files.is_empty() {
                    continue;
                }

                // Fast-forward through directories already processed in an
                // interrupted run. The recorded subpath itself was completed,
                // so it is skipped too.
                if let Some(resume_point) = walk.resume_point.as_deref() {
                    if dir == resume_point {
                        walk.resume_point = None;
                    }
                    debug!("fast-forwarding past {}", dir.display());
                    continue;
                }

                let items = files
                    .iter()
                    .map(|file| read_item(self.codec, file))
                    .collect();
                return Some(Ok(Task::Album(ScannedAlbum {
                    root: walk.root.clone(),
                    path: dir.to_path_buf(),
                    items,
                })));
            }

            // Root exhausted: emit its sentinel and move to the next root.
            if let Some(walk) = self.current.take() {
                return Some(Ok(Task::Done { root: walk.root }));
            }
        }
    }
}

/// Audio files directly inside `dir`, in name order.
fn audio_files_in(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && is_audio_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Build an item from a file, tolerating unreadable tags.
fn read_item(codec: &dyn TagCodec, path: &Path) -> Item {
    match codec.read(path) {
        Ok(tags) => Item::with_tags(path, tags),
        Err(e) => {
            debug!("could not read tags from {}: {}", path.display(), e);
            Item::from_path(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_audio_extensions() {
        assert!(is_audio_file(Path::new("test.mp3")));
        assert!(is_audio_file(Path::new("test.MP3")));
        assert!(is_audio_file(Path::new("test.flac")));
        assert!(!is_audio_file(Path::new("cover.jpg")));
        assert!(!is_audio_file(Path::new("test")));
    }
}
