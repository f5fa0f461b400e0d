//! Resume-progress persistence
//!
//! Records, per root directory, the last subdirectory whose import finished,
//! so an interrupted run can be resumed. The whole record is read and
//! rewritten on every update; writes go through a sibling temp file and an
//! atomic rename, so a crash mid-write never leaves a torn state file. The
//! read-modify-write cycle itself is not locked across processes.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Persisted progress state, one file per collection.
#[derive(Debug, Clone)]
pub struct ProgressStore {
    state_file: PathBuf,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ProgressRecord {
    #[serde(default)]
    progress: HashMap<PathBuf, PathBuf>,
}

impl ProgressStore {
    /// Create a store backed by the given state file. The file does not need
    /// to exist yet.
    pub fn new(state_file: impl Into<PathBuf>) -> Self {
        Self {
            state_file: state_file.into(),
        }
    }

    /// The last successfully processed subpath of `root`, if any.
    pub fn get(&self, root: &Path) -> Option<PathBuf> {
        self.read().progress.get(root).cloned()
    }

    /// Record that the import of `root` finished up to `subpath`. Passing
    /// `None` removes the entry (the import completed, or its progress is
    /// being discarded).
    pub fn set(&self, root: &Path, subpath: Option<&Path>) -> Result<()> {
        let mut state = self.read();
        match subpath {
            Some(subpath) => {
                state
                    .progress
                    .insert(root.to_path_buf(), subpath.to_path_buf());
            }
            None => {
                state.progress.remove(root);
            }
        }
        self.write(&state)
    }

    /// A missing or corrupt state file reads as empty state, never an error.
    fn read(&self) -> ProgressRecord {
        let bytes = match fs::read(&self.state_file) {
            Ok(bytes) => bytes,
            Err(_) => return ProgressRecord::default(),
        };
        match serde_json::from_slice(&bytes) {
            Ok(record) => record,
            Err(e) => {
                warn!(
                    "unreadable state file {}, treating as empty: {}",
                    self.state_file.display(),
                    e
                );
                ProgressRecord::default()
            }
        }
    }

    fn write(&self, state: &ProgressRecord) -> Result<()> {
        if let Some(parent) = self.state_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let bytes = serde_json::to_vec_pretty(state).map_err(tonearm_core::TonearmError::from)?;

        // Write-then-rename keeps the state file whole under interruption.
        let mut tmp = self.state_file.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.state_file)?;

        Ok(())
    }
}
