//! Tonearm Importer
//!
//! This crate is the resumable, multi-stage pipeline that imports
//! directories of music files into a Tonearm collection.
//!
//! # Architecture
//!
//! - `scanner`: turns root paths into an ordered stream of import tasks
//! - `lookup`: matches each task against external metadata candidates
//! - `decision`: resolves a choice per task and suppresses duplicates
//! - `commit`: applies the chosen outcome (files, store, artwork, events)
//! - `pipeline`: the driver loop composing the stages, plus the reduced
//!   no-tagging pathway
//! - `progress`: persisted resume markers, one per root directory
//! - `task`: the task entity and its typed stage progression
//! - `destination`: library destination paths and safe file relocation
//! - `activity`: optional append-only log of skip/as-is/duplicate events
//!
//! Each task flows through lookup -> decision -> commit in order, one task
//! fully processed before the next. External collaborators (matching engine,
//! collection store, prompt, artwork, tag codec, event sink) are the trait
//! boundaries defined in `tonearm-core`.

mod error;
mod types;

// Core modules
pub mod activity;
pub mod commit;
pub mod decision;
pub mod destination;
pub mod lookup;
pub mod pipeline;
pub mod progress;
pub mod scanner;
pub mod task;

pub use error::ImportError;
pub use pipeline::ImportPipeline;
pub use types::*;

/// Re-export of the crate-wide result type
pub type Result<T> = std::result::Result<T, ImportError>;
