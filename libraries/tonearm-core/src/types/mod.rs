//! Domain types shared between the pipeline and its collaborators

mod album;
mod candidate;
mod choice;
mod event;
mod item;

pub use album::{Album, AlbumId};
pub use candidate::{AlbumInfo, Candidate, MatchOutcome, Recommendation, TrackInfo};
pub use choice::Choice;
pub use event::ImportEvent;
pub use item::{Item, ItemTags};
