//! Tonearm Core
//!
//! Domain types, collaborator traits, and error handling for the Tonearm
//! import pipeline.
//!
//! The pipeline itself lives in `tonearm-importer`; this crate defines the
//! boundaries it is built against:
//!
//! - **Domain Types**: [`Item`], [`Album`], match candidates and choices
//! - **Collaborator Traits**: [`MatchingEngine`], [`CollectionStore`],
//!   [`DecisionPolicy`], [`ArtworkService`], [`TagCodec`], [`EventSink`]
//! - **Error Handling**: unified [`TonearmError`] and [`Result`] types

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{Result, TonearmError};
pub use traits::{
    ArtworkService, CollectionStore, DecisionPolicy, EventSink, MatchingEngine, StoreOpener,
    TagCodec,
};
pub use types::{
    Album, AlbumId, AlbumInfo, Candidate, Choice, ImportEvent, Item, ItemTags, MatchOutcome,
    Recommendation, TrackInfo,
};
