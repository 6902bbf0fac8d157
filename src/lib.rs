//! Note search and related-notes engine for Cortex Notes.
//!
//! The note store hands over a flat list of [`NoteRecord`]s. [`SearchIndex`]
//! answers ranked full-text queries over titles, tags and body text (CJK
//! unigrams plus Latin words, or upstream-segmented tokens), and
//! [`find_related`] ranks the notes most related to one focal note.

pub mod config;
pub mod corpus;
pub mod date;
pub mod error;
pub mod note;
pub mod related;
pub mod search;

#[cfg(test)]
mod related_test;

#[cfg(test)]
mod search_properties_test;

pub use config::{RelatedConfig, RelatedWeights, SearchConfig};
pub use corpus::{resolve_hits, Corpus};
pub use error::{Result, SearchError};
pub use note::NoteRecord;
pub use related::{find_related, find_related_with, rank_related, RelatedNote, ScoreBreakdown};
pub use search::{build_index, search, IndexMode, SearchHit, SearchIndex};
