use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::date::timestamp_or_epoch;
use crate::error::Result;
use crate::note::NoteRecord;
use crate::related::find_related;
use crate::search::{SearchHit, SearchIndex};

/// index.json is either a bare array (legacy) or `{ "_stats": ..., "notes": [...] }`
#[derive(Deserialize)]
#[serde(untagged)]
enum Snapshot {
    Legacy(Vec<NoteRecord>),
    Envelope {
        #[serde(default)]
        notes: Option<Vec<NoteRecord>>,
        #[serde(default, rename = "_stats")]
        stats: Option<Value>,
    },
}

/// One snapshot of the note store, newest note first.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    notes: Vec<NoteRecord>,
    stats: Option<Value>,
}

impl Corpus {
    pub fn new(mut notes: Vec<NoteRecord>) -> Self {
        sort_newest_first(&mut notes);
        Self { notes, stats: None }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let (notes, stats) = match serde_json::from_str::<Snapshot>(raw)? {
            Snapshot::Legacy(notes) => (notes, None),
            Snapshot::Envelope { notes, stats } => (notes.unwrap_or_default(), stats),
        };

        log::debug!("[Corpus] Loaded snapshot with {} note(s)", notes.len());
        let mut corpus = Self::new(notes);
        corpus.stats = stats;
        Ok(corpus)
    }

    pub fn notes(&self) -> &[NoteRecord] {
        &self.notes
    }

    /// Aggregate statistics from the envelope form, passed through untouched
    pub fn stats(&self) -> Option<&Value> {
        self.stats.as_ref()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&NoteRecord> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn build_index(&self) -> Result<SearchIndex> {
        SearchIndex::build(&self.notes)
    }

    /// Run a query and map the hits back onto this snapshot's notes
    pub fn search(&self, index: &SearchIndex, query: &str) -> Result<Vec<&NoteRecord>> {
        let hits = index.search(query)?;
        Ok(resolve_hits(&self.notes, &hits))
    }

    /// Related notes for the note with `id`; empty if it is not in the snapshot
    pub fn related(&self, id: &str, max_results: usize) -> Vec<&NoteRecord> {
        match self.get(id) {
            Some(focal) => find_related(focal, &self.notes, max_results),
            None => Vec::new(),
        }
    }
}

/// Stable sort by `created_at`, newest first; undated notes sink to the end.
pub fn sort_newest_first(notes: &mut [NoteRecord]) {
    notes.sort_by_cached_key(|note| std::cmp::Reverse(timestamp_or_epoch(note.created_at.as_deref())));
}

/// Full records for ranked hits, in hit order. Hits whose id is not in
/// `notes` are dropped.
pub fn resolve_hits<'a>(notes: &'a [NoteRecord], hits: &[SearchHit]) -> Vec<&'a NoteRecord> {
    let mut by_id: HashMap<&str, &'a NoteRecord> = HashMap::with_capacity(notes.len());
    for note in notes {
        by_id.entry(note.id.as_str()).or_insert(note);
    }

    hits.iter()
        .filter_map(|hit| by_id.get(hit.id.as_str()).copied())
        .collect()
}
