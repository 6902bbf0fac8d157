use std::collections::HashSet;

use rayon::prelude::*;

use super::tokenizer::IndexMode;
use crate::note::NoteRecord;

/// Field values for one note, ready to be written into the index
#[derive(Debug, Clone, PartialEq)]
pub struct IndexDocument {
    pub id: String,
    pub title: String,
    pub body: String,
    pub tags: String,
}

/// Keep the first note for every id, preserving corpus order.
pub fn dedupe_by_id<'a, I>(notes: I) -> Vec<&'a NoteRecord>
where
    I: IntoIterator<Item = &'a NoteRecord>,
{
    let mut seen = HashSet::new();
    notes
        .into_iter()
        .filter(|&note| seen.insert(note.id.as_str()))
        .collect()
}

/// Precomputed tokens anywhere in the corpus switch the whole index over.
pub fn select_mode(notes: &[&NoteRecord]) -> IndexMode {
    if notes.iter().any(|note| note.has_search_tokens()) {
        IndexMode::Precomputed
    } else {
        IndexMode::Fallback
    }
}

fn prepare(note: &NoteRecord, mode: IndexMode) -> IndexDocument {
    let body = match mode {
        IndexMode::Precomputed => note
            .search_tokens
            .as_ref()
            .map(|tokens| tokens.join(" "))
            .unwrap_or_default(),
        IndexMode::Fallback => note.body_text().to_string(),
    };

    IndexDocument {
        id: note.id.clone(),
        title: note.title.clone(),
        body,
        tags: note.tags_text(),
    }
}

/// Deduplicated documents plus the mode they were prepared for.
pub fn prepare_documents(notes: &[NoteRecord]) -> (IndexMode, Vec<IndexDocument>) {
    let unique = dedupe_by_id(notes);
    let mode = select_mode(&unique);
    let docs = unique.par_iter().map(|note| prepare(note, mode)).collect();
    (mode, docs)
}
