use std::collections::{HashMap, HashSet};

use rayon::prelude::*;

use crate::config::{RelatedConfig, RelatedWeights, SearchConfig};
use crate::date::timestamp_or_epoch;
use crate::note::NoteRecord;
use crate::search::documents::dedupe_by_id;
use crate::search::SearchIndex;

/// Per-signal scores for one candidate, each in [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreBreakdown {
    pub tag: f64,
    pub text: f64,
    pub note_type: f64,
    pub time: f64,
}

impl ScoreBreakdown {
    pub fn total(&self, weights: &RelatedWeights) -> f64 {
        self.tag * weights.tag
            + self.text * weights.text
            + self.note_type * weights.note_type
            + self.time * weights.time
    }
}

#[derive(Debug, Clone)]
pub struct RelatedNote<'a> {
    pub note: &'a NoteRecord,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

fn tag_set(note: &NoteRecord) -> HashSet<&str> {
    note.all_tags().collect()
}

/// Jaccard similarity of two tag sets; 0 when both are empty.
pub fn tag_overlap<'t>(a: &HashSet<&'t str>, b: &HashSet<&'t str>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// 1 when the candidate has a note type and it equals the focal note's.
pub fn type_affinity(focal: &NoteRecord, candidate: &NoteRecord) -> f64 {
    match candidate.note_type() {
        Some(t) if focal.note_type() == Some(t) => 1.0,
        _ => 0.0,
    }
}

/// Linear decay from 1 (same instant) to 0 at `window_ms` apart.
pub fn time_proximity(a_ms: i64, b_ms: i64, window_ms: i64) -> f64 {
    if window_ms <= 0 {
        return 0.0;
    }
    let diff = a_ms.abs_diff(b_ms) as f64;
    (1.0 - diff / window_ms as f64).max(0.0)
}

/// Text relevance of every corpus note to the focal note's title and manual
/// tags, normalized so the best hit scores 1.
pub fn text_similarity_scores(
    focal: &NoteRecord,
    corpus: &[NoteRecord],
    config: &SearchConfig,
) -> HashMap<String, f64> {
    let query = std::iter::once(focal.title.as_str())
        .chain(focal.tags.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ");

    let hits = match SearchIndex::build_with(corpus, config.clone()).and_then(|index| index.search(&query)) {
        Ok(hits) => hits,
        Err(e) => {
            log::warn!("[Related] Text similarity unavailable for {}: {}", focal.id, e);
            return HashMap::new();
        }
    };

    let top = match hits.first() {
        Some(hit) if hit.score > 0.0 => f64::from(hit.score),
        _ => 1.0,
    };

    hits.into_iter()
        .map(|hit| (hit.id, f64::from(hit.score) / top))
        .collect()
}

/// Notes named by the focal note's hint, in hint order. Unknown ids, the
/// focal note itself and repeats are skipped.
fn resolve_hint<'a>(
    focal: &NoteRecord,
    hint: &[String],
    corpus: &'a [NoteRecord],
    max_results: usize,
) -> Vec<&'a NoteRecord> {
    let mut by_id: HashMap<&str, &'a NoteRecord> = HashMap::with_capacity(corpus.len());
    for note in corpus {
        by_id.entry(note.id.as_str()).or_insert(note);
    }

    let mut seen = HashSet::new();
    let resolved: Vec<&'a NoteRecord> = hint
        .iter()
        .filter(|&id| id.as_str() != focal.id && seen.insert(id.as_str()))
        .filter_map(|id| by_id.get(id.as_str()).copied())
        .take(max_results)
        .collect();

    log::debug!(
        "[Related] Using precomputed hint for {} ({} of {} ids resolved)",
        focal.id,
        resolved.len(),
        hint.len()
    );
    resolved
}

/// Live multi-factor scoring: every other note above the noise floor,
/// best first. Ignores any precomputed hint.
pub fn rank_related<'a>(
    focal: &NoteRecord,
    corpus: &'a [NoteRecord],
    config: &RelatedConfig,
) -> Vec<RelatedNote<'a>> {
    if corpus.len() <= 1 {
        return Vec::new();
    }

    let candidates: Vec<&'a NoteRecord> = dedupe_by_id(corpus)
        .into_iter()
        .filter(|note| note.id != focal.id)
        .collect();
    if candidates.is_empty() {
        return Vec::new();
    }

    let text_scores = text_similarity_scores(focal, corpus, &config.search);
    let focal_tags = tag_set(focal);
    let focal_time = timestamp_or_epoch(focal.created_at.as_deref());
    let window_ms = config.time_window_ms();

    let mut scored: Vec<RelatedNote<'a>> = candidates
        .par_iter()
        .map(|&note| {
            let breakdown = ScoreBreakdown {
                tag: tag_overlap(&focal_tags, &tag_set(note)),
                text: text_scores.get(note.id.as_str()).copied().unwrap_or(0.0),
                note_type: type_affinity(focal, note),
                time: time_proximity(
                    focal_time,
                    timestamp_or_epoch(note.created_at.as_deref()),
                    window_ms,
                ),
            };
            RelatedNote {
                note,
                score: breakdown.total(&config.weights),
                breakdown,
            }
        })
        .filter(|candidate| candidate.score > config.noise_floor)
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));

    log::debug!(
        "[Related] Scored {} candidate(s) for {}, {} above noise floor",
        candidates.len(),
        focal.id,
        scored.len()
    );
    scored
}

/// Up to `max_results` notes related to `focal`.
///
/// A non-empty precomputed `related` hint on the focal note wins outright;
/// otherwise notes are ranked by tag overlap, text similarity, note type and
/// creation-time proximity. The focal note is never part of the result.
pub fn find_related<'a>(
    focal: &NoteRecord,
    corpus: &'a [NoteRecord],
    max_results: usize,
) -> Vec<&'a NoteRecord> {
    find_related_with(focal, corpus, max_results, &RelatedConfig::default())
}

pub fn find_related_with<'a>(
    focal: &NoteRecord,
    corpus: &'a [NoteRecord],
    max_results: usize,
    config: &RelatedConfig,
) -> Vec<&'a NoteRecord> {
    if let Some(hint) = focal.related_hint() {
        return resolve_hint(focal, hint, corpus, max_results);
    }

    rank_related(focal, corpus, config)
        .into_iter()
        .take(max_results)
        .map(|related| related.note)
        .collect()
}
