use thiserror::Error;

/// Errors surfaced by the search engine and snapshot parsing.
///
/// Missing or malformed note fields are never errors; they degrade to
/// neutral values instead.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search engine error: {0}")]
    Engine(#[from] tantivy::TantivyError),

    #[error("failed to parse notes snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SearchError>;
