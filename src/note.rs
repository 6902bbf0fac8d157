use serde::{Deserialize, Deserializer, Serialize};

// index.json sometimes carries `null` where a list is expected
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// One entry of the note store's snapshot.
///
/// Everything except `id` is optional; absent values degrade to neutral
/// contributions in search and relatedness scoring.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NoteRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ai_tags: Vec<String>,
    #[serde(default)]
    pub searchable_text: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    /// Tokens produced upstream by a segmenter
    #[serde(default)]
    pub search_tokens: Option<Vec<String>>,
    #[serde(default)]
    pub note_type: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Build-time relatedness hint (ordered note ids)
    #[serde(default)]
    pub related: Option<Vec<String>>,
}

impl NoteRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ai_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ai_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.searchable_text = Some(text.into());
        self
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    pub fn with_search_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_tokens = Some(tokens.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_note_type(mut self, note_type: impl Into<String>) -> Self {
        self.note_type = Some(note_type.into());
        self
    }

    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }

    pub fn with_related<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.related = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Manual tags followed by AI tags
    pub fn all_tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().chain(self.ai_tags.iter()).map(String::as_str)
    }

    /// Tag text as indexed: manual tags then AI tags, space separated
    pub fn tags_text(&self) -> String {
        self.all_tags().collect::<Vec<_>>().join(" ")
    }

    /// Raw body text used when no precomputed tokens exist
    pub fn body_text(&self) -> &str {
        self.searchable_text
            .as_deref()
            .or(self.excerpt.as_deref())
            .unwrap_or("")
    }

    pub fn has_search_tokens(&self) -> bool {
        self.search_tokens.as_ref().is_some_and(|t| !t.is_empty())
    }

    /// Non-empty note type, if any
    pub fn note_type(&self) -> Option<&str> {
        self.note_type.as_deref().filter(|t| !t.is_empty())
    }

    /// Relatedness hint, if present and non-empty
    pub fn related_hint(&self) -> Option<&[String]> {
        self.related.as_deref().filter(|ids| !ids.is_empty())
    }
}
