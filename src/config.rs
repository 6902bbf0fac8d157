use serde::{Deserialize, Serialize};

/// Query-time tuning for the lexical index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    pub title_boost: f32,
    pub tags_boost: f32,
    pub body_boost: f32,
    /// Allowed edit distance as a fraction of the query term length
    pub fuzzy: f32,
    pub prefix: bool,
    /// Score multiplier for whole-term typo matches relative to exact ones
    pub fuzzy_weight: f32,
    /// Score multiplier for prefix matches relative to exact ones
    pub prefix_weight: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            title_boost: 3.0,
            tags_boost: 2.0,
            body_boost: 1.0,
            fuzzy: 0.2,
            prefix: true,
            fuzzy_weight: 0.45,
            prefix_weight: 0.375,
        }
    }
}

/// Blend of the four relatedness signals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RelatedWeights {
    pub tag: f64,
    pub text: f64,
    pub note_type: f64,
    pub time: f64,
}

impl Default for RelatedWeights {
    fn default() -> Self {
        Self {
            tag: 0.4,
            text: 0.4,
            note_type: 0.1,
            time: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RelatedConfig {
    pub weights: RelatedWeights,
    /// Candidates must score strictly above this to be returned
    pub noise_floor: f64,
    pub time_window_days: u32,
    pub search: SearchConfig,
}

impl Default for RelatedConfig {
    fn default() -> Self {
        Self {
            weights: RelatedWeights::default(),
            noise_floor: 0.05,
            time_window_days: 90,
            search: SearchConfig::default(),
        }
    }
}

impl RelatedConfig {
    pub fn time_window_ms(&self) -> i64 {
        i64::from(self.time_window_days) * 86_400_000
    }
}
