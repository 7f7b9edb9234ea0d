//! Search parameters and the normalized result shape

use std::collections::HashMap;

use serde::Serialize;

/// Default number of results returned by a search
pub const DEFAULT_SEARCH_LIMIT: usize = 3;

/// Default minimum normalized score a result must meet
pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.7;

/// Parameters for a similarity query
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Maximum number of results to return
    pub limit: usize,
    /// Minimum normalized similarity score (0.0 - 1.0)
    pub score_threshold: f32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SEARCH_LIMIT,
            score_threshold: DEFAULT_SCORE_THRESHOLD,
        }
    }
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_score_threshold(mut self, threshold: f32) -> Self {
        self.score_threshold = threshold;
        self
    }
}

/// A normalized search result, independent of the backing store.
///
/// `score` is always higher-is-better in approximately [0, 1]; adapters for
/// stores with lower-is-better distances convert before returning.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub text: String,
    pub metadata: ResultMetadata,
}

/// Metadata attached to a search result
#[derive(Debug, Clone, Serialize)]
pub struct ResultMetadata {
    pub source: String,
    pub score: f32,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl SearchResult {
    pub fn new(text: impl Into<String>, source: impl Into<String>, score: f32) -> Self {
        Self {
            text: text.into(),
            metadata: ResultMetadata {
                source: source.into(),
                score,
                extra: HashMap::new(),
            },
        }
    }

    /// Attach additional payload fields beyond text and source
    pub fn with_extra(mut self, extra: HashMap<String, serde_json::Value>) -> Self {
        self.metadata.extra = extra;
        self
    }

    pub fn score(&self) -> f32 {
        self.metadata.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = SearchParams::default();

        assert_eq!(params.limit, 3);
        assert_eq!(params.score_threshold, 0.7);
    }

    #[test]
    fn test_result_serializes_extra_inline() {
        let mut extra = HashMap::new();
        extra.insert("domain".to_string(), serde_json::json!("rust"));

        let result = SearchResult::new("body", "docs", 0.9).with_extra(extra);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["metadata"]["source"], "docs");
        assert_eq!(json["metadata"]["domain"], "rust");
        assert!((json["metadata"]["score"].as_f64().unwrap() - 0.9).abs() < 1e-6);
    }
}
