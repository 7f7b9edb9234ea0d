//! Gemini embedding provider implementation

use std::borrow::Cow;

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{EmbeddingProvider, RetrievalError};
use crate::infrastructure::http_client::HttpClientTrait;

const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Character ceiling applied before submission; keeps requests under the
/// model's token limit
pub const MAX_EMBED_TEXT_CHARS: usize = 25_000;

/// Known Gemini embedding models and their dimensions
const EMBEDDING_MODELS: &[(&str, usize)] = &[
    ("embedding-001", 768),
    ("text-embedding-004", 768),
    ("gemini-embedding-001", 3072),
];

const DEFAULT_DIMENSIONS: usize = 768;

/// Gemini embedding provider
#[derive(Debug)]
pub struct GeminiEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    api_key: Option<String>,
    model: String,
    base_url: String,
    dimensions: usize,
    max_text_chars: usize,
}

impl<C: HttpClientTrait> GeminiEmbeddingProvider<C> {
    /// Create a new Gemini embedding provider. A missing API key makes every
    /// `embed` call fail, which the resilient wrapper turns into fallback
    /// vectors.
    pub fn new(client: C, api_key: Option<String>, model: impl Into<String>) -> Self {
        let model = model.into();
        let dimensions = Self::model_dimensions(&model).unwrap_or(DEFAULT_DIMENSIONS);

        Self {
            client,
            api_key: api_key.filter(|key| !key.is_empty()),
            model,
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            dimensions,
            max_text_chars: MAX_EMBED_TEXT_CHARS,
        }
    }

    /// Override the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the expected output dimensionality
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    fn model_dimensions(model: &str) -> Option<usize> {
        EMBEDDING_MODELS
            .iter()
            .find(|(name, _)| *name == model)
            .map(|(_, dims)| *dims)
    }

    fn embed_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:embedContent",
            self.base_url, self.model
        )
    }

    fn truncate<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if text.len() <= self.max_text_chars {
            return Cow::Borrowed(text);
        }
        Cow::Owned(text.chars().take(self.max_text_chars).collect())
    }

    fn build_request(&self, text: &str) -> serde_json::Value {
        serde_json::json!({
            "model": format!("models/{}", self.model),
            "content": { "parts": [{ "text": text }] },
        })
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<Vec<f32>, RetrievalError> {
        let response: EmbedContentResponse = serde_json::from_value(json).map_err(|e| {
            RetrievalError::embedding_provider(
                "gemini",
                format!("Failed to parse embedding response: {e}"),
            )
        })?;

        let values = response.embedding.values;
        if values.len() != self.dimensions {
            return Err(RetrievalError::embedding_provider(
                "gemini",
                format!(
                    "Model returned {} dimensions, expected {}",
                    values.len(),
                    self.dimensions
                ),
            ));
        }

        Ok(values)
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for GeminiEmbeddingProvider<C> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RetrievalError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            RetrievalError::embedding_provider("gemini", "API key not configured")
        })?;

        let trimmed = self.truncate(text);
        let body = self.build_request(&trimmed);
        let headers = vec![
            ("x-goog-api-key", api_key),
            ("Content-Type", "application/json"),
        ];

        let response = self
            .client
            .post_json(&self.embed_url(), headers, &body)
            .await
            .map_err(|e| RetrievalError::embedding_provider("gemini", e.to_string()))?;

        self.parse_response(response)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

// Gemini API types

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: ContentEmbedding,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}
