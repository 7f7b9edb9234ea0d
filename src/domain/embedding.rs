//! Embedding provider trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use super::RetrievalError;

/// Trait for embedding providers.
///
/// An implementation turns text into a fixed-length vector; the output
/// length of `embed` always equals `dimensions()`.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Generate an embedding vector for the given text
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RetrievalError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Fixed output dimensionality of this provider
    fn dimensions(&self) -> usize;
}
