//! Fallback wrapper keeping embedding available when the provider degrades
//!
//! On any inner failure the wrapper substitutes a pseudo-random vector of
//! the configured dimensionality instead of surfacing the error, so
//! ingestion and querying stay available. Substitutions are counted and
//! logged so degraded mode is observable.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;

use crate::domain::{EmbeddingProvider, RetrievalError};

/// Embedding provider whose `embed` never fails
pub struct ResilientEmbedder {
    inner: Arc<dyn EmbeddingProvider>,
    fallbacks: AtomicU64,
}

impl std::fmt::Debug for ResilientEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResilientEmbedder")
            .field("provider", &self.inner.provider_name())
            .field("fallbacks", &self.fallbacks.load(Ordering::Relaxed))
            .finish()
    }
}

impl ResilientEmbedder {
    pub fn new(inner: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            inner,
            fallbacks: AtomicU64::new(0),
        }
    }

    /// Number of embeddings substituted with fallback vectors so far
    pub fn fallback_count(&self) -> u64 {
        self.fallbacks.load(Ordering::Relaxed)
    }

    fn fallback_vector(dimensions: usize) -> Vec<f32> {
        let mut rng = rand::thread_rng();
        (0..dimensions).map(|_| rng.r#gen::<f32>() - 0.5).collect()
    }
}

#[async_trait]
impl EmbeddingProvider for ResilientEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RetrievalError> {
        match self.inner.embed(text).await {
            Ok(vector) => Ok(vector),
            Err(error) => {
                self.fallbacks.fetch_add(1, Ordering::Relaxed);
                metrics::counter!("embedding_fallbacks_total").increment(1);
                tracing::warn!(
                    provider = self.inner.provider_name(),
                    %error,
                    "Embedding provider failed, substituting fallback vector"
                );
                Ok(Self::fallback_vector(self.inner.dimensions()))
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }
}
