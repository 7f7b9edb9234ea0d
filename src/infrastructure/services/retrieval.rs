//! Retrieval facade over the configured vector store backend
//!
//! Single entry point hiding backend selection: the service owns exactly
//! one embedder and one adapter, constructed up front and shared with the
//! ingestion pipeline. `initialize` must run once before any traffic.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use once_cell::sync::OnceCell;

use crate::config::AppConfig;
use crate::domain::{
    Document, EmbeddingProvider, RetrievalError, SearchParams, SearchResult, VectorStoreProvider,
};
use crate::infrastructure::embedding::{GeminiEmbeddingProvider, ResilientEmbedder};
use crate::infrastructure::http_client::HttpClient;
use crate::infrastructure::services::{IngestReport, IngestionPipeline};
use crate::infrastructure::vector_store::{BackendKind, VectorStoreFactory};

/// Source recorded for knowledge stored without an explicit one
const DEFAULT_KNOWLEDGE_SOURCE: &str = "llm_interaction";

/// Backend-agnostic retrieval service
pub struct RetrievalService {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStoreProvider>,
    pipeline: IngestionPipeline,
    ready: OnceCell<()>,
}

impl std::fmt::Debug for RetrievalService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievalService")
            .field("backend", &self.store.backend_name())
            .field("initialized", &self.ready.get().is_some())
            .finish()
    }
}

impl RetrievalService {
    /// Create a service over explicit embedder and store instances
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, store: Arc<dyn VectorStoreProvider>) -> Self {
        let pipeline = IngestionPipeline::new(embedder.clone(), store.clone());

        Self {
            embedder,
            store,
            pipeline,
            ready: OnceCell::new(),
        }
    }

    /// Wire the service from configuration.
    ///
    /// Construction never fails: an unrecognized backend name selects
    /// Qdrant, and a missing embedding API key leaves the service in
    /// degraded mode with fallback vectors. Misconfiguration that matters
    /// surfaces at `initialize`.
    pub fn from_config(config: &AppConfig) -> Self {
        let provider = GeminiEmbeddingProvider::new(
            HttpClient::new(),
            config.embedding.api_key.clone(),
            &config.embedding.model,
        )
        .with_dimensions(config.embedding.dimensions);

        let provider = match config.embedding.base_url {
            Some(ref base_url) => provider.with_base_url(base_url),
            None => provider,
        };

        let embedder: Arc<dyn EmbeddingProvider> =
            Arc::new(ResilientEmbedder::new(Arc::new(provider)));

        let kind = BackendKind::parse(&config.backend.kind);
        tracing::info!(backend = %kind, "Using vector store backend");

        let store =
            VectorStoreFactory::create(kind, &config.backend, config.embedding.dimensions);

        Self::new(embedder, store)
    }

    /// Name of the active backend
    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Validate the embedding configuration and ensure the backing
    /// collection exists. Must be called exactly once before `search` or
    /// `upsert`.
    pub async fn initialize(&self) -> Result<(), RetrievalError> {
        if self.ready.get().is_some() {
            return Err(RetrievalError::configuration(
                "initialize() called more than once",
            ));
        }

        if self.embedder.dimensions() == 0 {
            return Err(RetrievalError::configuration(
                "embedding dimensionality must be non-zero",
            ));
        }

        self.store.ensure_collection().await?;
        let _ = self.ready.set(());

        tracing::info!(backend = self.store.backend_name(), "Retrieval service ready");
        Ok(())
    }

    fn ensure_ready(&self, operation: &str) -> Result<(), RetrievalError> {
        self.ready
            .get()
            .map(|_| ())
            .ok_or_else(|| RetrievalError::not_initialized(operation))
    }

    /// Embed the query text and run a similarity search against the active
    /// backend. An empty result set is not an error.
    pub async fn search(
        &self,
        query: &str,
        params: SearchParams,
    ) -> Result<Vec<SearchResult>, RetrievalError> {
        self.ensure_ready("search")?;

        let vector = self.embedder.embed(query).await?;
        self.store.query(&vector, &params).await
    }

    /// Ingest documents through the batched pipeline
    pub async fn upsert(&self, documents: Vec<Document>) -> Result<IngestReport, RetrievalError> {
        self.ensure_ready("upsert")?;
        self.pipeline.ingest(documents).await
    }

    /// Store one piece of domain knowledge and return its generated id.
    ///
    /// The domain lands in the document metadata; the source defaults to
    /// `llm_interaction` unless the metadata carries one, and a timestamp is
    /// stamped when absent.
    pub async fn store_domain_knowledge(
        &self,
        content: &str,
        domain: &str,
        metadata: HashMap<String, serde_json::Value>,
    ) -> Result<String, RetrievalError> {
        let mut metadata = metadata;
        metadata.insert("domain".to_string(), serde_json::json!(domain));
        metadata
            .entry("timestamp".to_string())
            .or_insert_with(|| serde_json::json!(Utc::now().to_rfc3339()));

        let source = match metadata.get("source") {
            Some(serde_json::Value::String(s)) => s.clone(),
            _ => DEFAULT_KNOWLEDGE_SOURCE.to_string(),
        };

        let document = Document::new(content, source).with_all_metadata(metadata);
        let id = document.id.clone();

        self.upsert(vec![document]).await?;
        Ok(id)
    }
}
