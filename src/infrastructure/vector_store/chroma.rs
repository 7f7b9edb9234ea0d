//! Chroma vector store adapter
//!
//! Speaks the Chroma REST protocol. Chroma returns a *distance* (lower is
//! better) rather than a score, so the adapter converts with
//! `score = 1 - distance`, clamped into [0, 1], and applies threshold and
//! ordering semantics client-side since the query API has no native
//! score-threshold parameter.

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::domain::{
    RetrievalError, SearchParams, SearchResult, StoredPoint, VectorStoreProvider,
};
use crate::infrastructure::http_client::HttpClientTrait;

use super::payload_string;

/// Configuration for the Chroma adapter
#[derive(Debug, Clone)]
pub struct ChromaConfig {
    pub url: String,
    pub collection_name: String,
    pub vector_size: usize,
}

impl ChromaConfig {
    pub fn new(collection_name: impl Into<String>, vector_size: usize) -> Self {
        Self {
            url: "http://localhost:8000".to_string(),
            collection_name: collection_name.into(),
            vector_size,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into().trim_end_matches('/').to_string();
        self
    }
}

/// Chroma-backed vector store.
///
/// Chroma addresses collections by server-assigned id, so
/// `ensure_collection` resolves and caches the id before any upsert or
/// query can run.
#[derive(Debug)]
pub struct ChromaVectorStore<C: HttpClientTrait> {
    client: C,
    config: ChromaConfig,
    collection_id: RwLock<Option<String>>,
}

impl<C: HttpClientTrait> ChromaVectorStore<C> {
    pub fn new(client: C, config: ChromaConfig) -> Self {
        Self {
            client,
            config,
            collection_id: RwLock::new(None),
        }
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![("Content-Type", "application/json")]
    }

    fn collections_url(&self) -> String {
        format!("{}/api/v1/collections", self.config.url)
    }

    fn backend_err(&self, error: impl std::fmt::Display) -> RetrievalError {
        RetrievalError::backend_unavailable("chroma", error.to_string())
    }

    async fn resolved_collection_id(&self, operation: &str) -> Result<String, RetrievalError> {
        self.collection_id
            .read()
            .await
            .clone()
            .ok_or_else(|| RetrievalError::not_initialized(operation))
    }

    fn check_dimensions(&self, collection: &CollectionRecord) -> Result<(), RetrievalError> {
        let recorded = collection
            .metadata
            .as_ref()
            .and_then(|m| m.get("dimension"))
            .and_then(|v| v.as_u64());

        if let Some(dimension) = recorded {
            if dimension as usize != self.config.vector_size {
                return Err(RetrievalError::configuration(format!(
                    "Collection '{}' has vector size {}, configured size is {}",
                    self.config.collection_name, dimension, self.config.vector_size
                )));
            }
        }

        Ok(())
    }

    async fn create_collection(&self) -> Result<String, RetrievalError> {
        let body = serde_json::json!({
            "name": self.config.collection_name,
            "metadata": {
                "description": "semantic retrieval collection",
                "dimension": self.config.vector_size,
            },
        });

        let response = self
            .client
            .post_json(&self.collections_url(), self.headers(), &body)
            .await
            .map_err(|e| self.backend_err(e))?;

        let created: CollectionRecord =
            serde_json::from_value(response).map_err(|e| self.backend_err(e))?;

        tracing::info!(
            collection = %self.config.collection_name,
            vector_size = self.config.vector_size,
            "Created Chroma collection"
        );

        Ok(created.id)
    }

    /// Convert a Chroma distance into a normalized score. Distances are
    /// expected in [0, 1]; the clamp bounds metrics that violate that
    /// assumption instead of emitting scores outside the normalized range.
    fn distance_to_score(distance: f32) -> f32 {
        (1.0 - distance).clamp(0.0, 1.0)
    }
}

#[async_trait]
impl<C: HttpClientTrait> VectorStoreProvider for ChromaVectorStore<C> {
    fn backend_name(&self) -> &'static str {
        "chroma"
    }

    async fn ensure_collection(&self) -> Result<(), RetrievalError> {
        let response = self
            .client
            .get_json(&self.collections_url(), self.headers())
            .await
            .map_err(|e| self.backend_err(e))?;

        let collections: Vec<CollectionRecord> =
            serde_json::from_value(response).map_err(|e| self.backend_err(e))?;

        let id = match collections
            .iter()
            .find(|c| c.name == self.config.collection_name)
        {
            Some(existing) => {
                self.check_dimensions(existing)?;
                tracing::debug!(
                    collection = %self.config.collection_name,
                    "Chroma collection already exists"
                );
                existing.id.clone()
            }
            None => self.create_collection().await?,
        };

        *self.collection_id.write().await = Some(id);
        Ok(())
    }

    async fn upsert_batch(&self, points: Vec<StoredPoint>) -> Result<(), RetrievalError> {
        let collection_id = self.resolved_collection_id("upsert_batch").await?;

        let mut ids = Vec::with_capacity(points.len());
        let mut embeddings = Vec::with_capacity(points.len());
        let mut documents = Vec::with_capacity(points.len());
        let mut metadatas = Vec::with_capacity(points.len());

        for point in points {
            let mut payload = point.payload;
            let text = match payload.remove("text") {
                Some(serde_json::Value::String(s)) => s,
                Some(serde_json::Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            };

            ids.push(point.id);
            embeddings.push(point.vector);
            documents.push(text);
            metadatas.push(serde_json::Value::Object(payload.into_iter().collect()));
        }

        let body = serde_json::json!({
            "ids": ids,
            "embeddings": embeddings,
            "documents": documents,
            "metadatas": metadatas,
        });
        let url = format!("{}/{}/upsert", self.collections_url(), collection_id);

        self.client
            .post_json(&url, self.headers(), &body)
            .await
            .map_err(|e| self.backend_err(e))?;

        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        params: &SearchParams,
    ) -> Result<Vec<SearchResult>, RetrievalError> {
        let collection_id = self.resolved_collection_id("query").await?;

        let body = serde_json::json!({
            "query_embeddings": [vector],
            "n_results": params.limit,
            "include": ["documents", "metadatas", "distances"],
        });
        let url = format!("{}/{}/query", self.collections_url(), collection_id);

        let response = self
            .client
            .post_json(&url, self.headers(), &body)
            .await
            .map_err(|e| self.backend_err(e))?;

        let parsed: QueryResponse =
            serde_json::from_value(response).map_err(|e| self.backend_err(e))?;

        // Chroma returns parallel arrays per submitted query vector; only
        // one vector is ever submitted here, so row 0 is the whole answer.
        let documents = parsed.documents.and_then(|mut d| d.drain(..).next()).unwrap_or_default();
        let mut metadatas = parsed.metadatas.and_then(|mut m| m.drain(..).next()).unwrap_or_default();
        let distances = parsed.distances.and_then(|mut d| d.drain(..).next()).unwrap_or_default();

        let mut results: Vec<SearchResult> = documents
            .into_iter()
            .enumerate()
            .map(|(i, document)| {
                let mut metadata = metadatas
                    .get_mut(i)
                    .and_then(Option::take)
                    .unwrap_or_default();
                let distance = distances.get(i).copied().flatten().unwrap_or(0.0);

                let source = payload_string(&metadata, "source");
                metadata.remove("source");

                SearchResult::new(
                    document.unwrap_or_default(),
                    source,
                    Self::distance_to_score(distance),
                )
                .with_extra(metadata.into_iter().collect())
            })
            .filter(|result| result.score() >= params.score_threshold)
            .collect();

        results.sort_by(|a, b| {
            b.score()
                .partial_cmp(&a.score())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(params.limit);

        Ok(results)
    }
}

// Chroma API types

#[derive(Debug, Deserialize)]
struct CollectionRecord {
    id: String,
    name: String,
    #[serde(default)]
    metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    documents: Option<Vec<Vec<Option<String>>>>,
    #[serde(default)]
    metadatas: Option<Vec<Vec<Option<serde_json::Map<String, serde_json::Value>>>>>,
    #[serde(default)]
    distances: Option<Vec<Vec<Option<f32>>>>,
}
