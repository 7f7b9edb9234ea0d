//! Qdrant vector store adapter
//!
//! Speaks the Qdrant REST protocol. Qdrant's native similarity score is
//! already higher-is-better in [0, 1] for cosine collections, so scores
//! pass through unchanged.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{
    RetrievalError, SearchParams, SearchResult, StoredPoint, VectorStoreProvider,
};
use crate::infrastructure::http_client::HttpClientTrait;

use super::result_from_payload;

/// Configuration for the Qdrant adapter
#[derive(Debug, Clone)]
pub struct QdrantConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub collection_name: String,
    pub vector_size: usize,
}

impl QdrantConfig {
    pub fn new(collection_name: impl Into<String>, vector_size: usize) -> Self {
        Self {
            url: "http://localhost:6333".to_string(),
            api_key: None,
            collection_name: collection_name.into(),
            vector_size,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// Qdrant-backed vector store
#[derive(Debug)]
pub struct QdrantVectorStore<C: HttpClientTrait> {
    client: C,
    config: QdrantConfig,
}

impl<C: HttpClientTrait> QdrantVectorStore<C> {
    pub fn new(client: C, config: QdrantConfig) -> Self {
        Self { client, config }
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        let mut headers = vec![("Content-Type", "application/json")];
        if let Some(ref key) = self.config.api_key {
            headers.push(("api-key", key.as_str()));
        }
        headers
    }

    fn collections_url(&self) -> String {
        format!("{}/collections", self.config.url)
    }

    fn collection_url(&self) -> String {
        format!("{}/collections/{}", self.config.url, self.config.collection_name)
    }

    fn backend_err(&self, error: impl std::fmt::Display) -> RetrievalError {
        RetrievalError::backend_unavailable("qdrant", error.to_string())
    }

    async fn collection_exists(&self) -> Result<bool, RetrievalError> {
        let response = self
            .client
            .get_json(&self.collections_url(), self.headers())
            .await
            .map_err(|e| self.backend_err(e))?;

        let listing: CollectionsResponse =
            serde_json::from_value(response).map_err(|e| self.backend_err(e))?;

        Ok(listing
            .result
            .collections
            .iter()
            .any(|c| c.name == self.config.collection_name))
    }

    /// Compare the configured vector size against the live collection. The
    /// dimensionality of a collection is fixed at creation, so a mismatch
    /// can only be fixed by reconfiguring the service.
    async fn check_dimensions(&self) -> Result<(), RetrievalError> {
        let response = self
            .client
            .get_json(&self.collection_url(), self.headers())
            .await
            .map_err(|e| self.backend_err(e))?;

        let info: CollectionInfoResponse =
            serde_json::from_value(response).map_err(|e| self.backend_err(e))?;

        if let Some(size) = info.vector_size() {
            if size != self.config.vector_size {
                return Err(RetrievalError::configuration(format!(
                    "Collection '{}' has vector size {}, configured size is {}",
                    self.config.collection_name, size, self.config.vector_size
                )));
            }
        }

        Ok(())
    }

    async fn create_collection(&self) -> Result<(), RetrievalError> {
        let body = serde_json::json!({
            "vectors": {
                "size": self.config.vector_size,
                "distance": "Cosine",
            }
        });

        self.client
            .put_json(&self.collection_url(), self.headers(), &body)
            .await
            .map_err(|e| self.backend_err(e))?;

        tracing::info!(
            collection = %self.config.collection_name,
            vector_size = self.config.vector_size,
            "Created Qdrant collection"
        );

        Ok(())
    }
}

#[async_trait]
impl<C: HttpClientTrait> VectorStoreProvider for QdrantVectorStore<C> {
    fn backend_name(&self) -> &'static str {
        "qdrant"
    }

    async fn ensure_collection(&self) -> Result<(), RetrievalError> {
        if self.collection_exists().await? {
            tracing::debug!(
                collection = %self.config.collection_name,
                "Qdrant collection already exists"
            );
            return self.check_dimensions().await;
        }

        self.create_collection().await
    }

    async fn upsert_batch(&self, points: Vec<StoredPoint>) -> Result<(), RetrievalError> {
        let points: Vec<serde_json::Value> = points
            .into_iter()
            .map(|point| {
                serde_json::json!({
                    "id": point.id,
                    "vector": point.vector,
                    "payload": point.payload,
                })
            })
            .collect();

        let body = serde_json::json!({ "points": points });
        let url = format!("{}/points", self.collection_url());

        self.client
            .put_json(&url, self.headers(), &body)
            .await
            .map_err(|e| self.backend_err(e))?;

        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        params: &SearchParams,
    ) -> Result<Vec<SearchResult>, RetrievalError> {
        let body = serde_json::json!({
            "vector": vector,
            "limit": params.limit,
            "score_threshold": params.score_threshold,
            "with_payload": true,
        });
        let url = format!("{}/points/search", self.collection_url());

        let response = self
            .client
            .post_json(&url, self.headers(), &body)
            .await
            .map_err(|e| self.backend_err(e))?;

        let search: SearchResponse =
            serde_json::from_value(response).map_err(|e| self.backend_err(e))?;

        Ok(search
            .result
            .into_iter()
            .map(|hit| result_from_payload(hit.payload, hit.score))
            .collect())
    }
}

// Qdrant API types

#[derive(Debug, Deserialize)]
struct CollectionsResponse {
    result: CollectionListing,
}

#[derive(Debug, Deserialize)]
struct CollectionListing {
    collections: Vec<CollectionDescription>,
}

#[derive(Debug, Deserialize)]
struct CollectionDescription {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CollectionInfoResponse {
    result: Option<CollectionInfo>,
}

#[derive(Debug, Deserialize)]
struct CollectionInfo {
    config: Option<CollectionConfig>,
}

#[derive(Debug, Deserialize)]
struct CollectionConfig {
    params: Option<CollectionParams>,
}

#[derive(Debug, Deserialize)]
struct CollectionParams {
    vectors: Option<VectorParams>,
}

#[derive(Debug, Deserialize)]
struct VectorParams {
    size: Option<usize>,
}

impl CollectionInfoResponse {
    fn vector_size(&self) -> Option<usize> {
        self.result
            .as_ref()?
            .config
            .as_ref()?
            .params
            .as_ref()?
            .vectors
            .as_ref()?
            .size
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    result: Vec<ScoredPoint>,
}

#[derive(Debug, Deserialize)]
struct ScoredPoint {
    score: f32,
    #[serde(default)]
    payload: serde_json::Map<String, serde_json::Value>,
}
