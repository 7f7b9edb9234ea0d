//! Vector store provider trait
//!
//! Implementations speak one backend's wire protocol and normalize its
//! result shape and similarity metric into the shared model: scores are
//! higher-is-better in [0, 1], results are ordered descending by score.

use std::fmt::Debug;

use async_trait::async_trait;

use super::{RetrievalError, SearchParams, SearchResult, StoredPoint};

/// Provider trait for vector store backends
#[async_trait]
pub trait VectorStoreProvider: Send + Sync + Debug {
    /// Backend name used in logs and error context
    fn backend_name(&self) -> &'static str;

    /// Create the configured collection if it does not exist. Idempotent;
    /// an existing collection with a different dimensionality is a fatal
    /// configuration error.
    async fn ensure_collection(&self) -> Result<(), RetrievalError>;

    /// Insert-or-overwrite points keyed by id
    async fn upsert_batch(&self, points: Vec<StoredPoint>) -> Result<(), RetrievalError>;

    /// Return at most `params.limit` results with normalized score >=
    /// `params.score_threshold`, sorted descending by score
    async fn query(
        &self,
        vector: &[f32],
        params: &SearchParams,
    ) -> Result<Vec<SearchResult>, RetrievalError>;
}

#[cfg(test)]
pub mod mock {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::RwLock;

    use super::*;

    /// In-memory mock store scoring by cosine similarity over stored vectors
    #[derive(Debug, Default)]
    pub struct MockVectorStore {
        points: RwLock<Vec<StoredPoint>>,
        ensure_calls: AtomicUsize,
        upsert_calls: AtomicUsize,
        queries: RwLock<Vec<SearchParams>>,
        fail_message: RwLock<Option<String>>,
    }

    impl MockVectorStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make every backend call fail with the given message
        pub async fn set_failure(&self, message: impl Into<String>) {
            *self.fail_message.write().await = Some(message.into());
        }

        pub fn ensure_calls(&self) -> usize {
            self.ensure_calls.load(Ordering::SeqCst)
        }

        pub fn upsert_calls(&self) -> usize {
            self.upsert_calls.load(Ordering::SeqCst)
        }

        pub async fn stored_points(&self) -> Vec<StoredPoint> {
            self.points.read().await.clone()
        }

        pub async fn recorded_queries(&self) -> Vec<SearchParams> {
            self.queries.read().await.clone()
        }

        async fn check_failure(&self) -> Result<(), RetrievalError> {
            if let Some(ref message) = *self.fail_message.read().await {
                return Err(RetrievalError::backend_unavailable("mock", message));
            }
            Ok(())
        }

        fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
            if a.len() != b.len() {
                return 0.0;
            }

            let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
            let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
            let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

            if mag_a == 0.0 || mag_b == 0.0 {
                return 0.0;
            }

            dot / (mag_a * mag_b)
        }

        fn payload_string(payload: &HashMap<String, serde_json::Value>, key: &str) -> String {
            match payload.get(key) {
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(serde_json::Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            }
        }
    }

    #[async_trait]
    impl VectorStoreProvider for MockVectorStore {
        fn backend_name(&self) -> &'static str {
            "mock"
        }

        async fn ensure_collection(&self) -> Result<(), RetrievalError> {
            self.check_failure().await?;
            self.ensure_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn upsert_batch(&self, points: Vec<StoredPoint>) -> Result<(), RetrievalError> {
            self.check_failure().await?;
            self.upsert_calls.fetch_add(1, Ordering::SeqCst);

            let mut stored = self.points.write().await;
            for point in points {
                stored.retain(|existing| existing.id != point.id);
                stored.push(point);
            }

            Ok(())
        }

        async fn query(
            &self,
            vector: &[f32],
            params: &SearchParams,
        ) -> Result<Vec<SearchResult>, RetrievalError> {
            self.check_failure().await?;
            self.queries.write().await.push(params.clone());

            let stored = self.points.read().await;
            let mut results: Vec<SearchResult> = stored
                .iter()
                .map(|point| {
                    let score = Self::cosine_similarity(vector, &point.vector);
                    let mut extra = point.payload.clone();
                    extra.remove("text");
                    extra.remove("source");

                    SearchResult::new(
                        Self::payload_string(&point.payload, "text"),
                        Self::payload_string(&point.payload, "source"),
                        score,
                    )
                    .with_extra(extra)
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

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_upsert_overwrites_by_id() {
            let store = MockVectorStore::new();

            let mut payload = HashMap::new();
            payload.insert("text".to_string(), serde_json::json!("v1"));
            store
                .upsert_batch(vec![StoredPoint {
                    id: "a".to_string(),
                    vector: vec![1.0],
                    payload: payload.clone(),
                }])
                .await
                .unwrap();

            payload.insert("text".to_string(), serde_json::json!("v2"));
            store
                .upsert_batch(vec![StoredPoint {
                    id: "a".to_string(),
                    vector: vec![1.0],
                    payload,
                }])
                .await
                .unwrap();

            let stored = store.stored_points().await;
            assert_eq!(stored.len(), 1);
            assert_eq!(stored[0].payload["text"], serde_json::json!("v2"));
        }

        #[tokio::test]
        async fn test_query_scores_by_cosine_similarity() {
            let store = MockVectorStore::new();

            let mut payload = HashMap::new();
            payload.insert("text".to_string(), serde_json::json!("match"));
            payload.insert("source".to_string(), serde_json::json!("s"));
            store
                .upsert_batch(vec![StoredPoint {
                    id: "a".to_string(),
                    vector: vec![1.0, 0.0],
                    payload,
                }])
                .await
                .unwrap();

            let results = store
                .query(&[1.0, 0.0], &SearchParams::new().with_score_threshold(0.0))
                .await
                .unwrap();

            assert_eq!(results.len(), 1);
            assert!((results[0].score() - 1.0).abs() < 1e-6);
        }
    }
}
