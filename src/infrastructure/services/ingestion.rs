//! Batched ingestion pipeline
//!
//! Converts an arbitrary-length document list into backend upserts without
//! unbounded memory or request concurrency: documents are partitioned into
//! fixed-size groups, each group's texts embed concurrently, and the group
//! is written with a single batch upsert before the next group starts.

use std::sync::Arc;

use futures::future::join_all;

use crate::domain::{
    Document, EmbeddingProvider, RetrievalError, StoredPoint, VectorStoreProvider,
};

/// Documents embedded concurrently and upserted per backend round trip
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Outcome of a completed ingestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    /// Documents committed to the backend
    pub documents: usize,
    /// Batch upserts issued
    pub batches: usize,
}

/// Batched ingestion pipeline bound to one embedder and one store
pub struct IngestionPipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStoreProvider>,
    batch_size: usize,
}

impl std::fmt::Debug for IngestionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestionPipeline")
            .field("backend", &self.store.backend_name())
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

impl IngestionPipeline {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, store: Arc<dyn VectorStoreProvider>) -> Self {
        Self {
            embedder,
            store,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Tune the batch size (minimum 1)
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Ingest all documents in order.
    ///
    /// Any embedding or upsert failure aborts the remaining groups; the
    /// returned `PartialIngestion` carries the number of documents already
    /// committed in fully completed batches. A batch is upserted only after
    /// every one of its embeddings resolved, so there are no mid-batch
    /// partial commits.
    pub async fn ingest(&self, documents: Vec<Document>) -> Result<IngestReport, RetrievalError> {
        let total = documents.len();
        let mut committed = 0usize;
        let mut batches = 0usize;

        let mut queue = documents;
        while !queue.is_empty() {
            let split = queue.len().min(self.batch_size);
            let rest = queue.split_off(split);
            let group = queue;
            queue = rest;

            let embeddings =
                join_all(group.iter().map(|doc| self.embedder.embed(&doc.text))).await;

            // Results stay index-paired with their documents regardless of
            // completion order.
            let mut vectors = Vec::with_capacity(group.len());
            for (document, embedding) in group.iter().zip(embeddings) {
                match embedding {
                    Ok(vector) => vectors.push(vector),
                    Err(cause) => {
                        tracing::error!(
                            document_id = %document.id,
                            committed,
                            "Embedding failed, aborting ingestion"
                        );
                        return Err(RetrievalError::partial_ingestion(committed, cause));
                    }
                }
            }

            let points: Vec<StoredPoint> = group
                .into_iter()
                .zip(vectors)
                .map(|(document, vector)| StoredPoint::from_document(document, vector))
                .collect();
            let count = points.len();

            self.store
                .upsert_batch(points)
                .await
                .map_err(|cause| RetrievalError::partial_ingestion(committed, cause))?;

            committed += count;
            batches += 1;
            tracing::debug!(batch = batches, documents = count, "Batch upserted");
        }

        metrics::counter!("documents_ingested_total").increment(total as u64);
        Ok(IngestReport {
            documents: committed,
            batches,
        })
    }
}
