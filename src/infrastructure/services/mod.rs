//! Services composing the embedding provider, pipeline, and vector stores

mod ingestion;
mod retrieval;

pub use ingestion::{IngestReport, IngestionPipeline, DEFAULT_BATCH_SIZE};
pub use retrieval::RetrievalService;
