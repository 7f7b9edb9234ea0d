//! Domain types for the retrieval core

pub mod document;
pub mod embedding;
pub mod error;
pub mod search;
pub mod vector_store;

pub use document::{Document, StoredPoint};
pub use embedding::EmbeddingProvider;
pub use error::RetrievalError;
pub use search::{
    ResultMetadata, SearchParams, SearchResult, DEFAULT_SCORE_THRESHOLD, DEFAULT_SEARCH_LIMIT,
};
pub use vector_store::VectorStoreProvider;
