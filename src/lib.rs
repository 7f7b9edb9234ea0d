//! Vector Retrieval Service
//!
//! A backend-agnostic semantic retrieval core:
//! - documents become vector embeddings via the Gemini embedding API,
//!   degrading to fallback vectors when the provider is unavailable
//! - vectors persist into interchangeable stores (Qdrant, Chroma) behind a
//!   single provider trait
//! - similarity queries return a normalized result shape whose score is
//!   always higher-is-better, regardless of the backend's native metric

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{Document, RetrievalError, SearchParams, SearchResult};
pub use infrastructure::services::RetrievalService;
