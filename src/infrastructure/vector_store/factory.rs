//! Vector store provider factory

use std::sync::Arc;

use crate::config::BackendConfig;
use crate::domain::VectorStoreProvider;
use crate::infrastructure::http_client::HttpClient;

use super::chroma::{ChromaConfig, ChromaVectorStore};
use super::qdrant::{QdrantConfig, QdrantVectorStore};

/// Vector store backend selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    Qdrant,
    Chroma,
}

impl BackendKind {
    /// Parse a configured backend name. Unrecognized names select Qdrant;
    /// backend selection never fails before `initialize`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "chroma" => Self::Chroma,
            _ => Self::Qdrant,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Qdrant => "qdrant",
            Self::Chroma => "chroma",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Factory for creating vector store providers
#[derive(Debug)]
pub struct VectorStoreFactory;

impl VectorStoreFactory {
    /// Build the provider for the selected backend from configuration
    pub fn create(
        kind: BackendKind,
        config: &BackendConfig,
        vector_size: usize,
    ) -> Arc<dyn VectorStoreProvider> {
        match kind {
            BackendKind::Qdrant => {
                let mut qdrant_config =
                    QdrantConfig::new(&config.collection_name, vector_size)
                        .with_url(&config.qdrant.url);
                if let Some(ref api_key) = config.qdrant.api_key {
                    qdrant_config = qdrant_config.with_api_key(api_key);
                }

                Arc::new(QdrantVectorStore::new(HttpClient::new(), qdrant_config))
            }
            BackendKind::Chroma => {
                let chroma_config = ChromaConfig::new(&config.collection_name, vector_size)
                    .with_url(&config.chroma.url);

                Arc::new(ChromaVectorStore::new(HttpClient::new(), chroma_config))
            }
        }
    }
}
