use thiserror::Error;

/// Core retrieval errors
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Embedding provider error: {provider} - {message}")]
    EmbeddingProvider { provider: String, message: String },

    #[error("Vector backend unavailable: {backend} - {message}")]
    BackendUnavailable { backend: String, message: String },

    #[error("Not initialized: {operation} called before initialize()")]
    NotInitialized { operation: String },

    #[error("Ingestion aborted after committing {committed} documents: {cause}")]
    PartialIngestion {
        committed: usize,
        #[source]
        cause: Box<RetrievalError>,
    },
}

impl RetrievalError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn embedding_provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EmbeddingProvider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn backend_unavailable(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BackendUnavailable {
            backend: backend.into(),
            message: message.into(),
        }
    }

    pub fn not_initialized(operation: impl Into<String>) -> Self {
        Self::NotInitialized {
            operation: operation.into(),
        }
    }

    pub fn partial_ingestion(committed: usize, cause: RetrievalError) -> Self {
        Self::PartialIngestion {
            committed,
            cause: Box::new(cause),
        }
    }
}
