mod app_config;

pub use app_config::{
    AppConfig, BackendConfig, ChromaSettings, EmbeddingConfig, LogFormat, LoggingConfig,
    QdrantSettings,
};
