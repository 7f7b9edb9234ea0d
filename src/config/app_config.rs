use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Vector store backend selection and connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Backend name: "qdrant" or "chroma". Unrecognized values fall back to
    /// qdrant at initialize time rather than failing here.
    pub kind: String,
    pub collection_name: String,
    #[serde(default)]
    pub qdrant: QdrantSettings,
    #[serde(default)]
    pub chroma: ChromaSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QdrantSettings {
    pub url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChromaSettings {
    pub url: String,
}

/// Embedding provider settings
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingConfig {
    /// Gemini API key; when absent the service runs in degraded mode with
    /// fallback vectors
    pub api_key: Option<String>,
    pub model: String,
    pub dimensions: usize,
    /// Override for the Gemini API base URL
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: "qdrant".to_string(),
            collection_name: "documents".to_string(),
            qdrant: QdrantSettings::default(),
            chroma: ChromaSettings::default(),
        }
    }
}

impl Default for QdrantSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:6333".to_string(),
            api_key: None,
        }
    }
}

impl Default for ChromaSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:8000".to_string(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "embedding-001".to_string(),
            dimensions: 768,
            base_url: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("RETRIEVAL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.backend.kind, "qdrant");
        assert_eq!(config.backend.collection_name, "documents");
        assert_eq!(config.backend.qdrant.url, "http://localhost:6333");
        assert_eq!(config.backend.chroma.url, "http://localhost:8000");
        assert_eq!(config.embedding.model, "embedding-001");
        assert_eq!(config.embedding.dimensions, 768);
        assert!(config.embedding.api_key.is_none());
    }

    #[test]
    fn test_deserialize_partial_toml() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [backend]
                kind = "chroma"
                collection_name = "kb"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.backend.kind, "chroma");
        assert_eq!(config.backend.collection_name, "kb");
        assert_eq!(config.backend.chroma.url, "http://localhost:8000");
        assert_eq!(config.embedding.dimensions, 768);
    }
}
