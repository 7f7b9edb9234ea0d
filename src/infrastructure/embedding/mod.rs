//! Embedding provider implementations

mod gemini;
mod resilient;

pub use gemini::{GeminiEmbeddingProvider, MAX_EMBED_TEXT_CHARS};
pub use resilient::ResilientEmbedder;
