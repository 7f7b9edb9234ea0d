//! Vector store adapter implementations

mod chroma;
mod factory;
mod qdrant;

pub use chroma::{ChromaConfig, ChromaVectorStore};
pub use factory::{BackendKind, VectorStoreFactory};
pub use qdrant::{QdrantConfig, QdrantVectorStore};

use serde_json::{Map, Value};

use crate::domain::SearchResult;

/// Coerce a payload field into a string. Missing and null values become
/// empty strings; non-string values surface as their JSON rendering.
fn payload_string(payload: &Map<String, Value>, key: &str) -> String {
    match payload.get(key) {
        Some(Value::String(s)) => s.clone(),
        None | Some(Value::Null) => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Build a normalized result from a backend payload and an
/// already-normalized score. Text and source are lifted out of the payload;
/// remaining fields ride along as extra metadata.
fn result_from_payload(mut payload: Map<String, Value>, score: f32) -> SearchResult {
    let text = payload_string(&payload, "text");
    let source = payload_string(&payload, "source");
    payload.remove("text");
    payload.remove("source");

    SearchResult::new(text, source, score).with_extra(payload.into_iter().collect())
}
