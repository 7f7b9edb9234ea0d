//! Document and stored point types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// A raw document prior to embedding.
///
/// Identity is caller-supplied or generated; documents are immutable once
/// handed to the ingestion pipeline. Deserializes directly from import files,
/// generating an id when the file omits one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    #[serde(default = "generate_id")]
    pub id: String,
    pub text: String,
    pub source: String,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Document {
    /// Create a new document with a generated id
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            text: text.into(),
            source: source.into(),
            metadata: HashMap::new(),
        }
    }

    /// Set an explicit id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Add a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Set all metadata
    pub fn with_all_metadata(mut self, metadata: HashMap<String, serde_json::Value>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// One (id, vector, payload) triple, owned by the vector store after upsert
#[derive(Debug, Clone)]
pub struct StoredPoint {
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: HashMap<String, serde_json::Value>,
}

impl StoredPoint {
    /// Build a point from a document and its embedding.
    ///
    /// The payload is `{text, source, ...metadata}` with metadata spread
    /// last, so a metadata entry can shadow the canonical fields.
    pub fn from_document(document: Document, vector: Vec<f32>) -> Self {
        let mut payload = HashMap::with_capacity(document.metadata.len() + 2);
        payload.insert("text".to_string(), serde_json::json!(document.text));
        payload.insert("source".to_string(), serde_json::json!(document.source));
        payload.extend(document.metadata);

        Self {
            id: document.id,
            vector,
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_generates_id() {
        let a = Document::new("text", "src");
        let b = Document::new("text", "src");

        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_deserialize_without_id_generates_one() {
        let doc: Document =
            serde_json::from_str(r#"{"text": "hello", "source": "import"}"#).unwrap();

        assert!(!doc.id.is_empty());
        assert_eq!(doc.text, "hello");
        assert!(doc.metadata.is_empty());
    }

    #[test]
    fn test_point_payload_carries_text_source_and_metadata() {
        let doc = Document::new("hello world", "unit-test")
            .with_id("doc-1")
            .with_metadata("topic", serde_json::json!("greetings"));

        let point = StoredPoint::from_document(doc, vec![0.1, 0.2]);

        assert_eq!(point.id, "doc-1");
        assert_eq!(point.payload["text"], serde_json::json!("hello world"));
        assert_eq!(point.payload["source"], serde_json::json!("unit-test"));
        assert_eq!(point.payload["topic"], serde_json::json!("greetings"));
    }

    #[test]
    fn test_point_payload_metadata_shadows_canonical_fields() {
        let doc = Document::new("body", "original")
            .with_metadata("source", serde_json::json!("override"));

        let point = StoredPoint::from_document(doc, vec![]);

        assert_eq!(point.payload["source"], serde_json::json!("override"));
    }
}
