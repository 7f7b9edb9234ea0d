//! HTTP client seam shared by the embedding provider and vector store
//! adapters. Transport failures stay `HttpError` here; each caller maps them
//! into its own domain error variant.

use async_trait::async_trait;
use thiserror::Error;

/// Transport-level failure
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HttpError {
    message: String,
}

impl HttpError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Trait for HTTP client operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    async fn get_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
    ) -> Result<serde_json::Value, HttpError>;

    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, HttpError>;

    async fn put_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, HttpError>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(timeout: std::time::Duration) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<serde_json::Value, HttpError> {
        let response = request
            .send()
            .await
            .map_err(|e| HttpError::new(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            return Err(HttpError::new(format!("HTTP {status}: {error_body}")));
        }

        response
            .json()
            .await
            .map_err(|e| HttpError::new(format!("Failed to parse response: {e}")))
    }

    fn apply_headers(
        mut request: reqwest::RequestBuilder,
        headers: Vec<(&str, &str)>,
    ) -> reqwest::RequestBuilder {
        for (key, value) in headers {
            request = request.header(key, value);
        }
        request
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn get_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
    ) -> Result<serde_json::Value, HttpError> {
        let request = Self::apply_headers(self.client.get(url), headers);
        self.execute(request).await
    }

    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, HttpError> {
        let request = Self::apply_headers(self.client.post(url), headers).json(body);
        self.execute(request).await
    }

    async fn put_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, HttpError> {
        let request = Self::apply_headers(self.client.put(url), headers).json(body);
        self.execute(request).await
    }
}

#[cfg(test)]
pub mod mock {
    use std::collections::HashMap;
    use std::sync::{Mutex, RwLock};

    use super::*;

    /// One request observed by the mock client
    #[derive(Debug, Clone)]
    pub struct RecordedRequest {
        pub method: &'static str,
        pub url: String,
        pub body: serde_json::Value,
    }

    /// Mock HTTP client with per-URL response sequences.
    ///
    /// Responses registered for the same URL are returned in order; the last
    /// one repeats once the sequence is exhausted.
    #[derive(Debug, Default)]
    pub struct MockHttpClient {
        responses: RwLock<HashMap<String, Vec<serde_json::Value>>>,
        cursors: Mutex<HashMap<String, usize>>,
        errors: RwLock<HashMap<String, String>>,
        requests: Mutex<Vec<RecordedRequest>>,
    }

    impl MockHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_response(self, url: impl Into<String>, response: serde_json::Value) -> Self {
            self.responses
                .write()
                .unwrap()
                .entry(url.into())
                .or_default()
                .push(response);
            self
        }

        pub fn with_error(self, url: impl Into<String>, error: impl Into<String>) -> Self {
            self.errors.write().unwrap().insert(url.into(), error.into());
            self
        }

        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn request_count(&self, method: &str, url: &str) -> usize {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.method == method && r.url == url)
                .count()
        }

        fn respond(
            &self,
            method: &'static str,
            url: &str,
            body: serde_json::Value,
        ) -> Result<serde_json::Value, HttpError> {
            self.requests.lock().unwrap().push(RecordedRequest {
                method,
                url: url.to_string(),
                body,
            });

            if let Some(error) = self.errors.read().unwrap().get(url) {
                return Err(HttpError::new(error.clone()));
            }

            let responses = self.responses.read().unwrap();
            let sequence = responses
                .get(url)
                .ok_or_else(|| HttpError::new(format!("No mock response for {url}")))?;

            let mut cursors = self.cursors.lock().unwrap();
            let cursor = cursors.entry(url.to_string()).or_insert(0);
            let response = sequence[(*cursor).min(sequence.len() - 1)].clone();
            *cursor += 1;

            Ok(response)
        }
    }

    #[async_trait]
    impl HttpClientTrait for MockHttpClient {
        async fn get_json(
            &self,
            url: &str,
            _headers: Vec<(&str, &str)>,
        ) -> Result<serde_json::Value, HttpError> {
            self.respond("GET", url, serde_json::Value::Null)
        }

        async fn post_json(
            &self,
            url: &str,
            _headers: Vec<(&str, &str)>,
            body: &serde_json::Value,
        ) -> Result<serde_json::Value, HttpError> {
            self.respond("POST", url, body.clone())
        }

        async fn put_json(
            &self,
            url: &str,
            _headers: Vec<(&str, &str)>,
            body: &serde_json::Value,
        ) -> Result<serde_json::Value, HttpError> {
            self.respond("PUT", url, body.clone())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_sequenced_responses_stick_at_last() {
            let client = MockHttpClient::new()
                .with_response("http://x/a", serde_json::json!(1))
                .with_response("http://x/a", serde_json::json!(2));

            assert_eq!(client.get_json("http://x/a", vec![]).await.unwrap(), 1);
            assert_eq!(client.get_json("http://x/a", vec![]).await.unwrap(), 2);
            assert_eq!(client.get_json("http://x/a", vec![]).await.unwrap(), 2);
            assert_eq!(client.request_count("GET", "http://x/a"), 3);
        }

        #[tokio::test]
        async fn test_unregistered_url_errors() {
            let client = MockHttpClient::new();
            let result = client.post_json("http://x/b", vec![], &serde_json::json!({})).await;

            assert!(result.is_err());
        }
    }
}
