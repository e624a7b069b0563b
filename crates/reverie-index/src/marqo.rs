//! Marqo HTTP client.
//!
//! Marqo embeds every document field not listed in `nonTensorFields`, so the
//! split between semantic and exact-match fields is decided per request.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::backend::{Document, VectorIndex};
use crate::error::{IndexError, Result};

/// Default timeout for index requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Key Marqo reads the document identifier from.
const ID_FIELD: &str = "_id";

/// Header carrying the Marqo Cloud API key.
const API_KEY_HEADER: &str = "x-api-key";

/// Body of an add-documents request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddDocuments<'a> {
    documents: [&'a Document; 1],
    non_tensor_fields: &'a [&'a str],
}

/// Blocking client for a Marqo vector index.
///
/// # Example
///
/// ```no_run
/// use reverie_index::{MarqoClient, VectorIndex};
///
/// let client = MarqoClient::builder()
///     .base_url("http://localhost:8882")
///     .build()?;
///
/// let mut doc = serde_json::Map::new();
/// doc.insert("brief".into(), "Vision models need more data".into());
/// client.store("thoughts", "0b6f...", &doc, &["bot_id"])?;
/// # Ok::<(), reverie_index::IndexError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MarqoClient {
    http: Client,
    base_url: Url,
}

impl MarqoClient {
    /// Create a new client builder.
    pub fn builder() -> MarqoClientBuilder {
        MarqoClientBuilder::new()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build a URL for a path below the base URL.
    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// POST a JSON body and return the parsed response.
    fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        let url = self.url(path)?;
        let response = self.http.post(url).json(body).send()?;
        Self::handle_response(response)
    }

    fn handle_response(response: Response) -> Result<Value> {
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(IndexError::Status {
                status: status.as_u16(),
                body,
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Extract the first per-document error from an add-documents response.
    fn rejection(response: &Value) -> Option<String> {
        if !response
            .get("errors")
            .and_then(Value::as_bool)
            .unwrap_or(false)
        {
            return None;
        }

        let detail = response
            .get("items")
            .and_then(Value::as_array)
            .and_then(|items| items.iter().find(|item| item.get("error").is_some()))
            .and_then(|item| item.get("error"))
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown error".to_string());
        Some(detail)
    }
}

impl VectorIndex for MarqoClient {
    fn store(
        &self,
        index: &str,
        id: &str,
        doc: &Document,
        non_tensor_fields: &[&str],
    ) -> Result<()> {
        let mut document = doc.clone();
        document.insert(ID_FIELD.to_string(), Value::String(id.to_string()));

        // Null attributes are sent as-is. Marqo may refuse them per document,
        // which comes back as `errors: true` and surfaces as `Rejected`.
        let body = AddDocuments {
            documents: [&document],
            non_tensor_fields,
        };

        let response = self.post(&format!("indexes/{}/documents", index), &body)?;
        if let Some(detail) = Self::rejection(&response) {
            return Err(IndexError::Rejected(detail));
        }

        debug!("Stored document {} in index {}", id, index);
        Ok(())
    }

    fn delete(&self, index: &str, id: &str) -> Result<()> {
        self.post(&format!("indexes/{}/documents/delete-batch", index), &[id])?;

        debug!("Deleted document {} from index {}", id, index);
        Ok(())
    }

    fn name(&self) -> &str {
        "marqo"
    }
}

/// Builder for creating a [`MarqoClient`].
#[derive(Debug)]
pub struct MarqoClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    timeout: Duration,
    user_agent: Option<String>,
}

impl MarqoClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }

    /// Set the base URL of the Marqo server.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the API key (Marqo Cloud).
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<MarqoClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| IndexError::Config("base_url is required".to_string()))?;

        // Normalize so that `join` keeps any path prefix
        let mut base_url = Url::parse(&base_url)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(key) = &self.api_key {
            let value = HeaderValue::from_str(key)
                .map_err(|_| IndexError::Config("Invalid API key".to_string()))?;
            headers.insert(API_KEY_HEADER, value);
        }

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("reverie-index/{}", env!("CARGO_PKG_VERSION")));

        let http = Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .timeout(self.timeout)
            .build()?;

        Ok(MarqoClient { http, base_url })
    }
}

impl Default for MarqoClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_doc() -> Document {
        let mut doc = Document::new();
        doc.insert("brief".into(), json!("Hands Down needs a better camera"));
        doc.insert("bot_id".into(), json!("bot-1"));
        doc.insert("importance".into(), json!(55));
        doc
    }

    #[test]
    fn test_builder_requires_base_url() {
        let result = MarqoClientBuilder::new().build();
        assert!(matches!(result, Err(IndexError::Config(_))));
    }

    #[test]
    fn test_builder_normalizes_base_url() {
        let client = MarqoClient::builder()
            .base_url("http://localhost:8882/marqo")
            .build()
            .unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8882/marqo/");
        assert_eq!(
            client.url("indexes/thoughts/documents").unwrap().as_str(),
            "http://localhost:8882/marqo/indexes/thoughts/documents"
        );
    }

    #[test]
    fn test_builder_rejects_invalid_url() {
        let result = MarqoClient::builder().base_url("not a url").build();
        assert!(matches!(result, Err(IndexError::InvalidUrl(_))));
    }

    #[test]
    fn test_rejection_detects_item_errors() {
        let ok = json!({"errors": false, "items": [{"_id": "a", "status": 200}]});
        assert!(MarqoClient::rejection(&ok).is_none());

        let bad = json!({
            "errors": true,
            "items": [
                {"_id": "a", "status": 200},
                {"_id": "b", "status": 400, "error": "bad field"}
            ]
        });
        assert_eq!(MarqoClient::rejection(&bad).unwrap(), "\"bad field\"");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_store_posts_document_with_non_tensor_fields() {
        let server = MockServer::start().await;

        let mut expected_doc = sample_doc();
        expected_doc.insert("_id".into(), json!("thought-1"));

        Mock::given(method("POST"))
            .and(path("/indexes/thoughts/documents"))
            .and(header("x-api-key", "secret"))
            .and(body_json(json!({
                "documents": [expected_doc],
                "nonTensorFields": ["bot_id", "importance"],
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"errors": false, "items": []})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let uri = server.uri();
        let result = tokio::task::spawn_blocking(move || {
            let client = MarqoClient::builder().base_url(uri).api_key("secret").build()?;
            client.store("thoughts", "thought-1", &sample_doc(), &["bot_id", "importance"])
        })
        .await
        .unwrap();

        assert!(result.is_ok());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_store_maps_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/indexes/thoughts/documents"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let uri = server.uri();
        let result = tokio::task::spawn_blocking(move || {
            let client = MarqoClient::builder().base_url(uri).build()?;
            client.store("thoughts", "thought-1", &sample_doc(), &[])
        })
        .await
        .unwrap();

        match result {
            Err(err @ IndexError::Status { status: 503, .. }) => {
                assert!(err.to_string().contains("overloaded"));
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_store_reports_rejected_documents() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/indexes/thoughts/documents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errors": true,
                "items": [{"_id": "thought-1", "status": 400, "error": "invalid field"}]
            })))
            .mount(&server)
            .await;

        let uri = server.uri();
        let result = tokio::task::spawn_blocking(move || {
            let client = MarqoClient::builder().base_url(uri).build()?;
            client.store("thoughts", "thought-1", &sample_doc(), &[])
        })
        .await
        .unwrap();

        assert!(matches!(result, Err(IndexError::Rejected(_))));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_store_sends_null_attributes_and_surfaces_refusal() {
        let server = MockServer::start().await;

        let mut doc = sample_doc();
        doc.insert("type".into(), Value::Null);
        doc.insert("subject_id".into(), Value::Null);
        doc.insert("subject_type".into(), Value::Null);

        let mut expected_doc = doc.clone();
        expected_doc.insert("_id".into(), json!("thought-1"));

        Mock::given(method("POST"))
            .and(path("/indexes/thoughts/documents"))
            .and(body_json(json!({
                "documents": [expected_doc],
                "nonTensorFields": ["type", "subject_id", "subject_type"],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errors": true,
                "items": [{
                    "_id": "thought-1",
                    "status": 400,
                    "error": "Field content `None` is of invalid content type"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let uri = server.uri();
        let result = tokio::task::spawn_blocking(move || {
            let client = MarqoClient::builder().base_url(uri).build()?;
            client.store(
                "thoughts",
                "thought-1",
                &doc,
                &["type", "subject_id", "subject_type"],
            )
        })
        .await
        .unwrap();

        match result {
            Err(IndexError::Rejected(detail)) => assert!(detail.contains("invalid content type")),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_delete_posts_id_batch() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/indexes/thoughts/documents/delete-batch"))
            .and(body_json(json!(["thought-1"])))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({
                "index_name": "thoughts",
                "status": "succeeded",
                "details": {"receivedDocumentIds": 1, "deletedDocuments": 1}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let uri = server.uri();
        let result = tokio::task::spawn_blocking(move || {
            let client = MarqoClient::builder().base_url(uri).build()?;
            client.delete("thoughts", "thought-1")
        })
        .await
        .unwrap();

        assert!(result.is_ok());
    }

    #[test]
    fn test_unreachable_server_is_unavailable() {
        let client = MarqoClient::builder()
            .base_url("http://127.0.0.1:1")
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();

        let store = client.store("thoughts", "thought-1", &sample_doc(), &[]);
        assert!(matches!(store, Err(IndexError::Unavailable(_))));

        let delete = client.delete("thoughts", "thought-1");
        assert!(matches!(delete, Err(IndexError::Unavailable(_))));
    }
}
