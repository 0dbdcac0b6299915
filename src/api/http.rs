use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::api::{ApiClient, Page, PageQuery};
use crate::auth::SessionHandle;
use crate::config;
use crate::error::ApiError;
use crate::table::row::RowId;

/// `reqwest`-backed API client.
///
/// Base URL and timeout come from config; the bearer token is read from the
/// session snapshot on every request, so a login or logout between calls is
/// picked up without rebuilding the client.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionHandle,
}

impl HttpApiClient {
    /// Client pointed at the configured API base URL.
    pub fn from_config(session: SessionHandle) -> Result<Self, ApiError> {
        let api = &config::config().api;
        Self::new(&api.base_url, api.timeout_secs, session)
    }

    pub fn new(base_url: &str, timeout_secs: u64, session: SessionHandle) -> Result<Self, ApiError> {
        // Validate early; joining below is plain string concatenation
        Url::parse(base_url).map_err(|_| ApiError::BadBaseUrl(base_url.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|source| ApiError::Transport { path: base_url.to_string(), source })?;

        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string(), session })
    }

    fn collection_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_matches('/'))
    }

    /// Item URL with the id appended as a percent-encoded final segment, so
    /// string ids containing `/`, spaces or query metacharacters cannot
    /// reshape the request path.
    fn item_url(&self, path: &str, id: &RowId) -> Result<String, ApiError> {
        let collection = self.collection_url(path);
        let mut url =
            Url::parse(&collection).map_err(|_| ApiError::BadBaseUrl(collection.clone()))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::BadBaseUrl(collection.clone()))?
            .push(&id.to_string());
        Ok(url.to_string())
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, path: &str, request: reqwest::RequestBuilder) -> Result<Value, ApiError> {
        if config::config().api.enable_request_logging {
            tracing::debug!(path, "api request");
        }

        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|source| ApiError::Transport { path: path.to_string(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { path: path.to_string(), status: status.as_u16() });
        }

        // Some mutation endpoints answer with an empty body
        let bytes = response
            .bytes()
            .await
            .map_err(|source| ApiError::Transport { path: path.to_string(), source })?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::InvalidBody { path: path.to_string(), detail: e.to_string() })
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn get_page(&self, path: &str, query: PageQuery) -> Result<Page, ApiError> {
        let url = self.collection_url(path);
        let request = self.http.get(&url).query(&query);
        let body = self.send(path, request).await?;

        serde_json::from_value(body)
            .map_err(|e| ApiError::InvalidBody { path: path.to_string(), detail: e.to_string() })
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let url = self.collection_url(path);
        self.send(path, self.http.post(&url).json(body)).await
    }

    async fn put(&self, path: &str, id: &RowId, body: &Value) -> Result<Value, ApiError> {
        let url = self.item_url(path, id)?;
        self.send(path, self.http.put(&url).json(body)).await
    }

    async fn delete(&self, path: &str, id: &RowId) -> Result<Value, ApiError> {
        let url = self.item_url(path, id)?;
        self.send(path, self.http.delete(&url).json(&Value::Object(Default::default()))).await
    }
}
