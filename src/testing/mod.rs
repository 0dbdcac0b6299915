//! In-memory API client for unit tests: canned responses plus a call log.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex, PoisonError};

use crate::api::{ApiClient, Page, PageQuery};
use crate::error::ApiError;
use crate::table::row::RowId;

#[derive(Debug, Default)]
struct MockState {
    page: Page,
    post_response: Value,
    fail_next: Option<u16>,
    calls: Vec<String>,
    last_page_query: Option<PageQuery>,
    last_body: Option<Value>,
}

/// Scripted [`ApiClient`] that records every call it receives.
#[derive(Debug, Clone, Default)]
pub struct MockApiClient {
    state: Arc<Mutex<MockState>>,
}

impl MockApiClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Page returned by every subsequent `get_page`.
    pub fn set_page(&self, page: Page) {
        self.lock().page = page;
    }

    /// Body returned by the next `post` calls (login payloads etc).
    pub fn set_post_response(&self, body: Value) {
        self.lock().post_response = body;
    }

    /// Make exactly the next call fail with the given HTTP status.
    pub fn fail_next_with_status(&self, status: u16) {
        self.lock().fail_next = Some(status);
    }

    /// Call log as "METHOD path" strings, in order.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn last_page_query(&self) -> Option<PageQuery> {
        self.lock().last_page_query
    }

    pub fn last_body(&self) -> Option<Value> {
        self.lock().last_body.clone()
    }

    fn begin_call(&self, description: String, path: &str) -> Result<(), ApiError> {
        let mut state = self.lock();
        if let Some(status) = state.fail_next.take() {
            return Err(ApiError::Status { path: path.to_string(), status });
        }
        state.calls.push(description);
        Ok(())
    }
}

#[async_trait]
impl ApiClient for MockApiClient {
    async fn get_page(&self, path: &str, query: PageQuery) -> Result<Page, ApiError> {
        self.begin_call(format!("GET {}", path), path)?;
        let mut state = self.lock();
        state.last_page_query = Some(query);
        Ok(state.page.clone())
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.begin_call(format!("POST {}", path), path)?;
        let mut state = self.lock();
        state.last_body = Some(body.clone());
        Ok(state.post_response.clone())
    }

    async fn put(&self, path: &str, id: &RowId, body: &Value) -> Result<Value, ApiError> {
        self.begin_call(format!("PUT {}/{}", path, id), path)?;
        let mut state = self.lock();
        state.last_body = Some(body.clone());
        Ok(json!({ "status": 200 }))
    }

    async fn delete(&self, path: &str, id: &RowId) -> Result<Value, ApiError> {
        self.begin_call(format!("DELETE {}/{}", path, id), path)?;
        Ok(json!({ "status": 200 }))
    }
}
