use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::table::row::{Row, RowId};

mod http;

pub use http::HttpApiClient;

/// Pagination parameters as sent on the wire. `page` is zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageQuery {
    pub page: i64,
    pub size: i64,
}

/// One page of rows as returned by the collection endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    pub data: Vec<Row>,
    pub total_count: i64,
    pub items_per_page: i64,
}

/// The remote PQS API, seen from the client core.
///
/// Paths are collection-relative; item-scoped operations append the row id as
/// a final path segment. Every operation is attempted exactly once - retry is
/// the caller's (i.e. the user's) decision.
#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn get_page(&self, path: &str, query: PageQuery) -> Result<Page, ApiError>;

    async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError>;

    async fn put(&self, path: &str, id: &RowId, body: &Value) -> Result<Value, ApiError>;

    async fn delete(&self, path: &str, id: &RowId) -> Result<Value, ApiError>;
}

#[async_trait]
impl<T: ApiClient + ?Sized> ApiClient for std::sync::Arc<T> {
    async fn get_page(&self, path: &str, query: PageQuery) -> Result<Page, ApiError> {
        (**self).get_page(path, query).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        (**self).post(path, body).await
    }

    async fn put(&self, path: &str, id: &RowId, body: &Value) -> Result<Value, ApiError> {
        (**self).put(path, id, body).await
    }

    async fn delete(&self, path: &str, id: &RowId) -> Result<Value, ApiError> {
        (**self).delete(path, id).await
    }
}
