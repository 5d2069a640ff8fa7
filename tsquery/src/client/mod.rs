//! Search client trait and implementations

mod http;

pub use http::HttpSearchClient;

use crate::error::Result;
use crate::query::SearchRequest;
use async_trait::async_trait;
use serde_json::Value;

/// Executes search requests against an Elasticsearch-compatible cluster
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Send `request` and return the raw response document.
    ///
    /// Responses whose status is listed in `request.ignore` are returned as
    /// successful responses.
    async fn search(&self, request: &SearchRequest) -> Result<Value>;
}
