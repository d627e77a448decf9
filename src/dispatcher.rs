//! Sends query documents to the remote repository.

use crate::config::DispatcherConfig;
use crate::document::QueryDocument;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::debug;

/// Anything that can run a query document and hand back the JSON result
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(&self, document: &QueryDocument) -> Result<Value>;
}

/// POSTs documents to the repository's query endpoint.
///
/// The response body is returned as parsed JSON whatever the status code;
/// query errors reported by the remote come back as ordinary values.
pub struct HttpDispatcher {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpDispatcher {
    pub fn new(config: &DispatcherConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.endpoint(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl QueryExecutor for HttpDispatcher {
    async fn execute(&self, document: &QueryDocument) -> Result<Value> {
        let body = serde_json::to_vec(document).map_err(Error::Encode)?;
        debug!(endpoint = %self.endpoint, query = %document.query_text(), "dispatching query");

        let resp = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;
        debug!(%status, len = bytes.len(), "query response received");

        serde_json::from_slice(&bytes).map_err(Error::Parse)
    }
}

#[async_trait]
impl<T: QueryExecutor + ?Sized> QueryExecutor for &T {
    async fn execute(&self, document: &QueryDocument) -> Result<Value> {
        (**self).execute(document).await
    }
}
