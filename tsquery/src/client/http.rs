//! HTTP search client

use super::SearchClient;
use crate::config::ClusterConfig;
use crate::error::{Error, Result};
use crate::query::SearchRequest;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Search client speaking the Elasticsearch REST API
pub struct HttpSearchClient {
    client: Client,
    url: String,
    credentials: Option<(String, Option<String>)>,
}

impl HttpSearchClient {
    /// Create a client for the cluster at `url` with default settings
    pub fn new(url: &str) -> Result<Self> {
        Self::from_config(&ClusterConfig {
            url: url.to_string(),
            ..ClusterConfig::default()
        })
    }

    pub fn from_config(config: &ClusterConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        let credentials = config
            .username
            .as_ref()
            .map(|user| (user.clone(), config.password.clone()));

        Ok(Self {
            client,
            url: config.url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SearchClient for HttpSearchClient {
    async fn search(&self, request: &SearchRequest) -> Result<Value> {
        let mut builder = self
            .client
            .post(format!("{}/{}/_search", self.url, request.index))
            .query(&[
                ("ignore_unavailable", request.ignore_unavailable),
                ("allow_no_indices", request.allow_no_indices),
            ])
            .json(&request.body);

        if let Some((user, password)) = &self.credentials {
            builder = builder.basic_auth(user, password.as_ref());
        }

        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();

        if request.ignore.contains(&status.as_u16()) {
            return Ok(serde_json::from_str(&body)
                .unwrap_or_else(|_| Value::Object(Default::default())));
        }

        Err(Error::Search {
            status: status.as_u16(),
            message: error_reason(&body),
        })
    }
}

/// The `error.reason` of an ES error body, or the body itself
fn error_reason(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            let error = v.get("error")?;
            error
                .get("reason")
                .and_then(Value::as_str)
                .or_else(|| error.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.to_string())
}
