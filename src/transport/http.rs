//! HTTP Transport
//!
//! reqwest-backed transport with auth headers, per-request timeout and
//! retry with exponential backoff.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use tracing::{debug, error, warn};

use super::{ApiRequest, Method, Transport};
use crate::config::ClientConfig;
use crate::error::{NotionError, Result};

const NOTION_VERSION_HEADER: &str = "notion-version";

/// Transport talking to the Notion REST API.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
    max_retries: u32,
    backoff_factor: f64,
    retry_statuses: Vec<u16>,
}

impl HttpTransport {
    /// Builds the underlying client with default headers and timeout.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| NotionError::Config("api_key contains invalid characters".to_string()))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(
            NOTION_VERSION_HEADER,
            HeaderValue::from_str(&config.notion_version).map_err(|_| {
                NotionError::Config("notion_version contains invalid characters".to_string())
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout_duration())
            .build()
            .map_err(|e| NotionError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout,
            max_retries: config.max_retries,
            backoff_factor: config.retry_backoff_factor,
            retry_statuses: config.retry_status_forcelist.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Delay before retry number `attempt` (1-based).
    fn backoff(&self, attempt: u32) -> Duration {
        let secs = self.backoff_factor * 2f64.powi(attempt.saturating_sub(1) as i32);
        Duration::from_secs_f64(secs.max(0.0))
    }

    fn build(&self, request: &ApiRequest) -> reqwest::RequestBuilder {
        let url = self.url(&request.path);
        let builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Patch => self.client.patch(url),
            Method::Delete => self.client.delete(url),
        };
        let builder = if request.query.is_empty() {
            builder
        } else {
            builder.query(&request.query)
        };
        match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        }
    }

    async fn attempt(&self, request: &ApiRequest) -> std::result::Result<Value, Attempt> {
        let response = self
            .build(request)
            .send()
            .await
            .map_err(|e| Attempt::Retryable(NotionError::from_reqwest(e, self.timeout_secs)))?;

        let status = response.status().as_u16();
        if response.status().is_success() {
            debug!(status, "Response success");
            return response
                .json::<Value>()
                .await
                .map_err(|e| Attempt::Fatal(NotionError::Decode(e.to_string())));
        }

        let body = response.text().await.unwrap_or_default();
        let err = NotionError::from_status(status, &body);
        if self.retry_statuses.contains(&status) {
            Err(Attempt::Retryable(err))
        } else {
            Err(Attempt::Fatal(err))
        }
    }
}

/// Outcome of a single failed attempt.
enum Attempt {
    Retryable(NotionError),
    Fatal(NotionError),
}

#[async_trait]
impl Transport for HttpTransport {
    async fn perform(&self, request: ApiRequest) -> Result<Value> {
        debug!(method = %request.method, path = %request.path, "Notion request");

        let mut attempt = 0;
        loop {
            match self.attempt(&request).await {
                Ok(value) => return Ok(value),
                Err(Attempt::Retryable(err)) if attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.backoff(attempt);
                    warn!(
                        method = %request.method,
                        path = %request.path,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Retrying Notion request"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(Attempt::Retryable(err)) | Err(Attempt::Fatal(err)) => {
                    error!(method = %request.method, path = %request.path, error = %err, "Notion API error");
                    return Err(err);
                }
            }
        }
    }
}
