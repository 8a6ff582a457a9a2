//! Response DTOs for the cache gateway
//!
//! Bodies the gateway produces itself; proxied Notion payloads are passed
//! through as raw JSON.

use serde::Serialize;

use crate::cache::Partition;

/// Response body for `DELETE /cache` and `DELETE /cache/:partition`
#[derive(Debug, Clone, Serialize)]
pub struct ClearCacheResponse {
    /// Success message
    pub message: String,
    /// Cleared partition, None when every partition was cleared
    pub partition: Option<Partition>,
}

impl ClearCacheResponse {
    pub fn new(partition: Option<Partition>) -> Self {
        let message = match partition {
            Some(p) => format!("Cache partition '{}' cleared", p),
            None => "All cache partitions cleared".to_string(),
        };
        Self { message, partition }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Whether response caching is active
    pub caching: bool,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(caching: bool) -> Self {
        Self {
            status: "healthy".to_string(),
            caching,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
