//! Error types for the Notion client
//!
//! Provides unified error handling using thiserror. The cache layer never
//! produces these; they originate in the transport or in client-side
//! request validation and pass through the cache untouched.

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use thiserror::Error;

use crate::models::ErrorResponse;

// == API Failure ==
/// Details of a failed Notion API call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiFailure {
    /// HTTP status returned by Notion, None for client-side rejections
    pub status: Option<u16>,
    /// Notion error code (`validation_error`, `object_not_found`, ...)
    pub code: String,
    /// Human readable message
    pub message: String,
    /// Raw error body, when Notion returned JSON
    pub body: Option<Value>,
}

impl ApiFailure {
    /// Builds a failure for a request rejected before it reached Notion.
    pub fn local(message: impl Into<String>) -> Self {
        Self {
            status: None,
            code: "validation_error".to_string(),
            message: message.into(),
            body: None,
        }
    }

    /// Parses a Notion error body.
    ///
    /// Non-JSON bodies keep their raw text as the message.
    pub fn from_body(status: u16, body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(parsed) => Self {
                status: Some(status),
                code: parsed
                    .get("code")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
                    .to_string(),
                message: parsed
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("Unknown error")
                    .to_string(),
                body: Some(parsed),
            },
            Err(_) => Self {
                status: Some(status),
                code: "unknown".to_string(),
                message: if body.is_empty() {
                    "Unknown error".to_string()
                } else {
                    body.to_string()
                },
                body: None,
            },
        }
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (status code: {})", self.message, status),
            None => write!(f, "{}", self.message),
        }
    }
}

// == Notion Error Enum ==
/// Unified error type for the Notion client.
#[derive(Error, Debug)]
pub enum NotionError {
    /// 401
    #[error("Authentication failed: {0}")]
    Authentication(ApiFailure),

    /// 400, or a request rejected client-side
    #[error("Validation error: {0}")]
    Validation(ApiFailure),

    /// 429
    #[error("Rate limit exceeded: {0}")]
    RateLimit(ApiFailure),

    /// 404
    #[error("Resource not found: {0}")]
    NotFound(ApiFailure),

    /// 409
    #[error("Conflict: {0}")]
    Conflict(ApiFailure),

    /// Any other non-success status
    #[error("API error ({}): {0}", .0.code)]
    Api(ApiFailure),

    /// Request exceeded the configured timeout
    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    /// Could not reach the API
    #[error("Connection error: {0}")]
    Connection(String),

    /// Response body was not valid JSON
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl NotionError {
    // == From Status ==
    /// Maps a failed HTTP response onto the error taxonomy.
    pub fn from_status(status: u16, body: &str) -> Self {
        let failure = ApiFailure::from_body(status, body);
        match status {
            400 => NotionError::Validation(failure),
            401 => NotionError::Authentication(failure),
            404 => NotionError::NotFound(failure),
            409 => NotionError::Conflict(failure),
            429 => NotionError::RateLimit(failure),
            _ => NotionError::Api(failure),
        }
    }

    /// Shorthand for a client-side validation failure.
    pub fn invalid(message: impl Into<String>) -> Self {
        NotionError::Validation(ApiFailure::local(message))
    }

    /// HTTP status reported by Notion, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            NotionError::Authentication(f)
            | NotionError::Validation(f)
            | NotionError::RateLimit(f)
            | NotionError::NotFound(f)
            | NotionError::Conflict(f)
            | NotionError::Api(f) => f.status,
            _ => None,
        }
    }

    /// Classifies a reqwest failure.
    pub fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            NotionError::Timeout(timeout_secs)
        } else if err.is_decode() {
            NotionError::Decode(err.to_string())
        } else {
            NotionError::Connection(err.to_string())
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for NotionError {
    fn into_response(self) -> Response {
        let status = match &self {
            NotionError::Authentication(_) => StatusCode::UNAUTHORIZED,
            NotionError::Validation(_) => StatusCode::BAD_REQUEST,
            NotionError::RateLimit(_) => StatusCode::TOO_MANY_REQUESTS,
            NotionError::NotFound(_) => StatusCode::NOT_FOUND,
            NotionError::Conflict(_) => StatusCode::CONFLICT,
            NotionError::Api(f) => f
                .status
                .and_then(|s| StatusCode::from_u16(s).ok())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            NotionError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            NotionError::Connection(_) | NotionError::Decode(_) => StatusCode::BAD_GATEWAY,
            NotionError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the Notion client.
pub type Result<T> = std::result::Result<T, NotionError>;
