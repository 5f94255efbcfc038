//! Transport layer - the HTTP capability virtual users are written against
//!
//! Tasks never talk to `reqwest` directly. They go through [`Transport`], which
//! keeps the scenario testable with an in-memory stub.

mod http;

pub use http::{HttpOptions, HttpTransport};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Content type sent with every JSON request.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// A request that never produced a response.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Path could not be joined onto the base host
    #[error("Invalid request path '{path}': {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: url::ParseError,
    },

    /// No response within the configured timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Could not connect to the target host
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Response headers arrived but the body could not be read
    #[error("Failed to read response body: {0}")]
    Body(String),

    #[error("Request failed: {0}")]
    Other(String),
}

impl From<reqwest::Error> for RequestError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            RequestError::Timeout(error.to_string())
        } else if error.is_connect() {
            RequestError::Connect(error.to_string())
        } else if error.is_body() || error.is_decode() {
            RequestError::Body(error.to_string())
        } else {
            RequestError::Other(error.to_string())
        }
    }
}

/// Minimal HTTP capability: POST a JSON document to a path relative to the
/// target host.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(
        &self,
        path: &str,
        body: &Value,
        headers: &[(&str, &str)],
    ) -> Result<RawResponse, RequestError>;
}
