//! Remote service seam.
//!
//! `RemoteApi` decouples the aggregation logic from the HTTP stack. The
//! production implementation lives in `okra-infrastructure`; tests supply
//! scripted in-memory implementations.

use crate::error::{OkraError, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static HTML_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*<(!doctype|html|head|body|\?xml|title)\b").expect("static regex")
});

/// A raw response from the remote service.
///
/// Only transport, auth and rate-limit failures are reported as errors by
/// `RemoteApi`; everything else arrives here and is classified by `json()`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub path: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl ApiResponse {
    pub fn new(path: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            status,
            content_type: None,
            body: body.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns true when the body is an HTML/XML page rather than JSON.
    pub fn looks_like_html(&self) -> bool {
        let declared_html = self
            .content_type
            .as_deref()
            .map(|ct| ct.to_ascii_lowercase().contains("text/html"))
            .unwrap_or(false);
        declared_html || HTML_PREFIX.is_match(&self.body)
    }

    /// Classifies the response and parses the body.
    ///
    /// - non-2xx maps through [`OkraError::from_status`]
    /// - an HTML body is `MalformedResponse`, even under 200
    /// - an unparseable body is `MalformedResponse`
    pub fn json(&self) -> Result<Value> {
        if !self.is_success() {
            return Err(OkraError::from_status(self.status, &self.path));
        }
        if self.looks_like_html() {
            return Err(OkraError::malformed(&self.path, "HTML page instead of JSON"));
        }
        if self.body.trim().is_empty() {
            return Err(OkraError::malformed(&self.path, "empty body"));
        }
        serde_json::from_str(&self.body)
            .map_err(|e| OkraError::malformed(&self.path, format!("invalid JSON: {}", e)))
    }
}

/// Appends `params` to `path` as a form-encoded query string.
pub fn with_query(path: &str, params: &[(&str, &str)]) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish();
    format!("{}?{}", path, query)
}

/// Encodes each value for a query string and joins them with commas.
pub fn encode_list(values: &[String]) -> String {
    values
        .iter()
        .map(|v| url::form_urlencoded::byte_serialize(v.as_bytes()).collect::<String>())
        .collect::<Vec<_>>()
        .join(",")
}

/// Read-only access to the goal-tracking service.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Issues one GET request.
    ///
    /// # Returns
    ///
    /// - `Ok(ApiResponse)`: the service answered (any status except 401/403/429)
    /// - `Err(Auth)`: 401/403
    /// - `Err(RateLimited)`: 429, after the client has waited the server window
    /// - `Err(Transport)`: no usable answer
    async fn get(&self, path: &str) -> Result<ApiResponse>;

    /// Issues all `paths` concurrently and waits for every one of them.
    ///
    /// The returned vector has the same length and order as `paths`. An outer
    /// `Err` means the whole chunk failed at transport level. Rate-limited
    /// items come back as `RateLimited` once their wait has passed, without
    /// costing the rest of the chunk its responses.
    async fn batch_get(&self, paths: &[String]) -> Result<Vec<Result<ApiResponse>>>;
}
