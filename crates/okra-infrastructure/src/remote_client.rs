//! RemoteClient - authenticated REST access to the goal-tracking service.
//!
//! Every request carries a bearer token plus the account-scope header. The
//! client classifies only what the caller cannot recover from locally:
//! transport failures, auth failures and rate limiting. Everything else is
//! handed back as an [`ApiResponse`] for the caller to validate.

use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use okra_core::config::{ApiConfig, BatchConfig};
use okra_core::{ApiResponse, OkraError, RemoteApi, Result};
use reqwest::header::{CONTENT_TYPE, HeaderValue, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use std::time::Duration;

const USER_AGENT: &str = concat!("okra/", env!("CARGO_PKG_VERSION"));

/// reqwest-backed [`RemoteApi`] implementation.
#[derive(Clone)]
pub struct RemoteClient {
    client: Client,
    base_url: String,
    token: String,
    account_id: String,
    account_header: String,
    chunk_timeout: Duration,
    rate_limit_default_wait: Duration,
    rate_limit_max_wait: Duration,
}

impl std::fmt::Debug for RemoteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteClient")
            .field("base_url", &self.base_url)
            .field("account_id", &self.account_id)
            .finish_non_exhaustive()
    }
}

impl RemoteClient {
    /// Creates a client from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `Config` when the token or account ID is missing, and
    /// `Internal` when the HTTP client cannot be constructed.
    pub fn new(api: &ApiConfig, batch: &BatchConfig) -> Result<Self> {
        let token = api
            .token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| OkraError::config("api.token is not set"))?;
        let account_id = api
            .account_id
            .clone()
            .filter(|a| !a.trim().is_empty())
            .ok_or_else(|| OkraError::config("api.accountId is not set"))?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(api.request_timeout_secs.max(1)))
            .build()
            .map_err(|e| OkraError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            token,
            account_id,
            account_header: api.account_header.clone(),
            chunk_timeout: Duration::from_secs(batch.chunk_timeout_secs.max(1)),
            rate_limit_default_wait: Duration::from_secs(api.rate_limit_default_wait_secs),
            rate_limit_max_wait: Duration::from_secs(api.rate_limit_max_wait_secs),
        })
    }

    /// Joins the base URL and a service path.
    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Adds bearer and account-scope headers.
    fn auth_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(&self.token)
            .header(self.account_header.as_str(), self.account_id.as_str())
            .header("Accept", "application/json")
    }

    /// How long to wait before retrying a 429, capped by configuration.
    fn rate_limit_wait(&self, header: Option<&HeaderValue>) -> Duration {
        header
            .and_then(parse_retry_after)
            .unwrap_or(self.rate_limit_default_wait)
            .min(self.rate_limit_max_wait)
    }

    /// Issues one request without waiting out a 429.
    ///
    /// A rate-limited reply comes back as `RateLimited` carrying the wait the
    /// caller still owes before retrying.
    async fn send(&self, path: &str) -> Result<ApiResponse> {
        let url = self.url(path);
        tracing::trace!("[RemoteClient] GET {}", url);

        let response = self
            .auth_request(self.client.get(&url))
            .send()
            .await
            .map_err(|e| {
                let kind = if e.is_timeout() {
                    "timed out"
                } else if e.is_connect() {
                    "connection failed"
                } else {
                    "request failed"
                };
                OkraError::transport(format!("GET {} {}: {}", path, kind, e))
            })?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(OkraError::Auth {
                    status: status.as_u16(),
                    path: path.to_string(),
                });
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let wait = self.rate_limit_wait(response.headers().get(RETRY_AFTER));
                tracing::warn!("[RemoteClient] Rate limited on {}; retry in {}s", path, wait.as_secs());
                return Err(OkraError::RateLimited {
                    path: path.to_string(),
                    retry_after_secs: wait.as_secs(),
                });
            }
            _ => {}
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.text().await.map_err(|e| {
            OkraError::transport(format!("GET {} failed while reading body: {}", path, e))
        })?;

        let mut api_response = ApiResponse::new(path, status.as_u16(), body);
        api_response.content_type = content_type;
        Ok(api_response)
    }
}

#[async_trait]
impl RemoteApi for RemoteClient {
    /// A 429 is waited out here before `RateLimited` is returned, so one
    /// retry afterwards is a clean attempt.
    async fn get(&self, path: &str) -> Result<ApiResponse> {
        let result = self.send(path).await;
        if let Err(OkraError::RateLimited { retry_after_secs, .. }) = &result {
            tokio::time::sleep(Duration::from_secs(*retry_after_secs)).await;
        }
        result
    }

    /// The chunk timeout only bounds the requests themselves. The longest
    /// rate-limit wait of the chunk is served afterwards, once.
    async fn batch_get(&self, paths: &[String]) -> Result<Vec<Result<ApiResponse>>> {
        let requests = paths.iter().map(|path| self.send(path));
        let results = tokio::time::timeout(self.chunk_timeout, join_all(requests))
            .await
            .map_err(|_| {
                OkraError::transport(format!(
                    "batch of {} requests timed out after {}s",
                    paths.len(),
                    self.chunk_timeout.as_secs()
                ))
            })?;

        let wait = results
            .iter()
            .filter_map(|result| match result {
                Err(OkraError::RateLimited { retry_after_secs, .. }) => Some(*retry_after_secs),
                _ => None,
            })
            .max();
        if let Some(secs) = wait {
            tracing::debug!("[RemoteClient] Waiting {}s for rate-limited requests", secs);
            tokio::time::sleep(Duration::from_secs(secs)).await;
        }
        Ok(results)
    }
}

/// Parses `Retry-After` as delta-seconds or an HTTP date.
fn parse_retry_after(header: &HeaderValue) -> Option<Duration> {
    let value = header.to_str().ok()?.trim();
    if let Ok(secs) = value.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    let at = chrono::DateTime::parse_from_rfc2822(value).ok()?;
    let delta = at.with_timezone(&Utc) - Utc::now();
    Some(delta.to_std().unwrap_or(Duration::ZERO))
}
