//! Run configuration.
//!
//! Every section carries serde defaults so a partial `config.toml` is valid;
//! credentials are usually supplied from the environment instead.

use crate::error::{OkraError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ACCOUNT_HEADER: &str = "Gtmhub-AccountId";

/// Root configuration for one aggregation run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RunConfig {
    pub api: ApiConfig,
    /// Session names or IDs, in the order they should appear in the report.
    pub sessions: Vec<String>,
    /// Window for the recent-activity statistic.
    pub lookback_days: u32,
    /// Window of progress samples fetched per key result.
    pub history_window_days: u32,
    pub sparkline_width: usize,
    /// Wall-clock budget for a run. Exceeding it is reported, not enforced.
    pub run_budget_secs: u64,
    pub batch: BatchConfig,
    pub performance: PerformanceToggles,
    pub hierarchy: HierarchyConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            sessions: Vec::new(),
            lookback_days: 7,
            history_window_days: 30,
            sparkline_width: 10,
            run_budget_secs: 300,
            batch: BatchConfig::default(),
            performance: PerformanceToggles::default(),
            hierarchy: HierarchyConfig::default(),
        }
    }
}

impl RunConfig {
    /// Checks the settings a run cannot start without.
    ///
    /// Error messages name the missing setting but never echo the token.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(OkraError::config("api.baseUrl is not set (OKRA_BASE_URL)"));
        }
        if self.api.token.as_deref().is_none_or(|t| t.trim().is_empty()) {
            return Err(OkraError::config("api.token is not set (OKRA_API_TOKEN)"));
        }
        if self
            .api
            .account_id
            .as_deref()
            .is_none_or(|a| a.trim().is_empty())
        {
            return Err(OkraError::config(
                "api.accountId is not set (OKRA_ACCOUNT_ID)",
            ));
        }
        if self.sessions.is_empty() {
            return Err(OkraError::config("no target sessions configured"));
        }
        if self.batch.chunk_size == 0 {
            return Err(OkraError::config("batch.chunkSize must be greater than 0"));
        }
        if self.batch.user_bulk_size == 0 {
            return Err(OkraError::config(
                "batch.userBulkSize must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// Remote service connection settings.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub account_id: Option<String>,
    /// Header carrying the account scope next to the bearer token.
    pub account_header: String,
    pub request_timeout_secs: u64,
    /// Wait used for a 429 without a usable `Retry-After` header.
    pub rate_limit_default_wait_secs: u64,
    /// Upper bound on any single 429 wait.
    pub rate_limit_max_wait_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token: None,
            account_id: None,
            account_header: DEFAULT_ACCOUNT_HEADER.to_string(),
            request_timeout_secs: 30,
            rate_limit_default_wait_secs: 5,
            rate_limit_max_wait_secs: 60,
        }
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("account_id", &self.account_id)
            .field("account_header", &self.account_header)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("rate_limit_default_wait_secs", &self.rate_limit_default_wait_secs)
            .field("rate_limit_max_wait_secs", &self.rate_limit_max_wait_secs)
            .finish()
    }
}

/// Chunking parameters for the batch orchestrator and bulk user lookups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct BatchConfig {
    pub chunk_size: usize,
    /// Courtesy pause between chunks.
    pub chunk_delay_ms: u64,
    pub chunk_timeout_secs: u64,
    /// Maximum IDs per bulk `/users` request.
    pub user_bulk_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            chunk_size: 25,
            chunk_delay_ms: 250,
            chunk_timeout_secs: 60,
            user_bulk_size: 50,
        }
    }
}

/// Switches that trade completeness for speed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PerformanceToggles {
    pub skip_history: bool,
    pub skip_sparklines: bool,
    pub bulk_user_fetch: bool,
}

impl Default for PerformanceToggles {
    fn default() -> Self {
        Self {
            skip_history: false,
            skip_sparklines: false,
            bulk_user_fetch: true,
        }
    }
}

/// Parent-field priority list for hierarchy reconstruction.
///
/// The first field in this list that is populated on any objective of the
/// dataset is used as the parent reference for every objective.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct HierarchyConfig {
    pub parent_fields: Vec<String>,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            parent_fields: ["parentGoalId", "parentId", "parent_id", "alignedTo"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}
