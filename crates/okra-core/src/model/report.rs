//! The finished model handed to presentation collaborators.

use super::objective::Objective;
use super::session::Session;
use super::summary::AggregateSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Which pipeline path produced the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RunPath {
    Optimized,
    Sequential,
}

/// Bookkeeping about how a run went.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    pub elapsed_ms: u64,
    pub requests_issued: usize,
    /// Items skipped after a tolerated failure.
    pub failed_items: usize,
    pub budget_exceeded: bool,
}

/// Objective forest plus analytics for one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AggregationReport {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub path: RunPath,
    pub sessions: Vec<Session>,
    /// Depth-first forest order; each objective carries its key results.
    pub objectives: Vec<Objective>,
    /// Key results counted in the summary but attached to no objective.
    pub unassociated_key_result_ids: Vec<String>,
    pub summary: AggregateSummary,
    pub stats: RunStats,
}
