//! Aggregate statistics over one run.

use super::status::StatusCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Run-wide analytics. Recomputed from scratch on every run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSummary {
    /// Mean key-result progress, 0–100; 0 when there are no key results.
    pub overall_progress: f64,
    pub total_objectives: usize,
    pub total_key_results: usize,
    pub status_counts: BTreeMap<StatusCategory, usize>,
    pub recent_updates_count: usize,
    pub hierarchy_stats: Option<HierarchyStats>,
}

/// Shape of the objective forest.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyStats {
    /// Objectives per level, level 0 being roots.
    pub level_counts: BTreeMap<usize, usize>,
    pub root_count: usize,
    pub leaf_count: usize,
    pub orphan_count: usize,
    pub max_depth: usize,
}
