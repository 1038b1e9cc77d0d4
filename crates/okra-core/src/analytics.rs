//! Run-wide analytics over the aggregated model.

use crate::model::{AggregateSummary, HierarchyStats, KeyResult, Objective, StatusCategory};
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

/// Computes [`AggregateSummary`] values. Stateless; every call recomputes
/// everything from its inputs.
pub struct AnalyticsEngine;

impl AnalyticsEngine {
    /// Summarizes against the current time.
    pub fn summarize(
        objectives: &[Objective],
        key_results: &[KeyResult],
        lookback_days: u32,
    ) -> AggregateSummary {
        Self::summarize_at(objectives, key_results, lookback_days, Utc::now())
    }

    /// Summarizes against an explicit clock.
    pub fn summarize_at(
        objectives: &[Objective],
        key_results: &[KeyResult],
        lookback_days: u32,
        now: DateTime<Utc>,
    ) -> AggregateSummary {
        AggregateSummary {
            overall_progress: Self::overall_progress(key_results),
            total_objectives: objectives.len(),
            total_key_results: key_results.len(),
            status_counts: Self::status_counts(key_results),
            recent_updates_count: Self::recent_updates(key_results, lookback_days, now).len(),
            hierarchy_stats: Self::hierarchy_stats(objectives),
        }
    }

    /// Mean key-result progress in [0, 100]; 0 for an empty set.
    ///
    /// Values outside the range are clamped and non-finite values count as 0.
    pub fn overall_progress(key_results: &[KeyResult]) -> f64 {
        if key_results.is_empty() {
            return 0.0;
        }
        let total: f64 = key_results
            .iter()
            .map(|kr| {
                if kr.progress.is_finite() {
                    kr.progress.clamp(0.0, 100.0)
                } else {
                    0.0
                }
            })
            .sum();
        total / key_results.len() as f64
    }

    /// Counts key results per normalized status. Every category is present.
    pub fn status_counts(key_results: &[KeyResult]) -> BTreeMap<StatusCategory, usize> {
        let mut counts: BTreeMap<StatusCategory, usize> =
            StatusCategory::iter().map(|c| (c, 0)).collect();
        for kr in key_results {
            *counts.entry(StatusCategory::normalize(&kr.status)).or_insert(0) += 1;
        }
        counts
    }

    /// Key results modified strictly after `now - lookback_days`.
    ///
    /// A key result without a timestamp is never considered recent.
    pub fn recent_updates(
        key_results: &[KeyResult],
        lookback_days: u32,
        now: DateTime<Utc>,
    ) -> Vec<&KeyResult> {
        let cutoff = now - Duration::days(i64::from(lookback_days));
        key_results
            .iter()
            .filter(|kr| kr.last_modified.is_some_and(|ts| ts > cutoff))
            .collect()
    }

    /// Shape statistics over an already-built forest. `None` without objectives.
    pub fn hierarchy_stats(objectives: &[Objective]) -> Option<HierarchyStats> {
        if objectives.is_empty() {
            return None;
        }
        let mut stats = HierarchyStats::default();
        for objective in objectives {
            *stats.level_counts.entry(objective.level).or_insert(0) += 1;
            if objective.is_root() {
                stats.root_count += 1;
            }
            if objective.is_leaf() {
                stats.leaf_count += 1;
            }
            if objective.is_orphan {
                stats.orphan_count += 1;
            }
            stats.max_depth = stats.max_depth.max(objective.level);
        }
        Some(stats)
    }
}
