//! Top-level aggregation coordinator.
//!
//! A run takes the optimized (batched) path first. If that path fails before
//! producing a result, the same steps are repeated once through the
//! sequential strategy; a failure there is returned to the caller.
//! Authentication failures are returned immediately.

mod collect;

use crate::batch::FetchStrategy;
use crate::session_resolver::SessionResolver;
use crate::user_directory::UserNameCache;
use chrono::Utc;
use collect::{Collected, collect};
use okra_core::model::{AggregationReport, RunStats, Session};
use okra_core::{RemoteApi, Result, RunConfig};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Instrument;
use uuid::Uuid;

/// Aggregates objectives, key results and analytics for configured sessions.
pub struct AggregationPipeline {
    api: Arc<dyn RemoteApi>,
    config: RunConfig,
    cache: UserNameCache,
}

impl AggregationPipeline {
    pub fn new(api: Arc<dyn RemoteApi>, config: RunConfig) -> Self {
        Self {
            api,
            config,
            cache: UserNameCache::new(),
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Lists every session visible to the account.
    pub async fn list_sessions(&self) -> Result<Vec<Session>> {
        let strategy = FetchStrategy::sequential(self.api.clone());
        SessionResolver::new(&strategy).list_sessions().await
    }

    /// Executes one aggregation run.
    ///
    /// # Errors
    ///
    /// - `Config` when the configuration is incomplete
    /// - `Auth` as soon as the service rejects the credentials
    /// - the sequential path's error when both paths fail
    pub async fn run(&self) -> Result<AggregationReport> {
        self.config.validate()?;

        let run_id = Uuid::new_v4().to_string();
        let span = tracing::info_span!("aggregation", run_id = %run_id);
        self.run_paths(run_id).instrument(span).await
    }

    async fn run_paths(&self, run_id: String) -> Result<AggregationReport> {
        let started = Instant::now();
        tracing::info!(
            "[Pipeline] Starting run for {} session(s)",
            self.config.sessions.len()
        );

        let optimized = FetchStrategy::batched(self.api.clone(), &self.config.batch);
        let first_attempt = collect(&self.config, &optimized, &self.cache).await;
        let (collected, strategy, extra_requests) = match first_attempt {
            Ok(collected) => (collected, optimized, 0),
            Err(e) if e.is_auth() => {
                tracing::error!("[Pipeline] Authentication failed: {}", e);
                return Err(e);
            }
            Err(e) => {
                tracing::warn!(
                    "[Pipeline] Optimized path failed: {}; falling back to sequential path",
                    e
                );
                let sequential = FetchStrategy::sequential(self.api.clone());
                let collected = collect(&self.config, &sequential, &self.cache)
                    .await
                    .inspect_err(|e| tracing::error!("[Pipeline] Sequential path failed: {}", e))?;
                (collected, sequential, optimized.requests_issued())
            }
        };

        let elapsed = started.elapsed();
        let stats = RunStats {
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            requests_issued: strategy.requests_issued() + extra_requests,
            failed_items: strategy.failed_items(),
            budget_exceeded: elapsed > Duration::from_secs(self.config.run_budget_secs),
        };
        Ok(self.finish(run_id, collected, &strategy, stats))
    }

    fn finish(
        &self,
        run_id: String,
        collected: Collected,
        strategy: &FetchStrategy,
        stats: RunStats,
    ) -> AggregationReport {
        if stats.budget_exceeded {
            tracing::warn!(
                "[Pipeline] Run took {}ms, over the {}s budget",
                stats.elapsed_ms,
                self.config.run_budget_secs
            );
        }
        tracing::info!(
            "[Pipeline] Run complete via {} path: {} objective(s), {} key result(s), {} request(s), {} skipped item(s) in {}ms",
            strategy.run_path(),
            collected.summary.total_objectives,
            collected.summary.total_key_results,
            stats.requests_issued,
            stats.failed_items,
            stats.elapsed_ms
        );

        AggregationReport {
            run_id,
            generated_at: Utc::now(),
            path: strategy.run_path(),
            sessions: collected.sessions,
            objectives: collected.objectives,
            unassociated_key_result_ids: collected.unassociated_key_result_ids,
            summary: collected.summary,
            stats,
        }
    }
}
