//! Batched vs. one-at-a-time fetching behind one interface.

use super::orchestrator::BatchOrchestrator;
use okra_core::config::BatchConfig;
use okra_core::model::RunPath;
use okra_core::{ApiResponse, OkraError, RemoteApi, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

enum Mode {
    Batched(BatchOrchestrator),
    Sequential,
}

/// How the pipeline talks to the remote service.
///
/// Both modes share the same contract: [`fetch_all`](Self::fetch_all)
/// returns one slot per path in input order, `None` for items that produced
/// no response. Rate-limited items get one retry; an auth failure aborts.
pub struct FetchStrategy {
    api: Arc<dyn RemoteApi>,
    mode: Mode,
    requests: AtomicUsize,
    failures: AtomicUsize,
}

impl FetchStrategy {
    /// Chunked parallel fetching through [`BatchOrchestrator`].
    pub fn batched(api: Arc<dyn RemoteApi>, config: &BatchConfig) -> Self {
        let orchestrator = BatchOrchestrator::new(api.clone(), config);
        Self::with_mode(api, Mode::Batched(orchestrator))
    }

    /// One request at a time, in order.
    pub fn sequential(api: Arc<dyn RemoteApi>) -> Self {
        Self::with_mode(api, Mode::Sequential)
    }

    fn with_mode(api: Arc<dyn RemoteApi>, mode: Mode) -> Self {
        Self {
            api,
            mode,
            requests: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
        }
    }

    /// The pipeline path this strategy implements.
    pub fn run_path(&self) -> RunPath {
        match self.mode {
            Mode::Batched(_) => RunPath::Optimized,
            Mode::Sequential => RunPath::Sequential,
        }
    }

    /// Issues a single request, retrying once if rate limited.
    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        match self.api.get(path).await {
            Err(OkraError::RateLimited { .. }) => {
                tracing::debug!("[FetchStrategy] Retrying rate-limited request '{}'", path);
                self.requests.fetch_add(1, Ordering::Relaxed);
                self.api.get(path).await
            }
            other => other,
        }
    }

    /// Fetches every path; see the type-level docs for the slot contract.
    pub async fn fetch_all(&self, paths: &[String]) -> Result<Vec<Option<ApiResponse>>> {
        match &self.mode {
            Mode::Batched(orchestrator) => orchestrator.execute_batch(paths).await,
            Mode::Sequential => {
                let mut slots = Vec::with_capacity(paths.len());
                for path in paths {
                    match self.get(path).await {
                        Ok(response) => slots.push(Some(response)),
                        Err(e) if e.is_auth() => return Err(e),
                        Err(e) => {
                            tracing::warn!("[FetchStrategy] Request '{}' failed: {}", path, e);
                            slots.push(None);
                        }
                    }
                }
                Ok(slots)
            }
        }
    }

    /// Records an item that was skipped after a tolerated failure.
    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn failed_items(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    /// Requests issued through this strategy, retries included.
    pub fn requests_issued(&self) -> usize {
        let batched = match &self.mode {
            Mode::Batched(orchestrator) => orchestrator.requests_issued(),
            Mode::Sequential => 0,
        };
        self.requests.load(Ordering::Relaxed) + batched
    }
}
