//! Chunked parallel request execution.

use okra_core::config::BatchConfig;
use okra_core::{ApiResponse, OkraError, RemoteApi, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Executes request lists as a sequence of parallel chunks.
///
/// The result of [`execute_batch`](Self::execute_batch) always has one slot
/// per input path, in input order. A slot is `None` when that request could
/// not produce a response at all; responses with an error status are still
/// returned so the caller's reducer can classify them.
pub struct BatchOrchestrator {
    api: Arc<dyn RemoteApi>,
    chunk_size: usize,
    chunk_delay: Duration,
    requests: AtomicUsize,
}

impl BatchOrchestrator {
    pub fn new(api: Arc<dyn RemoteApi>, config: &BatchConfig) -> Self {
        Self {
            api,
            chunk_size: config.chunk_size.max(1),
            chunk_delay: Duration::from_millis(config.chunk_delay_ms),
            requests: AtomicUsize::new(0),
        }
    }

    /// Number of HTTP requests issued so far, retries included.
    pub fn requests_issued(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }

    /// Runs `paths` chunk by chunk.
    ///
    /// - A chunk-level transport failure empties that chunk's slots.
    /// - Items reported as rate limited are retried once, one at a time,
    ///   after their chunk.
    /// - An authentication failure on any item aborts the whole batch.
    pub async fn execute_batch(&self, paths: &[String]) -> Result<Vec<Option<ApiResponse>>> {
        let mut slots: Vec<Option<ApiResponse>> = Vec::with_capacity(paths.len());
        let total_chunks = paths.len().div_ceil(self.chunk_size);

        for (index, chunk) in paths.chunks(self.chunk_size).enumerate() {
            if index > 0 && !self.chunk_delay.is_zero() {
                tokio::time::sleep(self.chunk_delay).await;
            }
            tracing::debug!(
                "[BatchOrchestrator] Chunk {}/{} ({} requests)",
                index + 1,
                total_chunks,
                chunk.len()
            );

            self.requests.fetch_add(chunk.len(), Ordering::Relaxed);
            let results = match self.api.batch_get(chunk).await {
                Ok(results) if results.len() == chunk.len() => results,
                Ok(results) => {
                    tracing::warn!(
                        "[BatchOrchestrator] Chunk {} returned {} results for {} requests; discarding chunk",
                        index + 1,
                        results.len(),
                        chunk.len()
                    );
                    slots.extend(std::iter::repeat_n(None, chunk.len()));
                    continue;
                }
                Err(e) if e.is_auth() => return Err(e),
                Err(e) => {
                    tracing::warn!("[BatchOrchestrator] Chunk {} failed: {}", index + 1, e);
                    slots.extend(std::iter::repeat_n(None, chunk.len()));
                    continue;
                }
            };

            let mut retry = Vec::new();
            for (offset, result) in results.into_iter().enumerate() {
                match result {
                    Ok(response) => slots.push(Some(response)),
                    Err(e) if e.is_auth() => return Err(e),
                    Err(OkraError::RateLimited { .. }) => {
                        retry.push(slots.len());
                        slots.push(None);
                    }
                    Err(e) => {
                        tracing::warn!(
                            "[BatchOrchestrator] Request '{}' failed: {}",
                            chunk[offset],
                            e
                        );
                        slots.push(None);
                    }
                }
            }

            for slot in retry {
                slots[slot] = self.retry_once(&paths[slot]).await?;
            }
        }

        Ok(slots)
    }

    async fn retry_once(&self, path: &str) -> Result<Option<ApiResponse>> {
        tracing::debug!("[BatchOrchestrator] Retrying rate-limited request '{}'", path);
        self.requests.fetch_add(1, Ordering::Relaxed);
        match self.api.get(path).await {
            Ok(response) => Ok(Some(response)),
            Err(e) if e.is_auth() => Err(e),
            Err(e) => {
                tracing::warn!("[BatchOrchestrator] Retry of '{}' failed: {}", path, e);
                Ok(None)
            }
        }
    }
}
