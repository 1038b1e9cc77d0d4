//! ID-keyed fetch adapters.
//!
//! Each adapter builds one request per ID, runs them through a
//! [`FetchStrategy`] and reduces the responses into an `ID -> value` map.
//! IDs whose response is missing or rejected by the reducer are logged and
//! left out of the map.

use super::FetchStrategy;
use okra_core::api::with_query;
use okra_core::model::{KeyResult, Task};
use okra_core::payload::unwrap_collection;
use okra_core::{ApiResponse, OkraError, Result};
use okra_infrastructure::dto::{GoalDto, TaskDto, parse_records, unwrap_record};
use std::collections::HashMap;

/// Fetches `path_for(id)` for every ID and reduces each response.
///
/// Positional re-association relies on the strategy's order guarantee.
pub async fn collect_by_id<T, P, R>(
    strategy: &FetchStrategy,
    kind: &str,
    ids: &[String],
    path_for: P,
    reduce: R,
) -> Result<HashMap<String, T>>
where
    P: Fn(&str) -> String,
    R: Fn(&ApiResponse) -> Result<T>,
{
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let paths: Vec<String> = ids.iter().map(|id| path_for(id)).collect();
    let responses = strategy.fetch_all(&paths).await?;

    let mut values = HashMap::with_capacity(ids.len());
    for (id, response) in ids.iter().zip(responses) {
        let Some(response) = response else {
            tracing::warn!("[Adapters] No {} response for '{}'; skipping", kind, id);
            strategy.record_failure();
            continue;
        };
        match reduce(&response) {
            Ok(value) => {
                values.insert(id.clone(), value);
            }
            Err(e) => {
                tracing::warn!("[Adapters] Skipping {} for '{}': {}", kind, id, e);
                strategy.record_failure();
            }
        }
    }

    tracing::debug!(
        "[Adapters] Collected {}/{} {} responses",
        values.len(),
        ids.len(),
        kind
    );
    Ok(values)
}

/// Detail records for objectives, keyed by objective ID.
pub async fn fetch_objective_details(
    strategy: &FetchStrategy,
    objective_ids: &[String],
) -> Result<HashMap<String, GoalDto>> {
    collect_by_id(
        strategy,
        "objective detail",
        objective_ids,
        |id| format!("/goals/{}", id),
        |response| {
            let payload = response.json()?;
            serde_json::from_value(unwrap_record(&payload).clone())
                .map_err(|e| OkraError::malformed(&response.path, e.to_string()))
        },
    )
    .await
}

/// Task lists keyed by key-result ID.
///
/// Only key results that declare at least one task are queried.
pub async fn fetch_tasks(
    strategy: &FetchStrategy,
    key_results: &[KeyResult],
) -> Result<HashMap<String, Vec<Task>>> {
    let ids: Vec<String> = key_results
        .iter()
        .filter(|kr| kr.task_count > 0)
        .map(|kr| kr.id.clone())
        .collect();

    collect_by_id(
        strategy,
        "task list",
        &ids,
        |id| with_query("/tasks", &[("metricId", id)]),
        |response| {
            let payload = response.json()?;
            let items = unwrap_collection(&payload).ok_or_else(|| {
                OkraError::malformed(&response.path, "unrecognized collection shape")
            })?;
            Ok(parse_records::<TaskDto>(items, "task")
                .into_iter()
                .map(Task::from)
                .collect())
        },
    )
    .await
}
