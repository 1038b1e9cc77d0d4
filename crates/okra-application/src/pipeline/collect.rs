//! The aggregation steps, shared by both pipeline paths.

use crate::batch::FetchStrategy;
use crate::batch::adapters::{fetch_objective_details, fetch_tasks};
use crate::progress_history::ProgressHistoryService;
use crate::session_resolver::SessionResolver;
use crate::user_directory::{UserDirectory, UserNameCache};
use okra_core::api::with_query;
use okra_core::history::mean_by_day;
use okra_core::model::{AggregateSummary, KeyResult, Objective, Session, UNASSIGNED_OWNER};
use okra_core::payload::unwrap_collection;
use okra_core::{AnalyticsEngine, HierarchyBuilder, OkraError, Result, RunConfig};
use okra_infrastructure::dto::{GoalDto, MetricDto, parse_records};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

/// Everything one path produces before run bookkeeping is added.
pub(crate) struct Collected {
    pub sessions: Vec<Session>,
    pub objectives: Vec<Objective>,
    pub unassociated_key_result_ids: Vec<String>,
    pub summary: AggregateSummary,
}

/// Runs every aggregation step through `strategy`.
pub(crate) async fn collect(
    config: &RunConfig,
    strategy: &FetchStrategy,
    cache: &UserNameCache,
) -> Result<Collected> {
    let sessions = SessionResolver::new(strategy)
        .resolve(&config.sessions)
        .await?;

    let mut objectives = Vec::new();
    let mut key_results = Vec::new();
    for session in &sessions {
        let session_query = [("sessionId", session.id.as_str())];
        let goals = list(strategy, &with_query("/goals", &session_query)).await?;
        objectives.extend(
            parse_records::<GoalDto>(&goals, "goal")
                .into_iter()
                .map(|goal| goal.into_objective(&session.id, &config.hierarchy.parent_fields)),
        );

        let metrics = list(strategy, &with_query("/metrics", &session_query)).await?;
        key_results.extend(
            parse_records::<MetricDto>(&metrics, "metric")
                .into_iter()
                .map(|metric| metric.into_key_result(&session.id)),
        );
    }
    tracing::info!(
        "[Pipeline] Listed {} objective(s) and {} key result(s) across {} session(s)",
        objectives.len(),
        key_results.len(),
        sessions.len()
    );

    let objective_ids: Vec<String> = objectives.iter().map(|o| o.id.clone()).collect();
    let mut details = fetch_objective_details(strategy, &objective_ids).await?;
    for objective in &mut objectives {
        if let Some(detail) = details.remove(&objective.id) {
            detail.apply_to(objective, &config.hierarchy.parent_fields);
        }
    }

    if config.performance.skip_history {
        tracing::debug!("[Pipeline] Progress history skipped");
    } else {
        let kr_ids: Vec<String> = key_results.iter().map(|kr| kr.id.clone()).collect();
        let mut histories = ProgressHistoryService::new(config.history_window_days)
            .fetch(strategy, &kr_ids)
            .await?;
        for kr in &mut key_results {
            if let Some(samples) = histories.remove(&kr.id) {
                kr.progress_history = samples;
            }
        }
    }

    let mut tasks = fetch_tasks(strategy, &key_results).await?;
    for kr in &mut key_results {
        if let Some(list) = tasks.remove(&kr.id) {
            kr.tasks = list;
        }
    }

    assign_owner_names(config, strategy, cache, &mut objectives, &mut key_results).await;
    attach_histories(config, &mut objectives, &mut key_results);

    let forest = HierarchyBuilder::new(&config.hierarchy).build(objectives);
    let (objectives, unassociated_key_result_ids) = attach_key_results(forest, &key_results);

    let summary = AnalyticsEngine::summarize(&objectives, &key_results, config.lookback_days);

    Ok(Collected {
        sessions,
        objectives,
        unassociated_key_result_ids,
        summary,
    })
}

/// Fetches and unwraps a list endpoint. Failures here are path-level.
async fn list(strategy: &FetchStrategy, path: &str) -> Result<Vec<Value>> {
    let payload = strategy.get(path).await?.json()?;
    unwrap_collection(&payload)
        .cloned()
        .ok_or_else(|| OkraError::malformed(path, "unrecognized collection shape"))
}

async fn assign_owner_names(
    config: &RunConfig,
    strategy: &FetchStrategy,
    cache: &UserNameCache,
    objectives: &mut [Objective],
    key_results: &mut [KeyResult],
) {
    let owner_ids: BTreeSet<String> = objectives
        .iter()
        .filter_map(|o| o.owner_id.clone())
        .chain(key_results.iter().filter_map(|kr| kr.owner_id.clone()))
        .chain(
            key_results
                .iter()
                .flat_map(|kr| kr.tasks.iter().filter_map(|t| t.owner_id.clone())),
        )
        .collect();

    let names = UserDirectory::new(
        cache.clone(),
        config.batch.user_bulk_size,
        config.performance.bulk_user_fetch,
    )
    .resolve(strategy, &owner_ids)
    .await;

    let name_of = |owner: &Option<String>| {
        owner
            .as_ref()
            .and_then(|id| names.get(id).cloned())
            .unwrap_or_else(|| UNASSIGNED_OWNER.to_string())
    };

    for objective in objectives.iter_mut() {
        objective.owner_name = name_of(&objective.owner_id);
    }
    for kr in key_results.iter_mut() {
        kr.owner_name = name_of(&kr.owner_id);
        for task in &mut kr.tasks {
            task.owner_name = name_of(&task.owner_id);
        }
    }
}

/// Derives objective histories from their key results and renders sparklines.
fn attach_histories(config: &RunConfig, objectives: &mut [Objective], key_results: &mut [KeyResult]) {
    let mut by_goal: HashMap<&str, Vec<&KeyResult>> = HashMap::new();
    for kr in key_results.iter() {
        if let Some(goal) = kr.goal_id.as_deref() {
            by_goal.entry(goal).or_default().push(kr);
        }
    }
    for objective in objectives.iter_mut() {
        if let Some(krs) = by_goal.get(objective.id.as_str()) {
            objective.progress_history =
                mean_by_day(krs.iter().map(|kr| kr.progress_history.as_slice()));
        }
    }
    drop(by_goal);

    if config.performance.skip_sparklines {
        tracing::debug!("[Pipeline] Sparklines skipped");
        return;
    }
    let width = config.sparkline_width;
    for kr in key_results.iter_mut() {
        kr.sparkline = ProgressHistoryService::sparkline(&kr.progress_history, width);
    }
    for objective in objectives.iter_mut() {
        objective.sparkline = ProgressHistoryService::sparkline(&objective.progress_history, width);
    }
}

/// Attaches each key result to the objective named by its `goal_id`.
///
/// Returns the forest and the IDs of key results that matched no objective.
fn attach_key_results(
    mut forest: Vec<Objective>,
    key_results: &[KeyResult],
) -> (Vec<Objective>, Vec<String>) {
    let position: HashMap<String, usize> = forest
        .iter()
        .enumerate()
        .map(|(i, o)| (o.id.clone(), i))
        .collect();

    let mut unassociated = Vec::new();
    for kr in key_results {
        match kr.goal_id.as_ref().and_then(|goal| position.get(goal)) {
            Some(&i) => forest[i].key_results.push(kr.clone()),
            None => {
                tracing::warn!(
                    "[Pipeline] Key result '{}' references objective {:?} which was not fetched",
                    kr.id,
                    kr.goal_id
                );
                unassociated.push(kr.id.clone());
            }
        }
    }
    (forest, unassociated)
}
