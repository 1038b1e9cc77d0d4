mod common;

use common::{MockApi, config, scenario_api, sessions_payload};
use okra_application::AggregationPipeline;
use okra_core::model::{RunPath, StatusCategory};
use okra_core::sparkline::FLAT_GLYPH;
use okra_core::{ApiResponse, OkraError};
use std::sync::Arc;

fn pipeline(api: &Arc<MockApi>, sessions: &[&str]) -> AggregationPipeline {
    AggregationPipeline::new(api.clone(), config(sessions))
}

#[tokio::test]
async fn test_scenario_builds_complete_model() {
    let api = Arc::new(scenario_api());
    let report = pipeline(&api, &["Q4 2024", "s2"]).run().await.unwrap();

    assert_eq!(report.path, RunPath::Optimized);
    assert_eq!(report.sessions.len(), 2);
    assert_eq!(report.summary.total_objectives, 3);
    assert_eq!(report.summary.total_key_results, 5);
    assert_eq!(report.unassociated_key_result_ids, vec!["k5"]);

    let attached: usize = report.objectives.iter().map(|o| o.key_results.len()).sum();
    assert_eq!(attached, 4);

    let stats = report.summary.hierarchy_stats.as_ref().unwrap();
    assert_eq!(stats.orphan_count, 1);
    assert_eq!(stats.root_count, 2);
    assert_eq!(stats.max_depth, 1);

    let order: Vec<&str> = report.objectives.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(order, vec!["g1", "g2", "g3"]);
    let g2 = &report.objectives[1];
    assert_eq!(g2.level, 1);
    assert_eq!(g2.hierarchical_index, "1.1");
    let g3 = &report.objectives[2];
    assert!(g3.is_orphan);
    assert_eq!(g3.hierarchical_index, "2");
}

#[tokio::test]
async fn test_scenario_analytics() {
    let api = Arc::new(scenario_api());
    let report = pipeline(&api, &["Q4 2024", "s2"]).run().await.unwrap();
    let summary = &report.summary;

    assert!((summary.overall_progress - 40.0).abs() < 1e-9);
    assert_eq!(summary.recent_updates_count, 1);
    assert_eq!(summary.status_counts[&StatusCategory::OnTrack], 1);
    assert_eq!(summary.status_counts[&StatusCategory::AtRisk], 1);
    assert_eq!(summary.status_counts[&StatusCategory::OffTrack], 1);
    assert_eq!(summary.status_counts[&StatusCategory::Completed], 1);
    assert_eq!(summary.status_counts[&StatusCategory::Unknown], 1);
}

#[tokio::test]
async fn test_details_owners_tasks_and_sparklines() {
    let api = Arc::new(scenario_api());
    let report = pipeline(&api, &["Q4 2024", "s2"]).run().await.unwrap();

    let g1 = &report.objectives[0];
    assert_eq!(g1.description, "Double ARR");
    assert_eq!(g1.owner_name, "Ada");
    assert!((g1.progress - 50.0).abs() < 1e-9);

    let k1 = &g1.key_results[0];
    assert_eq!(k1.tasks.len(), 2);
    assert_eq!(k1.tasks[0].owner_name, "Lin Wu");
    assert_eq!(k1.tasks[1].owner_name, "Unassigned");
    assert_eq!(k1.progress_history.len(), 3);
    assert_eq!(k1.sparkline.chars().count(), 10);
    assert_eq!(g1.sparkline, k1.sparkline);

    let g2 = &report.objectives[1];
    assert_eq!(g2.owner_name, "Lin Wu");
    let k2 = &g2.key_results[0];
    assert_eq!(k2.owner_name, "Unassigned");
    assert_eq!(k2.sparkline, FLAT_GLYPH.to_string().repeat(10));

    let g3 = &report.objectives[2];
    let k3 = g3.key_results.iter().find(|kr| kr.id == "k3").unwrap();
    assert_eq!(k3.owner_name, "User u3");
    assert!(k3.progress_history.is_empty());
    assert_eq!(k3.sparkline, "—");
}

#[tokio::test]
async fn test_tasks_only_fetched_for_declared_counts() {
    let api = Arc::new(scenario_api());
    pipeline(&api, &["Q4 2024", "s2"]).run().await.unwrap();

    assert_eq!(api.calls_starting_with("/tasks"), vec!["/tasks?metricId=k1"]);
}

#[tokio::test]
async fn test_skip_toggles_avoid_history_requests() {
    let api = Arc::new(scenario_api());
    let mut cfg = config(&["Q4 2024"]);
    cfg.performance.skip_history = true;
    cfg.performance.skip_sparklines = true;
    let report = AggregationPipeline::new(api.clone(), cfg).run().await.unwrap();

    assert!(api.calls().iter().all(|c| !c.contains("/history")));
    assert!(report.objectives.iter().all(|o| o.sparkline == "—"));
}

#[tokio::test]
async fn test_corrupted_detail_does_not_block_others() {
    let api = Arc::new(scenario_api().respond(
        "/goals/g2",
        200,
        "<!DOCTYPE html><html><body>Gateway error</body></html>",
    ));
    let report = pipeline(&api, &["Q4 2024", "s2"]).run().await.unwrap();

    assert_eq!(report.path, RunPath::Optimized);
    assert_eq!(report.summary.total_objectives, 3);
    assert_eq!(report.objectives[0].description, "Double ARR");
    assert_eq!(report.objectives[1].owner_name, "Unassigned");
    assert!(report.stats.failed_items >= 1);
}

#[tokio::test]
async fn test_chunk_failure_degrades_to_missing_details() {
    let api = Arc::new(scenario_api().fail_batches(1));
    let report = pipeline(&api, &["Q4 2024", "s2"]).run().await.unwrap();

    assert_eq!(report.path, RunPath::Optimized);
    assert_eq!(report.summary.total_objectives, 3);
    assert!(report.objectives[0].description.is_empty());
    assert_eq!(report.stats.failed_items, 4);
}

#[tokio::test]
async fn test_fallback_runs_once_after_optimized_failure() {
    let api = Arc::new(
        scenario_api().once("/sessions", Ok(ApiResponse::new("/sessions", 503, "{}"))),
    );
    let report = pipeline(&api, &["Q4 2024", "s2"]).run().await.unwrap();

    assert_eq!(report.path, RunPath::Sequential);
    assert_eq!(api.calls_to("/sessions"), 2);
    assert_eq!(report.summary.total_key_results, 5);
    assert_eq!(report.unassociated_key_result_ids, vec!["k5"]);
    assert!(api.batches().is_empty());
}

#[tokio::test]
async fn test_fallback_failure_propagates() {
    let api = Arc::new(MockApi::new().respond("/sessions", 500, "{}"));
    let err = pipeline(&api, &["Q4 2024"]).run().await.unwrap_err();

    assert!(matches!(err, OkraError::Http { status: 500, .. }));
    assert_eq!(api.calls_to("/sessions"), 2);
}

#[tokio::test]
async fn test_auth_failure_skips_fallback() {
    let api = Arc::new(MockApi::new().fail(
        "/sessions",
        OkraError::Auth {
            status: 401,
            path: "/sessions".to_string(),
        },
    ));
    let err = pipeline(&api, &["Q4 2024"]).run().await.unwrap_err();

    assert!(err.is_auth());
    assert_eq!(api.calls_to("/sessions"), 1);
}

#[tokio::test]
async fn test_unresolved_sessions_fail_the_run() {
    let api = Arc::new(scenario_api());
    let err = pipeline(&api, &["Q4 2024", "bad-name"]).run().await.unwrap_err();

    match err {
        OkraError::UnresolvedIdentifiers {
            unresolved,
            available,
        } => {
            assert_eq!(unresolved, vec!["bad-name"]);
            assert_eq!(available, vec!["Q4 2024", "Q1 2025", "Q3 2024"]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(api.calls_starting_with("/goals").is_empty());
}

#[tokio::test]
async fn test_incomplete_config_is_rejected_before_any_request() {
    let api = Arc::new(MockApi::new().json("/sessions", sessions_payload()));
    let mut cfg = config(&["Q4 2024"]);
    cfg.api.token = None;
    let err = AggregationPipeline::new(api.clone(), cfg).run().await.unwrap_err();

    assert!(err.is_config());
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_report_serializes_camel_case() {
    let api = Arc::new(scenario_api());
    let report = pipeline(&api, &["Q4 2024", "s2"]).run().await.unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert!(json["runId"].as_str().is_some_and(|id| !id.is_empty()));
    assert_eq!(json["path"], "optimized");
    assert_eq!(json["summary"]["totalKeyResults"], 5);
    assert_eq!(json["objectives"][1]["hierarchicalIndex"], "1.1");
    assert!(json["objectives"][0].get("parentFields").is_none());
}
