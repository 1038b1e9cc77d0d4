mod common;

use common::MockApi;
use okra_application::{FetchStrategy, UserDirectory, UserNameCache};
use okra_core::config::BatchConfig;
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;

fn ids(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn strategy(api: &Arc<MockApi>) -> FetchStrategy {
    FetchStrategy::batched(
        api.clone(),
        &BatchConfig {
            chunk_delay_ms: 0,
            ..BatchConfig::default()
        },
    )
}

#[tokio::test]
async fn test_bulk_then_individual_then_synthetic() {
    let api = Arc::new(
        MockApi::new()
            .json(
                "/users?ids=u1,u2,u3",
                json!({"items": [{"id": "u1", "displayName": "Ada"}]}),
            )
            .json("/users/u2", json!({"id": "u2", "email": "lin@example.com"})),
    );
    let directory = UserDirectory::new(UserNameCache::new(), 50, true);

    let names = directory
        .resolve(&strategy(&api), &ids(&["u1", "u2", "u3"]))
        .await;

    assert_eq!(names["u1"], "Ada");
    assert_eq!(names["u2"], "lin@example.com");
    assert_eq!(names["u3"], "User u3");
    assert_eq!(api.calls_to("/users/u1"), 0);
}

#[tokio::test]
async fn test_cached_names_are_not_refetched() {
    let api = Arc::new(MockApi::new().json_prefix(
        "/users?ids=",
        json!([{"id": "u1", "displayName": "Ada"}, {"id": "u2", "name": "Lin"}]),
    ));
    let cache = UserNameCache::new();
    let directory = UserDirectory::new(cache.clone(), 50, true);
    let strategy = strategy(&api);

    directory.resolve(&strategy, &ids(&["u1", "u2"])).await;
    let calls_after_first = api.calls().len();
    let names = directory.resolve(&strategy, &ids(&["u1", "u2"])).await;

    assert_eq!(api.calls().len(), calls_after_first);
    assert_eq!(names["u2"], "Lin");
    assert_eq!(cache.len().await, 2);
}

#[tokio::test]
async fn test_synthetic_labels_are_not_cached() {
    let api = Arc::new(MockApi::new());
    let cache = UserNameCache::new();
    let directory = UserDirectory::new(cache.clone(), 50, true);

    let names = directory.resolve(&strategy(&api), &ids(&["u9"])).await;

    assert_eq!(names["u9"], "User u9");
    assert_eq!(cache.len().await, 0);
}

#[tokio::test]
async fn test_bulk_requests_are_chunked() {
    let api = Arc::new(MockApi::new().json_prefix("/users?ids=", json!([])));
    let directory = UserDirectory::new(UserNameCache::new(), 2, true);

    directory
        .resolve(&strategy(&api), &ids(&["a", "b", "c", "d", "e"]))
        .await;

    assert_eq!(
        api.calls_starting_with("/users?ids="),
        vec!["/users?ids=a,b", "/users?ids=c,d", "/users?ids=e"]
    );
}

#[tokio::test]
async fn test_bulk_disabled_goes_straight_to_individual_lookups() {
    let api = Arc::new(
        MockApi::new()
            .json("/users/u1", json!({"data": {"id": "u1", "firstName": "Ada"}}))
            .json("/users/u2", json!({"id": "u2", "displayName": "Lin"})),
    );
    let directory = UserDirectory::new(UserNameCache::new(), 50, false);

    let names = directory
        .resolve(&strategy(&api), &ids(&["u1", "u2"]))
        .await;

    assert!(api.calls_starting_with("/users?ids=").is_empty());
    assert_eq!(names["u1"], "Ada");
    assert_eq!(names["u2"], "Lin");
}

#[tokio::test]
async fn test_failed_bulk_falls_back() {
    let api = Arc::new(
        MockApi::new()
            .respond("/users?ids=u1", 500, "{}")
            .json("/users/u1", json!({"id": "u1", "displayName": "Ada"})),
    );
    let directory = UserDirectory::new(UserNameCache::new(), 50, true);

    let names = directory.resolve(&strategy(&api), &ids(&["u1"])).await;

    assert_eq!(names["u1"], "Ada");
}
