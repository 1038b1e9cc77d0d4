//! Scripted in-memory `RemoteApi` and fixtures shared by integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use okra_core::config::ApiConfig;
use okra_core::{ApiResponse, OkraError, RemoteApi, Result, RunConfig};
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

type Scripted = Result<ApiResponse>;

/// Mock remote service with per-path scripted answers and call recording.
///
/// Lookup order for a path: one-shot answers queued with [`MockApi::once`],
/// then exact routes, then the longest matching prefix route, then 404.
#[derive(Default)]
pub struct MockApi {
    once: Mutex<HashMap<String, VecDeque<Scripted>>>,
    exact: Mutex<HashMap<String, Scripted>>,
    prefixes: Mutex<Vec<(String, Scripted)>>,
    failing_batches: Mutex<usize>,
    calls: Mutex<Vec<String>>,
    batches: Mutex<Vec<Vec<String>>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn json(self, path: &str, body: Value) -> Self {
        self.respond(path, 200, &body.to_string())
    }

    pub fn respond(self, path: &str, status: u16, body: &str) -> Self {
        self.exact
            .lock()
            .unwrap()
            .insert(path.to_string(), Ok(ApiResponse::new(path, status, body)));
        self
    }

    pub fn fail(self, path: &str, error: OkraError) -> Self {
        self.exact
            .lock()
            .unwrap()
            .insert(path.to_string(), Err(error));
        self
    }

    pub fn json_prefix(self, prefix: &str, body: Value) -> Self {
        self.prefixes.lock().unwrap().push((
            prefix.to_string(),
            Ok(ApiResponse::new(prefix, 200, body.to_string())),
        ));
        self
    }

    /// Queues an answer consumed by the next request to `path`.
    pub fn once(self, path: &str, answer: Scripted) -> Self {
        self.once
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(answer);
        self
    }

    /// Makes the next `n` `batch_get` calls fail as a whole.
    pub fn fail_batches(self, n: usize) -> Self {
        *self.failing_batches.lock().unwrap() = n;
        self
    }

    /// Every path answered, in request order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == path).count()
    }

    pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }

    /// Path lists of every `batch_get` call, failed ones included.
    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().unwrap().clone()
    }

    fn answer(&self, path: &str) -> Scripted {
        self.calls.lock().unwrap().push(path.to_string());

        if let Some(answer) = self
            .once
            .lock()
            .unwrap()
            .get_mut(path)
            .and_then(VecDeque::pop_front)
        {
            return with_path(answer, path);
        }
        if let Some(answer) = self.exact.lock().unwrap().get(path) {
            return with_path(answer.clone(), path);
        }
        let prefixes = self.prefixes.lock().unwrap();
        let best = prefixes
            .iter()
            .filter(|(prefix, _)| path.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len());
        match best {
            Some((_, answer)) => with_path(answer.clone(), path),
            None => Ok(ApiResponse::new(path, 404, r#"{"error":"not found"}"#)),
        }
    }
}

fn with_path(answer: Scripted, path: &str) -> Scripted {
    answer.map(|mut response| {
        response.path = path.to_string();
        response
    })
}

#[async_trait]
impl RemoteApi for MockApi {
    async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.answer(path)
    }

    async fn batch_get(&self, paths: &[String]) -> Result<Vec<Result<ApiResponse>>> {
        self.batches.lock().unwrap().push(paths.to_vec());
        {
            let mut failing = self.failing_batches.lock().unwrap();
            if *failing > 0 {
                *failing -= 1;
                return Err(OkraError::transport("simulated chunk failure"));
            }
        }
        Ok(paths.iter().map(|path| self.answer(path)).collect())
    }
}

/// Minimal valid configuration targeting `sessions`.
pub fn config(sessions: &[&str]) -> RunConfig {
    let mut config = RunConfig {
        api: ApiConfig {
            base_url: "https://okr.example.com/api/v1".to_string(),
            token: Some("token".to_string()),
            account_id: Some("acc".to_string()),
            ..ApiConfig::default()
        },
        sessions: sessions.iter().map(|s| s.to_string()).collect(),
        ..RunConfig::default()
    };
    config.batch.chunk_delay_ms = 0;
    config.batch.chunk_size = 3;
    config
}

pub fn sessions_payload() -> Value {
    json!({"items": [
        {"id": "s1", "name": "Q4 2024", "start": "2024-10-01", "end": "2024-12-31"},
        {"id": "s2", "name": "Q1 2025"},
        {"id": "s3", "name": "Q3 2024"}
    ]})
}

/// Two target sessions, three objectives (one aligned to a parent outside
/// the fetched set) and five key results (one pointing at no objective).
pub fn scenario_api() -> MockApi {
    MockApi::new()
        .json("/sessions", sessions_payload())
        .json(
            "/goals?sessionId=s1",
            json!([
                {"id": "g1", "name": "Grow revenue", "ownerId": "u1", "attainment": 0.5},
                {"id": "g2", "name": "Expand EMEA", "parentGoalId": "g1"}
            ]),
        )
        .json(
            "/goals?sessionId=s2",
            json!({"data": [
                {"id": "g3", "name": "Hire team", "parentGoalId": "g-archived"}
            ]}),
        )
        .json(
            "/metrics?sessionId=s1",
            json!([
                {"id": "k1", "name": "ARR", "goalId": "g1", "ownerId": "u1",
                 "progress": 40, "status": "on_track", "tasksCount": 2,
                 "dateModified": "2999-01-01T00:00:00Z"},
                {"id": "k2", "name": "Logos", "goalId": "g2", "progress": 80,
                 "status": "At Risk", "tasksCount": 0}
            ]),
        )
        .json(
            "/metrics?sessionId=s2",
            json!({"results": [
                {"id": "k3", "name": "Offers", "goalId": "g3", "ownerId": "u3", "progress": 20, "status": "off track"},
                {"id": "k4", "name": "Onboarding", "goalId": "g3", "progress": 60, "status": "done"},
                {"id": "k5", "name": "Stray", "goalId": "g-missing", "progress": 0, "status": "weird"}
            ]}),
        )
        .json(
            "/goals/g1",
            json!({"id": "g1", "description": "Double ARR", "status": "on_track"}),
        )
        .json("/goals/g2", json!({"data": {"id": "g2", "ownerId": "u2"}}))
        .json("/goals/g3", json!({"id": "g3", "parentGoalId": "g-archived"}))
        .json_prefix(
            "/metrics/k1/history",
            json!({"history": [
                {"date": "2024-10-01", "progressValue": 10},
                {"date": "2024-10-08", "progressValue": 25},
                {"date": "2024-10-15", "progressValue": 40}
            ]}),
        )
        .json_prefix(
            "/metrics/k2/history",
            json!([{"date": "2024-10-01", "progressValue": 80}]),
        )
        .json(
            "/tasks?metricId=k1",
            json!([
                {"id": "t1", "name": "Draft pricing", "ownerId": "u2"},
                {"id": "t2", "name": "Review"}
            ]),
        )
        .json_prefix(
            "/users?ids=",
            json!([
                {"id": "u1", "displayName": "Ada"},
                {"id": "u2", "firstName": "Lin", "lastName": "Wu"}
            ]),
        )
}
