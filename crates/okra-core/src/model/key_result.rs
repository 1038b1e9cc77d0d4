//! Key result (metric) domain model.

use super::progress::ProgressSample;
use super::task::Task;
use super::user::UNASSIGNED_OWNER;
use super::EMPTY_SPARKLINE;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A measurable target owned by exactly one objective.
///
/// Ownership is by value: `goal_id` must equal an objective's `id`. A key
/// result whose `goal_id` matches nothing is still counted in totals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KeyResult {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner_id: Option<String>,
    pub owner_name: String,
    pub status: String,
    /// Percent, 0–100.
    pub progress: f64,
    pub current_value: Option<f64>,
    pub target_value: Option<f64>,
    pub unit: Option<String>,
    pub goal_id: Option<String>,
    pub session_id: String,
    /// Number of tasks the service declares for this key result.
    pub task_count: u32,
    pub last_modified: Option<DateTime<Utc>>,
    pub tasks: Vec<Task>,
    pub progress_history: Vec<ProgressSample>,
    pub sparkline: String,
}

impl KeyResult {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            owner_id: None,
            owner_name: UNASSIGNED_OWNER.to_string(),
            status: String::new(),
            progress: 0.0,
            current_value: None,
            target_value: None,
            unit: None,
            goal_id: None,
            session_id: session_id.into(),
            task_count: 0,
            last_modified: None,
            tasks: Vec::new(),
            progress_history: Vec::new(),
            sparkline: EMPTY_SPARKLINE.to_string(),
        }
    }

    pub fn with_goal(mut self, goal_id: impl Into<String>) -> Self {
        self.goal_id = Some(goal_id.into());
        self
    }

    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_task_count(mut self, task_count: u32) -> Self {
        self.task_count = task_count;
        self
    }

    pub fn with_last_modified(mut self, last_modified: DateTime<Utc>) -> Self {
        self.last_modified = Some(last_modified);
        self
    }
}
