//! Objective domain model.

use super::key_result::KeyResult;
use super::progress::ProgressSample;
use super::user::UNASSIGNED_OWNER;
use super::EMPTY_SPARKLINE;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A goal within a session, possibly nested under another objective.
///
/// `level`, `children`, `hierarchical_index`, `is_orphan` and `parent_id` are
/// assigned once by the hierarchy builder and not touched afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Objective {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner_id: Option<String>,
    pub owner_name: String,
    pub status: String,
    /// Percent, 0–100.
    pub progress: f64,
    pub parent_id: Option<String>,
    pub session_id: String,
    pub children: Vec<String>,
    pub level: usize,
    pub hierarchical_index: String,
    /// Root because its declared parent is not part of this dataset.
    pub is_orphan: bool,
    /// Root because it was only reachable through a parent cycle.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub cycle_break: bool,
    pub progress_history: Vec<ProgressSample>,
    pub sparkline: String,
    pub key_results: Vec<KeyResult>,
    /// Candidate parent references as found on the remote record, keyed by
    /// field name. Consumed by the hierarchy builder.
    #[serde(skip)]
    pub parent_fields: BTreeMap<String, String>,
}

impl Objective {
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
            parent_id: None,
            session_id: session_id.into(),
            children: Vec::new(),
            level: 0,
            hierarchical_index: String::new(),
            is_orphan: false,
            cycle_break: false,
            progress_history: Vec::new(),
            sparkline: EMPTY_SPARKLINE.to_string(),
            key_results: Vec::new(),
            parent_fields: BTreeMap::new(),
        }
    }

    /// Records a candidate parent reference under `field`.
    pub fn with_parent_field(mut self, field: impl Into<String>, parent: impl Into<String>) -> Self {
        self.parent_fields.insert(field.into(), parent.into());
        self
    }

    pub fn is_root(&self) -> bool {
        self.level == 0
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
