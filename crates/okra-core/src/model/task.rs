//! Task domain model.

use super::user::UNASSIGNED_OWNER;
use serde::{Deserialize, Serialize};

/// A to-do item owned by exactly one key result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    pub owner_id: Option<String>,
    pub owner_name: String,
    pub status: String,
    pub description: String,
}

impl Task {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            owner_id: None,
            owner_name: UNASSIGNED_OWNER.to_string(),
            status: String::new(),
            description: String::new(),
        }
    }
}
