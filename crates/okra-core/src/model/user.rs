//! User records and owner-label conventions.

use serde::{Deserialize, Serialize};

/// Owner label for records that carry no owner ID.
pub const UNASSIGNED_OWNER: &str = "Unassigned";

/// A resolved owner/assignee.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub display_name: String,
}

/// Label used when neither the bulk nor the per-ID lookup produced a name.
pub fn synthetic_user_label(id: &str) -> String {
    format!("User {}", id)
}
