//! Wire DTOs for the goal-tracking service.
//!
//! The remote service is loose about field types (IDs arrive as strings or
//! numbers, numeric fields sometimes as strings) and about field names. DTOs
//! absorb that looseness; conversion methods produce domain models.
//!
//! Fields whose name varies between datasets are kept in a flattened `extra`
//! map and looked up by priority list at conversion time.

mod goal;
mod metric;
mod session;
mod task;
mod user;

pub use goal::GoalDto;
pub use metric::MetricDto;
pub use session::SessionDto;
pub use task::TaskDto;
pub use user::UserDto;

use okra_core::payload::first_string;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Parses each element of a collection, skipping records that do not fit.
pub fn parse_records<T: DeserializeOwned>(items: &[Value], kind: &str) -> Vec<T> {
    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<T>(item.clone()) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("[Dto] Skipping unreadable {} record: {}", kind, e);
                None
            }
        })
        .collect()
}

/// Unwraps a single-record payload, accepting `{"data": {...}}`.
pub fn unwrap_record(payload: &Value) -> &Value {
    match payload.get("data") {
        Some(inner @ Value::Object(_)) => inner,
        _ => payload,
    }
}

/// Reads an ID that may be a string, a number, or an object carrying `id`.
pub(crate) fn scalar_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(_) => first_string(value, &["id", "userId"]),
        _ => None,
    }
}

/// Resolves an owner reference from `ownerId` or an embedded `owner`.
pub(crate) fn owner_id(owner_id: Option<&Value>, owner: Option<&Value>) -> Option<String> {
    owner_id.and_then(scalar_id).or_else(|| owner.and_then(scalar_id))
}

/// Progress in [0, 100] from a percentage or a 0-1 attainment.
pub(crate) fn progress_percent(progress: Option<f64>, attainment: Option<f64>) -> f64 {
    progress
        .or_else(|| attainment.map(|a| a * 100.0))
        .filter(|p| p.is_finite())
        .map(|p| p.clamp(0.0, 100.0))
        .unwrap_or(0.0)
}

/// Reads `key` from `extra` as a string ID.
pub(crate) fn extra_id(extra: &Map<String, Value>, key: &str) -> Option<String> {
    extra.get(key).and_then(scalar_id)
}

pub(crate) fn de_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_id(&value).ok_or_else(|| serde::de::Error::custom("expected a string or numeric id"))
}

pub(crate) fn de_opt_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_id))
}

pub(crate) fn de_opt_f64<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

pub(crate) fn de_opt_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}
