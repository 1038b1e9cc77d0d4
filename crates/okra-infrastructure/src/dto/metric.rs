use super::{de_id, de_opt_f64, de_opt_id, de_opt_string, owner_id, progress_percent};
use okra_core::model::KeyResult;
use okra_core::payload::{first_f64, first_string, first_timestamp};
use serde::Deserialize;
use serde_json::{Map, Value};

const MODIFIED_KEYS: &[&str] = &["lastModified", "dateModified", "modifiedAt", "updatedAt"];
const CURRENT_KEYS: &[&str] = &["currentValue", "current"];
const TARGET_KEYS: &[&str] = &["targetValue"];
const TASK_COUNT_KEYS: &[&str] = &["tasksCount", "taskCount"];

/// A remote "metric" record, the wire form of a key result.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDto {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub description: Option<String>,
    #[serde(default)]
    pub owner_id: Option<Value>,
    #[serde(default)]
    pub owner: Option<Value>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub progress: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub attainment: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub actual: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub target: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub goal_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub session_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MetricDto {
    /// Converts to a key result owned by `session_id` unless the record names
    /// its own session.
    pub fn into_key_result(self, session_id: &str) -> KeyResult {
        let extra = Value::Object(self.extra);
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .or_else(|| first_string(&extra, &["title"]))
            .unwrap_or_default();
        let session = self.session_id.unwrap_or_else(|| session_id.to_string());

        let mut kr = KeyResult::new(self.id, name, session);
        kr.description = self.description.unwrap_or_default();
        kr.owner_id = owner_id(self.owner_id.as_ref(), self.owner.as_ref());
        kr.status = self.status.unwrap_or_default();
        kr.progress = progress_percent(self.progress, self.attainment);
        kr.current_value = self.actual.or_else(|| first_f64(&extra, CURRENT_KEYS));
        kr.target_value = self.target.or_else(|| first_f64(&extra, TARGET_KEYS));
        kr.unit = self.unit.filter(|u| !u.trim().is_empty());
        kr.goal_id = self.goal_id;
        kr.task_count = first_f64(&extra, TASK_COUNT_KEYS)
            .filter(|n| n.is_finite() && *n > 0.0)
            .map(|n| n as u32)
            .unwrap_or(0);
        kr.last_modified = first_timestamp(&extra, MODIFIED_KEYS);
        kr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_metric_to_key_result() {
        let dto: MetricDto = serde_json::from_value(json!({
            "id": "m1",
            "name": "ARR to $2M",
            "goalId": "g1",
            "ownerId": 17,
            "status": "At Risk",
            "actual": "1.2",
            "target": 2,
            "unit": "M$",
            "attainment": 0.6,
            "tasksCount": 3,
            "dateModified": "2024-11-10T08:30:00Z"
        }))
        .unwrap();
        let kr = dto.into_key_result("s1");
        assert_eq!(kr.goal_id.as_deref(), Some("g1"));
        assert_eq!(kr.owner_id.as_deref(), Some("17"));
        assert_eq!(kr.current_value, Some(1.2));
        assert_eq!(kr.target_value, Some(2.0));
        assert!((kr.progress - 60.0).abs() < 1e-9);
        assert_eq!(kr.task_count, 3);
        assert_eq!(
            kr.last_modified,
            Some(Utc.with_ymd_and_hms(2024, 11, 10, 8, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_sparse_metric_defaults() {
        let dto: MetricDto = serde_json::from_value(json!({"id": "m2"})).unwrap();
        let kr = dto.into_key_result("s2");
        assert_eq!(kr.session_id, "s2");
        assert_eq!(kr.task_count, 0);
        assert!(kr.goal_id.is_none());
        assert!(kr.last_modified.is_none());
        assert_eq!(kr.progress, 0.0);
    }
}
