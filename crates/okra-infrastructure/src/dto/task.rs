use super::{de_id, de_opt_string, owner_id};
use okra_core::model::Task;
use okra_core::payload::first_string;
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDto {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub name: Option<String>,
    #[serde(default)]
    pub owner_id: Option<Value>,
    #[serde(default)]
    pub owner: Option<Value>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub description: Option<String>,
    /// `title` and `assignee` alternates, among others.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<TaskDto> for Task {
    fn from(dto: TaskDto) -> Self {
        let extra = Value::Object(dto.extra);
        let name = dto
            .name
            .filter(|n| !n.trim().is_empty())
            .or_else(|| first_string(&extra, &["title"]))
            .unwrap_or_default();
        let owner = dto.owner.filter(|o| !o.is_null());

        let mut task = Task::new(dto.id, name);
        task.owner_id = owner_id(
            dto.owner_id.as_ref(),
            owner.as_ref().or_else(|| extra.get("assignee")),
        );
        task.status = dto.status.unwrap_or_default();
        task.description = dto.description.unwrap_or_default();
        task
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::parse_records;
    use serde_json::json;

    #[test]
    fn test_task_owner_from_assignee_object() {
        let dto: TaskDto = serde_json::from_value(json!({
            "id": 7,
            "title": "Ship beta",
            "assignee": {"id": "u9", "name": "Grace"},
            "status": "in_progress"
        }))
        .unwrap();
        let task = Task::from(dto);
        assert_eq!(task.id, "7");
        assert_eq!(task.name, "Ship beta");
        assert_eq!(task.owner_id.as_deref(), Some("u9"));
        assert_eq!(task.owner_name, "Unassigned");
    }

    #[test]
    fn test_tasks_with_both_keys_or_null_name_are_kept() {
        let items = vec![
            json!({
                "id": "t1",
                "name": "Draft plan",
                "title": "Plan draft",
                "owner": {"id": "u1"},
                "assignee": {"id": "u2"}
            }),
            json!({"id": "t2", "name": null, "title": "Review", "owner": null, "assignee": "u3"}),
        ];
        let tasks: Vec<Task> = parse_records::<TaskDto>(&items, "task")
            .into_iter()
            .map(Task::from)
            .collect();

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].name, "Draft plan");
        assert_eq!(tasks[0].owner_id.as_deref(), Some("u1"));
        assert_eq!(tasks[1].name, "Review");
        assert_eq!(tasks[1].owner_id.as_deref(), Some("u3"));
    }
}
