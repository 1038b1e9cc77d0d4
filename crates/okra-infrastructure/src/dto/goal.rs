use super::{de_id, de_opt_f64, de_opt_id, de_opt_string, extra_id, owner_id, progress_percent};
use okra_core::model::Objective;
use serde::Deserialize;
use serde_json::{Map, Value};

/// A remote "goal" record, the wire form of an objective.
///
/// The list endpoint returns a summary; the detail endpoint returns the same
/// shape with more fields populated.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalDto {
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
    #[serde(default, deserialize_with = "de_opt_id")]
    pub session_id: Option<String>,
    /// Everything else, including whichever parent reference the dataset uses.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GoalDto {
    fn display_name(&self) -> String {
        self.name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .or_else(|| {
                self.extra
                    .get("title")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_default()
    }

    fn progress_value(&self) -> Option<f64> {
        (self.progress.is_some() || self.attainment.is_some())
            .then(|| progress_percent(self.progress, self.attainment))
    }

    /// Builds an objective, keeping any populated candidate parent fields.
    pub fn into_objective(self, session_id: &str, parent_fields: &[String]) -> Objective {
        let session = self.session_id.clone().unwrap_or_else(|| session_id.to_string());
        let mut objective = Objective::new(self.id.clone(), self.display_name(), session);
        self.apply_to(&mut objective, parent_fields);
        objective
    }

    /// Merges the populated fields of this record into `objective`.
    ///
    /// Used for detail responses: absent fields leave the existing values alone.
    pub fn apply_to(self, objective: &mut Objective, parent_fields: &[String]) {
        let name = self.display_name();
        if !name.is_empty() {
            objective.name = name;
        }
        if let Some(progress) = self.progress_value() {
            objective.progress = progress;
        }
        if let Some(owner) = owner_id(self.owner_id.as_ref(), self.owner.as_ref()) {
            objective.owner_id = Some(owner);
        }
        if let Some(description) = self.description.filter(|d| !d.trim().is_empty()) {
            objective.description = description;
        }
        if let Some(status) = self.status.filter(|s| !s.trim().is_empty()) {
            objective.status = status;
        }
        for field in parent_fields {
            if let Some(parent) = extra_id(&self.extra, field) {
                objective.parent_fields.insert(field.clone(), parent);
            }
        }
    }
}
