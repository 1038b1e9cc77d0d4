use super::{de_id, de_opt_string};
use okra_core::model::UserRecord;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub email: Option<String>,
}

impl UserDto {
    /// First present of display name, name, first + last name, email.
    pub fn display_name(&self) -> Option<String> {
        let non_empty = |s: &Option<String>| {
            s.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        non_empty(&self.display_name)
            .or_else(|| non_empty(&self.name))
            .or_else(|| {
                let full = [non_empty(&self.first_name), non_empty(&self.last_name)]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" ");
                (!full.is_empty()).then_some(full)
            })
            .or_else(|| non_empty(&self.email))
    }

    /// Converts to a record, or `None` when the user has no usable name.
    pub fn into_record(self) -> Option<UserRecord> {
        let display_name = self.display_name()?;
        Some(UserRecord {
            id: self.id,
            display_name,
        })
    }
}
