use super::{de_id, de_opt_string};
use okra_core::model::Session;
use okra_core::payload::{first_string, parse_date};
use serde::Deserialize;
use serde_json::{Map, Value};

/// A planning session (quarter, half-year, ...) as listed by `/sessions`.
///
/// `title`, `start` and `end` are accepted as alternates and may appear
/// alongside the primary keys.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDto {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<SessionDto> for Session {
    fn from(dto: SessionDto) -> Self {
        let extra = Value::Object(dto.extra);
        let pick = |primary: Option<String>, alternate: &str| {
            primary
                .filter(|v| !v.trim().is_empty())
                .or_else(|| first_string(&extra, &[alternate]))
        };
        let name = pick(dto.name, "title").unwrap_or_default();
        let start_date = pick(dto.start_date, "start");
        let end_date = pick(dto.end_date, "end");

        Session {
            id: dto.id,
            name,
            start_date: start_date.as_deref().and_then(parse_date),
            end_date: end_date.as_deref().and_then(parse_date),
            status: dto.status.unwrap_or_default(),
        }
    }
}
