//! Status normalization.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Normalized status bucket used for aggregate counts.
///
/// Anything the service reports that does not map to a known bucket lands in
/// `Unknown` instead of being dropped.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StatusCategory {
    OnTrack,
    AtRisk,
    OffTrack,
    Completed,
    NotStarted,
    Unknown,
}

impl StatusCategory {
    /// Maps a raw status label onto a bucket.
    ///
    /// Case, surrounding whitespace, and `-`/space/`_` separators are ignored.
    pub fn normalize(raw: &str) -> Self {
        let key: String = raw
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect();

        match key.as_str() {
            "ontrack" | "ok" | "green" | "healthy" => Self::OnTrack,
            "atrisk" | "risk" | "yellow" | "amber" | "warning" => Self::AtRisk,
            "offtrack" | "behind" | "red" | "critical" | "blocked" => Self::OffTrack,
            "completed" | "complete" | "done" | "achieved" | "closed" => Self::Completed,
            "notstarted" | "draft" | "pending" | "todo" | "new" => Self::NotStarted,
            _ => Self::Unknown,
        }
    }
}
