//! Progress history samples.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One point of a progress series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSample {
    pub date: DateTime<Utc>,
    pub progress_value: f64,
}

impl ProgressSample {
    pub fn new(date: DateTime<Utc>, progress_value: f64) -> Self {
        Self {
            date,
            progress_value,
        }
    }
}
