//! Progress history retrieval and sparkline reduction.

use crate::batch::FetchStrategy;
use crate::batch::adapters::collect_by_id;
use chrono::{Duration, NaiveDate, Utc};
use okra_core::api::with_query;
use okra_core::history::normalize_history;
use okra_core::model::ProgressSample;
use okra_core::{OkraError, Result, sparkline};
use std::collections::HashMap;

/// Fetches a bounded window of progress samples per key result.
pub struct ProgressHistoryService {
    window_days: u32,
    end_date: Option<NaiveDate>,
}

impl ProgressHistoryService {
    pub fn new(window_days: u32) -> Self {
        Self {
            window_days,
            end_date: None,
        }
    }

    /// Pins the last day of the window instead of using today.
    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// History endpoint for one key result.
    pub fn history_path(&self, key_result_id: &str) -> String {
        let to = self.end_date.unwrap_or_else(|| Utc::now().date_naive());
        let from = to - Duration::days(i64::from(self.window_days));
        let from = from.format("%Y-%m-%d").to_string();
        let to = to.format("%Y-%m-%d").to_string();
        with_query(
            &format!("/metrics/{}/history", key_result_id),
            &[("from", from.as_str()), ("to", to.as_str())],
        )
    }

    /// Samples per key-result ID, ascending by date.
    ///
    /// A 404 means the key result has no history and yields an empty list.
    /// IDs whose history could not be read are absent from the map.
    pub async fn fetch(
        &self,
        strategy: &FetchStrategy,
        key_result_ids: &[String],
    ) -> Result<HashMap<String, Vec<ProgressSample>>> {
        collect_by_id(
            strategy,
            "progress history",
            key_result_ids,
            |id| self.history_path(id),
            |response| {
                if response.status == 404 {
                    return Ok(Vec::new());
                }
                let payload = response.json()?;
                normalize_history(&payload).ok_or_else(|| {
                    OkraError::malformed(&response.path, "unrecognized history shape")
                })
            },
        )
        .await
    }

    /// Reduces samples to a fixed-width sparkline.
    pub fn sparkline(samples: &[ProgressSample], width: usize) -> String {
        sparkline::render(samples, width)
    }
}
