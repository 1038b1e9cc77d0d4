//! Progress-history normalization.

use crate::model::ProgressSample;
use crate::payload::{HISTORY_SHAPES, first_f64, first_timestamp, match_shapes};
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::BTreeMap;

const DATE_KEYS: &[&str] = &["date", "createdAt", "checkInDate", "timestamp"];
const PERCENT_KEYS: &[&str] = &["progressValue", "value", "progress"];
const FRACTION_KEYS: &[&str] = &["attainment"];

/// Converts any accepted history payload into ascending samples.
///
/// Returns `None` when the payload matches none of the known shapes, so the
/// caller can tell "unrecognized" from "no samples". Entries missing a date or
/// a value are dropped.
pub fn normalize_history(payload: &Value) -> Option<Vec<ProgressSample>> {
    let entries = match_shapes(payload, HISTORY_SHAPES)?;
    let mut samples: Vec<ProgressSample> = entries.iter().filter_map(sample_from_entry).collect();
    samples.sort_by_key(|s| s.date);
    Some(samples)
}

fn sample_from_entry(entry: &Value) -> Option<ProgressSample> {
    let date = first_timestamp(entry, DATE_KEYS)?;
    let value = first_f64(entry, PERCENT_KEYS)
        .or_else(|| first_f64(entry, FRACTION_KEYS).map(|fraction| fraction * 100.0))?;
    value
        .is_finite()
        .then(|| ProgressSample::new(date, value))
}

/// Combines several series into one, averaging values that share a day.
///
/// Used to give an objective a trend line from its key results.
pub fn mean_by_day<'a, I>(series: I) -> Vec<ProgressSample>
where
    I: IntoIterator<Item = &'a [ProgressSample]>,
{
    let mut buckets: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for samples in series {
        for sample in samples {
            let bucket = buckets.entry(sample.date.date_naive()).or_insert((0.0, 0));
            bucket.0 += sample.progress_value;
            bucket.1 += 1;
        }
    }

    buckets
        .into_iter()
        .filter_map(|(day, (sum, count))| {
            let date = day.and_hms_opt(0, 0, 0)?.and_utc();
            Some(ProgressSample::new(date, sum / count as f64))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_bare_array_payload() {
        let payload = json!([
            {"date": "2024-10-03", "progressValue": 30},
            {"date": "2024-10-01", "progressValue": 10},
        ]);
        let samples = normalize_history(&payload).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].progress_value, 10.0);
        assert_eq!(samples[1].progress_value, 30.0);
    }

    #[test]
    fn test_wrapped_payload_with_alternate_keys() {
        let payload = json!({"history": [
            {"createdAt": "2024-10-01T09:00:00Z", "value": "12.5"},
            {"checkInDate": "2024-10-02", "attainment": 0.4},
        ]});
        let samples = normalize_history(&payload).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].progress_value, 12.5);
        assert!((samples[1].progress_value - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_nested_data_history_payload() {
        let payload = json!({"data": {"history": [{"timestamp": "2024-10-01", "progress": 5}]}});
        assert_eq!(normalize_history(&payload).unwrap().len(), 1);
    }

    #[test]
    fn test_incomplete_entries_are_dropped() {
        let payload = json!([
            {"date": "2024-10-01"},
            {"progressValue": 10},
            {"date": "not a date", "progressValue": 10},
            {"date": "2024-10-02", "progressValue": 20},
        ]);
        let samples = normalize_history(&payload).unwrap();
        assert_eq!(samples.len(), 1);
    }

    #[test]
    fn test_unrecognized_shape() {
        assert!(normalize_history(&json!({"checkins": []})).is_none());
    }

    #[test]
    fn test_mean_by_day() {
        let day1 = Utc.with_ymd_and_hms(2024, 10, 1, 8, 0, 0).unwrap();
        let day1_late = Utc.with_ymd_and_hms(2024, 10, 1, 20, 0, 0).unwrap();
        let day2 = Utc.with_ymd_and_hms(2024, 10, 2, 8, 0, 0).unwrap();
        let a = vec![ProgressSample::new(day1, 10.0), ProgressSample::new(day2, 50.0)];
        let b = vec![ProgressSample::new(day1_late, 30.0)];

        let merged = mean_by_day([a.as_slice(), b.as_slice()]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].progress_value, 20.0);
        assert_eq!(merged[1].progress_value, 50.0);
    }
}
