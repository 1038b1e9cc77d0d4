//! Structural matchers for differently-shaped remote payloads.
//!
//! Collections may arrive as a bare array or wrapped under one of several
//! keys. Each accepted layout is a [`Shape`]; a list of shapes is tried in
//! order and the first structural match wins.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// One accepted payload layout: the key path leading to the array.
///
/// An empty path matches a bare top-level array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape(pub &'static [&'static str]);

impl Shape {
    pub const BARE: Shape = Shape(&[]);

    /// Returns the array at this shape's path, if the payload has that structure.
    pub fn extract<'a>(&self, payload: &'a Value) -> Option<&'a Vec<Value>> {
        let mut current = payload;
        for key in self.0 {
            current = current.as_object()?.get(*key)?;
        }
        current.as_array()
    }
}

/// Collection layouts for list endpoints, in priority order.
pub const COLLECTION_SHAPES: &[Shape] = &[
    Shape::BARE,
    Shape(&["items"]),
    Shape(&["data"]),
    Shape(&["results"]),
    Shape(&["values"]),
];

/// Progress-history layouts, in priority order.
pub const HISTORY_SHAPES: &[Shape] = &[
    Shape::BARE,
    Shape(&["history"]),
    Shape(&["items"]),
    Shape(&["values"]),
    Shape(&["data"]),
    Shape(&["data", "history"]),
];

/// Tries `shapes` in order and returns the first matching array.
pub fn match_shapes<'a>(payload: &'a Value, shapes: &[Shape]) -> Option<&'a Vec<Value>> {
    shapes.iter().find_map(|shape| shape.extract(payload))
}

/// Unwraps a list-endpoint payload.
pub fn unwrap_collection(payload: &Value) -> Option<&Vec<Value>> {
    match_shapes(payload, COLLECTION_SHAPES)
}

/// Returns the first of `keys` present on `record` as a non-empty string.
///
/// Numbers are accepted and rendered, since IDs sometimes arrive numeric.
pub fn first_string(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match record.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Returns the first of `keys` present on `record` as a number.
///
/// Numeric strings are accepted.
pub fn first_f64(record: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| match record.get(*key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Parses an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    let date = NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

/// Parses the date part of a date or timestamp string.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    parse_timestamp(raw).map(|ts| ts.date_naive())
}

/// Returns the first of `keys` present on `record` as a timestamp.
pub fn first_timestamp(record: &Value, keys: &[&str]) -> Option<DateTime<Utc>> {
    keys.iter()
        .find_map(|key| record.get(*key)?.as_str().and_then(parse_timestamp))
}
