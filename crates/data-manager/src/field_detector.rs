//! Heuristic detection of the time and value columns
//!
//! Used when a panel has no explicit field mapping. The time column is found
//! by name alone; the value column needs a numeric sample value.

use std::borrow::Borrow;

use panel_charts_shared::Record;
use serde::Serialize;

use crate::numeric::is_numeric;

/// Exact (case-insensitive) time column names, highest priority first.
pub const TIME_FIELD_PRIORITY: &[&str] = &[
    "__timestamp",
    "timestamp",
    "time",
    "date",
    "created_at",
    "updated_at",
    "event_time",
];

/// Substrings that mark a time column when no exact name matches.
pub const TIME_FIELD_FRAGMENTS: &[&str] = &["time", "date"];

/// Substrings that make a numeric column a poor default value column.
pub const VALUE_FIELD_EXCLUSIONS: &[&str] = &["id", "count"];

/// Result of field detection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedFields {
    pub x_field: Option<String>,
    pub y_field: Option<String>,
}

impl DetectedFields {
    pub fn is_complete(&self) -> bool {
        self.x_field.is_some() && self.y_field.is_some()
    }
}

/// Detect time and value fields from column names and one sample record.
pub fn detect_fields<S: AsRef<str>>(fields: &[S], sample: &Record) -> DetectedFields {
    DetectedFields {
        x_field: detect_time_field(fields).map(str::to_string),
        y_field: detect_value_field(fields, sample).map(str::to_string),
    }
}

/// Detect fields using the first record's keys and values.
pub fn detect_from_records<R: Borrow<Record>>(records: &[R]) -> DetectedFields {
    match records.first() {
        Some(sample) => {
            let sample: &Record = sample.borrow();
            let fields: Vec<&str> = sample.keys().map(String::as_str).collect();
            detect_fields(&fields, sample)
        }
        None => DetectedFields::default(),
    }
}

pub fn detect_time_field<S: AsRef<str>>(fields: &[S]) -> Option<&str> {
    let lowered: Vec<String> = fields.iter().map(|f| f.as_ref().to_lowercase()).collect();

    let exact = TIME_FIELD_PRIORITY
        .iter()
        .find_map(|pattern| lowered.iter().position(|name| name == pattern));

    let index = exact.or_else(|| {
        lowered.iter().position(|name| {
            TIME_FIELD_FRAGMENTS
                .iter()
                .any(|fragment| name.contains(fragment))
        })
    })?;

    Some(fields[index].as_ref())
}

pub fn detect_value_field<'a, S: AsRef<str>>(fields: &'a [S], sample: &Record) -> Option<&'a str> {
    let numeric: Vec<&str> = fields
        .iter()
        .map(|field| field.as_ref())
        .filter(|name| sample.get(*name).is_some_and(is_numeric))
        .collect();

    numeric
        .iter()
        .find(|name| {
            let lowered = name.to_lowercase();
            !VALUE_FIELD_EXCLUSIONS
                .iter()
                .any(|excluded| lowered.contains(excluded))
        })
        .or_else(|| numeric.first())
        .copied()
}
