//! Canonicalization of raw time values to epoch milliseconds
//!
//! Query backends hand back timestamps as epoch numbers in whatever unit the
//! column was stored in, or as date strings. Numbers are classified by
//! magnitude; strings go through a fixed list of date formats.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Number, Value};

use crate::numeric::parse_number;

/// Unit a numeric epoch timestamp is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
}

/// Lower (exclusive) magnitude bounds, checked in order. Anything at or
/// below the last bound falls back to seconds.
const UNIT_THRESHOLDS: [(f64, TimeUnit); 4] = [
    (1e18, TimeUnit::Nanoseconds),
    (1e15, TimeUnit::Microseconds),
    (1e12, TimeUnit::Milliseconds),
    (1e9, TimeUnit::Seconds),
];

impl TimeUnit {
    /// Classify an epoch value by magnitude.
    pub fn infer(value: f64) -> TimeUnit {
        UNIT_THRESHOLDS
            .iter()
            .find(|(bound, _)| value > *bound)
            .map(|(_, unit)| *unit)
            .unwrap_or(TimeUnit::Seconds)
    }

    /// True when `value` is large enough to be a seconds-or-finer epoch
    /// rather than the small-value fallback.
    pub fn is_epoch_magnitude(value: f64) -> bool {
        value > UNIT_THRESHOLDS[3].0
    }

    pub fn to_millis(self, value: f64) -> f64 {
        match self {
            TimeUnit::Nanoseconds => (value / 1e6).floor(),
            TimeUnit::Microseconds => (value / 1e3).floor(),
            TimeUnit::Milliseconds => value,
            TimeUnit::Seconds => value * 1000.0,
        }
    }

    /// Exact integer conversion; keeps full precision for nanosecond
    /// counts beyond 2^53. `None` on overflow.
    pub fn to_millis_int(self, value: i128) -> Option<i128> {
        match self {
            TimeUnit::Nanoseconds => Some(value.div_euclid(1_000_000)),
            TimeUnit::Microseconds => Some(value.div_euclid(1_000)),
            TimeUnit::Milliseconds => Some(value),
            TimeUnit::Seconds => value.checked_mul(1_000),
        }
    }
}

/// Naive date-time layouts, read as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
];

/// Date-time layouts carrying an explicit offset that RFC 3339 rejects.
const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Convert a raw time value to epoch milliseconds.
///
/// For the declared time field numbers are unit-inferred and strings are
/// parsed as dates, falling back to numeric rules for plain number strings.
/// For any other field numbers pass through and numeric strings are parsed.
/// Returns `None` when nothing usable can be extracted.
pub fn normalize_time(raw: &Value, is_declared_time_field: bool) -> Option<f64> {
    let millis = match (raw, is_declared_time_field) {
        (Value::Number(n), true) => normalize_number(n),
        (Value::String(s), true) => {
            parse_date_string(s).or_else(|| normalize_numeric_string(s))
        }
        (Value::Number(n), false) => n.as_f64(),
        (Value::String(s), false) => parse_number(s),
        _ => None,
    }?;

    millis.is_finite().then_some(millis)
}

/// Unit-infer a JSON number, using integer arithmetic when it is integral.
pub fn normalize_number(n: &Number) -> Option<f64> {
    let integer = n
        .as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from));

    match integer {
        Some(value) => normalize_integer(value),
        None => n.as_f64().map(normalize_float),
    }
}

pub fn normalize_integer(value: i128) -> Option<f64> {
    TimeUnit::infer(value as f64)
        .to_millis_int(value)
        .map(|millis| millis as f64)
}

pub fn normalize_float(value: f64) -> f64 {
    TimeUnit::infer(value).to_millis(value)
}

fn normalize_numeric_string(text: &str) -> Option<f64> {
    let text = text.trim();
    match text.parse::<i128>() {
        Ok(value) => normalize_integer(value),
        Err(_) => parse_number(text).map(normalize_float),
    }
}

/// Parse a date string to epoch milliseconds.
pub fn parse_date_string(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_millis() as f64);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.timestamp_millis() as f64);
    }
    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Some(dt.timestamp_millis() as f64);
        }
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc().timestamp_millis() as f64);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            let midnight = date.and_hms_opt(0, 0, 0)?;
            return Some(midnight.and_utc().timestamp_millis() as f64);
        }
    }

    None
}
