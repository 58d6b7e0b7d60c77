//! Shared types for the panel charts transformation pipeline
//!
//! This crate contains the types exchanged between the data-manager engine,
//! the config-system crate and chart renderers: the record shape coming out
//! of query execution, the field mapping, the aligned columnar output and its
//! metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod chart_config;
pub mod data_types;
pub mod errors;

pub use chart_config::{DisplayConfig, UnitPosition};
pub use data_types::{ChartData, FieldMapping, Record, NO_DATA_SERIES};
pub use errors::{ChartsError, ChartsResult, ErrorContext, ErrorResponse};

/// Time range covered by an aligned timeline
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TimeRange {
    pub min: DateTime<Utc>,
    pub max: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(min: DateTime<Utc>, max: DateTime<Utc>) -> Self {
        Self { min, max }
    }

    /// Build a range from epoch milliseconds. Sub-millisecond precision is
    /// floored; values outside chrono's representable range yield `None`.
    pub fn from_millis(min: f64, max: f64) -> Option<Self> {
        let min = DateTime::from_timestamp_millis(min.floor() as i64)?;
        let max = DateTime::from_timestamp_millis(max.floor() as i64)?;
        Some(Self { min, max })
    }

    pub fn duration_ms(&self) -> i64 {
        (self.max - self.min).num_milliseconds()
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.min && instant <= self.max
    }
}

/// Min/max over every non-null aligned value
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Widen the range to include `value`.
    pub fn include(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }
}

/// Summary metadata computed alongside the aligned columns
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TransformMetadata {
    /// Number of input records, before any filtering.
    pub total_records: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range: Option<TimeRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_range: Option<ValueRange>,
    /// Cosmetic configuration handed through to renderers untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<DisplayConfig>,
}
