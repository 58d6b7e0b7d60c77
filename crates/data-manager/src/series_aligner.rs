//! Series grouping and alignment onto a shared timeline
//!
//! Records are split into named series, every distinct time across all
//! series becomes one timeline, and each series is resampled onto it: exact
//! observations are copied, interior gaps are linearly interpolated and
//! points outside a series' own span stay `None`.

use std::borrow::{Borrow, Cow};
use std::collections::{HashMap, HashSet};

use panel_charts_shared::{ChartData, Record, TimeRange, TransformMetadata, ValueRange};

use crate::clock::{Clock, SystemClock};
use crate::numeric::{display_string, is_truthy, parse_float};
use crate::time_normalizer::normalize_time;

/// One series' observations, in input order
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoints {
    pub name: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl SeriesPoints {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            x: Vec::new(),
            y: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// `(x, y)` pairs sorted by time. The sort is stable, so observations
    /// sharing a timestamp keep their input order.
    pub fn sorted_points(&self) -> Vec<(f64, f64)> {
        let mut points: Vec<(f64, f64)> =
            self.x.iter().copied().zip(self.y.iter().copied()).collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        points
    }
}

/// Output of the grouping pass
#[derive(Debug, Clone, Default)]
pub struct GroupedSeries {
    /// Series in first-seen order.
    pub series: Vec<SeriesPoints>,
    /// Sorted distinct times across all series.
    pub timeline: Vec<f64>,
    /// Records dropped for an unusable time or value.
    pub skipped: usize,
}

/// Series accumulator keyed by name, preserving first-seen order
#[derive(Debug, Default)]
struct SeriesGroups {
    index: HashMap<String, usize>,
    series: Vec<SeriesPoints>,
}

impl SeriesGroups {
    fn push(&mut self, name: &str, x: f64, y: f64) {
        let slot = match self.index.get(name) {
            Some(&slot) => slot,
            None => {
                let slot = self.series.len();
                self.index.insert(name.to_string(), slot);
                self.series.push(SeriesPoints::new(name));
                slot
            }
        };
        let series = &mut self.series[slot];
        series.x.push(x);
        series.y.push(y);
    }
}

/// Distinct timeline points, keyed by bit pattern
#[derive(Debug, Default)]
struct TimelineBuilder {
    seen: HashSet<u64>,
}

impl TimelineBuilder {
    fn insert(&mut self, t: f64) {
        // -0.0 and 0.0 are the same instant
        let t = if t == 0.0 { 0.0 } else { t };
        self.seen.insert(t.to_bits());
    }

    fn build(self) -> Vec<f64> {
        let mut timeline: Vec<f64> = self.seen.into_iter().map(f64::from_bits).collect();
        timeline.sort_by(f64::total_cmp);
        timeline
    }
}

/// Name of the series a record belongs to: the grouping value when it is
/// set and truthy, otherwise the value field's name.
fn series_name<'a>(
    record: &'a Record,
    series_field: Option<&str>,
    y_field: &'a str,
) -> Cow<'a, str> {
    match series_field.and_then(|field| record.get(field)) {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Cow::Borrowed(s.as_str()),
        Some(value) if is_truthy(value) => Cow::Owned(display_string(value)),
        _ => Cow::Borrowed(y_field),
    }
}

/// Split records into series and collect the distinct timeline.
pub fn group_records<R: Borrow<Record>>(
    records: &[R],
    x_field: &str,
    y_field: &str,
    series_field: Option<&str>,
) -> GroupedSeries {
    let mut groups = SeriesGroups::default();
    let mut timeline = TimelineBuilder::default();
    let mut skipped = 0;

    for record in records {
        let record: &Record = record.borrow();

        let Some(x) = record.get(x_field).and_then(|raw| normalize_time(raw, true)) else {
            skipped += 1;
            continue;
        };
        let Some(y) = record.get(y_field).and_then(parse_float) else {
            skipped += 1;
            continue;
        };

        let name = series_name(record, series_field, y_field);
        groups.push(&name, x, y);
        timeline.insert(x);
    }

    GroupedSeries {
        series: groups.series,
        timeline: timeline.build(),
        skipped,
    }
}

/// Resample sorted `(x, y)` points onto an ascending timeline.
///
/// Walks both sequences once: the cursor only moves forward, so the cost is
/// O(timeline + points).
pub fn align_to_timeline(points: &[(f64, f64)], timeline: &[f64]) -> Vec<Option<f64>> {
    let mut aligned = Vec::with_capacity(timeline.len());
    let mut cursor = 0;

    for &t in timeline {
        while cursor < points.len() && points[cursor].0 < t {
            cursor += 1;
        }

        // points[cursor] is the first point at or after t, points[cursor - 1]
        // the last one before it
        let value = match points.get(cursor) {
            Some(&(x, y)) if x == t => Some(y),
            Some(&high) if cursor > 0 => Some(interpolate(points[cursor - 1], high, t)),
            _ => None,
        };
        aligned.push(value);
    }

    aligned
}

fn interpolate((x_lo, y_lo): (f64, f64), (x_hi, y_hi): (f64, f64), t: f64) -> f64 {
    y_lo + (y_hi - y_lo) * (t - x_lo) / (x_hi - x_lo)
}

fn timeline_range(timeline: &[f64]) -> Option<TimeRange> {
    let (first, last) = (timeline.first()?, timeline.last()?);
    TimeRange::from_millis(*first, *last)
}

fn value_range(columns: &[Vec<Option<f64>>]) -> Option<ValueRange> {
    columns
        .iter()
        .flatten()
        .flatten()
        .fold(None, |range: Option<ValueRange>, &value| match range {
            Some(mut range) => {
                range.include(value);
                Some(range)
            }
            None => Some(ValueRange::new(value, value)),
        })
}

/// Aligns grouped records into [`ChartData`]
#[derive(Debug, Clone, Default)]
pub struct SeriesAligner<C = SystemClock> {
    clock: C,
}

impl SeriesAligner<SystemClock> {
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> SeriesAligner<C> {
    /// Use `clock` for the placeholder's timestamp.
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// The "No Data" output, stamped with the clock's current time.
    pub fn placeholder(&self) -> ChartData {
        ChartData::no_data(self.clock.now_millis())
    }

    /// Group, union and align `records` on `x_field`/`y_field`, optionally
    /// splitting series by `series_field`.
    pub fn align<R: Borrow<Record>>(
        &self,
        records: &[R],
        x_field: &str,
        y_field: &str,
        series_field: Option<&str>,
    ) -> ChartData {
        if x_field.is_empty() || y_field.is_empty() {
            log::warn!("[SeriesAligner] No usable time/value field; emitting placeholder");
            return self.placeholder();
        }

        let grouped = group_records(records, x_field, y_field, series_field);
        if grouped.series.is_empty() {
            log::warn!(
                "[SeriesAligner] None of {} records had a usable '{}'/'{}' pair",
                records.len(),
                x_field,
                y_field
            );
            return self.placeholder();
        }

        let timeline = grouped.timeline;
        let mut names = Vec::with_capacity(grouped.series.len());
        let mut columns = Vec::with_capacity(grouped.series.len());
        for series in grouped.series {
            columns.push(align_to_timeline(&series.sorted_points(), &timeline));
            names.push(series.name);
        }

        log::debug!(
            "[SeriesAligner] {} records -> {} series over {} points ({} skipped)",
            records.len(),
            names.len(),
            timeline.len(),
            grouped.skipped
        );

        let metadata = TransformMetadata {
            total_records: records.len(),
            time_range: timeline_range(&timeline),
            value_range: value_range(&columns),
            display: None,
        };

        ChartData::from_parts(timeline, columns, names, metadata).unwrap_or_else(|err| {
            log::error!("[SeriesAligner] Aligned output rejected: {err}");
            self.placeholder()
        })
    }
}
