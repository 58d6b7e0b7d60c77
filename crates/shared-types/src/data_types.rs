//! Common data types used across the system

use serde::ser::{SerializeSeq, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};

use crate::errors::{ChartsError, ChartsResult};
use crate::TransformMetadata;

/// One row from the query layer: field name to JSON scalar, in column order.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Series name used by the placeholder output.
pub const NO_DATA_SERIES: &str = "No Data";

/// Explicit column mapping supplied by the panel configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_field: Option<String>,
}

impl FieldMapping {
    pub fn new(x_field: impl Into<String>, y_field: impl Into<String>) -> Self {
        Self {
            x_field: Some(x_field.into()),
            y_field: Some(y_field.into()),
            series_field: None,
        }
    }

    pub fn with_series_field(mut self, series_field: impl Into<String>) -> Self {
        self.series_field = Some(series_field.into());
        self
    }
}

/// Time-aligned columnar chart data.
///
/// Column 0 is the shared timeline in epoch milliseconds (strictly
/// ascending, no gaps); every further column holds one series' values at
/// those instants, `None` marking a gap. Serializes to
/// `{"data": [[t..], [v|null..], ..], "series": [..], "metadata": {..}}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ChartDataWire")]
pub struct ChartData {
    timeline: Vec<f64>,
    values: Vec<Vec<Option<f64>>>,
    series: Vec<String>,
    metadata: TransformMetadata,
}

impl ChartData {
    /// Assemble chart data, checking the shape invariants renderers rely on.
    pub fn from_parts(
        timeline: Vec<f64>,
        values: Vec<Vec<Option<f64>>>,
        series: Vec<String>,
        metadata: TransformMetadata,
    ) -> ChartsResult<Self> {
        if values.len() != series.len() {
            return Err(ChartsError::InvalidFormat {
                expected: format!("{} value columns", series.len()),
                actual: format!("{} value columns", values.len()),
            });
        }
        if let Some(column) = values.iter().find(|c| c.len() != timeline.len()) {
            return Err(ChartsError::InvalidFormat {
                expected: format!("columns of length {}", timeline.len()),
                actual: format!("column of length {}", column.len()),
            });
        }
        if timeline.windows(2).any(|w| !(w[0] < w[1])) {
            return Err(ChartsError::InvalidFormat {
                expected: "strictly ascending timeline".to_string(),
                actual: "unsorted or duplicate time values".to_string(),
            });
        }

        Ok(Self {
            timeline,
            values,
            series,
            metadata,
        })
    }

    /// Single-point "No Data" output at `now_ms`, so renderers never see a
    /// zero-length timeline. Metadata reports zero records and no ranges.
    pub fn no_data(now_ms: f64) -> Self {
        Self {
            timeline: vec![now_ms],
            values: vec![vec![Some(0.0)]],
            series: vec![NO_DATA_SERIES.to_string()],
            metadata: TransformMetadata::default(),
        }
    }

    pub fn timeline(&self) -> &[f64] {
        &self.timeline
    }

    pub fn series(&self) -> &[String] {
        &self.series
    }

    pub fn metadata(&self) -> &TransformMetadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut TransformMetadata {
        &mut self.metadata
    }

    /// Value columns in series order.
    pub fn value_columns(&self) -> &[Vec<Option<f64>>] {
        &self.values
    }

    /// Aligned values for the named series.
    pub fn series_column(&self, name: &str) -> Option<&[Option<f64>]> {
        let index = self.series.iter().position(|s| s == name)?;
        Some(&self.values[index])
    }

    /// Total column count, timeline included.
    pub fn column_count(&self) -> usize {
        self.values.len() + 1
    }

    pub fn len(&self) -> usize {
        self.timeline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timeline.is_empty()
    }

    /// True for the "No Data" stand-in produced when nothing was plottable.
    pub fn is_placeholder(&self) -> bool {
        self.metadata.total_records == 0
            && self.series.len() == 1
            && self.series[0] == NO_DATA_SERIES
    }

    /// Columnar view with the timeline as column 0.
    pub fn columns(&self) -> Vec<Vec<Option<f64>>> {
        let mut columns = Vec::with_capacity(self.column_count());
        columns.push(self.timeline.iter().copied().map(Some).collect());
        columns.extend(self.values.iter().cloned());
        columns
    }
}

struct DataColumns<'a>(&'a ChartData);

impl Serialize for DataColumns<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.column_count()))?;
        seq.serialize_element(&self.0.timeline)?;
        for column in &self.0.values {
            seq.serialize_element(column)?;
        }
        seq.end()
    }
}

impl Serialize for ChartData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ChartData", 3)?;
        state.serialize_field("data", &DataColumns(self))?;
        state.serialize_field("series", &self.series)?;
        state.serialize_field("metadata", &self.metadata)?;
        state.end()
    }
}

#[derive(Deserialize)]
struct ChartDataWire {
    data: Vec<Vec<Option<f64>>>,
    series: Vec<String>,
    #[serde(default)]
    metadata: TransformMetadata,
}

impl TryFrom<ChartDataWire> for ChartData {
    type Error = ChartsError;

    fn try_from(wire: ChartDataWire) -> ChartsResult<Self> {
        let mut columns = wire.data.into_iter();
        let timeline = columns
            .next()
            .ok_or_else(|| ChartsError::InvalidFormat {
                expected: "timeline column".to_string(),
                actual: "empty data".to_string(),
            })?
            .into_iter()
            .collect::<Option<Vec<f64>>>()
            .ok_or_else(|| ChartsError::InvalidFormat {
                expected: "timeline without nulls".to_string(),
                actual: "null time value".to_string(),
            })?;

        Self::from_parts(timeline, columns.collect(), wire.series, wire.metadata)
    }
}
