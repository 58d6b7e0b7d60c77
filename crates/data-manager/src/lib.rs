//! Data Manager crate for panel charts
//! Turns row-oriented query results into time-aligned columnar chart data
//!
//! The pipeline runs in three stages: field detection (when the panel has no
//! explicit mapping), time normalization of every x value, and series
//! alignment onto one shared timeline. Every call is a pure function of the
//! records and the configuration.

pub mod clock;
pub mod field_detector;
pub mod numeric;
pub mod reduce;
pub mod series_aligner;
pub mod time_normalizer;

#[cfg(feature = "wasm")]
pub mod wasm_api;

use std::borrow::Borrow;

use panel_charts_config::{ConfigValidator, TransformConfig};
use panel_charts_shared::{ChartData, ChartsError, ChartsResult, FieldMapping, Record};
use serde_json::Value;

pub use clock::{Clock, FixedClock, SystemClock};
pub use field_detector::{detect_fields, detect_from_records, DetectedFields};
pub use reduce::{Reduction, SeriesReduce};
pub use series_aligner::{align_to_timeline, group_records, SeriesAligner};
pub use time_normalizer::{normalize_time, TimeUnit};

/// Fields the aligner will run on, after mapping and detection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFields {
    pub x_field: String,
    pub y_field: String,
    pub series_field: Option<String>,
}

/// Main entry point: configuration plus the alignment engine
#[derive(Debug, Clone)]
pub struct ChartTransformer<C = SystemClock> {
    config: TransformConfig,
    aligner: SeriesAligner<C>,
}

impl ChartTransformer<SystemClock> {
    /// Create a transformer, rejecting invalid configuration.
    pub fn new(config: TransformConfig) -> ChartsResult<Self> {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for ChartTransformer<SystemClock> {
    fn default() -> Self {
        Self {
            config: TransformConfig::default(),
            aligner: SeriesAligner::new(),
        }
    }
}

impl<C: Clock> ChartTransformer<C> {
    /// Create a transformer whose placeholder output is stamped by `clock`.
    pub fn with_clock(config: TransformConfig, clock: C) -> ChartsResult<Self> {
        ConfigValidator::validate(&config)?;
        Ok(Self {
            config,
            aligner: SeriesAligner::with_clock(clock),
        })
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Apply the explicit mapping, detecting whichever of x/y it leaves out
    /// from the first record. `None` when either cannot be determined.
    pub fn resolve_fields<R: Borrow<Record>>(&self, records: &[R]) -> Option<ResolvedFields> {
        let mapping = &self.config.mapping;

        let detected = match (&mapping.x_field, &mapping.y_field) {
            (Some(_), Some(_)) => DetectedFields::default(),
            _ if records.is_empty() => return None,
            _ => {
                let detected = detect_from_records(records);
                log::debug!(
                    "[ChartTransformer] Detected x: {:?}, y: {:?}",
                    detected.x_field,
                    detected.y_field
                );
                detected
            }
        };

        Some(ResolvedFields {
            x_field: mapping.x_field.clone().or(detected.x_field)?,
            y_field: mapping.y_field.clone().or(detected.y_field)?,
            series_field: mapping.series_field.clone(),
        })
    }

    /// Transform already-decoded records.
    pub fn transform<R: Borrow<Record>>(&self, records: &[R]) -> ChartData {
        let mut data = match self.resolve_fields(records) {
            Some(fields) => self.aligner.align(
                records,
                &fields.x_field,
                &fields.y_field,
                fields.series_field.as_deref(),
            ),
            None => {
                log::warn!(
                    "[ChartTransformer] No time/value fields found in {} records",
                    records.len()
                );
                self.aligner.placeholder()
            }
        };

        if !self.config.display.is_empty() {
            data.metadata_mut().display = Some(self.config.display.clone());
        }
        data
    }

    /// Transform a JSON value that must be an array of objects.
    pub fn transform_json(&self, value: &Value) -> ChartsResult<ChartData> {
        let records = records_from_json(value)?;
        Ok(self.transform(&records))
    }

    /// Transform a JSON document that must be an array of objects.
    pub fn transform_str(&self, json: &str) -> ChartsResult<ChartData> {
        let value: Value = serde_json::from_str(json)?;
        self.transform_json(&value)
    }
}

/// Borrow the records out of a JSON array, failing on anything else.
pub fn records_from_json(value: &Value) -> ChartsResult<Vec<&Record>> {
    let items = value.as_array().ok_or_else(|| ChartsError::InvalidFormat {
        expected: "array of records".to_string(),
        actual: numeric::json_type_name(value).to_string(),
    })?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_object().ok_or_else(|| ChartsError::InvalidFormat {
                expected: "object record".to_string(),
                actual: format!("{} at index {index}", numeric::json_type_name(item)),
            })
        })
        .collect()
}

fn config_for(mapping: Option<&FieldMapping>) -> TransformConfig {
    mapping
        .cloned()
        .map(TransformConfig::with_mapping)
        .unwrap_or_default()
}

/// Transform records with an optional explicit mapping.
pub fn transform_records(
    records: &[Record],
    mapping: Option<&FieldMapping>,
) -> ChartsResult<ChartData> {
    Ok(ChartTransformer::new(config_for(mapping))?.transform(records))
}

/// Transform a JSON array of records with an optional explicit mapping.
pub fn transform_json(value: &Value, mapping: Option<&FieldMapping>) -> ChartsResult<ChartData> {
    ChartTransformer::new(config_for(mapping))?.transform_json(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use panel_charts_shared::DisplayConfig;
    use serde_json::json;

    fn fixed(config: TransformConfig) -> ChartTransformer<FixedClock> {
        ChartTransformer::with_clock(config, FixedClock::new(0.0)).unwrap()
    }

    #[test]
    fn test_resolve_fields_fills_gaps_in_mapping() {
        let records = records_from_json(&json!([{"ts": 1, "time": 2, "load": 0.5}]))
            .unwrap()
            .into_iter()
            .cloned()
            .collect::<Vec<_>>();

        let transformer = fixed(TransformConfig::with_mapping(FieldMapping {
            x_field: Some("ts".to_string()),
            ..Default::default()
        }));
        let fields = transformer.resolve_fields(&records).unwrap();
        assert_eq!(fields.x_field, "ts");
        // "ts" comes first and is numeric
        assert_eq!(fields.y_field, "ts");

        let transformer = fixed(TransformConfig::default());
        let fields = transformer.resolve_fields(&records).unwrap();
        assert_eq!(fields.x_field, "time");
        assert!(fields.series_field.is_none());
    }

    #[test]
    fn test_resolve_fields_without_records() {
        let transformer = fixed(TransformConfig::default());
        assert!(transformer.resolve_fields::<Record>(&[]).is_none());

        let transformer = fixed(TransformConfig::with_mapping(FieldMapping::new("t", "v")));
        assert!(transformer.resolve_fields::<Record>(&[]).is_some());
    }

    #[test]
    fn test_undetectable_fields_yield_placeholder() {
        let data = fixed(TransformConfig::default())
            .transform_json(&json!([{"name": "a", "label": "b"}]))
            .unwrap();
        assert!(data.is_placeholder());
        assert_eq!(data.timeline(), &[0.0]);
    }

    #[test]
    fn test_display_config_passes_through() {
        let display = DisplayConfig {
            unit: Some("ms".to_string()),
            ..Default::default()
        };
        let config = TransformConfig::with_mapping(FieldMapping::new("t", "v"))
            .with_display(display.clone());
        let data = fixed(config)
            .transform_json(&json!([{"t": 1, "v": 2}]))
            .unwrap();
        assert_eq!(data.metadata().display, Some(display));
    }

    #[test]
    fn test_contract_violations_are_errors() {
        let transformer = fixed(TransformConfig::default());

        let err = transformer.transform_json(&json!({"t": 1})).unwrap_err();
        assert_eq!(
            err,
            ChartsError::InvalidFormat {
                expected: "array of records".to_string(),
                actual: "object".to_string(),
            }
        );

        let err = transformer.transform_json(&json!([{"t": 1}, 5])).unwrap_err();
        assert!(err.to_string().contains("number at index 1"));

        assert!(matches!(
            transformer.transform_str("[{"),
            Err(ChartsError::DataParse { .. })
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = TransformConfig::with_mapping(FieldMapping::new("t", " "));
        assert!(matches!(
            ChartTransformer::new(config),
            Err(ChartsError::InvalidConfig { .. })
        ));
        assert!(transform_records(&[], Some(&FieldMapping::new("", "v"))).is_err());
    }
}
