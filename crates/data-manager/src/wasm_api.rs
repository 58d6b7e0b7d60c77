//! WASM API for the data manager
//!
//! JSON strings in, JSON strings out: records and configuration arrive as
//! the query layer produced them and the aligned columns go back in the
//! `{data, series, metadata}` shape chart renderers index directly.

use panel_charts_config::TransformConfig;
use panel_charts_shared::{ChartsError, ErrorResponse};
use wasm_bindgen::prelude::*;

use crate::ChartTransformer;

fn to_js_error(error: ChartsError, operation: &str) -> JsValue {
    JsValue::from_str(
        &ErrorResponse::new(error)
            .with_context("wasm_api", operation)
            .to_json(),
    )
}

fn input_error(error: ChartsError, operation: &str, input: &str) -> JsValue {
    JsValue::from_str(
        &ErrorResponse::new(error)
            .with_context("wasm_api", operation)
            .with_metadata(serde_json::json!({ "inputBytes": input.len() }))
            .to_json(),
    )
}

fn serialize_error(error: serde_json::Error) -> JsValue {
    let error = ChartsError::Internal {
        message: format!("Failed to serialize output: {error}"),
    };
    to_js_error(error, "serialize")
}

fn parse_config(config_json: Option<String>) -> Result<TransformConfig, ChartsError> {
    match config_json.as_deref().map(str::trim) {
        None | Some("") => Ok(TransformConfig::default()),
        Some(json) => Ok(serde_json::from_str(json)?),
    }
}

/// Align a JSON array of records. `config_json` is an optional
/// `{mapping, display}` object.
#[wasm_bindgen(js_name = transformRecords)]
pub fn transform_records_json(
    records_json: &str,
    config_json: Option<String>,
) -> Result<String, JsValue> {
    console_error_panic_hook::set_once();

    let config = parse_config(config_json).map_err(|e| to_js_error(e, "parse_config"))?;
    let transformer =
        ChartTransformer::new(config).map_err(|e| to_js_error(e, "transform_records"))?;
    let data = transformer
        .transform_str(records_json)
        .map_err(|e| input_error(e, "transform_records", records_json))?;

    log::debug!("Transformed {} records", data.metadata().total_records);

    serde_json::to_string(&data).map_err(serialize_error)
}

/// Detect the time and value fields of a JSON array of records.
#[wasm_bindgen(js_name = detectFields)]
pub fn detect_fields_json(records_json: &str) -> Result<String, JsValue> {
    let value: serde_json::Value = serde_json::from_str(records_json)
        .map_err(|e| input_error(e.into(), "detect_fields", records_json))?;
    let records = crate::records_from_json(&value)
        .map_err(|e| input_error(e, "detect_fields", records_json))?;

    let detected = crate::detect_from_records(&records);

    serde_json::to_string(&detected).map_err(serialize_error)
}
