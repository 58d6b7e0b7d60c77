//! Display configuration carried alongside chart data

use serde::{Deserialize, Serialize};

/// Where a unit goes relative to the formatted number
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UnitPosition {
    Prefix,
    #[default]
    Suffix,
}

/// Unit, precision and label settings for a panel.
///
/// The alignment engine never reads these; they ride along in the output
/// metadata for axis and tooltip formatting.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DisplayConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub unit_position: UnitPosition,
}

impl DisplayConfig {
    pub fn is_empty(&self) -> bool {
        self.unit.is_none() && self.decimals.is_none() && self.label.is_none()
    }

    /// Format a value with the configured precision and unit.
    pub fn format_value(&self, value: f64) -> String {
        let number = match self.decimals {
            Some(decimals) => format!("{:.*}", decimals as usize, value),
            None => value.to_string(),
        };

        match self.unit.as_deref() {
            None | Some("") => number,
            Some(unit) => match self.unit_position {
                UnitPosition::Prefix => format!("{unit}{number}"),
                // Symbols such as % or ° attach directly to the number
                UnitPosition::Suffix if unit.chars().all(|c| !c.is_alphanumeric()) => {
                    format!("{number}{unit}")
                }
                UnitPosition::Suffix => format!("{number} {unit}"),
            },
        }
    }

    /// Label shown for a series: the configured label, else the series name.
    pub fn series_label<'a>(&'a self, series_name: &'a str) -> &'a str {
        self.label.as_deref().unwrap_or(series_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        let plain = DisplayConfig::default();
        assert_eq!(plain.format_value(12.5), "12.5");

        let ms = DisplayConfig {
            unit: Some("ms".to_string()),
            decimals: Some(2),
            ..Default::default()
        };
        assert_eq!(ms.format_value(3.14159), "3.14 ms");

        let percent = DisplayConfig {
            unit: Some("%".to_string()),
            decimals: Some(0),
            ..Default::default()
        };
        assert_eq!(percent.format_value(99.6), "100%");

        let dollars = DisplayConfig {
            unit: Some("$".to_string()),
            decimals: Some(2),
            unit_position: UnitPosition::Prefix,
            ..Default::default()
        };
        assert_eq!(dollars.format_value(1234.5), "$1234.50");
    }

    #[test]
    fn test_series_label() {
        let config = DisplayConfig::default();
        assert_eq!(config.series_label("cpu"), "cpu");
        assert!(config.is_empty());

        let labelled = DisplayConfig {
            label: Some("CPU load".to_string()),
            ..Default::default()
        };
        assert_eq!(labelled.series_label("cpu"), "CPU load");
    }

    #[test]
    fn test_deserialize_camel_case() {
        let config: DisplayConfig =
            serde_json::from_str(r#"{"unit": "$", "unitPosition": "prefix", "decimals": 1}"#)
                .unwrap();
        assert_eq!(config.unit_position, UnitPosition::Prefix);
        assert_eq!(config.decimals, Some(1));
    }
}
