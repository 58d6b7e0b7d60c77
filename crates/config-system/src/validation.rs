//! Configuration validation utilities

use crate::{ConfigError, Result, TransformConfig};
use panel_charts_shared::{DisplayConfig, FieldMapping};

/// Largest precision accepted for formatted values
pub const MAX_DECIMALS: u8 = 20;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration
    pub fn validate(config: &TransformConfig) -> Result<()> {
        Self::validate_mapping(&config.mapping)?;
        Self::validate_display(&config.display)?;
        Ok(())
    }

    /// Validate an explicit field mapping
    pub fn validate_mapping(mapping: &FieldMapping) -> Result<()> {
        let fields = [
            ("xField", &mapping.x_field),
            ("yField", &mapping.y_field),
            ("seriesField", &mapping.series_field),
        ];
        for (name, value) in fields {
            if let Some(value) = value {
                if value.trim().is_empty() {
                    return Err(ConfigError::validation(name, format!("{name} must not be blank")));
                }
            }
        }

        if let (Some(x), Some(series)) = (&mapping.x_field, &mapping.series_field) {
            if x == series {
                return Err(ConfigError::validation(
                    "seriesField",
                    format!("seriesField cannot reuse the time field '{x}'"),
                ));
            }
        }

        if let (Some(x), Some(y)) = (&mapping.x_field, &mapping.y_field) {
            if x == y {
                log::warn!("xField and yField both map to '{x}'; values will mirror time");
            }
        }

        Ok(())
    }

    /// Validate display settings
    pub fn validate_display(display: &DisplayConfig) -> Result<()> {
        if let Some(decimals) = display.decimals {
            if decimals > MAX_DECIMALS {
                return Err(ConfigError::validation(
                    "decimals",
                    format!("Invalid decimals: {decimals}. Must be at most {MAX_DECIMALS}"),
                ));
            }
        }

        if display.unit.as_deref().is_some_and(|u| u.trim().is_empty()) {
            return Err(ConfigError::validation("unit", "unit must not be blank"));
        }

        if display.label.as_deref().is_some_and(|l| l.trim().is_empty()) {
            return Err(ConfigError::validation("label", "label must not be blank"));
        }

        Ok(())
    }
}
