//! Configuration system for panel charts
//! Loads and validates the per-panel transform configuration

use panel_charts_shared::{ChartsError, DisplayConfig, FieldMapping};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod parser;
pub mod validation;

pub use parser::{ConfigFormat, ConfigParser, ConfigSerializer};
pub use validation::ConfigValidator;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },
}

impl ConfigError {
    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        ConfigError::Validation {
            message: message.into(),
            field: Some(field.to_string()),
        }
    }
}

impl From<ConfigError> for ChartsError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { message, field } => {
                ChartsError::InvalidConfig { message, field }
            }
            other => ChartsError::InvalidConfig {
                message: other.to_string(),
                field: None,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Everything a panel tells the transformation engine
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct TransformConfig {
    /// Explicit column mapping; unset x/y fields are detected from the data.
    pub mapping: FieldMapping,
    /// Cosmetic settings passed through to the output metadata.
    pub display: DisplayConfig,
}

impl TransformConfig {
    pub fn with_mapping(mapping: FieldMapping) -> Self {
        Self {
            mapping,
            display: DisplayConfig::default(),
        }
    }

    pub fn with_display(mut self, display: DisplayConfig) -> Self {
        self.display = display;
        self
    }

    /// Validate and return self, for builder-style construction.
    pub fn validated(self) -> Result<Self> {
        ConfigValidator::validate(&self)?;
        Ok(self)
    }
}
