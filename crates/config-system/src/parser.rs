//! Configuration file parser for multiple formats

use crate::{ConfigError, ConfigValidator, Result, TransformConfig};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Configuration parser
pub struct ConfigParser;

impl ConfigParser {
    /// Parse and validate configuration from a file
    pub fn parse_file(path: impl AsRef<Path>) -> Result<TransformConfig> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)?;
        let format = Self::detect_format(path)?;

        let config = Self::parse_string(&content, format)?;
        log::info!("Loaded transform config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration from a string
    pub fn parse_string(content: &str, format: ConfigFormat) -> Result<TransformConfig> {
        let config: TransformConfig = Self::parse_partial(content, format)?;
        ConfigValidator::validate(&config)?;
        Ok(config)
    }

    /// Detect configuration format from file extension
    pub fn detect_format(path: &Path) -> Result<ConfigFormat> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ConfigError::UnsupportedFormat(format!(
                "cannot determine format of {}",
                path.display()
            ))
        })?;

        match ext.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            "json" => Ok(ConfigFormat::Json),
            "toml" => Ok(ConfigFormat::Toml),
            _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
        }
    }

    /// Parse any deserializable fragment, e.g. a bare `FieldMapping`
    pub fn parse_partial<T: DeserializeOwned>(content: &str, format: ConfigFormat) -> Result<T> {
        match format {
            ConfigFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| ConfigError::Parse(format!("YAML parse error: {e}"))),
            ConfigFormat::Json => serde_json::from_str(content)
                .map_err(|e| ConfigError::Parse(format!("JSON parse error: {e}"))),
            ConfigFormat::Toml => toml::from_str(content)
                .map_err(|e| ConfigError::Parse(format!("TOML parse error: {e}"))),
        }
    }
}

/// Configuration serializer
pub struct ConfigSerializer;

impl ConfigSerializer {
    /// Serialize configuration to a file
    pub fn serialize_file(config: &TransformConfig, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = ConfigParser::detect_format(path)?;
        let content = Self::serialize_string(config, format)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Serialize configuration to a string
    pub fn serialize_string(config: &TransformConfig, format: ConfigFormat) -> Result<String> {
        match format {
            ConfigFormat::Yaml => serde_yaml::to_string(config)
                .map_err(|e| ConfigError::Parse(format!("YAML serialize error: {e}"))),
            ConfigFormat::Json => serde_json::to_string_pretty(config)
                .map_err(|e| ConfigError::Parse(format!("JSON serialize error: {e}"))),
            ConfigFormat::Toml => toml::to_string_pretty(config)
                .map_err(|e| ConfigError::Parse(format!("TOML serialize error: {e}"))),
        }
    }
}
