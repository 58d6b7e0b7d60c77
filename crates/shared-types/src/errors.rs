//! Common error types used across all panel charts crates
//! Provides consistent error handling and reporting

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base error type for caller contract violations.
///
/// Messy data never produces one of these: unparseable records are skipped
/// and an unplottable batch becomes the "No Data" placeholder.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum ChartsError {
    // Input-shape errors
    #[error("Invalid data format: {expected} but got {actual}")]
    InvalidFormat { expected: String, actual: String },

    #[error("Data parse error: {message}")]
    DataParse {
        message: String,
        offset: Option<usize>,
    },

    // Configuration errors
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        message: String,
        field: Option<String>,
    },

    // Generic errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Result type alias for panel charts operations
pub type ChartsResult<T> = Result<T, ChartsError>;

/// Error response structure for JavaScript interop
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ChartsError,
    pub timestamp: i64,
    pub context: Option<ErrorContext>,
}

/// Additional context for error reporting
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorContext {
    pub component: String,
    pub operation: String,
    pub metadata: serde_json::Value,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: ChartsError) -> Self {
        Self {
            success: false,
            error,
            timestamp: chrono::Utc::now().timestamp_millis(),
            context: None,
        }
    }

    /// Add context to the error response
    pub fn with_context(mut self, component: &str, operation: &str) -> Self {
        self.context = Some(ErrorContext {
            component: component.to_string(),
            operation: operation.to_string(),
            metadata: serde_json::Value::Null,
        });
        self
    }

    /// Add metadata to the error context
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        if let Some(ref mut ctx) = self.context {
            ctx.metadata = metadata;
        }
        self
    }

    /// Convert to JSON string for JavaScript
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"success":false,"error":{"type":"Internal","details":{"message":"Failed to serialize error"}}}"#.to_string()
        })
    }
}

impl From<serde_json::Error> for ChartsError {
    fn from(err: serde_json::Error) -> Self {
        ChartsError::DataParse {
            message: err.to_string(),
            offset: Some(err.column()),
        }
    }
}
