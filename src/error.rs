//! Error types for order-insights

use thiserror::Error;

/// Main error type for order-insights
#[derive(Error, Debug)]
pub enum InsightsError {
    #[error("Schema error: required column '{column}' not found")]
    MissingColumn { column: String },

    #[error("Schema error: invalid value {value:?} in column '{column}' at row {row}: {reason}")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
        reason: String,
    },

    #[error("Schema error: column '{column}' has type {dtype}, expected {expected}")]
    ColumnType {
        column: String,
        dtype: String,
        expected: String,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("DataFrame error: {0}")]
    PolarsError(#[from] polars::prelude::PolarsError),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl InsightsError {
    /// Build a missing-column schema error
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }

    /// Build an invalid-value schema error
    pub fn invalid_value(
        column: impl Into<String>,
        row: usize,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            column: column.into(),
            row,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Build a schema error for a column of the wrong type
    pub fn column_type(
        column: impl Into<String>,
        dtype: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::ColumnType {
            column: column.into(),
            dtype: dtype.into(),
            expected: expected.into(),
        }
    }

    /// True for errors caused by the shape or content of the input table
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            Self::MissingColumn { .. } | Self::InvalidValue { .. } | Self::ColumnType { .. }
        )
    }
}

/// Result type alias for order-insights operations
pub type Result<T> = std::result::Result<T, InsightsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_message() {
        let err = InsightsError::missing_column("price");
        assert!(err.is_schema_error());
        assert!(err.to_string().contains("'price'"));
    }

    #[test]
    fn test_invalid_value_message() {
        let err = InsightsError::invalid_value(
            "order_purchase_timestamp",
            3,
            "yesterday",
            "unparseable timestamp",
        );
        let msg = err.to_string();
        assert!(err.is_schema_error());
        assert!(msg.contains("row 3"));
        assert!(msg.contains("\"yesterday\""));
        assert!(msg.contains("unparseable timestamp"));
    }

    #[test]
    fn test_column_type_message() {
        let err = InsightsError::column_type("price", "bool", "a numeric or string column");
        assert!(err.is_schema_error());
        assert!(err.to_string().contains("'price' has type bool"));
    }

    #[test]
    fn test_config_error_is_not_schema() {
        let err = InsightsError::ConfigError("bad limit".to_string());
        assert!(!err.is_schema_error());
    }
}
