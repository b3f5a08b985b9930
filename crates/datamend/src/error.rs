//! Error types for dataset diagnosis and cleaning.
//!
//! Errors are built with `thiserror` and serialize as a `{code, message}`
//! pair so a caller on the other side of a service boundary can branch on the
//! stage that failed without parsing display strings.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the diagnosis and cleaning engine.
#[derive(Error, Debug)]
pub enum DatamendError {
    /// Diagnosis or cleaning was invoked on a dataset with zero records.
    #[error("Dataset is empty")]
    EmptyDataset,

    /// A fill strategy cannot be applied to a column of this classification.
    #[error("Strategy '{strategy}' cannot be applied to column '{column}': {reason}")]
    UnsupportedStrategy {
        strategy: String,
        column: String,
        reason: String,
    },

    /// Outlier analysis found no column worth analyzing.
    #[error("No columns are eligible for outlier analysis")]
    NoEligibleColumns,

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// No usable values found in a column for computation.
    #[error("No valid values found in column '{0}'")]
    NoValidValues(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A detection scan failed.
    #[error("Scan '{scan}' failed: {reason}")]
    ScanFailed { scan: String, reason: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<DatamendError>,
    },
}

impl DatamendError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        DatamendError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code for callers that branch on the failure kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyDataset => "EMPTY_DATASET",
            Self::UnsupportedStrategy { .. } => "UNSUPPORTED_STRATEGY",
            Self::NoEligibleColumns => "NO_ELIGIBLE_COLUMNS",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::NoValidValues(_) => "NO_VALID_VALUES",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::ScanFailed { .. } => "SCAN_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if the caller can fix this error by changing its input.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::EmptyDataset
            | Self::UnsupportedStrategy { .. }
            | Self::NoEligibleColumns
            | Self::ColumnNotFound(_)
            | Self::NoValidValues(_)
            | Self::InvalidConfig(_) => true,
            Self::WithContext { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for DatamendError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("DatamendError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, DatamendError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| DatamendError::Polars(e).with_context(context))
    }
}
