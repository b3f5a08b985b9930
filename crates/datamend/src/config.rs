//! Configuration types for diagnosis and cleaning.
//!
//! Both configs use the builder pattern and are serde (de)serializable, so a
//! cleaning request can arrive as JSON from any caller.

use crate::error::DatamendError;
use crate::types::FieldValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Strategy for filling missing values in the selected columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum FillStrategy {
    /// Arithmetic mean of the column's values (numeric columns only)
    #[default]
    Mean,
    /// Median of the column's values (numeric columns only)
    Median,
    /// Most frequent value
    Mode,
    /// A caller-supplied constant
    Custom,
    /// Carry the previous value forward
    ForwardFill,
    /// Carry the next value backward
    BackwardFill,
}

impl FillStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Mode => "mode",
            Self::Custom => "custom",
            Self::ForwardFill => "forwardFill",
            Self::BackwardFill => "backwardFill",
        }
    }
}

impl fmt::Display for FillStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("At least one column must be selected for filling")]
    NoColumns,

    #[error("Strategy 'custom' requires a custom value")]
    MissingCustomValue,

    #[error("Invalid IQR multiplier: {0} (must be finite and non-negative)")]
    InvalidMultiplier(f64),

    #[error("Invalid extreme-value ratio: {0} (must be finite and positive)")]
    InvalidExtremeRatio(f64),
}

impl From<ConfigValidationError> for DatamendError {
    fn from(err: ConfigValidationError) -> Self {
        DatamendError::InvalidConfig(err.to_string())
    }
}

// ============================================================================
// Fill Configuration
// ============================================================================

/// A cleaning request.
///
/// # Example
///
/// ```rust,ignore
/// use datamend::config::{FillConfig, FillStrategy};
///
/// let config = FillConfig::builder()
///     .strategy(FillStrategy::ForwardFill)
///     .column("hours")
///     .remove_empty_rows(true)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillConfig {
    /// Strategy applied to every selected column.
    pub strategy: FillStrategy,

    /// Columns to fill. Must not be empty.
    pub columns: Vec<String>,

    /// Literal used by [`FillStrategy::Custom`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_value: Option<FieldValue>,

    /// Drop rows that still have any missing field after filling.
    #[serde(default)]
    pub remove_empty_rows: bool,
}

impl FillConfig {
    pub fn builder() -> FillConfigBuilder {
        FillConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.columns.is_empty() {
            return Err(ConfigValidationError::NoColumns);
        }

        if self.strategy == FillStrategy::Custom && self.custom_value.is_none() {
            return Err(ConfigValidationError::MissingCustomValue);
        }

        Ok(())
    }
}

/// Builder for [`FillConfig`].
#[derive(Debug, Default)]
pub struct FillConfigBuilder {
    strategy: Option<FillStrategy>,
    columns: Vec<String>,
    custom_value: Option<FieldValue>,
    remove_empty_rows: Option<bool>,
}

impl FillConfigBuilder {
    pub fn strategy(mut self, strategy: FillStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Add one target column.
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.columns.push(column.into());
        self
    }

    /// Add several target columns.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Set the literal for [`FillStrategy::Custom`].
    pub fn custom_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.custom_value = Some(value.into());
        self
    }

    pub fn remove_empty_rows(mut self, remove: bool) -> Self {
        self.remove_empty_rows = Some(remove);
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<FillConfig, ConfigValidationError> {
        let config = FillConfig {
            strategy: self.strategy.unwrap_or_default(),
            columns: self.columns,
            custom_value: self.custom_value,
            remove_empty_rows: self.remove_empty_rows.unwrap_or(false),
        };

        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Detector Configuration
// ============================================================================

/// Tuning for the outlier analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Fence multiplier `k` in `[Q1 - k*IQR, Q3 + k*IQR]`.
    /// Default: 3.0
    pub iqr_multiplier: f64,

    /// Values at or above `extreme_ratio * median` are dropped before fencing.
    /// Default: 100.0
    pub extreme_ratio: f64,

    /// A column needs more than this many distinct numeric values.
    /// Default: 10
    pub min_distinct_values: usize,

    /// Column names (case-insensitive) never analyzed for outliers.
    /// Default: ["id"]
    pub identifier_columns: Vec<String>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            iqr_multiplier: 3.0,
            extreme_ratio: 100.0,
            min_distinct_values: 10,
            identifier_columns: vec!["id".to_string()],
        }
    }
}

impl DetectorConfig {
    pub fn builder() -> DetectorConfigBuilder {
        DetectorConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier < 0.0 {
            return Err(ConfigValidationError::InvalidMultiplier(self.iqr_multiplier));
        }

        if !self.extreme_ratio.is_finite() || self.extreme_ratio <= 0.0 {
            return Err(ConfigValidationError::InvalidExtremeRatio(
                self.extreme_ratio,
            ));
        }

        Ok(())
    }

    /// Whether `column` is an identifier and must be skipped.
    pub fn is_identifier(&self, column: &str) -> bool {
        self.identifier_columns
            .iter()
            .any(|id| id.eq_ignore_ascii_case(column))
    }
}

/// Builder for [`DetectorConfig`].
#[derive(Debug, Default)]
pub struct DetectorConfigBuilder {
    iqr_multiplier: Option<f64>,
    extreme_ratio: Option<f64>,
    min_distinct_values: Option<usize>,
    identifier_columns: Option<Vec<String>>,
}

impl DetectorConfigBuilder {
    pub fn iqr_multiplier(mut self, k: f64) -> Self {
        self.iqr_multiplier = Some(k);
        self
    }

    pub fn extreme_ratio(mut self, ratio: f64) -> Self {
        self.extreme_ratio = Some(ratio);
        self
    }

    pub fn min_distinct_values(mut self, n: usize) -> Self {
        self.min_distinct_values = Some(n);
        self
    }

    /// Replace the identifier column list.
    pub fn identifier_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.identifier_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn build(self) -> Result<DetectorConfig, ConfigValidationError> {
        let defaults = DetectorConfig::default();
        let config = DetectorConfig {
            iqr_multiplier: self.iqr_multiplier.unwrap_or(defaults.iqr_multiplier),
            extreme_ratio: self.extreme_ratio.unwrap_or(defaults.extreme_ratio),
            min_distinct_values: self
                .min_distinct_values
                .unwrap_or(defaults.min_distinct_values),
            identifier_columns: self
                .identifier_columns
                .unwrap_or(defaults.identifier_columns),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_detector_config() {
        let config = DetectorConfig::default();
        assert_eq!(config.iqr_multiplier, 3.0);
        assert_eq!(config.extreme_ratio, 100.0);
        assert_eq!(config.min_distinct_values, 10);
        assert!(config.is_identifier("ID"));
        assert!(!config.is_identifier("student_id"));
    }

    #[test]
    fn test_detector_builder_validation() {
        let result = DetectorConfig::builder().iqr_multiplier(-1.0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidMultiplier(_)
        ));

        let result = DetectorConfig::builder().extreme_ratio(0.0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidExtremeRatio(_)
        ));
    }

    #[test]
    fn test_fill_builder() {
        let config = FillConfig::builder()
            .strategy(FillStrategy::Median)
            .columns(["a", "b"])
            .remove_empty_rows(true)
            .build()
            .unwrap();

        assert_eq!(config.strategy, FillStrategy::Median);
        assert_eq!(config.columns, vec!["a", "b"]);
        assert!(config.remove_empty_rows);
    }

    #[test]
    fn test_fill_builder_requires_columns() {
        let result = FillConfig::builder().strategy(FillStrategy::Mean).build();
        assert!(matches!(result.unwrap_err(), ConfigValidationError::NoColumns));
    }

    #[test]
    fn test_custom_requires_value() {
        let result = FillConfig::builder()
            .strategy(FillStrategy::Custom)
            .column("city")
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::MissingCustomValue
        ));
    }

    #[test]
    fn test_fill_config_from_json() {
        let json = r#"{
            "strategy": "forwardFill",
            "columns": ["hours", "city"],
            "removeEmptyRows": true
        }"#;

        let config: FillConfig = serde_json::from_str(json).expect("Should deserialize");
        assert_eq!(config.strategy, FillStrategy::ForwardFill);
        assert_eq!(config.columns.len(), 2);
        assert!(config.custom_value.is_none());
        assert!(config.remove_empty_rows);
    }

    #[test]
    fn test_validation_error_converts() {
        let err: DatamendError = ConfigValidationError::NoColumns.into();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }
}
