//! Statistical imputation methods.
//!
//! Provides mean, median, mode and constant fills. Statistics always come
//! from the original dataset, never from a partially filled copy.

use crate::config::FillStrategy;
use crate::error::{DatamendError, Result};
use crate::profiler::ColumnClassifier;
use crate::types::{ColumnFillSummary, Dataset, FieldValue};
use crate::utils::{mean, median, mode_by_key};
use tracing::debug;

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill gaps in `column` with the mean of its values in `original`.
    pub fn apply_mean(
        original: &Dataset,
        target: &mut Dataset,
        column: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<ColumnFillSummary> {
        let values = Self::numeric_values(original, column, FillStrategy::Mean)?;
        let mean_val =
            mean(&values).ok_or_else(|| DatamendError::NoValidValues(column.to_string()))?;

        Ok(Self::fill_with_value(
            target,
            column,
            FieldValue::Number(mean_val),
            FillStrategy::Mean,
            processing_steps,
        ))
    }

    /// Fill gaps in `column` with the median of its values in `original`.
    pub fn apply_median(
        original: &Dataset,
        target: &mut Dataset,
        column: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<ColumnFillSummary> {
        let values = Self::numeric_values(original, column, FillStrategy::Median)?;
        let median_val =
            median(&values).ok_or_else(|| DatamendError::NoValidValues(column.to_string()))?;

        Ok(Self::fill_with_value(
            target,
            column,
            FieldValue::Number(median_val),
            FillStrategy::Median,
            processing_steps,
        ))
    }

    /// Fill gaps in `column` with its most frequent value.
    pub fn apply_mode(
        original: &Dataset,
        target: &mut Dataset,
        column: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<ColumnFillSummary> {
        let present: Vec<&FieldValue> = original
            .column_values(column)
            .filter(|v| !v.is_missing())
            .collect();
        let mode_val = mode_by_key(present.iter().copied(), |v| v.to_string())
            .cloned()
            .ok_or_else(|| DatamendError::NoValidValues(column.to_string()))?;

        Ok(Self::fill_with_value(
            target,
            column,
            mode_val,
            FillStrategy::Mode,
            processing_steps,
        ))
    }

    /// Fill gaps in `column` with a caller-supplied constant.
    pub fn apply_constant(
        target: &mut Dataset,
        column: &str,
        value: &FieldValue,
        processing_steps: &mut Vec<String>,
    ) -> ColumnFillSummary {
        Self::fill_with_value(
            target,
            column,
            value.clone(),
            FillStrategy::Custom,
            processing_steps,
        )
    }

    /// Parsed values of a numeric column, rejecting categorical columns.
    fn numeric_values(dataset: &Dataset, column: &str, strategy: FillStrategy) -> Result<Vec<f64>> {
        if !ColumnClassifier::is_numeric_column(dataset, column) {
            return Err(DatamendError::UnsupportedStrategy {
                strategy: strategy.to_string(),
                column: column.to_string(),
                reason: "column contains non-numeric values".to_string(),
            });
        }

        Ok(dataset
            .column_values(column)
            .filter(|v| !v.is_missing())
            .filter_map(FieldValue::as_weak_number)
            .collect())
    }

    /// Write `fill_value` into every missing cell of `column`.
    fn fill_with_value(
        target: &mut Dataset,
        column: &str,
        fill_value: FieldValue,
        strategy: FillStrategy,
        processing_steps: &mut Vec<String>,
    ) -> ColumnFillSummary {
        let mut cells_filled = 0;
        for record in target.records_mut() {
            if record.value(column).is_missing() {
                record.insert(column, fill_value.clone());
                cells_filled += 1;
            }
        }

        let step = match &fill_value {
            FieldValue::Number(n) => format!(
                "Filled {} cells in '{}' with {}: {:.2}",
                cells_filled, column, strategy, n
            ),
            other => format!(
                "Filled {} cells in '{}' with {}: '{}'",
                cells_filled, column, strategy, other
            ),
        };
        debug!("{}", step);
        processing_steps.push(step);

        ColumnFillSummary {
            column: column.to_string(),
            strategy,
            cells_filled,
            fill_value: Some(fill_value),
        }
    }
}
