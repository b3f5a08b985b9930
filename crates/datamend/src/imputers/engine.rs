//! Applies a [`FillConfig`] to a dataset.

use crate::config::{FillConfig, FillStrategy};
use crate::error::{DatamendError, Result};
use crate::imputers::{SequentialImputer, StatisticalImputer};
use crate::types::{CleanedDataset, ColumnFillFailure, ColumnFillSummary, Dataset};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Runs the configured fill strategy over the selected columns.
pub struct ImputationEngine;

impl ImputationEngine {
    /// Fill missing values in the configured columns and optionally drop
    /// rows that still have gaps.
    ///
    /// The input is cloned once and never modified. A column that cannot be
    /// filled is left unchanged and reported in [`CleanedDataset::failures`];
    /// the remaining columns are still processed.
    ///
    /// # Errors
    ///
    /// Returns [`DatamendError::EmptyDataset`] for a dataset without records
    /// and [`DatamendError::InvalidConfig`] for an invalid `config`.
    pub fn apply_fill(dataset: &Dataset, config: &FillConfig) -> Result<CleanedDataset> {
        if dataset.is_empty() {
            return Err(DatamendError::EmptyDataset);
        }
        config.validate()?;

        info!(
            "Applying {} to {} column(s)",
            config.strategy,
            config.columns.len()
        );

        let mut working = dataset.clone();
        let mut processing_steps = Vec::new();
        let mut filled = Vec::new();
        let mut failures = Vec::new();
        let mut seen = HashSet::new();

        for column in &config.columns {
            if !seen.insert(column.as_str()) {
                debug!("Column '{}' listed twice; skipping repeat", column);
                continue;
            }

            match Self::fill_column(dataset, &mut working, column, config, &mut processing_steps) {
                Ok(summary) => filled.push(summary),
                Err(e) => {
                    warn!("Could not fill column '{}': {}", column, e);
                    processing_steps.push(format!("Skipped '{}': {}", column, e));
                    failures.push(ColumnFillFailure {
                        column: column.clone(),
                        code: e.error_code().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        let rows_removed = if config.remove_empty_rows {
            Self::remove_incomplete_rows(&mut working, &mut processing_steps)
        } else {
            0
        };

        Ok(CleanedDataset {
            dataset: working,
            filled,
            failures,
            rows_removed,
            processing_steps,
        })
    }

    fn fill_column(
        original: &Dataset,
        working: &mut Dataset,
        column: &str,
        config: &FillConfig,
        processing_steps: &mut Vec<String>,
    ) -> Result<ColumnFillSummary> {
        if !original.has_column(column) {
            return Err(DatamendError::ColumnNotFound(column.to_string()));
        }

        match config.strategy {
            FillStrategy::Mean => {
                StatisticalImputer::apply_mean(original, working, column, processing_steps)
            }
            FillStrategy::Median => {
                StatisticalImputer::apply_median(original, working, column, processing_steps)
            }
            FillStrategy::Mode => {
                StatisticalImputer::apply_mode(original, working, column, processing_steps)
            }
            FillStrategy::Custom => {
                let value = config.custom_value.as_ref().ok_or_else(|| {
                    DatamendError::InvalidConfig(
                        "Strategy 'custom' requires a custom value".to_string(),
                    )
                })?;
                Ok(StatisticalImputer::apply_constant(
                    working,
                    column,
                    value,
                    processing_steps,
                ))
            }
            FillStrategy::ForwardFill => Ok(SequentialImputer::apply_forward_fill(
                working,
                column,
                processing_steps,
            )),
            FillStrategy::BackwardFill => Ok(SequentialImputer::apply_backward_fill(
                working,
                column,
                processing_steps,
            )),
        }
    }

    /// Drop every record with any missing field, targeted or not. A column
    /// of the first record that a later record lacks counts as missing.
    fn remove_incomplete_rows(working: &mut Dataset, processing_steps: &mut Vec<String>) -> usize {
        let before = working.len();
        let columns = working.columns();
        working.records_mut().retain(|record| {
            !record.has_missing() && columns.iter().all(|c| !record.value(c).is_missing())
        });
        let removed = before - working.len();

        if removed > 0 {
            processing_steps.push(format!("Removed {} rows with empty values", removed));
            debug!("Removed {} incomplete rows", removed);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldValue, Record};
    use pretty_assertions::assert_eq;

    fn sample() -> Dataset {
        Dataset::new(vec![
            Record::from_pairs([("hours", "4"), ("city", "Oslo"), ("grade", "B")]),
            Record::from_pairs([("hours", ""), ("city", ""), ("grade", "A")]),
            Record::from_pairs([("hours", "8"), ("city", "Rome"), ("grade", "")]),
        ])
    }

    #[test]
    fn test_apply_fill_never_mutates_input() {
        let original = sample();
        let snapshot = original.clone();
        let config = FillConfig::builder()
            .strategy(FillStrategy::Mean)
            .column("hours")
            .remove_empty_rows(true)
            .build()
            .unwrap();

        let cleaned = ImputationEngine::apply_fill(&original, &config).unwrap();
        assert_eq!(original, snapshot);
        assert_ne!(cleaned.dataset, original);
    }

    #[test]
    fn test_partial_success_reports_failed_columns() {
        let config = FillConfig::builder()
            .strategy(FillStrategy::Mean)
            .columns(["hours", "city", "nope"])
            .build()
            .unwrap();

        let cleaned = ImputationEngine::apply_fill(&sample(), &config).unwrap();

        assert_eq!(cleaned.filled.len(), 1);
        assert_eq!(cleaned.filled[0].column, "hours");
        assert_eq!(
            cleaned.dataset.records()[1].value("hours"),
            &FieldValue::Number(6.0)
        );

        let codes: Vec<(&str, &str)> = cleaned
            .failures
            .iter()
            .map(|f| (f.column.as_str(), f.code.as_str()))
            .collect();
        assert_eq!(
            codes,
            vec![("city", "UNSUPPORTED_STRATEGY"), ("nope", "COLUMN_NOT_FOUND")]
        );
        // City untouched
        assert_eq!(cleaned.dataset.records()[1].value("city"), &FieldValue::from(""));
        assert!(!cleaned.is_complete());
    }

    #[test]
    fn test_remove_empty_rows_checks_all_fields() {
        let config = FillConfig::builder()
            .strategy(FillStrategy::Custom)
            .column("city")
            .custom_value("Unknown")
            .remove_empty_rows(true)
            .build()
            .unwrap();

        let cleaned = ImputationEngine::apply_fill(&sample(), &config).unwrap();
        // Row 2 still lacks hours, row 3 lacks grade
        assert_eq!(cleaned.rows_removed, 2);
        assert_eq!(cleaned.dataset.len(), 1);
        assert_eq!(cleaned.dataset.records()[0].value("city"), &FieldValue::from("Oslo"));
    }

    #[test]
    fn test_remove_empty_rows_drops_records_lacking_a_column() {
        let ds = Dataset::new(vec![
            Record::from_pairs([("a", "1"), ("b", "x")]),
            Record::from_pairs([("a", "2")]),
        ]);
        let config = FillConfig::builder()
            .strategy(FillStrategy::ForwardFill)
            .column("a")
            .remove_empty_rows(true)
            .build()
            .unwrap();

        let cleaned = ImputationEngine::apply_fill(&ds, &config).unwrap();
        assert_eq!(cleaned.rows_removed, 1);
        assert_eq!(cleaned.dataset.len(), 1);
        assert_eq!(cleaned.dataset.records()[0].value("b"), &FieldValue::from("x"));
    }

    #[test]
    fn test_whitespace_cell_does_not_block_mean() {
        let ds: Dataset = ["4", "  ", "", "8"]
            .into_iter()
            .map(|v| Record::from_pairs([("h", v)]))
            .collect();
        let config = FillConfig::builder()
            .strategy(FillStrategy::Mean)
            .column("h")
            .build()
            .unwrap();

        let cleaned = ImputationEngine::apply_fill(&ds, &config).unwrap();
        assert!(cleaned.is_complete());
        assert_eq!(cleaned.dataset.records()[2].value("h"), &FieldValue::Number(6.0));
        // Whitespace is not an empty string, so it is not overwritten
        assert_eq!(cleaned.dataset.records()[1].value("h"), &FieldValue::from("  "));
    }

    #[test]
    fn test_mode_fill() {
        let config = FillConfig::builder()
            .strategy(FillStrategy::Mode)
            .columns(["grade", "city"])
            .build()
            .unwrap();

        let cleaned = ImputationEngine::apply_fill(&sample(), &config).unwrap();
        assert!(cleaned.is_complete());
        assert_eq!(cleaned.dataset.records()[2].value("grade"), &FieldValue::from("B"));
        assert_eq!(cleaned.dataset.records()[1].value("city"), &FieldValue::from("Oslo"));
    }

    #[test]
    fn test_empty_dataset_is_rejected() {
        let config = FillConfig::builder()
            .strategy(FillStrategy::Mean)
            .column("hours")
            .build()
            .unwrap();
        assert!(matches!(
            ImputationEngine::apply_fill(&Dataset::default(), &config),
            Err(DatamendError::EmptyDataset)
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = FillConfig {
            strategy: FillStrategy::Custom,
            columns: vec!["city".to_string()],
            custom_value: None,
            remove_empty_rows: false,
        };
        let err = ImputationEngine::apply_fill(&sample(), &config).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_repeated_column_is_filled_once() {
        let config = FillConfig::builder()
            .strategy(FillStrategy::ForwardFill)
            .columns(["hours", "hours"])
            .build()
            .unwrap();

        let cleaned = ImputationEngine::apply_fill(&sample(), &config).unwrap();
        assert_eq!(cleaned.filled.len(), 1);
        assert_eq!(cleaned.dataset.records()[1].value("hours"), &FieldValue::from("4"));
    }
}
