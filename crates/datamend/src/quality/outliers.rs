//! Robust outlier detection for numeric columns.
//!
//! Per eligible column: drop extreme magnitudes relative to the median, log
//! transform what is left, fence the transformed values with a wide IQR rule,
//! then re-check every row against that fence.

use crate::config::DetectorConfig;
use crate::error::{DatamendError, Result};
use crate::types::{Dataset, Outlier};
use crate::utils::{positional_median, sort_floats};
use std::collections::HashSet;
use tracing::debug;

/// Fence computed for one column, in log space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierBounds {
    pub lower: f64,
    pub upper: f64,
}

impl OutlierBounds {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Finds statistical outliers across the numeric columns of a dataset.
pub struct OutlierAnalyzer<'a> {
    config: &'a DetectorConfig,
}

impl<'a> OutlierAnalyzer<'a> {
    pub fn new(config: &'a DetectorConfig) -> Self {
        Self { config }
    }

    /// Flag every (row, column) whose value falls outside its column's
    /// bounds. Output follows column order, then row order.
    ///
    /// # Errors
    ///
    /// Returns [`DatamendError::NoEligibleColumns`] when no column qualifies.
    pub fn find_outliers(&self, dataset: &Dataset) -> Result<Vec<Outlier>> {
        let eligible = self.eligible_columns(dataset);
        if eligible.is_empty() {
            return Err(DatamendError::NoEligibleColumns);
        }

        let mut outliers = Vec::new();
        for column in &eligible {
            let Some(bounds) = self.column_bounds(dataset, column) else {
                debug!("Column '{}': nothing left after pre-filter", column);
                continue;
            };
            debug!(
                "Column '{}': lower {:.4}, upper {:.4}",
                column, bounds.lower, bounds.upper
            );

            for (idx, value) in dataset.column_values(column).enumerate() {
                let Some(v) = value.as_weak_number() else {
                    continue;
                };
                // Non-positive values map to ln(1) here, unlike the fencing pass
                let transformed = if v > 0.0 { v.ln() } else { 0.0 };
                if !bounds.contains(transformed) {
                    outliers.push(Outlier {
                        row: idx + 1,
                        column: column.clone(),
                        value: v,
                    });
                }
            }
        }

        debug!(
            "Found {} outliers across {} columns",
            outliers.len(),
            eligible.len()
        );
        Ok(outliers)
    }

    /// Columns with numeric data, enough distinct values, and a
    /// non-identifier name.
    pub fn eligible_columns(&self, dataset: &Dataset) -> Vec<String> {
        dataset
            .columns()
            .into_iter()
            .filter(|column| {
                if self.config.is_identifier(column) {
                    return false;
                }
                let values = numeric_values(dataset, column);
                !values.is_empty() && distinct_count(&values) > self.config.min_distinct_values
            })
            .collect()
    }

    /// Compute the log-space fence for `column`, or `None` when the
    /// pre-filter leaves no values.
    pub fn column_bounds(&self, dataset: &Dataset, column: &str) -> Option<OutlierBounds> {
        let mut values = numeric_values(dataset, column);
        sort_floats(&mut values);

        let median = positional_median(&values)?;
        let cutoff = median * self.config.extreme_ratio;
        let mut transformed: Vec<f64> = values
            .into_iter()
            .filter(|v| *v < cutoff)
            .map(|v| if v > 0.0 { v.ln() } else { v })
            .collect();

        if transformed.is_empty() {
            return None;
        }
        sort_floats(&mut transformed);

        let n = transformed.len();
        let q1 = transformed[n / 4];
        let q3 = transformed[(n * 3) / 4];
        let iqr = q3 - q1;
        let k = self.config.iqr_multiplier;

        Some(OutlierBounds {
            lower: q1 - k * iqr,
            upper: q3 + k * iqr,
        })
    }
}

/// Weakly parsed numeric values of a column; unparseable cells are skipped.
fn numeric_values(dataset: &Dataset, column: &str) -> Vec<f64> {
    dataset
        .column_values(column)
        .filter_map(|v| v.as_weak_number())
        .collect()
}

fn distinct_count(values: &[f64]) -> usize {
    values
        .iter()
        // -0.0 and 0.0 are the same value
        .map(|v| if *v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() })
        .collect::<HashSet<_>>()
        .len()
}
