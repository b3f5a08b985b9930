//! Column classification.
//!
//! Decides which columns have gaps to fill and whether each of them is
//! numeric or categorical. Numeric-only fill strategies consult this.

use crate::types::{ColumnClassification, Dataset};
use tracing::debug;

/// Classifies the columns of a dataset.
pub struct ColumnClassifier;

impl ColumnClassifier {
    /// Split the columns that contain missing values into numeric and
    /// categorical, in first-record key order.
    pub fn classify(dataset: &Dataset) -> ColumnClassification {
        let mut classification = ColumnClassification::default();

        for column in dataset.columns() {
            if !Self::has_missing(dataset, &column) {
                continue;
            }

            if Self::is_numeric_column(dataset, &column) {
                classification.numeric.push(column);
            } else {
                classification.categorical.push(column);
            }
        }

        debug!(
            "Classified {} numeric and {} categorical columns with gaps",
            classification.numeric.len(),
            classification.categorical.len()
        );
        classification
    }

    /// Any row holds `Missing` or an empty string for `column`.
    pub fn has_missing(dataset: &Dataset, column: &str) -> bool {
        dataset.column_values(column).any(|v| v.is_missing())
    }

    /// Every non-blank value parses as a finite number.
    ///
    /// Missing and whitespace-only cells do not count against the column; a
    /// column with nothing but gaps is numeric.
    pub fn is_numeric_column(dataset: &Dataset, column: &str) -> bool {
        dataset
            .column_values(column)
            .filter(|v| !v.is_blank())
            .all(|v| v.as_strict_number().is_some())
    }
}
