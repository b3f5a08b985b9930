//! Order-based imputation: forward and backward fill.

use crate::config::FillStrategy;
use crate::types::{ColumnFillSummary, Dataset, FieldValue};
use tracing::debug;

/// Fills gaps by propagating neighbouring values in row order.
pub struct SequentialImputer;

impl SequentialImputer {
    /// Carry the last seen value forward.
    ///
    /// Gaps before the first present value take that first value, so a
    /// column with at least one value ends up fully filled.
    pub fn apply_forward_fill(
        target: &mut Dataset,
        column: &str,
        processing_steps: &mut Vec<String>,
    ) -> ColumnFillSummary {
        let first_valid: Option<FieldValue> = target
            .column_values(column)
            .find(|v| !v.is_missing())
            .cloned();

        let mut last_valid: Option<FieldValue> = None;
        let mut cells_filled = 0;
        for record in target.records_mut() {
            let current = record.value(column);
            if !current.is_missing() {
                last_valid = Some(current.clone());
                continue;
            }
            if let Some(fill) = last_valid.as_ref().or(first_valid.as_ref()) {
                record.insert(column, fill.clone());
                cells_filled += 1;
            }
        }

        Self::summarize(column, FillStrategy::ForwardFill, cells_filled, processing_steps)
    }

    /// Carry the next value backward. Trailing gaps have no later value and
    /// stay missing.
    pub fn apply_backward_fill(
        target: &mut Dataset,
        column: &str,
        processing_steps: &mut Vec<String>,
    ) -> ColumnFillSummary {
        let mut next_valid: Option<FieldValue> = None;
        let mut cells_filled = 0;
        for record in target.records_mut().iter_mut().rev() {
            let current = record.value(column);
            if !current.is_missing() {
                next_valid = Some(current.clone());
            } else if let Some(fill) = &next_valid {
                record.insert(column, fill.clone());
                cells_filled += 1;
            }
        }

        Self::summarize(column, FillStrategy::BackwardFill, cells_filled, processing_steps)
    }

    fn summarize(
        column: &str,
        strategy: FillStrategy,
        cells_filled: usize,
        processing_steps: &mut Vec<String>,
    ) -> ColumnFillSummary {
        let step = format!("{} '{}': filled {} cells", strategy, column, cells_filled);
        debug!("{}", step);
        processing_steps.push(step);

        ColumnFillSummary {
            column: column.to_string(),
            strategy,
            cells_filled,
            fill_value: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Record;

    fn column(values: Vec<FieldValue>) -> Dataset {
        values
            .into_iter()
            .map(|v| Record::from_pairs([("v", v)]))
            .collect()
    }

    fn values(ds: &Dataset) -> Vec<FieldValue> {
        ds.column_values("v").cloned().collect()
    }

    fn text(s: &str) -> FieldValue {
        FieldValue::from(s)
    }

    #[test]
    fn test_forward_fill_backfills_leading_gaps_from_first_value() {
        let mut ds = column(vec![
            FieldValue::Missing,
            FieldValue::Missing,
            text("5"),
            FieldValue::Missing,
            text("9"),
        ]);
        let mut steps = Vec::new();

        let summary = SequentialImputer::apply_forward_fill(&mut ds, "v", &mut steps);

        assert_eq!(
            values(&ds),
            vec![text("5"), text("5"), text("5"), text("5"), text("9")]
        );
        assert_eq!(summary.cells_filled, 3);
        assert!(summary.fill_value.is_none());
    }

    #[test]
    fn test_forward_fill_treats_empty_string_as_gap() {
        let mut ds = column(vec![text("a"), text(""), text("b"), text("")]);
        let mut steps = Vec::new();

        SequentialImputer::apply_forward_fill(&mut ds, "v", &mut steps);
        assert_eq!(values(&ds), vec![text("a"), text("a"), text("b"), text("b")]);
    }

    #[test]
    fn test_forward_fill_all_missing_leaves_column() {
        let mut ds = column(vec![FieldValue::Missing, text("")]);
        let mut steps = Vec::new();

        let summary = SequentialImputer::apply_forward_fill(&mut ds, "v", &mut steps);
        assert_eq!(summary.cells_filled, 0);
        assert_eq!(values(&ds), vec![FieldValue::Missing, text("")]);
    }

    #[test]
    fn test_backward_fill_leaves_trailing_gaps() {
        let mut ds = column(vec![
            FieldValue::Missing,
            text("3"),
            FieldValue::Missing,
            text("7"),
            FieldValue::Missing,
        ]);
        let mut steps = Vec::new();

        let summary = SequentialImputer::apply_backward_fill(&mut ds, "v", &mut steps);

        assert_eq!(
            values(&ds),
            vec![text("3"), text("3"), text("7"), text("7"), FieldValue::Missing]
        );
        assert_eq!(summary.cells_filled, 2);
        assert!(steps[0].contains("backwardFill"));
    }
}
