//! Record model and the report types produced by the engine.

use crate::config::FillStrategy;
use crate::utils::{parse_leading_float, parse_strict_number};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Record Model
// ============================================================================

/// A single cell value.
///
/// Serializes untagged: `Text` as a JSON string, `Number` as a JSON number and
/// `Missing` as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Missing,
    Number(f64),
    Text(String),
}

static MISSING: FieldValue = FieldValue::Missing;

impl FieldValue {
    /// `Missing` or an empty string.
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Text(s) => s.is_empty(),
            Self::Number(_) => false,
        }
    }

    /// `Missing` or a string that is empty after trimming.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(_) => false,
        }
    }

    /// Whole-value numeric parse. Only finite numbers qualify.
    pub fn as_strict_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::Number(_) | Self::Missing => None,
            Self::Text(s) => parse_strict_number(s),
        }
    }

    /// Leading-number parse: `"12kg"` yields 12, `"abc"` yields nothing.
    pub fn as_weak_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if !n.is_nan() => Some(*n),
            Self::Number(_) | Self::Missing => None,
            Self::Text(s) => parse_leading_float(s),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => Ok(()),
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

/// One row: column name to value, in insertion order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(IndexMap<String, FieldValue>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from `(column, value)` pairs, keeping their order.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.0.get(column)
    }

    /// Value for `column`; absent keys read as `Missing`.
    pub fn value(&self, column: &str) -> &FieldValue {
        self.0.get(column).unwrap_or(&MISSING)
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(column.into(), value.into());
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when any field is `Missing` or an empty string.
    pub fn has_missing(&self) -> bool {
        self.0.values().any(FieldValue::is_missing)
    }

    /// Structural key that ignores column order.
    pub fn canonical_key(&self) -> serde_json::Result<String> {
        let sorted: BTreeMap<&str, &FieldValue> =
            self.0.iter().map(|(k, v)| (k.as_str(), v)).collect();
        serde_json::to_string(&sorted)
    }
}

/// An ordered sequence of records. Row order is significant.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset(Vec<Record>);

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self(records)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.0.iter()
    }

    pub fn into_records(self) -> Vec<Record> {
        self.0
    }

    /// The common field set: keys of the first record.
    pub fn columns(&self) -> Vec<String> {
        self.0
            .first()
            .map(|r| r.keys().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.0.first().is_some_and(|r| r.get(column).is_some())
    }

    /// Every row's value for `column`, in row order.
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a FieldValue> {
        self.0.iter().map(move |r| r.value(column))
    }

    pub(crate) fn records_mut(&mut self) -> &mut Vec<Record> {
        &mut self.0
    }
}

impl From<Vec<Record>> for Dataset {
    fn from(records: Vec<Record>) -> Self {
        Self(records)
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Columns that contain missing values, split by inferred kind.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColumnClassification {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
}

impl ColumnClassification {
    pub fn is_numeric(&self, column: &str) -> bool {
        self.numeric.iter().any(|c| c == column)
    }

    pub fn is_categorical(&self, column: &str) -> bool {
        self.categorical.iter().any(|c| c == column)
    }

    pub fn is_empty(&self) -> bool {
        self.numeric.is_empty() && self.categorical.is_empty()
    }
}

// ============================================================================
// Issue Report
// ============================================================================

/// A missing cell. `row` is 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingValue {
    pub row: usize,
    pub column: String,
    pub value: FieldValue,
}

/// A cell that failed a validation rule. `row` is 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvalidValue {
    pub row: usize,
    pub column: String,
    pub value: FieldValue,
    /// Name of the rule that rejected the value.
    pub rule: String,
}

/// Rows whose full records are identical. Indices are 1-based and ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub rows: Vec<usize>,
    pub record: Record,
}

/// A numeric cell outside its column's robust bounds. `row` is 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outlier {
    pub row: usize,
    pub column: String,
    pub value: f64,
}

/// A scan that failed and was reported as empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanFailure {
    pub scan: String,
    pub code: String,
    pub message: String,
}

/// The missing columns of a single row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingRow {
    pub row: usize,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueReport {
    pub missing_values: Vec<MissingValue>,
    pub invalid_values: Vec<InvalidValue>,
    pub duplicates: Vec<DuplicateGroup>,
    pub outliers: Vec<Outlier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scan_failures: Vec<ScanFailure>,
}

impl IssueReport {
    /// Count of all reported entries (duplicate groups count once).
    pub fn total_issues(&self) -> usize {
        self.missing_values.len()
            + self.invalid_values.len()
            + self.duplicates.len()
            + self.outliers.len()
    }

    pub fn is_clean(&self) -> bool {
        self.total_issues() == 0
    }

    /// Missing cells grouped per row, in row order.
    pub fn missing_by_row(&self) -> Vec<MissingRow> {
        let mut rows: Vec<MissingRow> = Vec::new();
        for entry in &self.missing_values {
            match rows.last_mut() {
                Some(last) if last.row == entry.row => last.columns.push(entry.column.clone()),
                _ => rows.push(MissingRow {
                    row: entry.row,
                    columns: vec![entry.column.clone()],
                }),
            }
        }
        rows
    }
}

// ============================================================================
// Cleaning Result
// ============================================================================

/// What the engine did to one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnFillSummary {
    pub column: String,
    pub strategy: FillStrategy,
    pub cells_filled: usize,
    /// The constant used, for strategies that fill with a single value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_value: Option<FieldValue>,
}

/// A column that was left unchanged because it could not be filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnFillFailure {
    pub column: String,
    pub code: String,
    pub message: String,
}

/// The output of a fill: a fresh dataset plus per-column metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanedDataset {
    pub dataset: Dataset,
    pub filled: Vec<ColumnFillSummary>,
    pub failures: Vec<ColumnFillFailure>,
    pub rows_removed: usize,
    pub processing_steps: Vec<String>,
}

impl CleanedDataset {
    /// True when every targeted column was filled.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

static_assertions::assert_impl_all!(Dataset: Send, Sync);
static_assertions::assert_impl_all!(IssueReport: Send, Sync);
static_assertions::assert_impl_all!(CleanedDataset: Send, Sync);
