//! Data Quality Diagnosis and Repair Library
//!
//! Finds quality problems in tabular records and fills missing values with
//! a chosen strategy, always producing a new dataset.
//!
//! # Overview
//!
//! - **Classification**: which columns have gaps, and whether each is numeric
//!   or categorical
//! - **Diagnosis**: missing values, rule violations, duplicate rows and
//!   statistical outliers, each scan independent of the others
//! - **Cleaning**: mean, median, mode, constant, forward and backward fill,
//!   with optional removal of rows that are still incomplete
//! - **I/O**: CSV loading via Polars and a fully quoted CSV export
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use datamend::{FillConfig, FillStrategy};
//!
//! let dataset = datamend::io::load_csv("students.csv")?;
//!
//! let report = datamend::diagnose(&dataset)?;
//! println!("{} issues", report.total_issues());
//!
//! let config = FillConfig::builder()
//!     .strategy(FillStrategy::Median)
//!     .columns(["math_score", "hours"])
//!     .remove_empty_rows(true)
//!     .build()?;
//!
//! let cleaned = datamend::clean(&dataset, &config)?;
//! datamend::io::write_csv(&cleaned.dataset, "students_clean.csv")?;
//! ```
//!
//! # Validation Rules
//!
//! The invalid-value scan is driven by a [`ValidationRegistry`]. The default
//! registry checks email-like columns for an `@` and score-like columns for
//! the range 0..=100. Custom rules plug in through [`FieldValidator`]:
//!
//! ```rust,ignore
//! use datamend::{ColumnMatcher, IssueDetector, RangeValidator, ValidationRegistry};
//!
//! let registry = ValidationRegistry::default().with_rule(
//!     ColumnMatcher::Exact("age".into()),
//!     RangeValidator::new("age_range", 0.0, 130.0),
//! );
//! let report = IssueDetector::default().with_registry(registry).detect(&dataset)?;
//! ```

pub mod config;
pub mod error;
pub mod imputers;
pub mod io;
pub mod profiler;
pub mod quality;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{
    ConfigValidationError, DetectorConfig, DetectorConfigBuilder, FillConfig, FillConfigBuilder,
    FillStrategy,
};
pub use error::{DatamendError, Result as DatamendResult, ResultExt};
pub use imputers::{ImputationEngine, SequentialImputer, StatisticalImputer};
pub use profiler::ColumnClassifier;
pub use quality::{
    ColumnMatcher, ContainsValidator, FieldValidator, IssueDetector, OutlierAnalyzer,
    OutlierBounds, PatternValidator, RangeValidator, UpperBoundValidator, ValidationRegistry,
    ValidationRule,
};
pub use reporting::{CleaningReport, DiagnosisReport, ReportGenerator};
pub use types::{
    CleanedDataset, ColumnClassification, ColumnFillFailure, ColumnFillSummary, Dataset,
    DuplicateGroup, FieldValue, InvalidValue, IssueReport, MissingRow, MissingValue, Outlier,
    Record, ScanFailure,
};

/// Columns with gaps, split into numeric and categorical.
pub fn classify(dataset: &Dataset) -> ColumnClassification {
    ColumnClassifier::classify(dataset)
}

/// Run every scan with default settings and rules.
pub fn diagnose(dataset: &Dataset) -> DatamendResult<IssueReport> {
    IssueDetector::default().detect(dataset)
}

/// Apply `config` to a copy of `dataset`.
pub fn clean(dataset: &Dataset, config: &FillConfig) -> DatamendResult<CleanedDataset> {
    ImputationEngine::apply_fill(dataset, config)
}
