//! Data quality analysis module.
//!
//! This module provides the issue detector and its building blocks:
//! validation rules for invalid values and the robust outlier analyzer.

mod analyzer;
pub mod outliers;
pub mod validators;

pub use analyzer::IssueDetector;
pub use outliers::{OutlierAnalyzer, OutlierBounds};
pub use validators::{
    ColumnMatcher, ContainsValidator, FieldValidator, PatternValidator, RangeValidator,
    UpperBoundValidator, ValidationRegistry, ValidationRule,
};
