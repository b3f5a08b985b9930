//! Imputation module for handling missing values.
//!
//! This module provides the fill strategies:
//! - Statistical imputation (mean, median, mode, constant)
//! - Sequential imputation (forward fill, backward fill)
//!
//! [`ImputationEngine`] drives them from a [`crate::config::FillConfig`].

mod engine;
mod sequential;
mod statistical;

pub use engine::ImputationEngine;
pub use sequential::SequentialImputer;
pub use statistical::StatisticalImputer;
