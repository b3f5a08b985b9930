use crate::config::FillStrategy;
use crate::error::Result;
use crate::profiler::ColumnClassifier;
use crate::types::{
    CleanedDataset, ColumnClassification, ColumnFillFailure, ColumnFillSummary, Dataset,
    IssueReport,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

// ============================================================================
// Report Types
// ============================================================================

/// Rows and common columns of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetShape {
    pub rows: usize,
    pub columns: usize,
}

impl DatasetShape {
    pub fn of(dataset: &Dataset) -> Self {
        Self {
            rows: dataset.len(),
            columns: dataset.columns().len(),
        }
    }
}

/// Per-category totals of an [`IssueReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IssueCounts {
    pub missing_values: usize,
    pub invalid_values: usize,
    pub duplicate_groups: usize,
    /// Rows that repeat an earlier row.
    pub duplicate_rows: usize,
    pub outliers: usize,
    pub total: usize,
}

impl IssueCounts {
    pub fn from_report(report: &IssueReport) -> Self {
        Self {
            missing_values: report.missing_values.len(),
            invalid_values: report.invalid_values.len(),
            duplicate_groups: report.duplicates.len(),
            duplicate_rows: report
                .duplicates
                .iter()
                .map(|g| g.rows.len().saturating_sub(1))
                .sum(),
            outliers: report.outliers.len(),
            total: report.total_issues(),
        }
    }
}

/// Everything a diagnosis found, plus context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the input file
    pub input_file: String,
    pub shape: DatasetShape,
    /// Columns with gaps, split by kind
    pub classification: ColumnClassification,
    pub counts: IssueCounts,
    /// Columns with at least one outlier, in report order
    pub outlier_columns: Vec<String>,
    pub issues: IssueReport,
}

/// Totals for a cleaning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningSummary {
    pub strategy: FillStrategy,
    pub rows_before: usize,
    pub rows_after: usize,
    pub rows_removed: usize,
    pub cells_filled: usize,
    /// Missing cells left in the cleaned dataset
    pub cells_still_missing: usize,
    pub columns_filled: usize,
    pub columns_failed: usize,
}

/// What a cleaning run did and where it wrote the result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the input file
    pub input_file: String,
    /// Path to the output file (if written)
    pub output_file: Option<String>,
    pub summary: CleaningSummary,
    pub filled: Vec<ColumnFillSummary>,
    pub failures: Vec<ColumnFillFailure>,
    pub processing_steps: Vec<String>,
}

// ============================================================================
// Report Generator
// ============================================================================

/// Builds reports and writes them as JSON.
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./outputs"),
        }
    }
}

impl ReportGenerator {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn build_diagnosis_report(
        input_file: &str,
        dataset: &Dataset,
        issues: &IssueReport,
    ) -> DiagnosisReport {
        let mut outlier_columns: Vec<String> = Vec::new();
        for outlier in &issues.outliers {
            if !outlier_columns.contains(&outlier.column) {
                outlier_columns.push(outlier.column.clone());
            }
        }

        DiagnosisReport {
            generated_at: timestamp(),
            input_file: input_file.to_string(),
            shape: DatasetShape::of(dataset),
            classification: ColumnClassifier::classify(dataset),
            counts: IssueCounts::from_report(issues),
            outlier_columns,
            issues: issues.clone(),
        }
    }

    pub fn build_cleaning_report(
        input_file: &str,
        output_file: Option<&str>,
        original: &Dataset,
        strategy: FillStrategy,
        cleaned: &CleanedDataset,
    ) -> CleaningReport {
        let cells_still_missing = cleaned
            .dataset
            .iter()
            .flat_map(|record| record.iter())
            .filter(|(_, value)| value.is_missing())
            .count();

        let summary = CleaningSummary {
            strategy,
            rows_before: original.len(),
            rows_after: cleaned.dataset.len(),
            rows_removed: cleaned.rows_removed,
            cells_filled: cleaned.filled.iter().map(|f| f.cells_filled).sum(),
            cells_still_missing,
            columns_filled: cleaned.filled.len(),
            columns_failed: cleaned.failures.len(),
        };

        CleaningReport {
            generated_at: timestamp(),
            input_file: input_file.to_string(),
            output_file: output_file.map(String::from),
            summary,
            filled: cleaned.filled.clone(),
            failures: cleaned.failures.clone(),
            processing_steps: cleaned.processing_steps.clone(),
        }
    }

    /// Write a report to `<output_dir>/<base_name>_report.json`.
    pub fn write_report_to_file<T: Serialize>(
        &self,
        report: &T,
        report_base_name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self
            .output_dir
            .join(format!("{}_report.json", report_base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());
        Ok(report_path)
    }
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
