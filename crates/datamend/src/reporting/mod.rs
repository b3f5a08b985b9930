//! Report generation module.
//!
//! Builds timestamped summaries of a diagnosis or a cleaning run. The same
//! structures back the CLI's `--json` output, the `--emit-report` file and
//! library callers.
//!
//! # Example
//!
//! ```rust,ignore
//! use datamend::reporting::ReportGenerator;
//!
//! let report = ReportGenerator::build_diagnosis_report("students.csv", &dataset, &issues);
//! println!("{}", serde_json::to_string_pretty(&report)?);
//!
//! let generator = ReportGenerator::new(PathBuf::from("output"));
//! generator.write_report_to_file(&report, "students")?;
//! ```

mod generator;

pub use generator::{
    CleaningReport, CleaningSummary, DatasetShape, DiagnosisReport, IssueCounts, ReportGenerator,
};
