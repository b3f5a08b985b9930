use crate::config::DetectorConfig;
use crate::error::{DatamendError, Result};
use crate::quality::outliers::OutlierAnalyzer;
use crate::quality::validators::ValidationRegistry;
use crate::types::{
    Dataset, DuplicateGroup, InvalidValue, IssueReport, MissingValue, Outlier, ScanFailure,
};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Scans a dataset for missing, invalid, duplicate and outlying values.
///
/// The four scans are independent. A scan that fails is logged, recorded in
/// [`IssueReport::scan_failures`] and contributes an empty list; the other
/// scans still run.
#[derive(Debug, Default)]
pub struct IssueDetector {
    config: DetectorConfig,
    registry: ValidationRegistry,
}

static_assertions::assert_impl_all!(IssueDetector: Send, Sync);

impl IssueDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            registry: ValidationRegistry::default(),
        }
    }

    /// Replace the validation rules.
    pub fn with_registry(mut self, registry: ValidationRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Run every scan over `dataset`.
    ///
    /// # Errors
    ///
    /// Returns [`DatamendError::EmptyDataset`] for a dataset with no records.
    pub fn detect(&self, dataset: &Dataset) -> Result<IssueReport> {
        if dataset.is_empty() {
            return Err(DatamendError::EmptyDataset);
        }

        let mut failures = Vec::new();

        let missing_values = run_scan("missing_values", &mut failures, || {
            Ok(Self::scan_missing(dataset))
        });
        let invalid_values = run_scan("invalid_values", &mut failures, || {
            Ok(self.scan_invalid(dataset))
        });
        let duplicates = run_scan("duplicates", &mut failures, || {
            Self::scan_duplicates(dataset)
        });
        let outliers = run_scan("outliers", &mut failures, || self.scan_outliers(dataset));

        let report = IssueReport {
            missing_values,
            invalid_values,
            duplicates,
            outliers,
            scan_failures: failures,
        };

        info!(
            "Detected {} missing, {} invalid, {} duplicate groups, {} outliers",
            report.missing_values.len(),
            report.invalid_values.len(),
            report.duplicates.len(),
            report.outliers.len()
        );
        Ok(report)
    }

    /// Every present key whose value is missing or blank.
    pub fn scan_missing(dataset: &Dataset) -> Vec<MissingValue> {
        dataset
            .iter()
            .enumerate()
            .flat_map(|(idx, record)| {
                record
                    .iter()
                    .filter(|(_, value)| value.is_blank())
                    .map(move |(column, value)| MissingValue {
                        row: idx + 1,
                        column: column.to_string(),
                        value: value.clone(),
                    })
            })
            .collect()
    }

    /// Apply the registry to every present field.
    pub fn scan_invalid(&self, dataset: &Dataset) -> Vec<InvalidValue> {
        if self.registry.is_empty() {
            return Vec::new();
        }

        let mut invalid = Vec::new();
        for (idx, record) in dataset.iter().enumerate() {
            for (column, value) in record.iter() {
                for rule in self.registry.failures(column, value) {
                    invalid.push(InvalidValue {
                        row: idx + 1,
                        column: column.to_string(),
                        value: value.clone(),
                        rule: rule.to_string(),
                    });
                }
            }
        }
        invalid
    }

    /// Group structurally identical records. Groups are ordered by the
    /// position of their first member.
    pub fn scan_duplicates(dataset: &Dataset) -> Result<Vec<DuplicateGroup>> {
        let mut groups: Vec<DuplicateGroup> = Vec::new();
        let mut index_by_key: HashMap<String, usize> = HashMap::new();

        for (idx, record) in dataset.iter().enumerate() {
            let key = record.canonical_key()?;
            match index_by_key.get(&key) {
                Some(&group) => groups[group].rows.push(idx + 1),
                None => {
                    index_by_key.insert(key, groups.len());
                    groups.push(DuplicateGroup {
                        rows: vec![idx + 1],
                        record: record.clone(),
                    });
                }
            }
        }

        groups.retain(|g| g.rows.len() > 1);
        Ok(groups)
    }

    /// Outlier scan. No eligible columns is a normal, empty result.
    pub fn scan_outliers(&self, dataset: &Dataset) -> Result<Vec<Outlier>> {
        match OutlierAnalyzer::new(&self.config).find_outliers(dataset) {
            Err(DatamendError::NoEligibleColumns) => {
                debug!("No columns eligible for outlier analysis");
                Ok(Vec::new())
            }
            other => other,
        }
    }
}

/// Run one scan, degrading a failure to an empty result.
fn run_scan<T, F>(name: &str, failures: &mut Vec<ScanFailure>, scan: F) -> Vec<T>
where
    F: FnOnce() -> Result<Vec<T>>,
{
    match scan() {
        Ok(found) => found,
        Err(e) => {
            let failure = DatamendError::ScanFailed {
                scan: name.to_string(),
                reason: e.to_string(),
            };
            warn!("{}", failure);
            failures.push(ScanFailure {
                scan: name.to_string(),
                code: e.error_code().to_string(),
                message: failure.to_string(),
            });
            Vec::new()
        }
    }
}
