//! Integration tests for diagnosis and cleaning.
//!
//! These tests run the public API end to end against CSV fixtures.

use datamend::{
    DatamendError, Dataset, DetectorConfig, FieldValue, FillConfig, FillStrategy, IssueDetector,
    OutlierAnalyzer, Record, ReportGenerator, ValidationRegistry, io,
};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_fixture(filename: &str) -> Dataset {
    io::load_csv(fixtures_path().join(filename)).expect("Failed to read CSV fixture")
}

fn temp_file(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("datamend-it-{}-{}", std::process::id(), name))
}

fn stringified(dataset: &Dataset) -> Vec<Vec<String>> {
    dataset
        .iter()
        .map(|record| record.iter().map(|(_, v)| v.to_string()).collect())
        .collect()
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_load_students_fixture() {
    let ds = load_fixture("students.csv");

    assert_eq!(ds.len(), 14);
    assert_eq!(
        ds.columns(),
        vec!["id", "name", "email", "math_score", "hours", "city"]
    );
    assert_eq!(ds.records()[2].value("math_score"), &FieldValue::Missing);
    assert_eq!(ds.records()[0].value("hours"), &FieldValue::from("4"));
}

// ============================================================================
// Diagnosis
// ============================================================================

#[test]
fn test_classify_students() {
    let classification = datamend::classify(&load_fixture("students.csv"));

    assert_eq!(classification.numeric, vec!["math_score", "hours"]);
    assert_eq!(classification.categorical, vec!["city"]);
}

#[test]
fn test_diagnose_students() {
    let ds = load_fixture("students.csv");
    let report = datamend::diagnose(&ds).unwrap();

    let missing: Vec<(usize, &str)> = report
        .missing_values
        .iter()
        .map(|m| (m.row, m.column.as_str()))
        .collect();
    assert_eq!(
        missing,
        vec![(3, "math_score"), (3, "city"), (5, "hours")]
    );

    let invalid: Vec<(usize, &str, &str)> = report
        .invalid_values
        .iter()
        .map(|i| (i.row, i.column.as_str(), i.rule.as_str()))
        .collect();
    assert_eq!(
        invalid,
        vec![(2, "email", "email_format"), (2, "math_score", "score_range")]
    );

    assert_eq!(report.duplicates.len(), 1);
    assert_eq!(report.duplicates[0].rows, vec![4, 14]);

    assert_eq!(report.outliers.len(), 1);
    assert_eq!(report.outliers[0].row, 13);
    assert_eq!(report.outliers[0].column, "hours");
    assert_eq!(report.outliers[0].value, 1_000_000.0);

    assert!(report.scan_failures.is_empty());
}

#[test]
fn test_missing_scan_matches_every_empty_cell() {
    let ds = load_fixture("students.csv");
    let report = datamend::diagnose(&ds).unwrap();

    let mut expected = Vec::new();
    for (idx, record) in ds.iter().enumerate() {
        for (column, value) in record.iter() {
            if value.is_blank() {
                expected.push((idx + 1, column.to_string()));
            }
        }
    }
    let reported: Vec<(usize, String)> = report
        .missing_values
        .into_iter()
        .map(|m| (m.row, m.column))
        .collect();
    assert_eq!(reported, expected);
}

#[test]
fn test_clean_dataset_has_no_issues() {
    let report = datamend::diagnose(&load_fixture("clean_only.csv")).unwrap();
    assert!(report.is_clean());
}

#[test]
fn test_diagnose_empty_dataset() {
    let err = datamend::diagnose(&Dataset::default()).unwrap_err();
    assert!(matches!(err, DatamendError::EmptyDataset));

    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["code"], "EMPTY_DATASET");
}

#[test]
fn test_score_example() {
    let ds = Dataset::new(vec![
        Record::from_pairs([("email", "a@x.com"), ("score", "95")]),
        Record::from_pairs([("email", "a@x.com"), ("score", "140")]),
    ]);
    let report = datamend::diagnose(&ds).unwrap();

    assert!(report.duplicates.is_empty());
    assert_eq!(report.invalid_values.len(), 1);
    assert_eq!(report.invalid_values[0].row, 2);
    assert_eq!(report.invalid_values[0].column, "score");
    assert_eq!(report.invalid_values[0].value, FieldValue::from("140"));
}

#[test]
fn test_study_hours_limit_flags_only_when_enabled() {
    let ds = Dataset::new(vec![
        Record::from_pairs([("name", "Ann"), ("weekly_self_study_hours", "12")]),
        Record::from_pairs([("name", "Bo"), ("weekly_self_study_hours", "95")]),
    ]);

    let plain = datamend::diagnose(&ds).unwrap();
    assert!(plain.invalid_values.is_empty());

    let report = IssueDetector::new(DetectorConfig::default())
        .with_registry(ValidationRegistry::default().with_study_hours_limit())
        .detect(&ds)
        .unwrap();
    assert_eq!(report.invalid_values.len(), 1);
    assert_eq!(report.invalid_values[0].row, 2);
    assert_eq!(report.invalid_values[0].rule, "study_hours_limit");
}

#[test]
fn test_hours_example_and_identifier_exclusion() {
    let values: Vec<&str> = vec![
        "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "1000000",
    ];
    let ds: Dataset = values
        .iter()
        .map(|v| Record::from_pairs([("id", *v), ("hours", *v)]))
        .collect();

    let config = DetectorConfig::default();
    let analyzer = OutlierAnalyzer::new(&config);
    assert_eq!(analyzer.eligible_columns(&ds), vec!["hours"]);

    let outliers = analyzer.find_outliers(&ds).unwrap();
    // Nothing among the first eleven values is flagged
    assert!(outliers.iter().all(|o| o.row == 12));
}

#[test]
fn test_outlier_count_monotonic_in_multiplier() {
    let ds = load_fixture("students.csv");

    let mut previous = usize::MAX;
    for k in [0.0, 0.25, 0.5, 1.0, 2.0, 3.0, 5.0] {
        let config = DetectorConfig::builder().iqr_multiplier(k).build().unwrap();
        let report = IssueDetector::new(config).detect(&ds).unwrap();
        assert!(report.outliers.len() <= previous);
        previous = report.outliers.len();
    }
}

// ============================================================================
// Cleaning
// ============================================================================

#[test]
fn test_mean_fill_is_idempotent() {
    let ds = load_fixture("students.csv");
    let config = FillConfig::builder()
        .strategy(FillStrategy::Mean)
        .columns(["math_score", "hours"])
        .build()
        .unwrap();

    let first = datamend::clean(&ds, &config).unwrap();
    let second = datamend::clean(&ds, &config).unwrap();
    assert_eq!(first, second);
    assert_eq!(ds, load_fixture("students.csv"));
}

#[test]
fn test_fill_completeness() {
    let mut records: Vec<Record> = load_fixture("students.csv").into_records();
    for record in &mut records {
        record.insert("notes", FieldValue::Missing);
    }
    let ds = Dataset::new(records);

    let config = FillConfig::builder()
        .strategy(FillStrategy::Median)
        .columns(["math_score", "hours", "notes"])
        .build()
        .unwrap();
    let cleaned = datamend::clean(&ds, &config).unwrap();

    for column in ["math_score", "hours"] {
        assert!(cleaned.dataset.column_values(column).all(|v| !v.is_missing()));
    }
    // Nothing to derive a median from: left unchanged and flagged
    assert!(cleaned.dataset.column_values("notes").all(|v| v.is_missing()));
    assert_eq!(cleaned.failures.len(), 1);
    assert_eq!(cleaned.failures[0].column, "notes");
    assert_eq!(cleaned.failures[0].code, "NO_VALID_VALUES");
}

#[test]
fn test_mean_on_categorical_column_is_rejected_per_column() {
    let ds = load_fixture("students.csv");
    let config = FillConfig::builder()
        .strategy(FillStrategy::Mean)
        .columns(["city", "hours"])
        .build()
        .unwrap();

    let cleaned = datamend::clean(&ds, &config).unwrap();
    assert_eq!(cleaned.filled.len(), 1);
    assert_eq!(cleaned.failures[0].code, "UNSUPPORTED_STRATEGY");
    assert_eq!(cleaned.dataset.records()[2].value("city"), &FieldValue::Missing);
}

#[test]
fn test_forward_fill_example() {
    let ds: Dataset = [None, None, Some("5"), None, Some("9")]
        .into_iter()
        .map(|v| Record::from_pairs([("v", FieldValue::from(v))]))
        .collect();
    let config = FillConfig::builder()
        .strategy(FillStrategy::ForwardFill)
        .column("v")
        .build()
        .unwrap();

    let cleaned = datamend::clean(&ds, &config).unwrap();
    let values: Vec<String> = cleaned
        .dataset
        .column_values("v")
        .map(|v| v.to_string())
        .collect();
    assert_eq!(values, vec!["5", "5", "5", "5", "9"]);
}

#[test]
fn test_fill_request_from_json_fixture() {
    let raw = std::fs::read_to_string(fixtures_path().join("fill_request.json")).unwrap();
    let config: FillConfig = serde_json::from_str(&raw).unwrap();
    assert_eq!(config.strategy, FillStrategy::ForwardFill);

    let cleaned = datamend::clean(&load_fixture("students.csv"), &config).unwrap();

    // Row 3 still lacks math_score
    assert_eq!(cleaned.rows_removed, 1);
    assert_eq!(cleaned.dataset.len(), 13);
    assert_eq!(cleaned.dataset.records()[3].value("hours"), &FieldValue::from("7"));
}

#[test]
fn test_custom_value_fill() {
    let config = FillConfig::builder()
        .strategy(FillStrategy::Custom)
        .column("city")
        .custom_value("Unknown")
        .build()
        .unwrap();

    let cleaned = datamend::clean(&load_fixture("students.csv"), &config).unwrap();
    assert_eq!(
        cleaned.dataset.records()[2].value("city"),
        &FieldValue::from("Unknown")
    );
}

// ============================================================================
// Export
// ============================================================================

#[test]
fn test_export_round_trip_after_cleaning() {
    let ds = load_fixture("students.csv");
    datamend::diagnose(&ds).unwrap();

    let config = FillConfig::builder()
        .strategy(FillStrategy::Mean)
        .columns(["math_score", "hours"])
        .build()
        .unwrap();
    let cleaned = datamend::clean(&ds, &config).unwrap();

    let path = temp_file("students_clean.csv");
    io::write_csv(&cleaned.dataset, &path).unwrap();
    let reloaded = io::load_csv(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(reloaded.columns(), cleaned.dataset.columns());
    assert_eq!(stringified(&reloaded), stringified(&cleaned.dataset));
}

#[test]
fn test_cleaning_report_written_as_json() {
    let ds = load_fixture("students.csv");
    let config = FillConfig::builder()
        .strategy(FillStrategy::Mode)
        .columns(["math_score", "hours", "city"])
        .build()
        .unwrap();
    let cleaned = datamend::clean(&ds, &config).unwrap();
    let report =
        ReportGenerator::build_cleaning_report("students.csv", None, &ds, config.strategy, &cleaned);

    assert_eq!(report.summary.cells_filled, 3);
    assert_eq!(report.summary.cells_still_missing, 0);

    let dir = temp_file("reports");
    let path = ReportGenerator::new(dir.clone())
        .write_report_to_file(&report, "students")
        .unwrap();
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let _ = std::fs::remove_dir_all(&dir);

    assert_eq!(written["summary"]["strategy"], "mode");
    assert_eq!(written["filled"].as_array().map(Vec::len), Some(3));
}
