//! Dataset input and output.
//!
//! Loading goes through polars so that quoting, embedded newlines and header
//! handling match the rest of the ecosystem. Every column is read as text;
//! the record model decides what is numeric later.

use crate::error::{Result, ResultExt};
use crate::types::{Dataset, FieldValue, Record};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::{AnyValue, DataFrame, SerReader};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Load a CSV file with a header row into a [`Dataset`].
///
/// All columns are read as strings. Empty fields become
/// [`FieldValue::Missing`].
pub fn load_csv(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    debug!("Loading CSV from {}", path.display());

    let df = CsvReadOptions::default()
        .with_has_header(true)
        // Zero inference rows: every column stays a string column
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))
        .context(format!("Opening {}", path.display()))?
        .finish()
        .context(format!("Parsing {}", path.display()))?;

    let dataset = dataset_from_dataframe(&df)?;
    info!(
        "Loaded {} rows x {} columns from {}",
        dataset.len(),
        df.width(),
        path.display()
    );
    Ok(dataset)
}

/// Convert a polars frame into records, one per row, keys in column order.
pub fn dataset_from_dataframe(df: &DataFrame) -> Result<Dataset> {
    let series: Vec<_> = df
        .get_columns()
        .iter()
        .map(|col| col.as_materialized_series())
        .collect();

    let mut records = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let mut record = Record::new();
        for s in &series {
            let value = s
                .get(idx)
                .context(format!("Reading row {} of '{}'", idx + 1, s.name()))?;
            record.insert(s.name().to_string(), field_from_any(value));
        }
        records.push(record);
    }

    Ok(Dataset::new(records))
}

fn field_from_any(value: AnyValue<'_>) -> FieldValue {
    match value {
        AnyValue::Null => FieldValue::Missing,
        AnyValue::String(s) => FieldValue::Text(s.to_string()),
        AnyValue::StringOwned(s) => FieldValue::Text(s.to_string()),
        AnyValue::Boolean(b) => FieldValue::Text(b.to_string()),
        other => match other.extract::<f64>() {
            Some(n) => FieldValue::Number(n),
            None => FieldValue::Text(other.to_string()),
        },
    }
}

/// Render a dataset as delimited text.
///
/// The header is the first record's keys joined with commas. Every value is
/// wrapped in double quotes; embedded quotes are doubled. `Missing` renders
/// as `""`. Rows are separated by `\n` with no trailing newline.
pub fn export_csv(dataset: &Dataset) -> String {
    let columns = dataset.columns();
    let mut lines = Vec::with_capacity(dataset.len() + 1);
    lines.push(columns.join(","));

    for record in dataset {
        let row: Vec<String> = columns
            .iter()
            .map(|column| quote(&record.value(column).to_string()))
            .collect();
        lines.push(row.join(","));
    }

    lines.join("\n")
}

/// Write [`export_csv`] output to `path`, creating parent directories.
pub fn write_csv(dataset: &Dataset, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, export_csv(dataset))?;
    info!("Dataset saved: {}", path.display());
    Ok(())
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
