//! CSV loading and saving for datasets.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use audit::{AuditError, CellValue, Dataset};
use tracing::debug;

/// Error type for data loading operations.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse CSV: {0}")]
    CsvError(String),

    #[error("Failed to write CSV: {0}")]
    WriteError(String),

    #[error("Invalid dataset: {0}")]
    Dataset(#[from] AuditError),
}

/// Load a dataset from a CSV file with a header row.
pub fn load_csv_file(path: &Path) -> Result<Dataset, LoadError> {
    let file = File::open(path)
        .map_err(|e| LoadError::FileNotFound(format!("{}: {}", path.display(), e)))?;
    let dataset = read_csv(BufReader::new(file))?;
    debug!(
        path = %path.display(),
        rows = dataset.len(),
        columns = dataset.column_count(),
        "csv loaded"
    );
    Ok(dataset)
}

/// Read CSV from any reader. Every record must have one cell per header.
pub fn read_csv<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let mut reader = csv::Reader::from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| LoadError::CsvError(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect::<Vec<_>>();

    let mut dataset = Dataset::new(headers);
    for result in reader.records() {
        let record = result.map_err(|e| LoadError::CsvError(e.to_string()))?;
        dataset.push_row(record.iter().map(parse_cell).collect())?;
    }
    Ok(dataset)
}

/// Type one raw CSV field.
///
/// Fields are trimmed and thousands separators removed before parsing;
/// anything that is not a finite number stays text.
pub fn parse_cell(raw: &str) -> CellValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CellValue::Empty;
    }
    let digits: String = trimmed.chars().filter(|&c| c != ',').collect();
    match digits.parse::<f64>() {
        Ok(v) if v.is_finite() => CellValue::Number(v),
        _ => CellValue::Text(trimmed.to_string()),
    }
}

/// Write a dataset as CSV with a header row.
pub fn save_csv_file(path: &Path, dataset: &Dataset) -> Result<(), LoadError> {
    let mut writer =
        csv::Writer::from_path(path).map_err(|e| LoadError::WriteError(e.to_string()))?;

    writer
        .write_record(dataset.columns())
        .map_err(|e| LoadError::WriteError(e.to_string()))?;
    for row in dataset.rows() {
        let fields = row.cells().iter().map(|cell| match cell {
            CellValue::Number(v) => v.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Empty => String::new(),
        });
        writer
            .write_record(fields)
            .map_err(|e| LoadError::WriteError(e.to_string()))?;
    }
    writer
        .flush()
        .map_err(|e| LoadError::WriteError(e.to_string()))
}
