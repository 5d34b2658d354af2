//! Training Dataset
//!
//! Reads the RSNA bone-age training CSV. Only the `boneage` and `male`
//! columns are used; any other columns (such as `id`) are ignored.

use std::io::Read;
use std::path::Path;

use super::error::{DatasetError, DatasetResult};

const BONEAGE_COLUMN: &str = "boneage";
const MALE_COLUMN: &str = "male";

/// One subject of the training set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetRow {
    /// Bone age in months
    pub boneage: u32,
    pub male: bool,
}

impl DatasetRow {
    pub fn new(boneage: u32, male: bool) -> Self {
        Self { boneage, male }
    }
}

/// Read every row of the dataset file at `path`
pub fn read_dataset(path: &Path) -> DatasetResult<Vec<DatasetRow>> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| DatasetError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    read_records(reader)
}

/// Read rows from any CSV source with a header row
pub fn read_dataset_from<R: Read>(source: R) -> DatasetResult<Vec<DatasetRow>> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    read_records(reader)
}

fn read_records<R: Read>(mut reader: csv::Reader<R>) -> DatasetResult<Vec<DatasetRow>> {
    let headers = reader.headers()?.clone();
    let boneage_idx = column_index(&headers, BONEAGE_COLUMN)?;
    let male_idx = column_index(&headers, MALE_COLUMN)?;

    let mut rows = Vec::new();
    for (line_num, result) in reader.records().enumerate() {
        // Header is line 1
        let line = line_num + 2;
        let record = result?;

        let boneage = parse_boneage(record.get(boneage_idx).unwrap_or(""), line)?;
        let male = parse_male(record.get(male_idx).unwrap_or(""), line)?;

        rows.push(DatasetRow { boneage, male });
    }

    Ok(rows)
}

fn column_index(headers: &csv::StringRecord, name: &'static str) -> DatasetResult<usize> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .ok_or(DatasetError::MissingColumn(name))
}

/// Months are integral; "36.0" is accepted, "36.5" is not.
fn parse_boneage(value: &str, line: usize) -> DatasetResult<u32> {
    if let Ok(months) = value.parse::<u32>() {
        return Ok(months);
    }

    match value.parse::<f64>() {
        Ok(months) if months >= 0.0 && months.fract() == 0.0 && months <= u32::MAX as f64 => {
            Ok(months as u32)
        }
        _ => Err(invalid(line, BONEAGE_COLUMN, value)),
    }
}

fn parse_male(value: &str, line: usize) -> DatasetResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(invalid(line, MALE_COLUMN, value)),
    }
}

fn invalid(line: usize, column: &'static str, value: &str) -> DatasetError {
    DatasetError::InvalidValue {
        line,
        column,
        value: value.to_string(),
    }
}
