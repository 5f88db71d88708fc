use std::path::Path;

use uuid::Uuid;

use crate::error::{PipelineError, Result};
use crate::models::{SalesRecord, Submission};

pub const REQUIRED_COLUMNS: [&str; 11] = [
    "Month",
    "Year",
    "Country",
    "Channel",
    "Product Class",
    "Sales Team",
    "Distributor",
    "Customer Name",
    "Product Name",
    "Quantity",
    "Price",
];

/// Read an uploaded CSV into a uniquely identified in-memory submission.
/// Schema problems are caught here, before any network call is made.
pub fn load_submission(path: &Path) -> Result<Submission> {
    let csv = std::fs::read(path)?;
    let records = parse_records(&csv)?;
    Ok(Submission {
        id: Uuid::new_v4(),
        csv,
        records,
    })
}

pub fn parse_records(csv: &[u8]) -> Result<Vec<SalesRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(csv);

    let headers = reader
        .headers()
        .map_err(|e| PipelineError::MalformedRow {
            line: 1,
            message: e.to_string(),
        })?
        .clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(PipelineError::MissingColumns { missing });
    }

    let mut records = Vec::new();
    for (index, result) in reader.deserialize::<SalesRecord>().enumerate() {
        let record = result.map_err(|e| PipelineError::MalformedRow {
            line: index + 2,
            message: e.to_string(),
        })?;
        records.push(record);
    }

    Ok(records)
}
