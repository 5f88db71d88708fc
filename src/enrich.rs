use crate::error::{PipelineError, Result};
use crate::models::{EnrichedRecord, SalesRecord};

/// Bucket label for a record: literal month name, a single space, and the
/// decimal year. This exact form is what chronological sorting parses later.
pub fn month_year_key(month: &str, year: i32) -> String {
    format!("{month} {year}")
}

/// Attach predictions to their rows positionally. Counts must match
/// exactly; a short or long prediction series rejects the whole dataset
/// rather than silently truncating it.
pub fn merge(records: Vec<SalesRecord>, predictions: Vec<f64>) -> Result<Vec<EnrichedRecord>> {
    if records.len() != predictions.len() {
        return Err(PipelineError::Alignment {
            rows: records.len(),
            predictions: predictions.len(),
        });
    }

    Ok(records
        .into_iter()
        .zip(predictions)
        .map(|(record, predicted_sales)| {
            let month_year = month_year_key(&record.month, record.year);
            EnrichedRecord {
                record,
                predicted_sales,
                month_year,
            }
        })
        .collect())
}
