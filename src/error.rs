use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Failures across ingestion, prediction, and aggregation. Every variant is
/// a recoverable, per-submission outcome; none should take the process down.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("prediction service unreachable: {source}")]
    ServiceUnavailable { source: reqwest::Error },
    #[error("prediction service returned {status}: {body}")]
    PredictionService {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("prediction response is not a numeric series: {reason}")]
    InvalidPredictions { reason: String },
    #[error("{predictions} predictions returned for {rows} rows")]
    Alignment { rows: usize, predictions: usize },
    #[error("dataset is missing required columns: {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },
    #[error("malformed row at line {line}: {message}")]
    MalformedRow { line: usize, message: String },
    #[error("unrecognized month-year bucket '{key}'")]
    UnknownMonth { key: String },
    #[error("no records match the current filter")]
    NoData,
    #[error(transparent)]
    Io(#[from] io::Error),
}
