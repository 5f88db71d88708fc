use std::time::Duration;

use reqwest::multipart::{Form, Part};

use crate::error::{PipelineError, Result};
use crate::models::Submission;

/// HTTP client for the external sales scoring service. One submission is
/// scored in a single request; retrying is left to the caller.
pub struct PredictionClient {
    client: reqwest::Client,
    endpoint: String,
}

impl PredictionClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|source| PipelineError::ServiceUnavailable { source })?;
        Ok(Self {
            client,
            endpoint: format!("{}/predict_csv", base_url.trim_end_matches('/')),
        })
    }

    /// Upload the submission's CSV and return one predicted value per data
    /// row, positionally aligned with the input.
    pub async fn predict(&self, submission: &Submission) -> Result<Vec<f64>> {
        let part = Part::bytes(submission.csv.clone()).file_name(format!("{}.csv", submission.id));
        let form = Form::new().part("csv", part);

        tracing::debug!(
            endpoint = %self.endpoint,
            rows = submission.records.len(),
            "requesting predictions"
        );
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|source| PipelineError::ServiceUnavailable { source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, "prediction request failed");
            return Err(PipelineError::PredictionService { status, body });
        }

        let body = response
            .text()
            .await
            .map_err(|source| PipelineError::ServiceUnavailable { source })?;
        decode_predictions(&body, submission.records.len())
    }
}

/// Decode the service response, holding it to one numeric value per row.
pub fn decode_predictions(body: &str, rows: usize) -> Result<Vec<f64>> {
    let predictions: Vec<f64> =
        serde_json::from_str(body).map_err(|e| PipelineError::InvalidPredictions {
            reason: e.to_string(),
        })?;
    if predictions.len() != rows {
        return Err(PipelineError::Alignment {
            rows,
            predictions: predictions.len(),
        });
    }
    Ok(predictions)
}
