use std::future::Future;
use std::time::Instant;

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::encoder::{EncodedSubmission, SkippedFile};
use super::schema::{parse_questions, FormFieldDescriptor, SchemaError};
use crate::config::{ConfigError, JotformSettings};

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const VENDOR_OK: i64 = 200;

/// What the vendor handed back for an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub submission_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub skipped_files: Vec<SkippedFile>,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("form id is required")]
    MissingFormId,
    #[error("could not reach Jotform: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Jotform rejected the submission ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("unexpected Jotform response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaFetchError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("form id is required")]
    MissingFormId,
    #[error("could not reach Jotform: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Jotform API error ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("questions response is not JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Outbound seam for the intake service so it can run against a fake vendor.
pub trait SubmissionGateway: Send + Sync {
    fn submit(
        &self,
        form_id: &str,
        submission: &EncodedSubmission,
    ) -> impl Future<Output = Result<SubmissionReceipt, SubmissionError>> + Send;
}

/// Jotform REST client. Holds a pooled `reqwest::Client`; cheap to clone.
#[derive(Clone)]
pub struct JotformClient {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl JotformClient {
    pub fn new(settings: &JotformSettings) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;

        Ok(Self {
            http,
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
        })
    }

    fn api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)
    }

    /// Post an encoded submission. No retry: a failure is returned to the caller as-is.
    pub async fn submit_encoded(
        &self,
        form_id: &str,
        submission: &EncodedSubmission,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let api_key = self.api_key()?;
        let form_id = form_id.trim();
        if form_id.is_empty() {
            return Err(SubmissionError::MissingFormId);
        }

        let url = format!("{}/form/{form_id}/submissions", self.api_url);
        debug!(
            form_id,
            fields = submission.fields.len(),
            body = %submission.redacted_preview(),
            "submitting to Jotform"
        );

        let started = Instant::now();
        let response = self
            .http
            .post(&url)
            .query(&[("apiKey", api_key)])
            .header(CONTENT_TYPE, FORM_URLENCODED)
            .body(submission.to_form_body())
            .send()
            .await?;

        let receipt = self.handle_submission_response(response, submission).await?;
        info!(
            form_id,
            submission_id = %receipt.submission_id,
            skipped = receipt.skipped_files.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Jotform accepted submission"
        );
        Ok(receipt)
    }

    async fn handle_submission_response(
        &self,
        response: reqwest::Response,
        submission: &EncodedSubmission,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let status = response.status();
        let text = response.text().await?;
        let body: Option<Value> = serde_json::from_str(&text).ok();

        if !status.is_success() {
            let message = body
                .as_ref()
                .and_then(vendor_message)
                .unwrap_or_else(|| text.trim().to_string());
            warn!(status = status.as_u16(), %message, "Jotform returned an error status");
            return Err(SubmissionError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body = body.ok_or_else(|| SubmissionError::InvalidResponse(truncate(&text)))?;
        let code = body.get("responseCode").and_then(Value::as_i64);
        if code != Some(VENDOR_OK) {
            let message = vendor_message(&body).unwrap_or_else(|| "Submission failed".to_string());
            warn!(response_code = ?code, %message, "Jotform reported a failed submission");
            return Err(SubmissionError::Rejected {
                status: code
                    .and_then(|value| u16::try_from(value).ok())
                    .unwrap_or(status.as_u16()),
                message,
            });
        }

        let content = body.get("content");
        let submission_id = content
            .and_then(|content| content.get("submissionID"))
            .and_then(scalar_text)
            .ok_or_else(|| {
                SubmissionError::InvalidResponse("response has no submissionID".to_string())
            })?;
        let url = content
            .and_then(|content| content.get("URL"))
            .and_then(scalar_text);

        Ok(SubmissionReceipt {
            submission_id,
            url,
            skipped_files: submission.skipped_files.clone(),
        })
    }

    /// Fetch the live form's fields for the matcher.
    pub async fn form_questions(
        &self,
        form_id: &str,
    ) -> Result<Vec<FormFieldDescriptor>, SchemaFetchError> {
        let api_key = self.api_key()?;
        let form_id = form_id.trim();
        if form_id.is_empty() {
            return Err(SchemaFetchError::MissingFormId);
        }

        let url = format!("{}/form/{form_id}/questions", self.api_url);
        debug!(form_id, "fetching form questions");

        let response = self.http.get(&url).header("APIKEY", api_key).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status != StatusCode::OK {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .as_ref()
                .and_then(vendor_message)
                .unwrap_or_else(|| truncate(&text));
            return Err(SchemaFetchError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = serde_json::from_str(&text)?;
        if let Some(code) = body.get("responseCode").and_then(Value::as_i64) {
            if code != VENDOR_OK {
                return Err(SchemaFetchError::Rejected {
                    status: u16::try_from(code).unwrap_or(status.as_u16()),
                    message: vendor_message(&body).unwrap_or_else(|| "Unknown error".to_string()),
                });
            }
        }

        let descriptors = parse_questions(&body)?;
        info!(form_id, fields = descriptors.len(), "fetched form questions");
        Ok(descriptors)
    }
}

impl SubmissionGateway for JotformClient {
    async fn submit(
        &self,
        form_id: &str,
        submission: &EncodedSubmission,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        self.submit_encoded(form_id, submission).await
    }
}

impl std::fmt::Debug for JotformClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JotformClient")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

fn vendor_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn truncate(text: &str) -> String {
    const LIMIT: usize = 200;
    let trimmed = text.trim();
    match trimmed.char_indices().nth(LIMIT) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}
