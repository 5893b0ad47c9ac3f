use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{ApplicationAccepted, ApplicationRequest};
use super::validation::{validate_stage1, ValidationFailure};
use crate::config::ConfigError;
use crate::workflows::jotform::{
    EncodedSubmission, FieldMapping, FileAttachment, SubmissionEncoder, SubmissionError,
    SubmissionGateway, SubmissionPayload,
};

/// Validates, encodes and forwards stage-1 applications to the vendor.
pub struct ApplicationIntakeService<G> {
    encoder: SubmissionEncoder,
    gateway: Arc<G>,
    form_id: Option<String>,
}

impl<G> ApplicationIntakeService<G>
where
    G: SubmissionGateway + 'static,
{
    pub fn new(mapping: Arc<FieldMapping>, gateway: Arc<G>, form_id: Option<String>) -> Self {
        Self {
            encoder: SubmissionEncoder::new(mapping),
            gateway,
            form_id,
        }
    }

    /// Submit one application. A vendor failure is returned once and never retried.
    pub async fn submit(
        &self,
        request: ApplicationRequest,
    ) -> Result<ApplicationAccepted, IntakeError> {
        validate_stage1(&request.form)?;

        let form_id = self
            .form_id
            .as_deref()
            .ok_or(ConfigError::MissingFormId("JOTFORM_FORM_ID_STAGE1"))?;

        let attachments = request
            .attachments
            .iter()
            .map(|upload| {
                upload
                    .decode()
                    .map_err(|source| IntakeError::InvalidAttachment {
                        name: upload.name.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<FileAttachment>, IntakeError>>()?;

        let payload = SubmissionPayload {
            form: request.form,
            attachments,
        };
        let encoded = self.encode(&payload);

        let receipt = self.gateway.submit(form_id, &encoded).await?;
        info!(
            submission_id = %receipt.submission_id,
            attachments_skipped = receipt.skipped_files.len(),
            "application forwarded"
        );
        Ok(receipt.into())
    }

    fn encode(&self, payload: &SubmissionPayload) -> EncodedSubmission {
        let encoded = self.encoder.encode(payload);
        for dropped in &encoded.dropped_fields {
            warn!(field = %dropped.field, reason = ?dropped.reason, "answer not sent to Jotform");
        }
        encoded
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
    #[error("attachment '{name}' is not valid base64")]
    InvalidAttachment {
        name: String,
        #[source]
        source: base64::DecodeError,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}
