use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::workflows::jotform::{ApplicationForm, FileAttachment, SkippedFile, SubmissionReceipt};

pub const INTAKE_EMAIL: &str = "intake@americanguardianhomehealth.com";
pub const SUPPORT_PHONE: &str = "+1 (916) 573-3231";

/// Body of `POST /api/v1/applications`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRequest {
    pub form: ApplicationForm,
    #[serde(default)]
    pub attachments: Vec<AttachmentUpload>,
}

/// File as the browser uploads it: base64 text, optionally still wearing its data-URL prefix.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentUpload {
    pub name: String,
    #[serde(default)]
    pub mime_type: String,
    pub content_base64: String,
}

impl AttachmentUpload {
    pub fn decode(&self) -> Result<FileAttachment, base64::DecodeError> {
        let content = self.content_base64.trim();
        let content = match content.split_once(";base64,") {
            Some((prefix, data)) if prefix.starts_with("data:") => data,
            _ => content,
        };
        let bytes = STANDARD.decode(content)?;
        Ok(FileAttachment::new(
            self.name.clone(),
            self.mime_type.clone(),
            bytes,
        ))
    }
}

impl std::fmt::Debug for AttachmentUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttachmentUpload")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("content_len", &self.content_base64.len())
            .finish()
    }
}

/// 202 response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationAccepted {
    pub submission_id: String,
    pub attachments_skipped: Vec<SkippedFile>,
    pub message: String,
}

impl From<SubmissionReceipt> for ApplicationAccepted {
    fn from(receipt: SubmissionReceipt) -> Self {
        let message = success_message(&receipt.skipped_files);
        Self {
            submission_id: receipt.submission_id,
            attachments_skipped: receipt.skipped_files,
            message,
        }
    }
}

pub fn success_message(skipped: &[SkippedFile]) -> String {
    if skipped.is_empty() {
        return "Application submitted successfully!".to_string();
    }

    let names = skipped
        .iter()
        .map(|file| file.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Application submitted successfully! Note: the following file(s) could not be uploaded (max 2MB, one file per application): {names}. Please email your resume separately to {INTAKE_EMAIL}"
    )
}

pub fn failure_message() -> String {
    format!("Failed to submit application. Please try again or contact support at {SUPPORT_PHONE}")
}
