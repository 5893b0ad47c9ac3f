use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::intake::{ApplicationIntakeService, ApplicationRequest, AttachmentUpload};
use crate::workflows::jotform::{
    ApplicationForm, AttestationAnswer, EncodedSubmission, FieldMapping, SemanticField,
    SubmissionError, SubmissionGateway, SubmissionReceipt,
};

pub(super) const FORM_ID: &str = "251234567890";

pub(super) fn stage1_mapping() -> Arc<FieldMapping> {
    Arc::new(FieldMapping::from_ids([
        (SemanticField::FullName, "3"),
        (SemanticField::Email, "4"),
        (SemanticField::Phone, "5"),
        (SemanticField::Address, "6"),
        (SemanticField::RoleAppliedFor, "11"),
        (SemanticField::LicenseState, "14"),
        (SemanticField::LicenseNumber, "15"),
        (SemanticField::LicenseExpiry, "16"),
        (SemanticField::Availability, "19"),
        (SemanticField::WorkAuthorizedUs, "20"),
        (SemanticField::ReliableTransportation, "21"),
        (SemanticField::EmploymentHistory, "22"),
        (SemanticField::Reference1Name, "29"),
        (SemanticField::Reference1Email, "30"),
        (SemanticField::Reference1Phone, "31"),
        (SemanticField::Reference2Name, "32"),
        (SemanticField::Reference2Email, "33"),
        (SemanticField::Reference2Phone, "34"),
        (SemanticField::Attestation, "37"),
        (SemanticField::Resume, "38"),
    ]))
}

pub(super) fn complete_form() -> ApplicationForm {
    ApplicationForm {
        first_name: Some("Jane".into()),
        last_name: Some("Doe".into()),
        email: Some("jane@example.com".into()),
        phone: Some("916-555-0100".into()),
        address: Some("1 Main St".into()),
        city: Some("Sacramento".into()),
        state: Some("CA".into()),
        zip_code: Some("95814".into()),
        role_applied_for: Some("RN – Registered Nurse (CA)".into()),
        license_state: Some("CA".into()),
        license_number: Some("RN-1234".into()),
        license_expiry: Some("2027-06-30".into()),
        work_authorized_us: Some("Yes".into()),
        reliable_transportation: Some("Yes".into()),
        reference1_first_name: Some("Ann".into()),
        reference1_last_name: Some("Lee".into()),
        reference2_first_name: Some("Bo".into()),
        reference2_last_name: Some("Kim".into()),
        reference2_email: Some("bo@example.com".into()),
        attestation: Some(AttestationAnswer::Flag(true)),
        ..ApplicationForm::default()
    }
}

pub(super) fn request() -> ApplicationRequest {
    ApplicationRequest {
        form: complete_form(),
        attachments: Vec::new(),
    }
}

pub(super) fn upload(name: &str, content_base64: &str) -> AttachmentUpload {
    AttachmentUpload {
        name: name.to_string(),
        mime_type: "application/pdf".to_string(),
        content_base64: content_base64.to_string(),
    }
}

/// Records every submission and answers with a fixed receipt.
#[derive(Default)]
pub(super) struct RecordingGateway {
    calls: Mutex<Vec<(String, EncodedSubmission)>>,
}

impl RecordingGateway {
    pub(super) fn calls(&self) -> Vec<(String, EncodedSubmission)> {
        self.calls.lock().expect("gateway mutex poisoned").clone()
    }
}

impl SubmissionGateway for RecordingGateway {
    async fn submit(
        &self,
        form_id: &str,
        submission: &EncodedSubmission,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        self.calls
            .lock()
            .expect("gateway mutex poisoned")
            .push((form_id.to_string(), submission.clone()));
        Ok(SubmissionReceipt {
            submission_id: "6001".to_string(),
            url: None,
            skipped_files: submission.skipped_files.clone(),
        })
    }
}

/// Vendor that refuses everything.
pub(super) struct RejectingGateway;

impl SubmissionGateway for RejectingGateway {
    async fn submit(
        &self,
        _form_id: &str,
        _submission: &EncodedSubmission,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        Err(SubmissionError::Rejected {
            status: 401,
            message: "You're not authorized to use (/form-id/submissions) ".to_string(),
        })
    }
}

pub(super) fn build_service() -> (
    Arc<ApplicationIntakeService<RecordingGateway>>,
    Arc<RecordingGateway>,
) {
    let gateway = Arc::new(RecordingGateway::default());
    let service = Arc::new(ApplicationIntakeService::new(
        stage1_mapping(),
        gateway.clone(),
        Some(FORM_ID.to_string()),
    ));
    (service, gateway)
}

pub(super) async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}
