use serde::{Deserialize, Serialize};
use std::fmt;

/// Flat application form as the site collects it. Every text answer is optional here;
/// required-ness is enforced by intake validation, not by the encoder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub role_applied_for: Option<String>,
    pub license_type: Option<String>,
    pub license_state: Option<String>,
    pub license_number: Option<String>,
    pub license_expiry: Option<String>,
    pub availability: Option<String>,
    #[serde(rename = "workAuthorizedUS")]
    pub work_authorized_us: Option<String>,
    pub reliable_transportation: Option<String>,
    pub employment_history: Option<String>,
    #[serde(rename = "reference1FirstName")]
    pub reference1_first_name: Option<String>,
    #[serde(rename = "reference1LastName")]
    pub reference1_last_name: Option<String>,
    #[serde(rename = "reference1Phone")]
    pub reference1_phone: Option<String>,
    #[serde(rename = "reference1Email")]
    pub reference1_email: Option<String>,
    #[serde(rename = "reference2FirstName")]
    pub reference2_first_name: Option<String>,
    #[serde(rename = "reference2LastName")]
    pub reference2_last_name: Option<String>,
    #[serde(rename = "reference2Phone")]
    pub reference2_phone: Option<String>,
    #[serde(rename = "reference2Email")]
    pub reference2_email: Option<String>,
    pub attestation: Option<AttestationAnswer>,
}

/// The attestation box arrives as a JSON boolean from some call sites and as "Yes" from others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttestationAnswer {
    Flag(bool),
    Text(String),
}

impl AttestationAnswer {
    pub fn is_affirmed(&self) -> bool {
        match self {
            Self::Flag(flag) => *flag,
            Self::Text(text) => text == "Yes",
        }
    }
}

impl From<bool> for AttestationAnswer {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// Raw file selected by the applicant.
#[derive(Clone, PartialEq, Eq)]
pub struct FileAttachment {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FileAttachment {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

impl fmt::Debug for FileAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileAttachment")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size_bytes", &self.bytes.len())
            .finish()
    }
}

/// Everything one submission carries. Created per request and dropped after the vendor call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionPayload {
    pub form: ApplicationForm,
    /// Only the first attachment that passes the size guard is sent; see the encoder.
    pub attachments: Vec<FileAttachment>,
}

impl SubmissionPayload {
    pub fn new(form: ApplicationForm) -> Self {
        Self {
            form,
            attachments: Vec::new(),
        }
    }

    pub fn with_attachment(mut self, attachment: FileAttachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}
