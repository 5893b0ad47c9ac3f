use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Datelike, NaiveDate};
use serde::Serialize;
use tracing::{debug, warn};
use url::form_urlencoded;

use super::mapping::{FieldMapping, MappedField, SemanticField};
use super::payload::{ApplicationForm, FileAttachment, SubmissionPayload};

/// Raw attachment ceiling. The body is URL-encoded form data, so large files cannot ride along.
pub const MAX_ATTACHMENT_BYTES: usize = 2 * 1024 * 1024;
/// Ceiling on the base64 text of an attachment.
pub const MAX_ENCODED_ATTACHMENT_BYTES: usize = 3 * 1024 * 1024;

/// Sub-input of a composite vendor control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositePart {
    First,
    Last,
    AddrLine1,
    City,
    State,
    Postal,
    Day,
    Month,
    Year,
}

impl CompositePart {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Last => "last",
            Self::AddrLine1 => "addr_line1",
            Self::City => "city",
            Self::State => "state",
            Self::Postal => "postal",
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

/// One key/value pair of the vendor submission body.
#[derive(Clone, PartialEq, Eq)]
pub enum WireField {
    Scalar {
        field_id: String,
        value: String,
    },
    Composite {
        field_id: String,
        part: CompositePart,
        value: String,
    },
    Indexed {
        field_id: String,
        index: u32,
        value: String,
    },
    File {
        field_id: String,
        file_name: String,
        data_url: String,
    },
}

impl WireField {
    pub fn field_id(&self) -> &str {
        match self {
            Self::Scalar { field_id, .. }
            | Self::Composite { field_id, .. }
            | Self::Indexed { field_id, .. }
            | Self::File { field_id, .. } => field_id,
        }
    }

    pub fn key(&self) -> String {
        match self {
            Self::Scalar { field_id, .. } | Self::File { field_id, .. } => {
                format!("submission[{field_id}]")
            }
            Self::Composite { field_id, part, .. } => {
                format!("submission[{field_id}][{}]", part.as_str())
            }
            Self::Indexed { field_id, index, .. } => format!("submission[{field_id}][{index}]"),
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Scalar { value, .. }
            | Self::Composite { value, .. }
            | Self::Indexed { value, .. } => value,
            Self::File { data_url, .. } => data_url,
        }
    }
}

impl fmt::Debug for WireField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File {
                field_id,
                file_name,
                data_url,
            } => f
                .debug_struct("File")
                .field("field_id", field_id)
                .field("file_name", file_name)
                .field("data_url_len", &data_url.len())
                .finish(),
            other => write!(f, "{}={:?}", other.key(), other.value()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    TooLarge,
    EncodedTooLarge,
    AdditionalAttachment,
}

impl SkipReason {
    pub fn describe(self) -> &'static str {
        match self {
            Self::TooLarge => "File too large (max 2MB)",
            Self::EncodedTooLarge => "Base64 encoded size too large",
            Self::AdditionalAttachment => "Only one attachment is sent per submission",
        }
    }
}

/// An attachment that was not sent. The submission itself still goes through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedFile {
    pub name: String,
    pub size_bytes: usize,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum DropReason {
    /// The reviewed mapping has no entry for this field.
    Unmapped,
    /// The licence expiry could not be read as a calendar date.
    UnparsableDate { raw: String },
}

/// An answered field that produced no wire keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedField {
    pub field: SemanticField,
    pub reason: DropReason,
}

/// Output of the encoder for one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedSubmission {
    pub fields: Vec<WireField>,
    pub skipped_files: Vec<SkippedFile>,
    pub dropped_fields: Vec<DroppedField>,
}

impl EncodedSubmission {
    /// `application/x-www-form-urlencoded` body for the submissions endpoint.
    pub fn to_form_body(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for field in &self.fields {
            serializer.append_pair(&field.key(), field.value());
        }
        serializer.finish()
    }

    /// Body with file contents replaced by a placeholder, safe to log.
    pub fn redacted_preview(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for field in &self.fields {
            match field {
                WireField::File { file_name, .. } => {
                    let placeholder = format!("[base64 file data - {file_name}]");
                    serializer.append_pair(&field.key(), &placeholder);
                }
                other => {
                    serializer.append_pair(&other.key(), other.value());
                }
            }
        }
        serializer.finish()
    }

    pub fn field(&self, key: &str) -> Option<&WireField> {
        self.fields.iter().find(|field| field.key() == key)
    }

    pub fn has_attachment(&self) -> bool {
        self.fields
            .iter()
            .any(|field| matches!(field, WireField::File { .. }))
    }
}

/// What an answered semantic field contributes before it is bound to a vendor id.
enum FieldInput<'a> {
    Absent,
    Scalar(&'a str),
    Parts(Vec<(CompositePart, &'a str)>),
    Date(&'a str),
    Checked,
}

/// Turns submission payloads into vendor wire fields using the injected mapping table.
#[derive(Debug, Clone)]
pub struct SubmissionEncoder {
    mapping: Arc<FieldMapping>,
}

impl SubmissionEncoder {
    pub fn new(mapping: Arc<FieldMapping>) -> Self {
        Self { mapping }
    }

    /// Deterministic: the same payload and mapping always produce the same fields in the same order.
    pub fn encode(&self, payload: &SubmissionPayload) -> EncodedSubmission {
        let mut encoded = EncodedSubmission::default();

        for field in SemanticField::ALL {
            if field == SemanticField::Resume {
                self.encode_attachments(&payload.attachments, &mut encoded);
                continue;
            }

            let input = self.input_for(field, &payload.form);
            if matches!(input, FieldInput::Absent) {
                continue;
            }

            match self.mapping.get(field) {
                Some(mapped) => emit(field, mapped, input, &mut encoded),
                None => {
                    debug!(%field, "answered field has no mapping entry; dropped");
                    encoded.dropped_fields.push(DroppedField {
                        field,
                        reason: DropReason::Unmapped,
                    });
                }
            }
        }

        encoded
    }

    fn input_for<'a>(&self, field: SemanticField, form: &'a ApplicationForm) -> FieldInput<'a> {
        use SemanticField as F;

        match field {
            F::FullName => name_parts(&form.first_name, &form.last_name),
            F::Reference1Name => name_parts(&form.reference1_first_name, &form.reference1_last_name),
            F::Reference2Name => name_parts(&form.reference2_first_name, &form.reference2_last_name),
            F::Address => {
                let mut parts = Vec::new();
                push_part(&mut parts, CompositePart::AddrLine1, &form.address);
                for (part, source, own_field) in [
                    (CompositePart::City, &form.city, F::City),
                    (CompositePart::State, &form.state, F::State),
                    (CompositePart::Postal, &form.zip_code, F::ZipCode),
                ] {
                    if !self.mapping.is_claimed(own_field) {
                        push_part(&mut parts, part, source);
                    }
                }
                if parts.is_empty() {
                    FieldInput::Absent
                } else {
                    FieldInput::Parts(parts)
                }
            }
            F::City | F::State | F::ZipCode => {
                // Folded into the address control unless the form has a dedicated field.
                if !self.mapping.is_claimed(field) {
                    return FieldInput::Absent;
                }
                let source = match field {
                    F::City => &form.city,
                    F::State => &form.state,
                    _ => &form.zip_code,
                };
                scalar(source)
            }
            F::LicenseExpiry => match answered(&form.license_expiry) {
                Some(raw) => FieldInput::Date(raw),
                None => FieldInput::Absent,
            },
            F::Attestation => match &form.attestation {
                Some(answer) if answer.is_affirmed() => FieldInput::Checked,
                _ => FieldInput::Absent,
            },
            F::Email => scalar(&form.email),
            F::Phone => scalar(&form.phone),
            F::RoleAppliedFor => scalar(&form.role_applied_for),
            F::LicenseType => scalar(&form.license_type),
            F::LicenseState => scalar(&form.license_state),
            F::LicenseNumber => scalar(&form.license_number),
            F::Availability => scalar(&form.availability),
            F::WorkAuthorizedUs => scalar(&form.work_authorized_us),
            F::ReliableTransportation => scalar(&form.reliable_transportation),
            F::EmploymentHistory => scalar(&form.employment_history),
            F::Reference1Phone => scalar(&form.reference1_phone),
            F::Reference1Email => scalar(&form.reference1_email),
            F::Reference2Phone => scalar(&form.reference2_phone),
            F::Reference2Email => scalar(&form.reference2_email),
            F::Resume => FieldInput::Absent,
        }
    }

    fn encode_attachments(&self, attachments: &[FileAttachment], encoded: &mut EncodedSubmission) {
        let mut embedded: Option<(&FileAttachment, usize)> = None;

        for attachment in attachments {
            let size_bytes = attachment.size_bytes();
            let reason = if size_bytes > MAX_ATTACHMENT_BYTES {
                Some(SkipReason::TooLarge)
            } else if base64_len(size_bytes) > MAX_ENCODED_ATTACHMENT_BYTES {
                Some(SkipReason::EncodedTooLarge)
            } else if embedded.is_some() {
                Some(SkipReason::AdditionalAttachment)
            } else {
                None
            };

            match reason {
                Some(reason) => {
                    warn!(
                        file = %attachment.name,
                        size_kb = size_bytes / 1024,
                        reason = reason.describe(),
                        "attachment skipped"
                    );
                    encoded.skipped_files.push(SkippedFile {
                        name: attachment.name.clone(),
                        size_bytes,
                        reason,
                    });
                }
                None => embedded = Some((attachment, size_bytes)),
            }
        }

        let Some((attachment, size_bytes)) = embedded else {
            return;
        };

        let Some(mapped) = self.mapping.get(SemanticField::Resume) else {
            debug!(file = %attachment.name, "resume field unmapped; attachment dropped");
            encoded.dropped_fields.push(DroppedField {
                field: SemanticField::Resume,
                reason: DropReason::Unmapped,
            });
            return;
        };

        let data = STANDARD.encode(&attachment.bytes);
        debug!(
            file = %attachment.name,
            size_kb = size_bytes / 1024,
            encoded_kb = data.len() / 1024,
            "attachment embedded as base64"
        );
        encoded.fields.push(WireField::File {
            field_id: mapped.field_id.clone(),
            file_name: attachment.name.clone(),
            data_url: format!("data:{};base64,{data}", attachment_mime(&attachment.mime_type)),
        });
    }
}

fn emit(field: SemanticField, mapped: &MappedField, input: FieldInput<'_>, encoded: &mut EncodedSubmission) {
    let field_id = &mapped.field_id;
    match input {
        FieldInput::Absent => {}
        FieldInput::Scalar(value) => encoded.fields.push(WireField::Scalar {
            field_id: field_id.clone(),
            value: value.to_string(),
        }),
        FieldInput::Parts(parts) => {
            encoded
                .fields
                .extend(parts.into_iter().map(|(part, value)| WireField::Composite {
                    field_id: field_id.clone(),
                    part,
                    value: value.to_string(),
                }))
        }
        FieldInput::Date(raw) => match parse_calendar_date(raw) {
            Some(date) => {
                for (part, value) in [
                    (CompositePart::Day, format!("{:02}", date.day())),
                    (CompositePart::Month, format!("{:02}", date.month())),
                    (CompositePart::Year, format!("{:04}", date.year())),
                ] {
                    encoded.fields.push(WireField::Composite {
                        field_id: field_id.clone(),
                        part,
                        value,
                    });
                }
            }
            None => {
                warn!(%field, raw, "date answer is not a calendar date; omitted");
                encoded.dropped_fields.push(DroppedField {
                    field,
                    reason: DropReason::UnparsableDate {
                        raw: raw.to_string(),
                    },
                });
            }
        },
        FieldInput::Checked => {
            let value = "Yes".to_string();
            encoded.fields.push(match mapped.option_index {
                Some(index) => WireField::Indexed {
                    field_id: field_id.clone(),
                    index,
                    value,
                },
                None => WireField::Scalar {
                    field_id: field_id.clone(),
                    value,
                },
            });
        }
    }
}

fn answered(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|raw| !raw.trim().is_empty())
}

fn scalar(value: &Option<String>) -> FieldInput<'_> {
    match answered(value) {
        Some(raw) => FieldInput::Scalar(raw),
        None => FieldInput::Absent,
    }
}

fn push_part<'a>(parts: &mut Vec<(CompositePart, &'a str)>, part: CompositePart, value: &'a Option<String>) {
    if let Some(raw) = answered(value) {
        parts.push((part, raw));
    }
}

fn name_parts<'a>(first: &'a Option<String>, last: &'a Option<String>) -> FieldInput<'a> {
    let mut parts = Vec::with_capacity(2);
    push_part(&mut parts, CompositePart::First, first);
    push_part(&mut parts, CompositePart::Last, last);
    if parts.is_empty() {
        FieldInput::Absent
    } else {
        FieldInput::Parts(parts)
    }
}

/// Accepts the date input's `YYYY-MM-DD`, US `MM/DD/YYYY`, or an RFC 3339 timestamp.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%m/%d/%Y") {
        return Some(date);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.date_naive())
}

fn base64_len(raw_len: usize) -> usize {
    raw_len.div_ceil(3) * 4
}

fn attachment_mime(declared: &str) -> String {
    declared
        .trim()
        .parse::<mime::Mime>()
        .map(|parsed| parsed.essence_str().to_string())
        .unwrap_or_else(|_| mime::APPLICATION_PDF.essence_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::jotform::mapping::MappedField;
    use crate::workflows::jotform::payload::AttestationAnswer;
    use crate::workflows::jotform::schema::FieldType;

    fn encoder(pairs: &[(SemanticField, &str)]) -> SubmissionEncoder {
        SubmissionEncoder::new(Arc::new(FieldMapping::from_ids(
            pairs.iter().map(|(field, id)| (*field, *id)),
        )))
    }

    fn keys(encoded: &EncodedSubmission) -> Vec<String> {
        encoded.fields.iter().map(WireField::key).collect()
    }

    fn stage1_form() -> ApplicationForm {
        ApplicationForm {
            first_name: Some("Jane".into()),
            last_name: Some("Doe".into()),
            email: Some("jane@x.com".into()),
            attestation: Some(AttestationAnswer::Text("Yes".into())),
            ..ApplicationForm::default()
        }
    }

    #[test]
    fn end_to_end_body_matches_vendor_format() {
        let encoder = encoder(&[
            (SemanticField::FullName, "29"),
            (SemanticField::Email, "4"),
            (SemanticField::Attestation, "37"),
        ]);

        let encoded = encoder.encode(&SubmissionPayload::new(stage1_form()));

        assert_eq!(
            encoded.to_form_body(),
            "submission%5B29%5D%5Bfirst%5D=Jane&submission%5B29%5D%5Blast%5D=Doe&submission%5B4%5D=jane%40x.com&submission%5B37%5D=Yes"
        );
        assert!(encoded.dropped_fields.is_empty());
    }

    #[test]
    fn encoding_is_repeatable() {
        let encoder = encoder(&[
            (SemanticField::FullName, "3"),
            (SemanticField::Address, "6"),
            (SemanticField::LicenseExpiry, "16"),
            (SemanticField::Resume, "38"),
        ]);
        let mut form = stage1_form();
        form.address = Some("1 Main St".into());
        form.city = Some("Sacramento".into());
        form.license_expiry = Some("2027-03-09".into());
        let payload = SubmissionPayload::new(form)
            .with_attachment(FileAttachment::new("resume.pdf", "application/pdf", vec![7; 64]));

        let first = encoder.encode(&payload);
        let second = encoder.encode(&payload);

        assert_eq!(first, second);
        assert_eq!(first.to_form_body(), second.to_form_body());
    }

    #[test]
    fn name_expands_to_first_and_last_only() {
        let encoded = encoder(&[(SemanticField::FullName, "29")])
            .encode(&SubmissionPayload::new(stage1_form()));

        assert_eq!(keys(&encoded), vec!["submission[29][first]", "submission[29][last]"]);
        assert!(encoded.field("submission[29]").is_none());
    }

    #[test]
    fn address_collects_present_parts() {
        let form = ApplicationForm {
            address: Some("1 Main St".into()),
            city: Some("Sacramento".into()),
            state: Some("".into()),
            zip_code: Some("95814".into()),
            ..ApplicationForm::default()
        };
        let encoded = encoder(&[(SemanticField::Address, "6")]).encode(&SubmissionPayload::new(form));

        assert_eq!(
            keys(&encoded),
            vec![
                "submission[6][addr_line1]",
                "submission[6][city]",
                "submission[6][postal]"
            ]
        );
    }

    #[test]
    fn separately_mapped_city_is_not_folded_into_address() {
        let form = ApplicationForm {
            address: Some("1 Main St".into()),
            city: Some("Sacramento".into()),
            ..ApplicationForm::default()
        };
        let encoded = encoder(&[(SemanticField::Address, "6"), (SemanticField::City, "7")])
            .encode(&SubmissionPayload::new(form));

        assert_eq!(keys(&encoded), vec!["submission[6][addr_line1]", "submission[7]"]);
    }

    #[test]
    fn license_expiry_is_split_and_padded() {
        let form = ApplicationForm {
            license_expiry: Some("03/09/2027".into()),
            ..ApplicationForm::default()
        };
        let encoded = encoder(&[(SemanticField::LicenseExpiry, "16")])
            .encode(&SubmissionPayload::new(form));

        let values: Vec<(String, &str)> = encoded
            .fields
            .iter()
            .map(|field| (field.key(), field.value()))
            .collect();
        assert_eq!(
            values,
            vec![
                ("submission[16][day]".to_string(), "09"),
                ("submission[16][month]".to_string(), "03"),
                ("submission[16][year]".to_string(), "2027"),
            ]
        );
    }

    #[test]
    fn unparsable_date_is_omitted_and_recorded() {
        let form = ApplicationForm {
            license_expiry: Some("next spring".into()),
            ..ApplicationForm::default()
        };
        let encoded = encoder(&[(SemanticField::LicenseExpiry, "16")])
            .encode(&SubmissionPayload::new(form));

        assert!(encoded.fields.is_empty());
        assert_eq!(
            encoded.dropped_fields,
            vec![DroppedField {
                field: SemanticField::LicenseExpiry,
                reason: DropReason::UnparsableDate {
                    raw: "next spring".into()
                },
            }]
        );
    }

    #[test]
    fn attestation_never_sends_no() {
        let encoder = encoder(&[(SemanticField::Attestation, "37")]);

        let unchecked = ApplicationForm {
            attestation: Some(AttestationAnswer::Flag(false)),
            ..ApplicationForm::default()
        };
        assert!(encoder.encode(&SubmissionPayload::new(unchecked)).fields.is_empty());

        let checked = ApplicationForm {
            attestation: Some(AttestationAnswer::Flag(true)),
            ..ApplicationForm::default()
        };
        let encoded = encoder.encode(&SubmissionPayload::new(checked));
        assert_eq!(encoded.to_form_body(), "submission%5B37%5D=Yes");
    }

    #[test]
    fn attestation_uses_option_slot_when_mapped() {
        let mut mapping = FieldMapping::new();
        mapping.claim(
            SemanticField::Attestation,
            MappedField {
                field_id: "37".into(),
                matched_label: "iAttest".into(),
                field_type: FieldType::Checkbox,
                option_index: Some(0),
            },
        );
        let encoded = SubmissionEncoder::new(Arc::new(mapping))
            .encode(&SubmissionPayload::new(stage1_form()));

        assert_eq!(keys(&encoded), vec!["submission[37][0]"]);
    }

    #[test]
    fn attachment_at_limit_is_embedded_and_one_byte_over_is_skipped() {
        let encoder = encoder(&[(SemanticField::Resume, "38")]);

        let at_limit = SubmissionPayload::default().with_attachment(FileAttachment::new(
            "resume.pdf",
            "application/pdf",
            vec![0; MAX_ATTACHMENT_BYTES],
        ));
        let encoded = encoder.encode(&at_limit);
        assert!(encoded.skipped_files.is_empty());
        let file = encoded.field("submission[38]").expect("file embedded");
        assert!(file.value().starts_with("data:application/pdf;base64,AAAA"));

        let over = SubmissionPayload::default().with_attachment(FileAttachment::new(
            "resume.pdf",
            "application/pdf",
            vec![0; MAX_ATTACHMENT_BYTES + 1],
        ));
        let encoded = encoder.encode(&over);
        assert!(encoded.fields.is_empty());
        assert_eq!(
            encoded.skipped_files,
            vec![SkippedFile {
                name: "resume.pdf".into(),
                size_bytes: MAX_ATTACHMENT_BYTES + 1,
                reason: SkipReason::TooLarge,
            }]
        );
        assert!(!encoded.to_form_body().contains("submission%5B38%5D"));
    }

    #[test]
    fn only_first_accepted_attachment_is_sent() {
        let encoder = encoder(&[(SemanticField::Resume, "38")]);
        let payload = SubmissionPayload::default()
            .with_attachment(FileAttachment::new("huge.pdf", "application/pdf", vec![1; MAX_ATTACHMENT_BYTES + 10]))
            .with_attachment(FileAttachment::new("resume.docx", "", vec![1, 2, 3]))
            .with_attachment(FileAttachment::new("cover.pdf", "application/pdf", vec![4, 5, 6]));

        let encoded = encoder.encode(&payload);

        match encoded.field("submission[38]") {
            Some(WireField::File { file_name, data_url, .. }) => {
                assert_eq!(file_name, "resume.docx");
                assert_eq!(data_url, "data:application/pdf;base64,AQID");
            }
            other => panic!("expected embedded file, got {other:?}"),
        }
        let reasons: Vec<SkipReason> = encoded.skipped_files.iter().map(|file| file.reason).collect();
        assert_eq!(reasons, vec![SkipReason::TooLarge, SkipReason::AdditionalAttachment]);
    }

    #[test]
    fn unmapped_answers_are_recorded_not_sent() {
        let form = ApplicationForm {
            email: Some("jane@x.com".into()),
            license_number: Some("RN-1234".into()),
            ..ApplicationForm::default()
        };
        let encoded = encoder(&[(SemanticField::Email, "4")]).encode(&SubmissionPayload::new(form));

        assert_eq!(keys(&encoded), vec!["submission[4]"]);
        assert_eq!(encoded.dropped_fields.len(), 1);
        assert_eq!(encoded.dropped_fields[0].field, SemanticField::LicenseNumber);
        assert_eq!(encoded.dropped_fields[0].reason, DropReason::Unmapped);
    }

    #[test]
    fn blank_answers_are_not_sent() {
        let form = ApplicationForm {
            email: Some("   ".into()),
            phone: Some(String::new()),
            ..ApplicationForm::default()
        };
        let encoded = encoder(&[(SemanticField::Email, "4"), (SemanticField::Phone, "5")])
            .encode(&SubmissionPayload::new(form));

        assert!(encoded.fields.is_empty());
        assert!(encoded.dropped_fields.is_empty());
    }

    #[test]
    fn preview_hides_file_contents() {
        let encoder = encoder(&[(SemanticField::Email, "4"), (SemanticField::Resume, "38")]);
        let payload = SubmissionPayload::new(stage1_form())
            .with_attachment(FileAttachment::new("resume.pdf", "application/pdf", vec![9; 32]));

        let encoded = encoder.encode(&payload);
        let preview = encoded.redacted_preview();

        assert!(encoded.has_attachment());
        assert!(preview.contains("submission%5B38%5D=%5Bbase64+file+data+-+resume.pdf%5D"));
        assert!(!preview.contains("base64%2C"));
    }
}
