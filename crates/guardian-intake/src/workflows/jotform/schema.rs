use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Vendor control types, collapsed to the shapes the matcher and encoder care about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Text,
    TextArea,
    Email,
    Phone,
    CompositeName,
    CompositeAddress,
    CompositeDate,
    Dropdown,
    Checkbox,
    Radio,
    FileUpload,
    SectionHeader,
    PageBreak,
    Other(String),
}

impl FieldType {
    pub fn from_vendor(raw: &str) -> Self {
        match raw.trim() {
            "control_textbox" => Self::Text,
            "control_textarea" => Self::TextArea,
            "control_email" => Self::Email,
            "control_phone" => Self::Phone,
            "control_fullname" => Self::CompositeName,
            "control_address" => Self::CompositeAddress,
            "control_datetime" => Self::CompositeDate,
            "control_dropdown" => Self::Dropdown,
            "control_checkbox" => Self::Checkbox,
            "control_radio" => Self::Radio,
            "control_fileupload" | "fileupload" | "file" => Self::FileUpload,
            "control_head" => Self::SectionHeader,
            "control_pagebreak" => Self::PageBreak,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn vendor_name(&self) -> &str {
        match self {
            Self::Text => "control_textbox",
            Self::TextArea => "control_textarea",
            Self::Email => "control_email",
            Self::Phone => "control_phone",
            Self::CompositeName => "control_fullname",
            Self::CompositeAddress => "control_address",
            Self::CompositeDate => "control_datetime",
            Self::Dropdown => "control_dropdown",
            Self::Checkbox => "control_checkbox",
            Self::Radio => "control_radio",
            Self::FileUpload => "control_fileupload",
            Self::SectionHeader => "control_head",
            Self::PageBreak => "control_pagebreak",
            Self::Other(raw) => raw,
        }
    }

    /// Layout markers carry no answer and never take part in matching.
    pub fn is_layout(&self) -> bool {
        matches!(self, Self::SectionHeader | Self::PageBreak)
    }

    pub fn is_choice(&self) -> bool {
        matches!(self, Self::Checkbox | Self::Radio)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.vendor_name())
    }
}

impl Serialize for FieldType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.vendor_name())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_vendor(&raw))
    }
}

/// One question on a remote form as reported by `GET /form/{id}/questions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFieldDescriptor {
    pub field_id: String,
    pub label: String,
    pub field_type: FieldType,
}

impl FormFieldDescriptor {
    pub fn new(field_id: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            field_id: field_id.into(),
            label: label.into(),
            field_type,
        }
    }

    /// Blank on the form; the display fallback `Unnamed` is not a label.
    pub fn is_unlabeled(&self) -> bool {
        self.label.trim().is_empty() || self.label == UNNAMED
    }

    /// Vendor ids are assigned in on-form order; non-numeric ids sort first.
    pub fn numeric_id(&self) -> u64 {
        self.field_id.trim().parse().unwrap_or(0)
    }
}

const METADATA_KEYS: &[&str] = &[
    "id",
    "username",
    "title",
    "height",
    "status",
    "created_at",
    "updated_at",
    "formID",
    "count",
];

const LABEL_KEYS: &[&str] = &["text", "name", "label", "question", "title"];
const UNNAMED: &str = "Unnamed";

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("questions response has no content object")]
    MissingContent,
    #[error("form has no fields; add fields to the Jotform form first")]
    Empty,
}

/// Extract descriptors from the questions envelope, sorted by numeric field id.
pub fn parse_questions(envelope: &Value) -> Result<Vec<FormFieldDescriptor>, SchemaError> {
    let content = envelope
        .get("content")
        .and_then(Value::as_object)
        .ok_or(SchemaError::MissingContent)?;

    if content.is_empty() {
        return Err(SchemaError::Empty);
    }

    let mut descriptors: Vec<FormFieldDescriptor> = content
        .iter()
        .filter(|(field_id, _)| !METADATA_KEYS.contains(&field_id.as_str()))
        .filter_map(|(field_id, question)| {
            let question = question.as_object()?;
            let label = question_label(question);
            if label == UNNAMED {
                let lowered = field_id.to_ascii_lowercase();
                let looks_like_metadata = METADATA_KEYS
                    .iter()
                    .any(|key| lowered.contains(&key.to_ascii_lowercase()));
                if looks_like_metadata {
                    return None;
                }
            }
            let raw_type = ["type", "inputType"]
                .iter()
                .find_map(|key| question.get(*key).and_then(Value::as_str))
                .unwrap_or("unknown");
            Some(FormFieldDescriptor::new(
                field_id.clone(),
                label,
                FieldType::from_vendor(raw_type),
            ))
        })
        .collect();

    if descriptors.is_empty() {
        return Err(SchemaError::Empty);
    }

    descriptors.sort_by_key(FormFieldDescriptor::numeric_id);
    Ok(descriptors)
}

fn question_label(question: &Map<String, Value>) -> String {
    LABEL_KEYS
        .iter()
        .filter_map(|key| question.get(*key).and_then(Value::as_str))
        .find(|value| !value.trim().is_empty())
        .unwrap_or(UNNAMED)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_and_sorts_questions_numerically() {
        let envelope = json!({
            "responseCode": 200,
            "content": {
                "10": { "text": "Email", "type": "control_email" },
                "3": { "text": "Name", "type": "control_fullname" },
                "1": { "text": "Clinician Application", "type": "control_head" },
                "22": { "name": "employmentHistory", "type": "control_textarea" }
            }
        });

        let descriptors = parse_questions(&envelope).expect("questions parse");
        let ids: Vec<&str> = descriptors.iter().map(|d| d.field_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3", "10", "22"]);
        assert_eq!(descriptors[0].field_type, FieldType::SectionHeader);
        assert_eq!(descriptors[1].field_type, FieldType::CompositeName);
        assert_eq!(descriptors[3].label, "employmentHistory");
    }

    #[test]
    fn skips_metadata_entries_and_non_objects() {
        let envelope = json!({
            "content": {
                "id": "260071806751050",
                "count": 4,
                "status": { "type": "x" },
                "4": { "text": "Email", "type": "control_email" },
                "5": null
            }
        });

        let descriptors = parse_questions(&envelope).expect("questions parse");
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].field_id, "4");
    }

    #[test]
    fn falls_back_through_label_keys() {
        let envelope = json!({
            "content": {
                "7": { "text": "", "label": "License State", "type": "control_textbox" },
                "8": { "type": "control_radio" }
            }
        });

        let descriptors = parse_questions(&envelope).expect("questions parse");
        assert_eq!(descriptors[0].label, "License State");
        assert_eq!(descriptors[1].label, "Unnamed");
        assert_eq!(descriptors[1].field_type, FieldType::Radio);
    }

    #[test]
    fn empty_or_missing_content_is_an_error() {
        assert!(matches!(
            parse_questions(&json!({ "content": {} })),
            Err(SchemaError::Empty)
        ));
        assert!(matches!(
            parse_questions(&json!({ "message": "nope" })),
            Err(SchemaError::MissingContent)
        ));
    }

    #[test]
    fn unknown_vendor_types_round_trip() {
        let field_type = FieldType::from_vendor("control_signature");
        assert_eq!(field_type, FieldType::Other("control_signature".to_string()));
        assert_eq!(field_type.to_string(), "control_signature");
        assert!(FieldType::from_vendor("control_pagebreak").is_layout());
    }
}
