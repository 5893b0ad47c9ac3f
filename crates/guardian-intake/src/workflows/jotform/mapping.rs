use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Write as _};
use std::io::Write;
use std::path::Path;

use super::schema::{FieldType, FormFieldDescriptor};

/// Internal, vendor-agnostic names for the logical fields of the clinician application.
///
/// Declaration order is the encoding order and the order of the review report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SemanticField {
    FullName,
    Email,
    Phone,
    Address,
    City,
    State,
    ZipCode,
    RoleAppliedFor,
    LicenseType,
    LicenseState,
    LicenseNumber,
    LicenseExpiry,
    Availability,
    #[serde(rename = "workAuthorizedUS")]
    WorkAuthorizedUs,
    ReliableTransportation,
    EmploymentHistory,
    #[serde(rename = "reference1Name")]
    Reference1Name,
    #[serde(rename = "reference1Phone")]
    Reference1Phone,
    #[serde(rename = "reference1Email")]
    Reference1Email,
    #[serde(rename = "reference2Name")]
    Reference2Name,
    #[serde(rename = "reference2Phone")]
    Reference2Phone,
    #[serde(rename = "reference2Email")]
    Reference2Email,
    Attestation,
    Resume,
}

impl SemanticField {
    pub const ALL: [SemanticField; 24] = [
        Self::FullName,
        Self::Email,
        Self::Phone,
        Self::Address,
        Self::City,
        Self::State,
        Self::ZipCode,
        Self::RoleAppliedFor,
        Self::LicenseType,
        Self::LicenseState,
        Self::LicenseNumber,
        Self::LicenseExpiry,
        Self::Availability,
        Self::WorkAuthorizedUs,
        Self::ReliableTransportation,
        Self::EmploymentHistory,
        Self::Reference1Name,
        Self::Reference1Phone,
        Self::Reference1Email,
        Self::Reference2Name,
        Self::Reference2Phone,
        Self::Reference2Email,
        Self::Attestation,
        Self::Resume,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::City => "city",
            Self::State => "state",
            Self::ZipCode => "zipCode",
            Self::RoleAppliedFor => "roleAppliedFor",
            Self::LicenseType => "licenseType",
            Self::LicenseState => "licenseState",
            Self::LicenseNumber => "licenseNumber",
            Self::LicenseExpiry => "licenseExpiry",
            Self::Availability => "availability",
            Self::WorkAuthorizedUs => "workAuthorizedUS",
            Self::ReliableTransportation => "reliableTransportation",
            Self::EmploymentHistory => "employmentHistory",
            Self::Reference1Name => "reference1Name",
            Self::Reference1Phone => "reference1Phone",
            Self::Reference1Email => "reference1Email",
            Self::Reference2Name => "reference2Name",
            Self::Reference2Phone => "reference2Phone",
            Self::Reference2Email => "reference2Email",
            Self::Attestation => "attestation",
            Self::Resume => "resume",
        }
    }

    pub fn section(self) -> ReportSection {
        match self {
            Self::FullName
            | Self::Email
            | Self::Phone
            | Self::Address
            | Self::City
            | Self::State
            | Self::ZipCode => ReportSection::Personal,
            Self::RoleAppliedFor
            | Self::LicenseType
            | Self::LicenseState
            | Self::LicenseNumber
            | Self::LicenseExpiry => ReportSection::Professional,
            Self::Availability
            | Self::WorkAuthorizedUs
            | Self::ReliableTransportation
            | Self::EmploymentHistory => ReportSection::Qualifications,
            Self::Reference1Name
            | Self::Reference1Phone
            | Self::Reference1Email
            | Self::Reference2Name
            | Self::Reference2Phone
            | Self::Reference2Email => ReportSection::References,
            Self::Attestation | Self::Resume => ReportSection::AttestationAndResume,
        }
    }
}

impl fmt::Display for SemanticField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportSection {
    Personal,
    Professional,
    Qualifications,
    References,
    AttestationAndResume,
}

impl ReportSection {
    const ORDERED: [ReportSection; 5] = [
        Self::Personal,
        Self::Professional,
        Self::Qualifications,
        Self::References,
        Self::AttestationAndResume,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::Personal => "Personal Information",
            Self::Professional => "Professional Information",
            Self::Qualifications => "Availability & Qualifications",
            Self::References => "References",
            Self::AttestationAndResume => "Attestation & Resume",
        }
    }
}

/// Where a semantic field lives on the remote form, with the label it was matched from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappedField {
    pub field_id: String,
    pub matched_label: String,
    pub field_type: FieldType,
    /// Checkbox option slot; produces `submission[id][index]` instead of `submission[id]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_index: Option<u32>,
}

impl MappedField {
    pub fn from_descriptor(descriptor: &FormFieldDescriptor) -> Self {
        Self {
            field_id: descriptor.field_id.clone(),
            matched_label: descriptor.label.clone(),
            field_type: descriptor.field_type.clone(),
            option_index: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MappingFileError {
    #[error("failed to read field mapping {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid field mapping {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("failed to write field mapping: {0}")]
    Write(#[from] std::io::Error),
    #[error("failed to serialize field mapping: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write review csv: {0}")]
    Csv(#[from] csv::Error),
}

/// Reviewed association of semantic fields to vendor field ids. Read-only at runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMapping {
    entries: BTreeMap<SemanticField, MappedField>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for tests and fixtures: `(field, id)` pairs with unknown provenance.
    pub fn from_ids<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (SemanticField, S)>,
        S: Into<String>,
    {
        let mut mapping = Self::new();
        for (field, id) in pairs {
            mapping.claim(
                field,
                MappedField {
                    field_id: id.into(),
                    matched_label: field.key().to_string(),
                    field_type: FieldType::Other("unknown".to_string()),
                    option_index: None,
                },
            );
        }
        mapping
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, MappingFileError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| MappingFileError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| MappingFileError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<(), MappingFileError> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Records `field` unless it is already claimed. Returns whether the claim took.
    pub fn claim(&mut self, field: SemanticField, mapped: MappedField) -> bool {
        if self.entries.contains_key(&field) {
            return false;
        }
        self.entries.insert(field, mapped);
        true
    }

    pub fn get(&self, field: SemanticField) -> Option<&MappedField> {
        self.entries.get(&field)
    }

    pub fn field_id(&self, field: SemanticField) -> Option<&str> {
        self.get(field).map(|mapped| mapped.field_id.as_str())
    }

    pub fn is_claimed(&self, field: SemanticField) -> bool {
        self.entries.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SemanticField, &MappedField)> {
        self.entries.iter().map(|(field, mapped)| (*field, mapped))
    }

    pub fn missing(&self) -> Vec<SemanticField> {
        SemanticField::ALL
            .into_iter()
            .filter(|field| !self.is_claimed(*field))
            .collect()
    }

    /// Sectioned listing for operator review; gaps are called out explicitly.
    pub fn review_report(&self) -> String {
        let mut report = String::new();
        for section in ReportSection::ORDERED {
            let _ = writeln!(report, "// {}", section.title());
            for field in SemanticField::ALL
                .into_iter()
                .filter(|field| field.section() == section)
            {
                match self.get(field) {
                    Some(mapped) => {
                        let _ = write!(
                            report,
                            "{field} -> {} // {} ({})",
                            mapped.field_id, mapped.matched_label, mapped.field_type
                        );
                        if let Some(index) = mapped.option_index {
                            let _ = write!(report, " option {index}");
                        }
                        report.push('\n');
                    }
                    None => {
                        let _ = writeln!(report, "// {field}: NOT FOUND in Jotform form");
                    }
                }
            }
            report.push('\n');
        }
        report
    }
}

/// Serializes every descriptor with the semantic field it was matched to, if any.
pub fn write_review_csv<W: Write>(
    writer: W,
    descriptors: &[FormFieldDescriptor],
    mapping: &FieldMapping,
) -> Result<(), MappingFileError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["Field ID", "Label", "Type", "Semantic Field"])?;

    for descriptor in descriptors {
        let matched = mapping
            .iter()
            .find(|(_, mapped)| mapped.field_id == descriptor.field_id)
            .map(|(field, _)| field.key())
            .unwrap_or("");
        csv_writer.write_record([
            descriptor.field_id.as_str(),
            descriptor.label.as_str(),
            descriptor.field_type.vendor_name(),
            matched,
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}
