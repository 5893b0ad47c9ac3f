use super::super::mapping::SemanticField;
use std::collections::HashMap;
use std::sync::OnceLock;

use SemanticField::{
    Address, Attestation, Availability, City, Email, EmploymentHistory, FullName, LicenseExpiry,
    LicenseNumber, LicenseState, LicenseType, Phone, Reference1Email, Reference1Name,
    Reference1Phone, Reference2Email, Reference2Name, Reference2Phone, ReliableTransportation,
    Resume, RoleAppliedFor, State, WorkAuthorizedUs, ZipCode,
};

/// Normalized vendor label to semantic field. Order matters: fuzzy ties go to the earlier entry.
pub(crate) const LABEL_DICTIONARY: &[(&str, SemanticField)] = &[
    // Personal Information
    ("full name", FullName),
    ("name", FullName),
    ("email", Email),
    ("phone", Phone),
    ("phone number", Phone),
    ("address", Address),
    ("city", City),
    ("state", State),
    ("zip", ZipCode),
    ("zip code", ZipCode),
    ("postal code", ZipCode),
    // Professional Information
    ("role", RoleAppliedFor),
    ("role applied for", RoleAppliedFor),
    ("position", RoleAppliedFor),
    ("license type", LicenseType),
    ("license state", LicenseState),
    ("license number", LicenseNumber),
    ("license expiry", LicenseExpiry),
    ("license expiration", LicenseExpiry),
    ("expiry", LicenseExpiry),
    ("expiration", LicenseExpiry),
    // Availability & Qualifications
    ("availability", Availability),
    ("work authorized", WorkAuthorizedUs),
    ("work authorized in us", WorkAuthorizedUs),
    ("authorized to work", WorkAuthorizedUs),
    ("reliable transportation", ReliableTransportation),
    ("transportation", ReliableTransportation),
    ("employment history", EmploymentHistory),
    ("work history", EmploymentHistory),
    // References
    ("reference 1 name", Reference1Name),
    ("reference1 name", Reference1Name),
    ("ref 1 name", Reference1Name),
    ("reference 1 phone", Reference1Phone),
    ("reference1 phone", Reference1Phone),
    ("ref 1 phone", Reference1Phone),
    ("reference 1 email", Reference1Email),
    ("reference1 email", Reference1Email),
    ("ref 1 email", Reference1Email),
    ("reference 2 name", Reference2Name),
    ("reference2 name", Reference2Name),
    ("ref 2 name", Reference2Name),
    ("reference 2 phone", Reference2Phone),
    ("reference2 phone", Reference2Phone),
    ("ref 2 phone", Reference2Phone),
    ("reference 2 email", Reference2Email),
    ("reference2 email", Reference2Email),
    ("ref 2 email", Reference2Email),
    // Attestation & Resume
    ("attestation", Attestation),
    ("i attest", Attestation),
    ("agree", Attestation),
    ("resume", Resume),
    ("cv", Resume),
    ("file", Resume),
];

static EXACT_LOOKUP: OnceLock<HashMap<&'static str, SemanticField>> = OnceLock::new();

pub(crate) fn exact_match(normalized_label: &str) -> Option<SemanticField> {
    EXACT_LOOKUP
        .get_or_init(|| {
            let mut map = HashMap::with_capacity(LABEL_DICTIONARY.len());
            for (label, field) in LABEL_DICTIONARY {
                map.entry(*label).or_insert(*field);
            }
            map
        })
        .get(normalized_label)
        .copied()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReferenceFacet {
    Name,
    Phone,
    Email,
}

impl ReferenceFacet {
    pub(crate) fn keyword(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Phone => "phone",
            Self::Email => "email",
        }
    }
}

/// Which reference (1 or 2) and which sub-field a semantic field stands for.
pub(crate) fn reference_facet(field: SemanticField) -> Option<(u8, ReferenceFacet)> {
    match field {
        Reference1Name => Some((1, ReferenceFacet::Name)),
        Reference1Phone => Some((1, ReferenceFacet::Phone)),
        Reference1Email => Some((1, ReferenceFacet::Email)),
        Reference2Name => Some((2, ReferenceFacet::Name)),
        Reference2Phone => Some((2, ReferenceFacet::Phone)),
        Reference2Email => Some((2, ReferenceFacet::Email)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_lookup_covers_synonyms() {
        assert_eq!(exact_match("postal code"), Some(ZipCode));
        assert_eq!(exact_match("name"), Some(FullName));
        assert_eq!(exact_match("ref 2 email"), Some(Reference2Email));
        assert_eq!(exact_match("favorite color"), None);
    }

    #[test]
    fn dictionary_keys_are_normalized() {
        for (label, _) in LABEL_DICTIONARY {
            assert_eq!(*label, super::super::normalizer::normalize_label(label));
        }
    }
}
