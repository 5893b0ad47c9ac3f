use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::workflows::jotform::encoder::parse_calendar_date;
use crate::workflows::jotform::ApplicationForm;

const REQUIRED: &str = "Required";
const INVALID_EMAIL: &str = "Invalid email format";
const INVALID_PHONE: &str = "Invalid phone number format";
const INVALID_DATE: &str = "Invalid date";

/// Per-field messages keyed by the form's camelCase field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, &'static str>);

impl FieldErrors {
    fn insert(&mut self, field: &'static str, message: &'static str) {
        self.0.entry(field).or_insert(message);
    }

    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.get(field).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("application is incomplete: {} field(s) need attention", .field_errors.len())]
pub struct ValidationFailure {
    pub field_errors: FieldErrors,
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex compiles"))
}

fn phone_pattern() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| {
        Regex::new(r"^\+?\(?[0-9]{3}\)?[-\s.]?[0-9]{3}[-\s.]?[0-9]{4,6}$")
            .expect("phone regex compiles")
    })
}

fn blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |raw| raw.trim().is_empty())
}

/// Stage-1 checks run before anything is encoded or sent.
pub fn validate_stage1(form: &ApplicationForm) -> Result<(), ValidationFailure> {
    let mut errors = FieldErrors::default();

    let required: [(&'static str, &Option<String>); 14] = [
        ("firstName", &form.first_name),
        ("lastName", &form.last_name),
        ("email", &form.email),
        ("phone", &form.phone),
        ("address", &form.address),
        ("roleAppliedFor", &form.role_applied_for),
        ("licenseState", &form.license_state),
        ("licenseNumber", &form.license_number),
        ("workAuthorizedUS", &form.work_authorized_us),
        ("reliableTransportation", &form.reliable_transportation),
        ("reference1FirstName", &form.reference1_first_name),
        ("reference1LastName", &form.reference1_last_name),
        ("reference2FirstName", &form.reference2_first_name),
        ("reference2LastName", &form.reference2_last_name),
    ];
    for (field, value) in required {
        if blank(value) {
            errors.insert(field, REQUIRED);
        }
    }

    if let Some(email) = form.email.as_deref().filter(|raw| !raw.trim().is_empty()) {
        if !email_pattern().is_match(email) {
            errors.insert("email", INVALID_EMAIL);
        }
    }

    if let Some(phone) = form.phone.as_deref().filter(|raw| !raw.trim().is_empty()) {
        let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
        if !phone_pattern().is_match(&compact) {
            errors.insert("phone", INVALID_PHONE);
        }
    }

    if let Some(expiry) = form.license_expiry.as_deref().filter(|raw| !raw.trim().is_empty()) {
        if parse_calendar_date(expiry).is_none() {
            errors.insert("licenseExpiry", INVALID_DATE);
        }
    }

    if !form
        .attestation
        .as_ref()
        .is_some_and(|answer| answer.is_affirmed())
    {
        errors.insert("attestation", REQUIRED);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationFailure {
            field_errors: errors,
        })
    }
}
