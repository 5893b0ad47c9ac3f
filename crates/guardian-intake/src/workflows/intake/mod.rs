//! Public application intake: stage-1 validation, attachment decoding and hand-off to Jotform.

pub mod domain;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    failure_message, success_message, ApplicationAccepted, ApplicationRequest, AttachmentUpload,
    INTAKE_EMAIL, SUPPORT_PHONE,
};
pub use router::{intake_router, MAX_REQUEST_BODY_BYTES};
pub use service::{ApplicationIntakeService, IntakeError};
pub use validation::{validate_stage1, FieldErrors, ValidationFailure};
