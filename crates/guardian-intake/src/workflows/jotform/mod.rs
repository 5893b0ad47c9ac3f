//! Jotform integration: schema discovery, label matching, submission encoding and the REST client.

pub mod client;
pub mod encoder;
pub mod mapping;
pub mod matcher;
pub mod payload;
pub mod schema;

pub use client::{
    JotformClient, SchemaFetchError, SubmissionError, SubmissionGateway, SubmissionReceipt,
};
pub use encoder::{
    CompositePart, DropReason, DroppedField, EncodedSubmission, SkipReason, SkippedFile,
    SubmissionEncoder, WireField, MAX_ATTACHMENT_BYTES, MAX_ENCODED_ATTACHMENT_BYTES,
};
pub use mapping::{
    write_review_csv, FieldMapping, MappedField, MappingFileError, ReportSection, SemanticField,
};
pub use matcher::{FieldMatcher, MatchReport};
pub use payload::{ApplicationForm, AttestationAnswer, FileAttachment, SubmissionPayload};
pub use schema::{parse_questions, FieldType, FormFieldDescriptor, SchemaError};
