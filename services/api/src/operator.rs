use crate::infra::{load_field_mapping, read_attachment};
use clap::Args;
use guardian_intake::config::{AppConfig, HiringStage};
use guardian_intake::error::AppError;
use guardian_intake::telemetry;
use guardian_intake::workflows::intake::{success_message, validate_stage1, IntakeError};
use guardian_intake::workflows::jotform::{
    write_review_csv, ApplicationForm, EncodedSubmission, FieldMatcher, JotformClient,
    SubmissionEncoder, SubmissionPayload,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct MappingGenerateArgs {
    /// Hiring stage whose configured form to inspect: 1, 2 or 3
    #[arg(long, default_value = "1")]
    pub(crate) stage: HiringStage,
    /// Jotform form id to inspect instead of the stage's configured form
    #[arg(long)]
    pub(crate) form_id: Option<String>,
    /// Where to write the mapping JSON (defaults to JOTFORM_FIELD_MAPPING)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Also write every form field and its match as CSV
    #[arg(long)]
    pub(crate) report_csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct SubmitArgs {
    /// JSON file holding the application form
    #[arg(long)]
    pub(crate) payload: PathBuf,
    /// Hiring stage whose form receives the submission: 1, 2 or 3
    #[arg(long, default_value = "1")]
    pub(crate) stage: HiringStage,
    /// Mapping JSON for the target form (defaults to JOTFORM_FIELD_MAPPING)
    #[arg(long)]
    pub(crate) mapping: Option<PathBuf>,
    /// File to attach as the resume; repeat for more (only the first that fits is sent)
    #[arg(long = "attachment")]
    pub(crate) attachments: Vec<PathBuf>,
    /// Print the encoded body instead of submitting it
    #[arg(long)]
    pub(crate) dry_run: bool,
}

pub(crate) async fn run_mapping_generate(args: MappingGenerateArgs) -> Result<(), AppError> {
    let MappingGenerateArgs {
        stage,
        form_id,
        output,
        report_csv,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let form_id = match form_id {
        Some(form_id) => form_id,
        None => config.jotform.forms.require(stage)?.to_string(),
    };
    let output = output.unwrap_or_else(|| config.jotform.field_mapping_path.clone());

    let client = JotformClient::new(&config.jotform)?;
    println!("Fetching fields for form {form_id}");
    let descriptors = client.form_questions(&form_id).await?;
    println!("Found {} fields", descriptors.len());

    let report = FieldMatcher::new().match_fields(&descriptors);

    println!("\n{}", report.mapping.review_report());
    if report.layout_skipped > 0 {
        println!("Skipped {} layout element(s)", report.layout_skipped);
    }
    if !report.unmatched.is_empty() {
        println!("\nUnmatched fields (map these manually if needed):");
        for descriptor in &report.unmatched {
            println!(
                "  - {}: {} ({})",
                descriptor.field_id, descriptor.label, descriptor.field_type
            );
        }
    }

    if let Some(parent) = output.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    report
        .mapping
        .write_json(BufWriter::new(File::create(&output)?))?;
    println!(
        "\nWrote {} mapped field(s) to {}",
        report.mapping.len(),
        output.display()
    );

    if let Some(path) = report_csv {
        write_review_csv(File::create(&path)?, &descriptors, &report.mapping)?;
        println!("Wrote field review CSV to {}", path.display());
    }

    Ok(())
}

pub(crate) async fn run_submit(args: SubmitArgs) -> Result<(), AppError> {
    let SubmitArgs {
        payload,
        stage,
        mapping,
        attachments,
        dry_run,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let form: ApplicationForm = serde_json::from_reader(File::open(&payload)?)?;
    let mut submission = SubmissionPayload::new(form);
    for path in &attachments {
        submission = submission.with_attachment(read_attachment(path)?);
    }

    let mapping_path = mapping.unwrap_or_else(|| config.jotform.field_mapping_path.clone());
    let mapping = Arc::new(load_field_mapping(&mapping_path)?);
    let encoded = SubmissionEncoder::new(mapping).encode(&submission);
    render_encoding_notes(&encoded);

    if dry_run {
        println!("Encoded body ({} field(s)):", encoded.fields.len());
        for pair in encoded.redacted_preview().split('&').filter(|pair| !pair.is_empty()) {
            println!("  {pair}");
        }
        return Ok(());
    }

    if stage == HiringStage::Application {
        validate_stage1(&submission.form).map_err(IntakeError::from)?;
    }
    let form_id = config.jotform.forms.require(stage)?;
    let client = JotformClient::new(&config.jotform)?;
    let receipt = client.submit_encoded(form_id, &encoded).await?;

    println!("Submission {} accepted", receipt.submission_id);
    if let Some(url) = &receipt.url {
        println!("View: {url}");
    }
    println!("{}", success_message(&receipt.skipped_files));
    Ok(())
}

fn render_encoding_notes(encoded: &EncodedSubmission) {
    for skipped in &encoded.skipped_files {
        println!(
            "Skipped attachment {} ({} KB): {}",
            skipped.name,
            skipped.size_bytes / 1024,
            skipped.reason.describe()
        );
    }
    for dropped in &encoded.dropped_fields {
        println!("Not sent: {} ({:?})", dropped.field, dropped.reason);
    }
}
