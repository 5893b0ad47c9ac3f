use std::path::PathBuf;
use std::sync::Arc;

use guardian_intake::workflows::jotform::{
    parse_questions, write_review_csv, ApplicationForm, AttestationAnswer, FieldMapping,
    FieldMatcher, FieldType, FileAttachment, SemanticField, SubmissionEncoder, SubmissionPayload,
    WireField,
};
use serde_json::json;

fn stage1_questions() -> serde_json::Value {
    json!({
        "responseCode": 200,
        "content": {
            "1": { "text": "Personal Information", "type": "control_head" },
            "3": { "text": "Name", "type": "control_fullname" },
            "4": { "text": "Email", "type": "control_email" },
            "5": { "text": "Phone Number", "type": "control_phone" },
            "6": { "text": "Address", "type": "control_address" },
            "11": { "text": "Role Applied For", "type": "control_dropdown" },
            "16": { "text": "License Expiry", "type": "control_datetime" },
            "19": { "text": "Availability", "type": "control_dropdown" },
            "29": { "text": "Reference 1 Name", "type": "control_fullname" },
            "32": { "text": "Reference 2 Name", "type": "control_fullname" },
            "33": { "text": "Email", "type": "control_email" },
            "34": { "text": "Phone Number", "type": "control_phone" },
            "37": { "text": "I attest that the information is accurate", "type": "control_checkbox" },
            "38": { "text": "Upload Resume", "type": "control_fileupload" },
            "40": { "text": "", "type": "control_button" },
            "formID": "251234567890",
            "count": 15
        }
    })
}

fn scratch_file(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("guardian-intake-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("scratch dir");
    dir.join(name)
}

#[test]
fn generated_mapping_drives_the_encoder() {
    let descriptors = parse_questions(&stage1_questions()).expect("questions parse");
    let report = FieldMatcher::new().match_fields(&descriptors);

    assert_eq!(report.layout_skipped, 1);
    assert_eq!(report.mapping.field_id(SemanticField::Email), Some("4"));
    assert_eq!(report.mapping.field_id(SemanticField::Reference2Email), Some("33"));
    assert_eq!(report.mapping.field_id(SemanticField::Reference2Phone), Some("34"));
    assert_eq!(report.mapping.field_id(SemanticField::Attestation), Some("37"));
    assert_eq!(report.mapping.field_id(SemanticField::Resume), Some("38"));
    assert_eq!(report.mapping.field_id(SemanticField::FullName), Some("3"));
    let unmatched: Vec<&str> = report.unmatched.iter().map(|d| d.field_id.as_str()).collect();
    assert_eq!(unmatched, vec!["40"]);

    let review = report.mapping.review_report();
    assert!(review.contains("reference2Email -> 33 // Email (control_email)"));
    assert!(review.contains("// licenseNumber: NOT FOUND in Jotform form"));

    let path = scratch_file("stage1-field-mapping.json");
    report
        .mapping
        .write_json(std::fs::File::create(&path).expect("create mapping file"))
        .expect("mapping written");
    let reloaded = FieldMapping::from_path(&path).expect("mapping reloads");
    assert_eq!(reloaded, report.mapping);

    let form = ApplicationForm {
        first_name: Some("Jane".into()),
        last_name: Some("Doe".into()),
        email: Some("jane@example.com".into()),
        license_number: Some("RN-1234".into()),
        license_expiry: Some("2027-06-30".into()),
        reference2_first_name: Some("Bo".into()),
        reference2_last_name: Some("Kim".into()),
        reference2_email: Some("bo@example.com".into()),
        attestation: Some(AttestationAnswer::Text("Yes".into())),
        ..ApplicationForm::default()
    };
    let payload = SubmissionPayload::new(form).with_attachment(FileAttachment::new(
        "resume.pdf",
        "",
        b"%PDF".to_vec(),
    ));

    let encoded = SubmissionEncoder::new(Arc::new(reloaded)).encode(&payload);
    let value = |key: &str| encoded.field(key).map(WireField::value);

    assert_eq!(value("submission[3][first]"), Some("Jane"));
    assert_eq!(value("submission[4]"), Some("jane@example.com"));
    assert_eq!(value("submission[16][day]"), Some("30"));
    assert_eq!(value("submission[32][last]"), Some("Kim"));
    assert_eq!(value("submission[33]"), Some("bo@example.com"));
    assert_eq!(value("submission[37]"), Some("Yes"));
    assert_eq!(value("submission[38]"), Some("data:application/pdf;base64,JVBERg=="));
    assert_eq!(encoded.dropped_fields.len(), 1);
    assert_eq!(encoded.dropped_fields[0].field, SemanticField::LicenseNumber);

    std::fs::remove_file(path).ok();
}

#[test]
fn review_csv_lists_every_descriptor() {
    let descriptors = parse_questions(&stage1_questions()).expect("questions parse");
    let report = FieldMatcher::new().match_fields(&descriptors);

    let mut buffer = Vec::new();
    write_review_csv(&mut buffer, &descriptors, &report.mapping).expect("csv written");
    let csv = String::from_utf8(buffer).expect("utf8");
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines[0], "Field ID,Label,Type,Semantic Field");
    assert_eq!(lines.len(), descriptors.len() + 1);
    assert!(lines.contains(&"33,Email,control_email,reference2Email"));
    assert!(lines.contains(&"1,Personal Information,control_head,"));
}

#[test]
fn shipped_stage1_mapping_covers_the_application() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/stage1-field-mapping.json");
    let mapping = FieldMapping::from_path(path).expect("shipped mapping loads");

    assert_eq!(mapping.field_id(SemanticField::FullName), Some("3"));
    assert_eq!(mapping.field_id(SemanticField::Reference1Email), Some("30"));
    assert_eq!(mapping.field_id(SemanticField::Reference2Phone), Some("34"));
    assert_eq!(mapping.field_id(SemanticField::Resume), Some("38"));
    assert!(mapping.missing().contains(&SemanticField::LicenseType));

    let attestation = mapping.get(SemanticField::Attestation).expect("attestation mapped");
    assert_eq!(attestation.field_id, "37");
    assert_eq!(attestation.matched_label, "iAttest");
    assert_eq!(attestation.field_type, FieldType::Radio);
}
