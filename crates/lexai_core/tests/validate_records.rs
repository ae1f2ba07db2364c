use lexai_core::domain::{CourtJurisdiction, CourtRelevance, Document, DocumentStatus};
use lexai_core::validate::{
    validate_document, validate_documents, validate_jurisdiction, validate_transition,
};
use pretty_assertions::assert_eq;

fn doc(id: &str, status: DocumentStatus, content: Option<&str>, uploaded_at: &str) -> Document {
    Document {
        id: id.to_string(),
        name: format!("{id}.pdf"),
        size: 10,
        mime_type: "application/pdf".to_string(),
        uploaded_at: uploaded_at.to_string(),
        status,
        content: content.map(str::to_string),
    }
}

#[test]
fn content_before_processing_is_flagged() {
    let warnings = validate_document(&doc(
        "d1",
        DocumentStatus::Pending,
        Some("<p>text</p>"),
        "2024-01-05T00:00:00Z",
    ));
    let codes: Vec<_> = warnings.iter().map(|w| w.code.as_str()).collect();
    assert_eq!(codes, vec!["RECORD_CONTENT_BEFORE_PROCESSED"]);
}

#[test]
fn processed_document_with_content_is_clean() {
    assert!(validate_document(&doc(
        "d1",
        DocumentStatus::Processed,
        Some("<p>text</p>"),
        "2024-01-05"
    ))
    .is_empty());
}

#[test]
fn report_lists_only_records_with_warnings_in_name_order() {
    let docs = vec![
        doc("b", DocumentStatus::Failed, None, "last tuesday"),
        doc("ok", DocumentStatus::Processed, None, "2024-01-05"),
        doc("a", DocumentStatus::Processing, Some("x"), "2024-01-05"),
    ];
    let report = validate_documents(&docs);
    let ids: Vec<_> = report.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(report[1].warnings[0].code, "RECORD_TS_UNPARSEABLE");
}

#[test]
fn relevance_outside_percentage_range_is_flagged() {
    let j = CourtJurisdiction {
        primary: "Delhi".to_string(),
        courts: vec![
            CourtRelevance {
                name: "Delhi High Court".to_string(),
                relevance: 92,
            },
            CourtRelevance {
                name: "Saket District Court".to_string(),
                relevance: 140,
            },
        ],
    };
    let warnings = validate_jurisdiction(&j);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0]
        .details
        .as_deref()
        .unwrap_or_default()
        .contains("Saket"));
}

#[test]
fn status_regression_is_reported() {
    assert!(validate_transition("d1", DocumentStatus::Failed, DocumentStatus::Processing).is_none());
    let w = validate_transition("d1", DocumentStatus::Processed, DocumentStatus::Pending)
        .expect("regression");
    assert_eq!(w.code, "RECORD_STATUS_REGRESSION");
}
