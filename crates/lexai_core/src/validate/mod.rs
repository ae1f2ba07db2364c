use serde::{Deserialize, Serialize};

use crate::domain::{CourtJurisdiction, Document, DocumentStatus, ValidationWarning};
use crate::normalize::timestamps::parse_timestamp;

/// Check a document record against the client-side invariants.
///
/// Records are never dropped; the caller decides whether to surface the warnings.
pub fn validate_document(doc: &Document) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if doc.id.trim().is_empty() {
        warnings.push(ValidationWarning::new("RECORD_ID_EMPTY", "Document id is empty")
            .with_details(format!("name={}", doc.name)));
    }

    if doc.content.is_some() && doc.status != DocumentStatus::Processed {
        warnings.push(
            ValidationWarning::new(
                "RECORD_CONTENT_BEFORE_PROCESSED",
                "Document carries content but is not processed",
            )
            .with_details(format!("id={}; status={}", doc.id, doc.status.as_str())),
        );
    }

    if parse_timestamp(&doc.uploaded_at).is_none() {
        warnings.push(
            ValidationWarning::new("RECORD_TS_UNPARSEABLE", "Failed to parse uploadedAt")
                .with_details(format!("id={}; value={}", doc.id, doc.uploaded_at)),
        );
    }

    warnings
}

pub fn validate_jurisdiction(j: &CourtJurisdiction) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    for court in &j.courts {
        if !(0..=100).contains(&court.relevance) {
            warnings.push(
                ValidationWarning::new(
                    "RECORD_RELEVANCE_OUT_OF_RANGE",
                    "Court relevance out of range",
                )
                .with_details(format!("court={}; value={}", court.name, court.relevance)),
            );
        }
    }
    warnings
}

/// Flag a refetched status that moved along an edge outside the transition table.
pub fn validate_transition(
    id: &str,
    previous: DocumentStatus,
    next: DocumentStatus,
) -> Option<ValidationWarning> {
    if previous.can_transition_to(next) {
        return None;
    }
    Some(
        ValidationWarning::new(
            "RECORD_STATUS_REGRESSION",
            "Document status moved outside the known transitions",
        )
        .with_details(format!(
            "id={id}; from={}; to={}",
            previous.as_str(),
            next.as_str()
        )),
    )
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentValidationReportItem {
    pub id: String,
    pub name: String,
    pub warnings: Vec<ValidationWarning>,
}

/// Validate every record, keeping only the ones with warnings. Ordered by (name, id).
pub fn validate_documents(docs: &[Document]) -> Vec<DocumentValidationReportItem> {
    let mut out: Vec<DocumentValidationReportItem> = docs
        .iter()
        .filter_map(|d| {
            let warnings = validate_document(d);
            if warnings.is_empty() {
                None
            } else {
                Some(DocumentValidationReportItem {
                    id: d.id.clone(),
                    name: d.name.clone(),
                    warnings,
                })
            }
        })
        .collect();

    out.sort_by(|a, b| (&a.name, &a.id).cmp(&(&b.name, &b.id)));
    out
}
