use serde::{Deserialize, Serialize};

/// Processing status of an uploaded document as reported by the server.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Pending,
    Processing,
    Processed,
    Failed,
}

impl DocumentStatus {
    pub const ALL: [DocumentStatus; 4] = [
        DocumentStatus::Pending,
        DocumentStatus::Processing,
        DocumentStatus::Processed,
        DocumentStatus::Failed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Processing => "processing",
            DocumentStatus::Processed => "processed",
            DocumentStatus::Failed => "failed",
        }
    }

    /// Parse the lowercase wire value. Unknown values return `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

/// Client-visible projection of an uploaded file and its processing state.
///
/// Notes:
/// - `uploaded_at` stays a raw ISO 8601 string; parsing happens where it is consumed
///   (filters, relative formatting) so a malformed value never drops the record.
/// - `content` is only expected once `status == processed`; see `validate::validate_document`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub uploaded_at: String,
    pub status: DocumentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Statute {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAnalysis {
    pub summary: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub statutes: Vec<Statute>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CourtRelevance {
    pub name: String,
    /// Integer percentage in `[0, 100]`.
    pub relevance: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CourtJurisdiction {
    pub primary: String,
    #[serde(default)]
    pub courts: Vec<CourtRelevance>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Court {
    pub id: String,
    pub name: String,
    pub jurisdiction_type: String,
    pub location: String,
    #[serde(default)]
    pub case_types: Vec<String>,
}

/// Immutable record of a past system action. `document_id` is a weak reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: String,
    pub timestamp: String,
    pub action: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
}

/// Aggregate usage counters. `Default` is the all-zero fallback used when the server has none.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub documents_processed: u64,
    pub successful_analyses: u64,
    pub pending_documents: u64,
    pub courts_referenced: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
    pub flag: &'static str,
}

pub const SUPPORTED_LANGUAGES: [Language; 5] = [
    Language { code: "en", name: "English", flag: "🇺🇸" },
    Language { code: "hi", name: "Hindi", flag: "🇮🇳" },
    Language { code: "es", name: "Spanish", flag: "🇪🇸" },
    Language { code: "fr", name: "French", flag: "🇫🇷" },
    Language { code: "de", name: "German", flag: "🇩🇪" },
];

/// Look up a supported language by its code or (case-insensitive) display name.
pub fn find_language(raw: &str) -> Option<Language> {
    let raw = raw.trim();
    SUPPORTED_LANGUAGES
        .into_iter()
        .find(|l| l.code.eq_ignore_ascii_case(raw) || l.name.eq_ignore_ascii_case(raw))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationWarning {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl ValidationWarning {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_uses_camel_case_wire_names() {
        let raw = r#"{"id":"d1","name":"contract.pdf","size":1536,"type":"application/pdf",
            "uploadedAt":"2024-01-05T10:00:00Z","status":"processing"}"#;
        let doc: Document = serde_json::from_str(raw).expect("decode");
        assert_eq!(doc.mime_type, "application/pdf");
        assert_eq!(doc.status, DocumentStatus::Processing);
        assert_eq!(doc.content, None);

        let back = serde_json::to_value(&doc).expect("encode");
        assert_eq!(back["uploadedAt"], "2024-01-05T10:00:00Z");
        assert!(back.get("content").is_none());
    }

    #[test]
    fn status_parse_accepts_wire_values_only() {
        assert_eq!(DocumentStatus::parse("Processed"), Some(DocumentStatus::Processed));
        assert_eq!(DocumentStatus::parse("all"), None);
    }

    #[test]
    fn languages_resolve_by_code_or_name() {
        assert_eq!(find_language("hi").map(|l| l.name), Some("Hindi"));
        assert_eq!(find_language("german").map(|l| l.code), Some("de"));
        assert!(find_language("klingon").is_none());
    }
}
