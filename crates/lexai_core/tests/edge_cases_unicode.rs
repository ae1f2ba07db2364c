/// Edge case tests for non-ASCII names and descriptions
///
/// Ensures that:
/// - Search matches case-insensitively beyond ASCII
/// - Devanagari and emoji names survive filtering and notices untouched
/// - Intake notices quote the original file name

#[cfg(test)]
mod unicode_edge_cases {
    use lexai_core::domain::{ActivityLog, Document, DocumentStatus};
    use lexai_core::filter::{filter_activities, filter_documents, ActivityFilter, DocumentFilter};
    use lexai_core::intake::{screen_batch, CandidateFile};

    fn doc(name: &str) -> Document {
        Document {
            id: name.to_string(),
            name: name.to_string(),
            size: 100,
            mime_type: "application/pdf".to_string(),
            uploaded_at: "2025-01-15T10:00:00Z".to_string(),
            status: DocumentStatus::Processed,
            content: None,
        }
    }

    #[test]
    fn test_search_folds_non_ascii_case() {
        let docs = vec![doc("ÜBERSICHT Vertrag.pdf"), doc("contract.pdf")];
        let f = DocumentFilter {
            search: Some("übersicht".to_string()),
            ..Default::default()
        };
        let out = filter_documents(&docs, &f);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "ÜBERSICHT Vertrag.pdf");
    }

    #[test]
    fn test_devanagari_description_search() {
        let entries = vec![ActivityLog {
            id: "1".to_string(),
            timestamp: "2025-01-15T10:00:00Z".to_string(),
            action: "document_translated".to_string(),
            description: "अनुबंध का हिंदी अनुवाद 📄".to_string(),
            document_id: Some("d1".to_string()),
        }];
        let f = ActivityFilter {
            search: Some("हिंदी".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_activities(&entries, &f).len(), 1);
    }

    #[test]
    fn test_rejection_notice_keeps_emoji_file_name() {
        let out = screen_batch(vec![CandidateFile::new("📎 exhibit.zip", "application/zip", 5)], |f| f);
        assert!(out.rejected[0].notice().description.contains("📎 exhibit.zip"));
    }
}
