use lexai_core::cache::{encode_segment, CourtQuery, QueryKey};
use lexai_core::domain::{ActivityLog, Court, CourtJurisdiction, Document, DocumentAnalysis, Stats};
use lexai_core::error::AppError;
use serde::{Deserialize, Serialize};

use super::{ActivityScope, LegalApi};
use crate::client::ApiClient;
use crate::files::UploadFile;
use crate::multipart::encode_files;

#[derive(Debug, Clone)]
pub struct HttpLegalApi {
    client: ApiClient,
}

impl HttpLegalApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct TranslateRequest<'a> {
    target_language: &'a str,
}

/// Upload responses carry either one record or a list of them.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum CreatedDocuments {
    Many(Vec<Document>),
    One(Box<Document>),
}

fn document_path(id: &str, action: &str) -> String {
    format!("/api/documents/{}/{action}", encode_segment(id))
}

impl LegalApi for HttpLegalApi {
    fn list_recent_documents(&self) -> Result<Vec<Document>, AppError> {
        let docs: Option<Vec<Document>> = self.client.get_json(
            &QueryKey::RecentDocuments.path(),
            &[],
            "Failed to load recent documents",
        )?;
        Ok(docs.unwrap_or_default())
    }

    fn list_documents(&self) -> Result<Vec<Document>, AppError> {
        let docs: Option<Vec<Document>> = self.client.get_json(
            &QueryKey::AllDocuments.path(),
            &[],
            "Failed to load documents",
        )?;
        Ok(docs.unwrap_or_default())
    }

    fn get_document(&self, id: &str) -> Result<Document, AppError> {
        self.client.get_json(
            &QueryKey::Document(id.to_string()).path(),
            &[],
            "Failed to load document",
        )
    }

    fn get_analysis(&self, id: &str) -> Result<Option<DocumentAnalysis>, AppError> {
        self.client.get_json(
            &QueryKey::Analysis(id.to_string()).path(),
            &[],
            "Failed to load analysis",
        )
    }

    fn get_jurisdiction(&self, id: &str) -> Result<Option<CourtJurisdiction>, AppError> {
        self.client.get_json(
            &QueryKey::Jurisdiction(id.to_string()).path(),
            &[],
            "Failed to load jurisdiction",
        )
    }

    fn get_summary(&self, id: &str) -> Result<serde_json::Value, AppError> {
        self.client.get_json(
            &QueryKey::Summary(id.to_string()).path(),
            &[],
            "Failed to load summary",
        )
    }

    fn upload_documents(&self, files: &[UploadFile]) -> Result<Vec<Document>, AppError> {
        let form = encode_files(files);
        let created: CreatedDocuments =
            self.client
                .post_multipart("/api/documents/upload", &form, "Failed to upload document")?;
        Ok(match created {
            CreatedDocuments::Many(docs) => docs,
            CreatedDocuments::One(doc) => vec![*doc],
        })
    }

    fn analyze_document(&self, id: &str) -> Result<DocumentAnalysis, AppError> {
        self.client.post_json(
            &document_path(id, "analyze"),
            serde_json::json!({}),
            "Failed to analyze document",
        )
    }

    fn find_jurisdiction(&self, id: &str) -> Result<CourtJurisdiction, AppError> {
        self.client.post_json(
            &document_path(id, "jurisdiction"),
            serde_json::json!({}),
            "Failed to find jurisdiction",
        )
    }

    fn translate_document(
        &self,
        id: &str,
        target_language: &str,
    ) -> Result<serde_json::Value, AppError> {
        let body = serde_json::to_value(TranslateRequest { target_language }).map_err(|e| {
            AppError::new("API_ENCODE_FAILED", "Failed to encode translate request")
                .with_details(e.to_string())
        })?;
        self.client.post_json(
            &document_path(id, "translate"),
            body,
            "Failed to translate document",
        )
    }

    fn delete_document(&self, id: &str) -> Result<(), AppError> {
        self.client.delete(
            &QueryKey::Document(id.to_string()).path(),
            "Failed to delete document",
        )
    }

    fn download_document(&self, id: &str) -> Result<Vec<u8>, AppError> {
        self.client
            .get_bytes(&document_path(id, "download"), "Failed to download document")
    }

    fn export_report_pdf(&self, id: &str) -> Result<Vec<u8>, AppError> {
        self.client
            .get_bytes(&document_path(id, "export-pdf"), "Failed to export report")
    }

    fn get_stats(&self) -> Result<Stats, AppError> {
        let stats: Option<Stats> =
            self.client
                .get_json(&QueryKey::Stats.path(), &[], "Failed to load statistics")?;
        Ok(stats.unwrap_or_default())
    }

    fn list_courts(&self, query: &CourtQuery) -> Result<Vec<Court>, AppError> {
        let courts: Option<Vec<Court>> = self.client.get_json(
            &QueryKey::Courts(query.clone()).path(),
            &query.query_pairs(),
            "Failed to load courts",
        )?;
        Ok(courts.unwrap_or_default())
    }

    fn list_activities(&self, scope: ActivityScope) -> Result<Vec<ActivityLog>, AppError> {
        let key = match scope {
            ActivityScope::All => QueryKey::Activities,
            ActivityScope::Recent => QueryKey::RecentActivities,
        };
        let entries: Option<Vec<ActivityLog>> =
            self.client
                .get_json(&key.path(), &[], "Failed to load activities")?;
        Ok(entries.unwrap_or_default())
    }
}
