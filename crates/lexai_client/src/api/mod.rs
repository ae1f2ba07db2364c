use lexai_core::cache::CourtQuery;
use lexai_core::domain::{ActivityLog, Court, CourtJurisdiction, Document, DocumentAnalysis, Stats};
use lexai_core::error::AppError;

use crate::files::UploadFile;

/// Which activity feed to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityScope {
    All,
    Recent,
}

/// The backend's logical endpoints. Blocking; every call is one request.
///
/// `Option` results model the empty-result case (the server answered `null`), which is not
/// an error.
pub trait LegalApi {
    fn list_recent_documents(&self) -> Result<Vec<Document>, AppError>;
    fn list_documents(&self) -> Result<Vec<Document>, AppError>;
    fn get_document(&self, id: &str) -> Result<Document, AppError>;
    fn get_analysis(&self, id: &str) -> Result<Option<DocumentAnalysis>, AppError>;
    fn get_jurisdiction(&self, id: &str) -> Result<Option<CourtJurisdiction>, AppError>;
    fn get_summary(&self, id: &str) -> Result<serde_json::Value, AppError>;

    /// Upload one batch. Returns the created record(s).
    fn upload_documents(&self, files: &[UploadFile]) -> Result<Vec<Document>, AppError>;
    fn analyze_document(&self, id: &str) -> Result<DocumentAnalysis, AppError>;
    fn find_jurisdiction(&self, id: &str) -> Result<CourtJurisdiction, AppError>;
    fn translate_document(
        &self,
        id: &str,
        target_language: &str,
    ) -> Result<serde_json::Value, AppError>;
    fn delete_document(&self, id: &str) -> Result<(), AppError>;

    fn download_document(&self, id: &str) -> Result<Vec<u8>, AppError>;
    fn export_report_pdf(&self, id: &str) -> Result<Vec<u8>, AppError>;

    fn get_stats(&self) -> Result<Stats, AppError>;
    fn list_courts(&self, query: &CourtQuery) -> Result<Vec<Court>, AppError>;
    fn list_activities(&self, scope: ActivityScope) -> Result<Vec<ActivityLog>, AppError>;
}

pub mod http_api;
