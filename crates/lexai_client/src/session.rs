use std::collections::HashMap;
use std::sync::Mutex;

use lexai_core::cache::{CourtQuery, Mutation, QueryCache, QueryKey};
use lexai_core::domain::{
    find_language, ActivityLog, Court, CourtJurisdiction, Document, DocumentAnalysis,
    DocumentStatus, Stats,
};
use lexai_core::error::AppError;
use lexai_core::notice::Notice;
use lexai_core::status::status_gate;
use lexai_core::upload::{UploadFlow, UploadState};
use lexai_core::validate::{validate_document, validate_transition};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::{ActivityScope, LegalApi};
use crate::files::UploadFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatedAction {
    View,
    Download,
    Delete,
    Analyze,
}

impl GatedAction {
    fn as_str(self) -> &'static str {
        match self {
            GatedAction::View => "view",
            GatedAction::Download => "download",
            GatedAction::Delete => "delete",
            GatedAction::Analyze => "analyze",
        }
    }

    fn allowed(self, status: DocumentStatus) -> bool {
        let a = status_gate(status);
        match self {
            GatedAction::View => a.can_view,
            GatedAction::Download => a.can_download,
            GatedAction::Delete => a.can_delete,
            GatedAction::Analyze => a.can_analyze,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    pub state: UploadState,
    pub notices: Vec<Notice>,
    pub created: Vec<Document>,
    /// The request error when the server refused the batch.
    pub error: Option<AppError>,
}

impl UploadReport {
    /// Created records, or why nothing was created.
    pub fn into_result(self) -> Result<Vec<Document>, AppError> {
        if let Some(e) = self.error {
            return Err(e);
        }
        if self.created.is_empty() {
            return Err(AppError::new(
                "INTAKE_NO_ACCEPTED_FILES",
                "No file passed intake; nothing was uploaded",
            )
            .with_details(format!("rejected={}", self.notices.len())));
        }
        Ok(self.created)
    }
}

/// Everything the research view shows for one processed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentView {
    pub document: Document,
    pub analysis: Option<DocumentAnalysis>,
    pub jurisdiction: Option<CourtJurisdiction>,
}

/// Couples a `LegalApi` to the query cache and the upload state machine.
///
/// Reads are served from fresh cache entries; every successful mutation drops the keys it
/// declares. Failed mutations leave the cache untouched.
pub struct Session<A> {
    api: A,
    cache: QueryCache,
    last_status: Mutex<HashMap<String, DocumentStatus>>,
}

impl<A: LegalApi> Session<A> {
    pub fn new(api: A, cache: QueryCache) -> Self {
        Self {
            api,
            cache,
            last_status: Mutex::new(HashMap::new()),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    fn cached<T, F>(&self, key: QueryKey, fetch: F) -> Result<T, AppError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&A) -> Result<T, AppError>,
    {
        if let Some(hit) = self.cache.get::<T>(&key) {
            return Ok(hit);
        }
        let value = fetch(&self.api)?;
        self.cache.put(key, &value)?;
        Ok(value)
    }

    /// Check refetched records against the last status seen for them.
    fn observe(&self, docs: &[Document]) {
        let mut seen = self.last_status.lock().unwrap_or_else(|e| e.into_inner());
        for doc in docs {
            if let Some(prev) = seen.insert(doc.id.clone(), doc.status) {
                if let Some(w) = validate_transition(&doc.id, prev, doc.status) {
                    tracing::warn!(code = %w.code, details = ?w.details, "{}", w.message);
                }
            }
            for w in validate_document(doc) {
                tracing::debug!(code = %w.code, details = ?w.details, "{}", w.message);
            }
        }
    }

    /// Drop the per-document entries of every record whose status a list read shows has
    /// moved on since it was cached.
    fn sync_documents(&self, docs: &[Document]) {
        for doc in docs {
            let key = QueryKey::Document(doc.id.clone());
            let Some(cached) = self.cache.get::<Document>(&key) else {
                continue;
            };
            if cached.status == doc.status {
                continue;
            }
            tracing::debug!(
                document_id = %doc.id,
                from = cached.status.as_str(),
                to = doc.status.as_str(),
                "status moved; dropping cached record"
            );
            for key in [
                key,
                QueryKey::Analysis(doc.id.clone()),
                QueryKey::Jurisdiction(doc.id.clone()),
                QueryKey::Summary(doc.id.clone()),
            ] {
                self.cache.invalidate(&key);
            }
        }
    }

    pub fn recent_documents(&self) -> Result<Vec<Document>, AppError> {
        let docs = self.cached(QueryKey::RecentDocuments, |api| api.list_recent_documents())?;
        self.sync_documents(&docs);
        self.observe(&docs);
        Ok(docs)
    }

    pub fn documents(&self) -> Result<Vec<Document>, AppError> {
        let docs = self.cached(QueryKey::AllDocuments, |api| api.list_documents())?;
        self.sync_documents(&docs);
        self.observe(&docs);
        Ok(docs)
    }

    pub fn document(&self, id: &str) -> Result<Document, AppError> {
        let doc = self.cached(QueryKey::Document(id.to_string()), |api| api.get_document(id))?;
        self.observe(std::slice::from_ref(&doc));
        Ok(doc)
    }

    pub fn analysis(&self, id: &str) -> Result<Option<DocumentAnalysis>, AppError> {
        self.cached(QueryKey::Analysis(id.to_string()), |api| api.get_analysis(id))
    }

    pub fn jurisdiction(&self, id: &str) -> Result<Option<CourtJurisdiction>, AppError> {
        self.cached(QueryKey::Jurisdiction(id.to_string()), |api| {
            api.get_jurisdiction(id)
        })
    }

    pub fn summary(&self, id: &str) -> Result<serde_json::Value, AppError> {
        self.cached(QueryKey::Summary(id.to_string()), |api| api.get_summary(id))
    }

    pub fn stats(&self) -> Result<Stats, AppError> {
        self.cached(QueryKey::Stats, |api| api.get_stats())
    }

    pub fn courts(&self, query: &CourtQuery) -> Result<Vec<Court>, AppError> {
        self.cached(QueryKey::Courts(query.clone()), |api| api.list_courts(query))
    }

    pub fn activities(&self, scope: ActivityScope) -> Result<Vec<ActivityLog>, AppError> {
        let key = match scope {
            ActivityScope::All => QueryKey::Activities,
            ActivityScope::Recent => QueryKey::RecentActivities,
        };
        self.cached(key, |api| api.list_activities(scope))
    }

    /// Drop one key so the next read goes to the server.
    pub fn refresh(&self, key: &QueryKey) {
        self.cache.invalidate(key);
    }

    /// Apply the Status Gate to the server's current record. Processing moves the status
    /// without any client mutation, so the cached record is not trusted here.
    fn gated(&self, id: &str, action: GatedAction) -> Result<Document, AppError> {
        self.refresh(&QueryKey::Document(id.to_string()));
        let doc = self.document(id)?;
        if !action.allowed(doc.status) {
            return Err(AppError::new(
                "ACTION_NOT_ALLOWED",
                format!(
                    "Cannot {} a document that is {}",
                    action.as_str(),
                    doc.status.as_str()
                ),
            )
            .with_details(format!("id={id}; status={}", doc.status.as_str())));
        }
        Ok(doc)
    }

    fn commit(&self, mutation: Mutation) {
        let dropped = self.cache.invalidate_for(&mutation);
        tracing::info!(mutation = ?mutation, dropped, "mutation applied");
    }

    /// Validate, submit and settle one upload batch.
    ///
    /// Validation failures never reach the API. Request failures are reported through the
    /// report's `error` and notices, not as `Err`.
    pub fn submit_files(&self, files: Vec<UploadFile>) -> Result<UploadReport, AppError> {
        let mut flow = UploadFlow::new();
        let Some(batch) = flow.begin(files, |f| &f.meta)? else {
            return Ok(UploadReport {
                state: flow.state().clone(),
                notices: flow.take_notices(),
                created: Vec::new(),
                error: None,
            });
        };

        tracing::info!(count = batch.len(), "submitting upload batch");
        let (created, error) = match flow.settle(self.api.upload_documents(&batch)) {
            Ok(docs) => {
                self.commit(Mutation::Upload);
                self.observe(&docs);
                (docs, None)
            }
            Err(e) => {
                tracing::warn!(code = %e.code, message = %e.message, "upload failed");
                (Vec::new(), Some(e))
            }
        };

        Ok(UploadReport {
            state: flow.state().clone(),
            notices: flow.take_notices(),
            created,
            error,
        })
    }

    /// Processed documents with their derived analysis, as shown by the research view.
    pub fn view(&self, id: &str) -> Result<DocumentView, AppError> {
        let document = self.gated(id, GatedAction::View)?;
        Ok(DocumentView {
            analysis: self.analysis(id)?,
            jurisdiction: self.jurisdiction(id)?,
            document,
        })
    }

    pub fn analyze(&self, id: &str) -> Result<DocumentAnalysis, AppError> {
        self.gated(id, GatedAction::Analyze)?;
        tracing::info!(document_id = %id, "analyzing document");
        let analysis = self.api.analyze_document(id)?;
        self.commit(Mutation::Analyze(id.to_string()));
        self.cache.put(QueryKey::Analysis(id.to_string()), &Some(&analysis))?;
        Ok(analysis)
    }

    pub fn find_jurisdiction(&self, id: &str) -> Result<CourtJurisdiction, AppError> {
        tracing::info!(document_id = %id, "finding jurisdiction");
        let jurisdiction = self.api.find_jurisdiction(id)?;
        self.commit(Mutation::FindJurisdiction(id.to_string()));
        self.cache
            .put(QueryKey::Jurisdiction(id.to_string()), &Some(&jurisdiction))?;
        Ok(jurisdiction)
    }

    /// Translate into a supported language, given by code (`hi`) or name (`Hindi`).
    pub fn translate(&self, id: &str, language: &str) -> Result<serde_json::Value, AppError> {
        let lang = find_language(language).ok_or_else(|| {
            AppError::new("VALIDATION_UNSUPPORTED_LANGUAGE", "Unsupported target language")
                .with_details(format!("language={language}"))
        })?;
        let target = lang.name.to_lowercase();
        tracing::info!(document_id = %id, target = %target, "translating document");
        let out = self.api.translate_document(id, &target)?;
        self.commit(Mutation::Translate(id.to_string()));
        Ok(out)
    }

    pub fn download(&self, id: &str) -> Result<Vec<u8>, AppError> {
        self.gated(id, GatedAction::Download)?;
        self.api.download_document(id)
    }

    pub fn export_report(&self, id: &str) -> Result<Vec<u8>, AppError> {
        self.gated(id, GatedAction::View)?;
        self.api.export_report_pdf(id)
    }

    pub fn delete(&self, id: &str) -> Result<(), AppError> {
        self.gated(id, GatedAction::Delete)?;
        tracing::info!(document_id = %id, "deleting document");
        self.api.delete_document(id)?;
        self.commit(Mutation::Delete(id.to_string()));
        self.last_status
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(id);
        Ok(())
    }
}
