use serde::Serialize;

use crate::domain::Document;
use crate::error::AppError;
use crate::intake::{screen_batch, CandidateFile};
use crate::notice::Notice;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum UploadState {
    Idle,
    Submitting { file_count: usize },
    Success { created: usize },
}

/// One upload submission state machine: `Idle -> Submitting -> {Success, Failure}`.
///
/// A failure is not held: its notice is raised, the error goes back to the caller and the
/// flow returns to `Idle`. `Success` is at rest and a new batch may start from it. Nothing is
/// retried automatically. Overlapping uploads use separate `UploadFlow` values.
#[derive(Debug, Clone)]
pub struct UploadFlow {
    state: UploadState,
    notices: Vec<Notice>,
}

impl UploadFlow {
    pub fn new() -> Self {
        Self {
            state: UploadState::Idle,
            notices: Vec::new(),
        }
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    /// Notices raised since the flow was created, oldest first.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Screen a batch and, when at least one file passes, enter `Submitting`.
    ///
    /// Returns the accepted files to send as one submission unit, or `None` when nothing
    /// passed (no request must be issued). Each rejection raises its own notice.
    pub fn begin<T, F>(&mut self, files: Vec<T>, meta: F) -> Result<Option<Vec<T>>, AppError>
    where
        F: Fn(&T) -> &CandidateFile,
    {
        if let UploadState::Submitting { file_count } = &self.state {
            return Err(AppError::new(
                "UPLOAD_IN_FLIGHT",
                "An upload batch is already being submitted",
            )
            .with_details(format!("file_count={file_count}")));
        }

        let outcome = screen_batch(files, meta);
        self.notices
            .extend(outcome.rejected.iter().map(|r| r.notice()));

        if !outcome.is_submittable() {
            self.state = UploadState::Idle;
            return Ok(None);
        }

        self.state = UploadState::Submitting {
            file_count: outcome.accepted.len(),
        };
        Ok(Some(outcome.accepted))
    }

    /// Record the settled request and pass its result through. Only meaningful while
    /// `Submitting`.
    pub fn settle(
        &mut self,
        result: Result<Vec<Document>, AppError>,
    ) -> Result<Vec<Document>, AppError> {
        if !matches!(self.state, UploadState::Submitting { .. }) {
            tracing::warn!(state = ?self.state, "upload settled without a submission in flight");
        }
        match &result {
            Ok(created) => {
                self.notices.push(Notice::info(
                    "Upload successful",
                    "Your document has been uploaded and queued for processing.",
                ));
                self.state = UploadState::Success {
                    created: created.len(),
                };
            }
            Err(e) => {
                self.notices.push(Notice::error("Upload failed", e.message.clone()));
                self.state = UploadState::Idle;
            }
        }
        result
    }
}

impl Default for UploadFlow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DocumentStatus;
    use crate::notice::NoticeVariant;
    use pretty_assertions::assert_eq;

    fn pdf(name: &str, size: u64) -> CandidateFile {
        CandidateFile::new(name, "application/pdf", size)
    }

    fn created(id: &str) -> Document {
        Document {
            id: id.to_string(),
            name: "a.pdf".to_string(),
            size: 1,
            mime_type: "application/pdf".to_string(),
            uploaded_at: "2024-01-05T00:00:00Z".to_string(),
            status: DocumentStatus::Pending,
            content: None,
        }
    }

    #[test]
    fn happy_path() {
        let mut flow = UploadFlow::new();
        let batch = flow.begin(vec![pdf("a.pdf", 10)], |f| f).expect("begin");
        assert_eq!(batch.map(|b| b.len()), Some(1));
        assert_eq!(flow.state(), &UploadState::Submitting { file_count: 1 });

        let docs = flow.settle(Ok(vec![created("d1")])).expect("settled");
        assert_eq!(docs[0].id, "d1");
        assert_eq!(flow.state(), &UploadState::Success { created: 1 });
        assert_eq!(flow.notices().len(), 1);
        assert_eq!(flow.notices()[0].title, "Upload successful");
    }

    #[test]
    fn nothing_valid_means_no_submission() {
        let mut flow = UploadFlow::new();
        let batch = flow
            .begin(vec![CandidateFile::new("x.png", "image/png", 1)], |f| f)
            .expect("begin");
        assert!(batch.is_none());
        assert_eq!(flow.state(), &UploadState::Idle);
        assert_eq!(flow.notices()[0].title, "Invalid file type");
    }

    #[test]
    fn failure_surfaces_server_text_verbatim() {
        let mut flow = UploadFlow::new();
        flow.begin(vec![pdf("a.pdf", 10)], |f| f).expect("begin");
        let err = flow
            .settle(Err(AppError::new("API_REQUEST_FAILED", "Storage quota exceeded")))
            .expect_err("failed");
        assert_eq!(err.message, "Storage quota exceeded");
        assert_eq!(flow.state(), &UploadState::Idle);
        let n = flow.take_notices();
        assert_eq!(n[0].description, "Storage quota exceeded");
        assert_eq!(n[0].variant, NoticeVariant::Destructive);
        assert!(flow.notices().is_empty());

        // Back to Idle: a new batch may start.
        assert!(flow.begin(vec![pdf("b.pdf", 10)], |f| f).expect("begin").is_some());
    }

    #[test]
    fn second_batch_while_submitting_is_refused() {
        let mut flow = UploadFlow::new();
        flow.begin(vec![pdf("a.pdf", 10)], |f| f).expect("begin");
        let err = flow
            .begin(vec![pdf("b.pdf", 10)], |f| f)
            .expect_err("in flight");
        assert_eq!(err.code, "UPLOAD_IN_FLIGHT");
    }
}
