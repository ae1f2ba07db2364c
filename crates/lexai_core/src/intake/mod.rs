use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::notice::Notice;

pub const ALLOWED_MIME_TYPES: [&str; 4] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
];

/// 50 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

pub const ACCEPTED_EXTENSIONS: [&str; 4] = [".pdf", ".docx", ".doc", ".txt"];

/// Metadata of a file the user wants to submit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CandidateFile {
    pub name: String,
    pub mime_type: String,
    pub byte_size: u64,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, byte_size: u64) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            byte_size,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RejectionReason {
    UnsupportedType,
    TooLarge,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntakeRejection {
    pub file_name: String,
    pub reason: RejectionReason,
}

impl IntakeRejection {
    pub fn notice(&self) -> Notice {
        match self.reason {
            RejectionReason::UnsupportedType => Notice::error(
                "Invalid file type",
                format!(
                    "File \"{}\" is not supported. Please upload PDF, DOCX, or TXT files.",
                    self.file_name
                ),
            ),
            RejectionReason::TooLarge => Notice::error(
                "File too large",
                format!("File \"{}\" exceeds the 50MB limit.", self.file_name),
            ),
        }
    }

    pub fn to_error(&self) -> AppError {
        let code = match self.reason {
            RejectionReason::UnsupportedType => "INTAKE_UNSUPPORTED_TYPE",
            RejectionReason::TooLarge => "INTAKE_TOO_LARGE",
        };
        AppError::new(code, self.notice().description)
            .with_details(format!("file={}", self.file_name))
    }
}

/// Accept a file iff its MIME type is allow-listed and it fits the size limit.
/// The type check runs first, so an oversized unsupported file reports `UnsupportedType`.
pub fn validate_file(file: &CandidateFile) -> Result<(), IntakeRejection> {
    if !ALLOWED_MIME_TYPES.contains(&file.mime_type.as_str()) {
        return Err(IntakeRejection {
            file_name: file.name.clone(),
            reason: RejectionReason::UnsupportedType,
        });
    }
    if file.byte_size > MAX_UPLOAD_BYTES {
        return Err(IntakeRejection {
            file_name: file.name.clone(),
            reason: RejectionReason::TooLarge,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeOutcome<T> {
    pub accepted: Vec<T>,
    pub rejected: Vec<IntakeRejection>,
}

impl<T> IntakeOutcome<T> {
    /// A submission only happens when at least one file survived screening.
    pub fn is_submittable(&self) -> bool {
        !self.accepted.is_empty()
    }
}

/// Partition a batch into accepted and rejected files, both in input order.
///
/// Generic over the carried item so callers can screen payload-bearing files
/// without cloning their bytes.
pub fn screen_batch<T, F>(files: Vec<T>, meta: F) -> IntakeOutcome<T>
where
    F: Fn(&T) -> &CandidateFile,
{
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();
    for file in files {
        match validate_file(meta(&file)) {
            Ok(()) => accepted.push(file),
            Err(r) => {
                tracing::warn!(file = %r.file_name, reason = ?r.reason, "file rejected at intake");
                rejected.push(r);
            }
        }
    }
    IntakeOutcome { accepted, rejected }
}

/// Map an accepted file extension to its MIME type, for files read from disk.
pub fn mime_type_for_name(name: &str) -> Option<&'static str> {
    let lower = name.to_ascii_lowercase();
    let ext = lower.rsplit_once('.').map(|(_, e)| e)?;
    match ext {
        "pdf" => Some("application/pdf"),
        "doc" => Some("application/msword"),
        "docx" => Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        "txt" => Some("text/plain"),
        _ => None,
    }
}
