use std::fs;
use std::path::Path;

use lexai_core::error::AppError;
use lexai_core::intake::{mime_type_for_name, validate_file, CandidateFile};

/// A file queued for upload: intake metadata plus its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub meta: CandidateFile,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        let meta = CandidateFile::new(name, mime_type, bytes.len() as u64);
        Self { meta, bytes }
    }

    /// Read a file from disk, deriving its MIME type from the extension.
    ///
    /// Files that cannot pass intake are not read; they carry their on-disk size and an empty
    /// payload so the validator can still reject them by name.
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| {
                AppError::new("INTAKE_READ_FAILED", "Upload path has no file name")
                    .with_details(path.display().to_string())
            })?;

        let md = fs::metadata(path).map_err(|e| {
            AppError::new("INTAKE_READ_FAILED", "Failed to stat upload file")
                .with_details(format!("path={}; err={}", path.display(), e))
        })?;
        if !md.is_file() {
            return Err(AppError::new("INTAKE_READ_FAILED", "Upload path is not a file")
                .with_details(path.display().to_string()));
        }

        let mime_type = mime_type_for_name(&name).unwrap_or("application/octet-stream");
        let meta = CandidateFile::new(name, mime_type, md.len());
        if validate_file(&meta).is_err() {
            return Ok(Self {
                meta,
                bytes: Vec::new(),
            });
        }

        let bytes = fs::read(path).map_err(|e| {
            AppError::new("INTAKE_READ_FAILED", "Failed to read upload file")
                .with_details(format!("path={}; err={}", path.display(), e))
        })?;
        Ok(Self {
            meta: CandidateFile {
                byte_size: bytes.len() as u64,
                ..meta
            },
            bytes,
        })
    }
}
