use sha2::{Digest, Sha256};

use crate::files::UploadFile;

pub const UPLOAD_FIELD: &str = "files";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartBody {
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Encode a batch as `multipart/form-data`, one `files` part per file.
///
/// The boundary is derived from the payload hash, so it cannot collide with the content
/// short of a SHA-256 preimage.
pub fn encode_files(files: &[UploadFile]) -> MultipartBody {
    let boundary = boundary_for(files);
    let mut body = Vec::new();

    for f in files {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{UPLOAD_FIELD}\"; filename=\"{}\"\r\n",
                escape_filename(&f.meta.name)
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", f.meta.mime_type).as_bytes());
        body.extend_from_slice(&f.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    MultipartBody {
        content_type: format!("multipart/form-data; boundary={boundary}"),
        body,
    }
}

fn boundary_for(files: &[UploadFile]) -> String {
    let mut hasher = Sha256::new();
    for f in files {
        hasher.update(f.meta.name.as_bytes());
        hasher.update((f.bytes.len() as u64).to_le_bytes());
        hasher.update(&f.bytes);
    }
    let digest = hex::encode(hasher.finalize());
    format!("lexai-{}", &digest[..32])
}

fn escape_filename(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '\r' && *c != '\n')
        .map(|c| match c {
            '"' => "%22".to_string(),
            other => other.to_string(),
        })
        .collect()
}
