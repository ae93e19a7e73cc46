//! CV attachment: type and size checks plus a content fingerprint.
//!
//! Only metadata survives; the file bytes are hashed and dropped.

use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::CvError;
use crate::form::model::{CvMeta, MAX_CV_BYTES, PDF_MIME};

impl CvMeta {
    /// Accept a file the candidate picked. Rejects anything that is not a
    /// PDF or is larger than 5 MiB.
    pub fn inspect(name: &str, mime: &str, bytes: &[u8]) -> Result<Self, CvError> {
        if mime != PDF_MIME {
            return Err(CvError::NotPdf {
                mime: mime.to_string(),
            });
        }
        let size = bytes.len() as u64;
        if size > MAX_CV_BYTES {
            return Err(CvError::TooLarge {
                size,
                max: MAX_CV_BYTES,
            });
        }

        Ok(Self {
            name: name.to_string(),
            size,
            mime: mime.to_string(),
            hash: sha256_hex(bytes),
        })
    }

    /// Read and inspect a file from disk. The MIME type is taken from the
    /// extension; the size is checked before the contents are read.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, CvError> {
        let path = path.as_ref();
        let mime = mime_for(path);
        if mime != PDF_MIME {
            return Err(CvError::NotPdf {
                mime: mime.to_string(),
            });
        }

        let size = tokio::fs::metadata(path).await?.len();
        if size > MAX_CV_BYTES {
            return Err(CvError::TooLarge {
                size,
                max: MAX_CV_BYTES,
            });
        }

        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let meta = Self::inspect(&name, mime, &bytes)?;
        info!(name = %meta.name, size = meta.size, "CV attached");
        Ok(meta)
    }
}

fn mime_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => PDF_MIME,
        _ => "application/octet-stream",
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
