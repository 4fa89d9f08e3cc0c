//! Transient on-disk storage for one uploaded image.
//!
//! The upload is streamed into a uniquely named file under the configured
//! upload directory. The file is removed when the [`TempUpload`] is closed or
//! dropped, so every exit path of a request releases it.

use super::error::UploadError;
use axum::extract::multipart::Field;
use std::path::Path;
use tempfile::NamedTempFile;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

pub struct TempUpload {
    file: NamedTempFile,
    size: u64,
}

impl TempUpload {
    /// Stream `field` into a new temp file in `dir`, failing once more than
    /// `max_bytes` have arrived.
    pub async fn receive(
        dir: &Path,
        mut field: Field<'_>,
        max_bytes: u64,
    ) -> Result<Self, UploadError> {
        let file = tempfile::Builder::new()
            .prefix("upload-")
            .tempfile_in(dir)?;
        let mut writer = File::from_std(file.reopen()?);
        let mut size: u64 = 0;

        while let Some(chunk) = field.chunk().await.map_err(|e| {
            UploadError::InvalidUpload(format!("Failed to read uploaded file: {}", e))
        })? {
            size += chunk.len() as u64;
            if size > max_bytes {
                return Err(UploadError::InvalidUpload(format!(
                    "File too large (max {} bytes)",
                    max_bytes
                )));
            }
            writer.write_all(&chunk).await?;
        }

        writer.flush().await?;

        Ok(Self { file, size })
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Read the stored bytes back.
    pub async fn read(&self) -> Result<Vec<u8>, UploadError> {
        Ok(tokio::fs::read(self.path()).await?)
    }

    /// Delete the file now, logging instead of failing if that is not possible.
    pub fn close(self) {
        let path = self.file.path().to_path_buf();
        if let Err(e) = self.file.close() {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove temporary upload");
        }
    }
}
