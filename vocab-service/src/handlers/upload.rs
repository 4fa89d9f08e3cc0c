use crate::models::{resolve_image_mime, WordPair};
use crate::services::metrics::record_extraction;
use crate::services::{TempUpload, UploadError};
use crate::startup::AppState;
use axum::{
    extract::{
        multipart::{Field, MultipartRejection},
        Multipart, State,
    },
    Json,
};

/// Multipart field the browser UI sends the image in.
pub const IMAGE_FIELD: &str = "image";

/// `POST /upload-image`: turn one photographed word list into word pairs.
pub async fn upload_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Vec<WordPair>>, UploadError> {
    receive_and_extract(&state, multipart).await.map_err(|e| {
        // Extraction failures are counted by the extractor itself.
        if matches!(
            e,
            UploadError::NoFile | UploadError::InvalidUpload(_) | UploadError::Storage(_)
        ) {
            tracing::warn!(error = %e, "Upload rejected");
            record_extraction(e.outcome());
        }
        e
    })
}

async fn receive_and_extract(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Vec<WordPair>>, UploadError> {
    // A body that is not multipart at all carries no file either.
    let mut multipart = multipart.map_err(|_| UploadError::NoFile)?;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        UploadError::InvalidUpload(format!("Failed to read multipart field: {}", e))
    })? {
        if field.name() == Some(IMAGE_FIELD) || field.file_name().is_some() {
            return extract_field(state, field).await;
        }
    }

    Err(UploadError::NoFile)
}

async fn extract_field(
    state: &AppState,
    field: Field<'_>,
) -> Result<Json<Vec<WordPair>>, UploadError> {
    let file_name = field.file_name().map(str::to_string);
    let mime_type = resolve_image_mime(field.content_type(), file_name.as_deref())
        .filter(|mime| mime.starts_with("image/"))
        .ok_or_else(|| {
            UploadError::InvalidUpload("Only image files can be uploaded.".to_string())
        })?;

    let upload = TempUpload::receive(
        &state.config.upload.temp_dir,
        field,
        state.config.upload.max_bytes,
    )
    .await?;

    if upload.size() == 0 {
        return Err(UploadError::NoFile);
    }

    tracing::info!(
        file_name = file_name.as_deref().unwrap_or("unnamed"),
        mime_type = %mime_type,
        size = upload.size(),
        "Image upload received"
    );

    let result = match upload.read().await {
        Ok(bytes) => state.extractor.extract(&bytes, &mime_type).await,
        Err(e) => Err(e),
    };
    upload.close();

    result.map(Json)
}
