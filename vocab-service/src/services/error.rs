use super::providers::ProviderError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Everything that can go wrong while turning an uploaded image into words.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No image file was uploaded")]
    NoFile,

    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error("Upstream model call failed: {0}")]
    Upstream(#[from] ProviderError),

    #[error("Model response is not a JSON array: {reason}")]
    Parse { raw: String, reason: String },

    #[error("Temporary storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl UploadError {
    /// Label used for the extraction outcome metric.
    pub fn outcome(&self) -> &'static str {
        match self {
            UploadError::NoFile => "no_file",
            UploadError::InvalidUpload(_) => "invalid_upload",
            UploadError::Upstream(_) => "upstream_error",
            UploadError::Parse { .. } => "parse_error",
            UploadError::Storage(_) => "storage_error",
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ParseErrorBody {
    error: String,
    raw_response: String,
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        match self {
            UploadError::NoFile => {
                (StatusCode::BAD_REQUEST, "No image file was uploaded.").into_response()
            }
            UploadError::InvalidUpload(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            UploadError::Parse { raw, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ParseErrorBody {
                    error: "Could not parse the model response.".to_string(),
                    raw_response: raw,
                }),
            )
                .into_response(),
            UploadError::Upstream(_) | UploadError::Storage(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred while processing the image.",
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_string(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn no_file_is_plain_text_400() {
        let response = UploadError::NoFile.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_string(response).await, "No image file was uploaded.");
    }

    #[tokio::test]
    async fn parse_error_carries_raw_response() {
        let response = UploadError::Parse {
            raw: "not json".to_string(),
            reason: "expected value".to_string(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["rawResponse"], "not json");
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn upstream_error_hides_details() {
        let response =
            UploadError::Upstream(ProviderError::ApiError("quota exceeded for key".into()))
                .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_string(response).await;
        assert!(!body.contains("quota"));
    }
}
