//! HTTP client for the upload relay.

use crate::handlers::upload::IMAGE_FIELD;
use crate::models::WordPair;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Upload rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
}

#[derive(Clone)]
pub struct UploadClient {
    client: Client,
    base_url: String,
}

impl UploadClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        // Generous: the relay waits on the model before answering.
        let client = Client::builder()
            .timeout(Duration::from_secs(180))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Send one image to `POST /upload-image` and return the extracted words.
    pub async fn upload(
        &self,
        image: Vec<u8>,
        file_name: &str,
        mime_type: &str,
    ) -> Result<Vec<WordPair>, ClientError> {
        let part = Part::bytes(image)
            .file_name(file_name.to_string())
            .mime_str(mime_type)?;
        let form = Form::new().part(IMAGE_FIELD, part);

        let response = self
            .client
            .post(format!("{}/upload-image", self.base_url))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Rejected { status, message });
        }

        Ok(response.json().await?)
    }
}
