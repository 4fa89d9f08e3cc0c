#![allow(dead_code)]

use reqwest::multipart;
use secrecy::Secret;
use service_core::config::Config as CoreConfig;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use vocab_service::config::{GeminiSettings, UploadConfig, VocabConfig, WebConfig};
use vocab_service::services::providers::mock::MockVisionProvider;
use vocab_service::startup::Application;

/// A 1x1 transparent PNG.
pub const PNG_1X1: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub provider: Arc<MockVisionProvider>,
    pub upload_dir: PathBuf,
    // Removes the upload directory when the test ends.
    _scratch: TempDir,
}

impl TestApp {
    pub async fn spawn(provider: MockVisionProvider) -> Self {
        Self::spawn_with_limit(provider, 1024 * 1024).await
    }

    pub async fn spawn_with_limit(provider: MockVisionProvider, max_bytes: u64) -> Self {
        let scratch = tempfile::tempdir().expect("Failed to create scratch directory");
        let upload_dir = scratch.path().join("uploads");

        let config = VocabConfig {
            common: CoreConfig { port: 0 }, // Random port for testing
            gemini: GeminiSettings {
                api_key: Secret::new("test-key".to_string()),
                model: "mock".to_string(),
                api_base: "http://127.0.0.1:9".to_string(),
                timeout: Duration::from_secs(5),
            },
            upload: UploadConfig {
                temp_dir: upload_dir.clone(),
                max_bytes,
            },
            web: WebConfig {
                static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/static")),
                cors_allow_origin: "*".to_string(),
            },
        };

        let provider = Arc::new(provider);
        let app = Application::build_with_provider(config, provider.clone())
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to answer health checks
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            provider,
            upload_dir,
            _scratch: scratch,
        }
    }

    pub async fn post_upload(&self, form: multipart::Form) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}/upload-image", self.address))
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Files left behind in the upload directory.
    pub fn leftover_uploads(&self) -> usize {
        std::fs::read_dir(&self.upload_dir)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

pub fn image_form(bytes: &[u8], file_name: &str, mime_type: &str) -> multipart::Form {
    multipart::Form::new().part(
        "image",
        multipart::Part::bytes(bytes.to_vec())
            .file_name(file_name.to_string())
            .mime_str(mime_type)
            .unwrap(),
    )
}

pub fn png_form() -> multipart::Form {
    image_form(PNG_1X1, "words.png", "image/png")
}
