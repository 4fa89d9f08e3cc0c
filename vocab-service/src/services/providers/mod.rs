//! AI provider abstractions and implementations.
//!
//! The relay only needs one capability from the model: read an image and
//! answer an instruction with text. Keeping that behind a trait lets tests and
//! local runs swap Gemini for a deterministic mock.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Content filtered")]
    ContentFiltered,

    #[error("Model returned no text")]
    EmptyResponse,

    #[error("Network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Short label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::ApiError(_) => "api_error",
            ProviderError::RateLimited => "rate_limited",
            ProviderError::ContentFiltered => "content_filtered",
            ProviderError::EmptyResponse => "empty_response",
            ProviderError::NetworkError(_) => "network_error",
        }
    }
}

/// Image attached inline to a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,

    /// Base64 (standard alphabet, padded) image bytes.
    pub data: String,
}

/// Trait for multimodal text generation providers (e.g., Gemini).
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Answer `prompt` about `image`, returning the model's raw text.
    async fn generate(&self, prompt: &str, image: &InlineImage) -> Result<String, ProviderError>;

    /// Model identifier, for logs.
    fn model(&self) -> &str;
}
