//! Mock provider implementation for tests and offline runs.

use super::{InlineImage, ProviderError, VisionProvider};
use async_trait::async_trait;
use std::sync::Mutex;

/// Mock vision provider that answers every request with a canned result.
pub struct MockVisionProvider {
    reply: Result<String, ProviderError>,
    calls: Mutex<Vec<InlineImage>>,
}

impl MockVisionProvider {
    /// Always answer with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always fail with `error`.
    pub fn failing(error: ProviderError) -> Self {
        Self {
            reply: Err(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Images received so far, in call order.
    pub fn calls(&self) -> Vec<InlineImage> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl VisionProvider for MockVisionProvider {
    async fn generate(&self, _prompt: &str, image: &InlineImage) -> Result<String, ProviderError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(image.clone());
        }

        self.reply.clone()
    }

    fn model(&self) -> &str {
        "mock"
    }
}
