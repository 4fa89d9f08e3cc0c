//! Image-to-word-list extraction.
//!
//! Sends the image and a fixed instruction to the vision provider, then turns
//! the model's free-form answer into word pairs.

use super::error::UploadError;
use super::metrics::{record_extraction, record_upstream_latency, record_words_extracted};
use super::providers::{InlineImage, VisionProvider};
use crate::models::WordPair;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// Instruction sent with every image.
pub const EXTRACTION_PROMPT: &str = "Extract the English words and their Korean meanings from this image \
and return them as a JSON array. Each item must have the keys 'eng' and 'kor'. For example: \
[{\"eng\": \"apple\", \"kor\": \"사과\"}, {\"eng\": \"book\", \"kor\": \"책\"}]. \
Assume the image is a list with each word printed next to its meaning.";

const FENCE: &str = "```";

/// Return the contents of the first Markdown code fence in `raw`, or all of
/// `raw` when there is none. Surrounding whitespace is trimmed.
pub fn strip_code_fences(raw: &str) -> &str {
    let Some(start) = raw.find(FENCE) else {
        return raw.trim();
    };

    let body = skip_info_string(&raw[start + FENCE.len()..]);
    let body = match body.find(FENCE) {
        Some(end) => &body[..end],
        None => body,
    };

    body.trim()
}

/// Drop a fence's language tag (`json`, `JSON`, ...) if present.
fn skip_info_string(body: &str) -> &str {
    let is_tag_char = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_';

    match body.split_once('\n') {
        Some((first, rest)) if first.trim().chars().all(is_tag_char) => rest,
        _ => body.trim_start_matches(is_tag_char),
    }
}

/// Parse the model's answer into word pairs.
///
/// Anything but a JSON array is a [`UploadError::Parse`] carrying the
/// untouched answer. Array items without non-blank `eng`/`kor` strings are
/// dropped.
pub fn parse_word_pairs(raw: &str) -> Result<Vec<WordPair>, UploadError> {
    let cleaned = strip_code_fences(raw);

    let value: Value = serde_json::from_str(cleaned).map_err(|e| UploadError::Parse {
        raw: raw.to_string(),
        reason: e.to_string(),
    })?;

    let Value::Array(items) = value else {
        return Err(UploadError::Parse {
            raw: raw.to_string(),
            reason: "response is not a JSON array".to_string(),
        });
    };

    let pairs: Vec<WordPair> = items.iter().filter_map(WordPair::from_json).collect();

    if pairs.len() < items.len() {
        tracing::warn!(
            dropped = items.len() - pairs.len(),
            kept = pairs.len(),
            "Dropped word pairs without non-empty eng/kor strings"
        );
    }

    Ok(pairs)
}

/// Runs the upload relay against a vision provider.
#[derive(Clone)]
pub struct WordExtractor {
    provider: Arc<dyn VisionProvider>,
}

impl WordExtractor {
    pub fn new(provider: Arc<dyn VisionProvider>) -> Self {
        Self { provider }
    }

    /// Extract word pairs from raw image bytes. Never retries.
    pub async fn extract(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> Result<Vec<WordPair>, UploadError> {
        let inline = InlineImage {
            mime_type: mime_type.to_string(),
            data: STANDARD.encode(image),
        };

        let started = Instant::now();
        let answer = self.provider.generate(EXTRACTION_PROMPT, &inline).await;
        record_upstream_latency(self.provider.model(), started.elapsed());

        let text = answer.map_err(|e| {
            tracing::error!(
                model = %self.provider.model(),
                kind = e.kind(),
                error = %e,
                "Vision provider call failed"
            );
            record_extraction("upstream_error");
            UploadError::Upstream(e)
        })?;

        match parse_word_pairs(&text) {
            Ok(pairs) => {
                tracing::info!(
                    model = %self.provider.model(),
                    words = pairs.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Extracted word list"
                );
                record_extraction("success");
                record_words_extracted(pairs.len());
                Ok(pairs)
            }
            Err(e) => {
                tracing::error!(raw_response = %text, error = %e, "Failed to parse model response");
                record_extraction(e.outcome());
                Err(e)
            }
        }
    }
}
