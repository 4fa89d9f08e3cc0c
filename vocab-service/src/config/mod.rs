use crate::services::providers::gemini::GEMINI_API_BASE;
use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default maximum upload size (10 MiB).
const DEFAULT_UPLOAD_MAX_BYTES: u64 = 10 * 1024 * 1024;

const DEFAULT_GEMINI_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct VocabConfig {
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
    pub upload: UploadConfig,
    pub web: WebConfig,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: Secret<String>,
    /// Multimodal model used for extraction (e.g., gemini-1.5-flash)
    pub model: String,
    pub api_base: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Directory for transient upload files
    pub temp_dir: PathBuf,
    pub max_bytes: u64,
}

#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Directory holding the browser UI
    pub static_dir: PathBuf,
    pub cors_allow_origin: String,
}

impl VocabConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env, APP__ prefix and PORT)
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let api_key = get_env("GEMINI_API_KEY", None, is_prod)?;
        if api_key.trim().is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "GEMINI_API_KEY is set but empty"
            )));
        }

        Ok(VocabConfig {
            common: common_config,
            gemini: GeminiSettings {
                api_key: Secret::new(api_key),
                model: get_env("GEMINI_MODEL", Some("gemini-1.5-flash"), is_prod)?,
                api_base: get_env("GEMINI_API_BASE", Some(GEMINI_API_BASE), is_prod)?,
                timeout: Duration::from_secs(parse_env(
                    "GEMINI_TIMEOUT_SECS",
                    DEFAULT_GEMINI_TIMEOUT_SECS,
                    is_prod,
                )?),
            },
            upload: UploadConfig {
                temp_dir: get_env("UPLOAD_DIR", Some("uploads"), is_prod)?.into(),
                max_bytes: parse_env("UPLOAD_MAX_BYTES", DEFAULT_UPLOAD_MAX_BYTES, is_prod)?,
            },
            web: WebConfig {
                static_dir: get_env(
                    "STATIC_DIR",
                    Some(concat!(env!("CARGO_MANIFEST_DIR"), "/static")),
                    is_prod,
                )?
                .into(),
                cors_allow_origin: get_env("CORS_ALLOW_ORIGIN", Some("*"), is_prod)?,
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

fn parse_env(key: &str, default: u64, is_prod: bool) -> Result<u64, AppError> {
    get_env(key, Some(&default.to_string()), is_prod)?
        .trim()
        .parse()
        .map_err(|e| AppError::ConfigError(anyhow::anyhow!("{} is not a number: {}", key, e)))
}
