//! Environment-driven configuration. The tests share the process
//! environment, so they run one at a time.

use secrecy::ExposeSecret;
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use vocab_service::config::VocabConfig;

const VARS: &[&str] = &[
    "ENVIRONMENT",
    "GEMINI_API_KEY",
    "GEMINI_MODEL",
    "GEMINI_API_BASE",
    "GEMINI_TIMEOUT_SECS",
    "UPLOAD_DIR",
    "UPLOAD_MAX_BYTES",
    "STATIC_DIR",
    "CORS_ALLOW_ORIGIN",
    "PORT",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn missing_or_blank_api_key_is_fatal() {
    clear_env();
    assert!(VocabConfig::load().is_err());

    env::set_var("GEMINI_API_KEY", "   ");
    assert!(VocabConfig::load().is_err());

    clear_env();
}

#[test]
#[serial]
fn defaults_apply_in_dev() {
    clear_env();
    env::set_var("GEMINI_API_KEY", "test-key");

    let config = VocabConfig::load().expect("defaults should load");

    assert_eq!(config.gemini.api_key.expose_secret(), "test-key");
    assert_eq!(config.gemini.model, "gemini-1.5-flash");
    assert_eq!(config.gemini.timeout, Duration::from_secs(120));
    assert_eq!(config.upload.temp_dir, PathBuf::from("uploads"));
    assert_eq!(config.upload.max_bytes, 10 * 1024 * 1024);
    assert_eq!(config.web.cors_allow_origin, "*");
    assert!(config.web.static_dir.ends_with("static"));
    assert_eq!(config.common.port, 3000);
    // Debug output never shows the key
    assert!(!format!("{:?}", config).contains("test-key"));

    clear_env();
}

#[test]
#[serial]
fn environment_overrides_defaults() {
    clear_env();
    env::set_var("GEMINI_API_KEY", "test-key");
    env::set_var("GEMINI_MODEL", "gemini-2.0-flash");
    env::set_var("GEMINI_TIMEOUT_SECS", "30");
    env::set_var("UPLOAD_MAX_BYTES", "2048");
    env::set_var("PORT", "8080");

    let config = VocabConfig::load().unwrap();

    assert_eq!(config.gemini.model, "gemini-2.0-flash");
    assert_eq!(config.gemini.timeout, Duration::from_secs(30));
    assert_eq!(config.upload.max_bytes, 2048);
    assert_eq!(config.common.port, 8080);

    clear_env();
}

#[test]
#[serial]
fn malformed_numbers_are_rejected() {
    clear_env();
    env::set_var("GEMINI_API_KEY", "test-key");

    env::set_var("UPLOAD_MAX_BYTES", "lots");
    assert!(VocabConfig::load().is_err());
    env::remove_var("UPLOAD_MAX_BYTES");

    env::set_var("PORT", "http");
    assert!(VocabConfig::load().is_err());

    clear_env();
}

#[test]
#[serial]
fn production_requires_every_setting() {
    clear_env();
    env::set_var("ENVIRONMENT", "prod");
    env::set_var("GEMINI_API_KEY", "test-key");
    assert!(VocabConfig::load().is_err());

    env::set_var("GEMINI_MODEL", "gemini-1.5-flash");
    env::set_var("GEMINI_API_BASE", "https://generativelanguage.googleapis.com/v1beta");
    env::set_var("GEMINI_TIMEOUT_SECS", "60");
    env::set_var("UPLOAD_DIR", "/tmp/vocab-uploads");
    env::set_var("UPLOAD_MAX_BYTES", "1048576");
    env::set_var("STATIC_DIR", "/srv/vocab/static");
    env::set_var("CORS_ALLOW_ORIGIN", "https://vocab.example");
    let config = VocabConfig::load().expect("complete production config should load");
    assert_eq!(config.upload.temp_dir, PathBuf::from("/tmp/vocab-uploads"));

    clear_env();
}
