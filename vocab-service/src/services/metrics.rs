//! Metrics collection and Prometheus export.
//!
//! Initializes the metrics exporter and provides helpers for the relay's
//! domain metrics. HTTP request metrics come from the shared middleware.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use service_core::error::AppError;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

static INIT_LOCK: Mutex<()> = Mutex::new(());

/// Install the Prometheus recorder. Calling it again is a no-op.
pub fn init_metrics() -> Result<(), AppError> {
    let _guard = INIT_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if METRICS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
        AppError::InternalError(anyhow::anyhow!(
            "failed to install Prometheus recorder: {}",
            e
        ))
    })?;

    let _ = METRICS_HANDLE.set(handle);
    Ok(())
}

/// Get the current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized".to_string())
}

/// Count one extraction attempt by outcome (`success`, `parse_error`, ...).
pub fn record_extraction(outcome: &'static str) {
    counter!("vocab_extractions_total", "outcome" => outcome).increment(1);
}

pub fn record_words_extracted(count: usize) {
    counter!("vocab_words_extracted_total").increment(count as u64);
}

pub fn record_upstream_latency(model: &str, elapsed: Duration) {
    histogram!("vocab_upstream_duration_seconds", "model" => model.to_string())
        .record(elapsed.as_secs_f64());
}
