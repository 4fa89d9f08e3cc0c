use service_core::observability::init_tracing;
use vocab_service::config::VocabConfig;
use vocab_service::services::init_metrics;
use vocab_service::startup::Application;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    let otlp_endpoint = std::env::var("OTLP_ENDPOINT").ok();
    init_tracing("vocab-service", "info", otlp_endpoint.as_deref());

    init_metrics().map_err(|e| {
        tracing::error!("Failed to initialize metrics: {}", e);
        std::io::Error::other(format!("Metrics error: {}", e))
    })?;

    // A missing GEMINI_API_KEY stops the service here.
    let config = VocabConfig::load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    tracing::info!(
        "Web app available at http://localhost:{}/index.html",
        app.port()
    );

    app.run_until_stopped().await
}
