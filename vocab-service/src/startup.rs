//! Application startup and lifecycle management.
//!
//! One HTTP server carries the upload relay, health and metrics endpoints and
//! the static browser UI.

use crate::config::VocabConfig;
use crate::handlers;
use crate::services::providers::gemini::{GeminiConfig, GeminiVisionProvider};
use crate::services::providers::VisionProvider;
use crate::services::WordExtractor;
use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    security_headers::security_headers_middleware,
    tracing::{make_request_span, request_id_middleware},
};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: VocabConfig,
    pub extractor: WordExtractor,
}

/// Build the HTTP router for the given state.
pub fn build_router(state: AppState) -> Result<Router, AppError> {
    let body_limit = usize::try_from(state.config.upload.max_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let router = Router::new()
        .route("/upload-image", post(handlers::upload_image))
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        .fallback_service(ServeDir::new(&state.config.web.static_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors_layer(&state.config.web.cors_allow_origin)?)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
        .layer(from_fn(request_id_middleware))
        .with_state(state);

    Ok(router)
}

fn cors_layer(allow_origin: &str) -> Result<CorsLayer, AppError> {
    let origin = if allow_origin.trim() == "*" {
        AllowOrigin::any()
    } else {
        let origins = allow_origin
            .split(',')
            .map(|o| HeaderValue::from_str(o.trim()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("Invalid CORS_ALLOW_ORIGIN: {}", e))
            })?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::ORIGIN,
            HeaderName::from_static("x-requested-with"),
            header::CONTENT_TYPE,
            header::ACCEPT,
        ]))
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    /// Build the application talking to Gemini.
    pub async fn build(config: VocabConfig) -> Result<Self, AppError> {
        let provider = GeminiVisionProvider::new(GeminiConfig {
            api_key: config.gemini.api_key.clone(),
            model: config.gemini.model.clone(),
            api_base: config.gemini.api_base.clone(),
            timeout: config.gemini.timeout,
        })
        .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;

        tracing::info!(model = %config.gemini.model, "Initialized Gemini vision provider");

        Self::build_with_provider(config, Arc::new(provider)).await
    }

    /// Build the application with any vision provider (tests use the mock).
    pub async fn build_with_provider(
        config: VocabConfig,
        provider: Arc<dyn VisionProvider>,
    ) -> Result<Self, AppError> {
        tokio::fs::create_dir_all(&config.upload.temp_dir)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to create upload directory {}: {}",
                    config.upload.temp_dir.display(),
                    e
                );
                AppError::from(e)
            })?;

        let state = AppState {
            config: config.clone(),
            extractor: WordExtractor::new(provider),
        };

        let app = build_router(state)?;

        // Port 0 binds a random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("vocab-service listening on port {}", port);

        let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GeminiSettings, UploadConfig, WebConfig};
    use crate::services::providers::mock::MockVisionProvider;
    use axum::http::{Request, StatusCode};
    use secrecy::Secret;
    use std::path::PathBuf;
    use std::time::Duration;
    use tower::ServiceExt;

    fn state() -> AppState {
        AppState {
            config: VocabConfig {
                common: service_core::config::Config { port: 0 },
                gemini: GeminiSettings {
                    api_key: Secret::new("test-key".to_string()),
                    model: "mock".to_string(),
                    api_base: "http://127.0.0.1:9".to_string(),
                    timeout: Duration::from_secs(1),
                },
                upload: UploadConfig {
                    temp_dir: std::env::temp_dir(),
                    max_bytes: 1024,
                },
                web: WebConfig {
                    static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/static")),
                    cors_allow_origin: "*".to_string(),
                },
            },
            extractor: WordExtractor::new(Arc::new(MockVisionProvider::replying("[]"))),
        }
    }

    #[tokio::test]
    async fn upload_without_body_is_bad_request() {
        let app = build_router(state()).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/upload-image")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(
            response.headers().get(header::X_CONTENT_TYPE_OPTIONS).unwrap(),
            "nosniff"
        );
    }

    #[tokio::test]
    async fn upload_route_rejects_get() {
        let app = build_router(state()).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/upload-image")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn cors_accepts_origin_lists() {
        assert!(cors_layer("*").is_ok());
        assert!(cors_layer("http://localhost:3000, https://vocab.example").is_ok());
        assert!(cors_layer("http://bad\norigin").is_err());
    }
}
