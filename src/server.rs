//! Server initialization and routing
//!
//! This module handles the Axum server setup including:
//! - Router configuration with all endpoints
//! - Middleware stack (body limit, timeout, compression, logging)
//! - Graceful shutdown handling

use crate::config::Config;
use crate::middleware::{log_requests, request_id};
use crate::routes::{delete, docs, health, index, not_found, upload};
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Build the Axum router with all routes and middleware
///
/// Static documentation routes are parameterized by project and version;
/// the reserved `/_/` prefix keeps the mutation endpoints from colliding
/// with project names.
pub fn build_router(state: Arc<AppState>) -> Router {
    let timeout = state.config.timeout();
    let max_upload = state.config.max_upload_size();

    Router::new()
        .route("/", get(index::get_index))
        .route("/health", get(health::health_check))
        .route("/_/upload", post(upload::upload_docs))
        .route("/_/delete", get(delete::delete_docs))
        .route("/{project}", get(docs::get_default_version))
        .route("/{project}/", get(docs::get_default_version))
        .route("/{project}/{version}", get(docs::redirect_to_dir))
        .route("/{project}/{version}/", get(docs::serve_docs_root))
        .route("/{project}/{version}/{*path}", get(docs::serve_docs_file))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
        .layer(from_fn(request_id))
        .layer(from_fn(log_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the DocBay HTTP server
///
/// Initializes structured logging, creates the on-disk layout under the
/// configured data directory, binds the listener, and serves until shut
/// down via SIGTERM or Ctrl+C.
pub async fn start_server(config: Config) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(config.log_level.as_str())
        .with_target(false)
        .json()
        .init();

    // Create shared state (this creates the proj/ and tmp/ directories)
    let state = Arc::new(AppState::new(config.clone())?);

    // Build router
    let app = build_router(state);

    // Parse bind address
    let addr: SocketAddr = config.socket_addr()?;

    tracing::info!(
        "Starting DocBay on {} with data dir {}",
        addr,
        config.data_dir.display()
    );
    tracing::info!(
        "Timeout: {}s, Max upload: {}MB",
        config.timeout_secs,
        config.max_upload_size_mb
    );

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
