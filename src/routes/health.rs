use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// Health check endpoint (liveness)
/// Returns 200 if server is running
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "docbay",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
