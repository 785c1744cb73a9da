use crate::error::{ServerError, ServerResult};
use crate::state::AppState;
use axum::body::Body;
use axum::extract::{Path, Request, State};
use axum::response::{IntoResponse, Redirect, Response};
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::services::ServeDir;

/// Redirect `/{project}` to the project's `latest` version.
pub async fn get_default_version(Path(project): Path<String>) -> Redirect {
    Redirect::to(&format!("/{project}/latest/"))
}

/// Redirect `/{project}/{version}` to the trailing-slash form so that
/// relative links inside served pages resolve against the version root.
pub async fn redirect_to_dir(Path((project, version)): Path<(String, String)>) -> Redirect {
    Redirect::to(&format!("/{project}/{version}/"))
}

/// Serve the root of a version directory (`/{project}/{version}/`).
pub async fn serve_docs_root(
    State(state): State<Arc<AppState>>,
    Path((project, version)): Path<(String, String)>,
    request: Request,
) -> ServerResult<Response> {
    serve_docs(state, &project, &version, request).await
}

/// Serve a file beneath a version directory
/// (`/{project}/{version}/{*path}`).
pub async fn serve_docs_file(
    State(state): State<Arc<AppState>>,
    Path((project, version, _path)): Path<(String, String, String)>,
    request: Request,
) -> ServerResult<Response> {
    serve_docs(state, &project, &version, request).await
}

/// Resolve the version directory and delegate to a static file service.
///
/// The version directory path is pure composition; a missing or
/// non-directory result is the not-found condition here, before any file
/// lookup happens.
async fn serve_docs(
    state: Arc<AppState>,
    project: &str,
    version: &str,
    request: Request,
) -> ServerResult<Response> {
    let dir = state.store.version_dir(project, version);
    let is_dir = tokio::fs::metadata(&dir)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false);
    if !is_dir {
        return Err(ServerError::NotFound);
    }

    // Strip the /{project}/{version} prefix from the raw request path.
    // The remainder stays percent-encoded; ServeDir decodes it itself
    // and answers directory requests with their index.html.
    let rest = request.uri().path().splitn(4, '/').nth(3).unwrap_or("");
    let file_request = Request::builder()
        .uri(format!("/{rest}"))
        .body(Body::empty())
        .map_err(|err| ServerError::Internal(err.to_string()))?;

    let response = ServeDir::new(dir)
        .oneshot(file_request)
        .await
        .map_err(|err| ServerError::Internal(err.to_string()))?;

    Ok(response.into_response())
}
