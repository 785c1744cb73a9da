use crate::error::{ServerError, ServerResult};
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::multipart::{Multipart, MultipartError};
use axum::extract::State;
use axum::response::Redirect;
use std::io::Cursor;
use std::sync::Arc;

/// Archive upload endpoint.
///
/// Accepts a multipart form with `project` and `version` text fields and
/// a `content` file field holding a ZIP archive. Missing or empty fields
/// are a validation failure; store failures surface as 500-class
/// responses. On success the client is redirected back to the index.
pub async fn upload_docs(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ServerResult<Redirect> {
    let mut project: Option<String> = None;
    let mut version: Option<String> = None;
    let mut content: Option<Bytes> = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("project") => project = Some(field.text().await.map_err(bad_multipart)?),
            Some("version") => version = Some(field.text().await.map_err(bad_multipart)?),
            Some("content") => content = Some(field.bytes().await.map_err(bad_multipart)?),
            _ => {}
        }
    }

    let project = project
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ServerError::BadRequest("you must provide a project name".to_string()))?;
    let version = version
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ServerError::BadRequest("you must provide a version".to_string()))?;
    let content = content
        .ok_or_else(|| ServerError::BadRequest("you must provide a content file".to_string()))?;

    tracing::info!(
        project = %project,
        version = %version,
        bytes = content.len(),
        "ingesting uploaded archive"
    );

    let store = state.store.clone();
    tokio::task::spawn_blocking(move || {
        store.ingest_archive(&project, &version, Cursor::new(content))
    })
    .await??;

    Ok(Redirect::to("/"))
}

fn bad_multipart(err: MultipartError) -> ServerError {
    ServerError::BadRequest(format!("could not read multipart form: {err}"))
}
