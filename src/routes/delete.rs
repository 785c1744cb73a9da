use crate::error::{ServerError, ServerResult};
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::response::Redirect;
use serde::Deserialize;
use std::sync::Arc;

/// Query parameters for the delete endpoint
#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub version: String,
}

/// Delete a version's documentation tree.
///
/// Deleting an absent version succeeds (the store is idempotent); on
/// success the client is redirected back to the index.
pub async fn delete_docs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DeleteParams>,
) -> ServerResult<Redirect> {
    if params.project.is_empty() || params.version.is_empty() {
        return Err(ServerError::BadRequest(
            "project and version query parameters are required".to_string(),
        ));
    }

    tracing::info!(
        project = %params.project,
        version = %params.version,
        "deleting version"
    );

    let store = state.store.clone();
    tokio::task::spawn_blocking(move || store.delete_version(&params.project, &params.version))
        .await??;

    Ok(Redirect::to("/"))
}
