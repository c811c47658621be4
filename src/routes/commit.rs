//! GET /{repository}/commit/{hash} - unified diff of a commit against its first parent.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::error::Result;
use crate::routes::{blocking, AppState};

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/{repository}/commit/{hash}", get(get_commit))
        .with_state(state)
}

async fn get_commit(
    State(state): State<AppState>,
    Path((repository, hash)): Path<(String, String)>,
) -> Result<Response> {
    let store = Arc::clone(&state.store);
    let patch = blocking(move || store.commit_diff(&repository, &hash)).await?;

    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], patch).into_response())
}
