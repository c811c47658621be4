//! Branch browsing.
//!
//! - GET /{repository}/tree/?branch=
//! - GET /{repository}/tree/{*path}?branch=
//!
//! Checks out the requested branch (or the default when `branch` is absent)
//! and renders the directory context for directory-like paths, or returns the
//! raw file bytes otherwise. Both happen under the repository's lock.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::error::Result;
use crate::git::Browse;
use crate::routes::{blocking, render, AppState};

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/{repository}/tree/", get(tree_root))
        .route("/{repository}/tree/{*path}", get(tree_path))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct TreeQuery {
    #[serde(default)]
    branch: String,
}

async fn tree_root(
    State(state): State<AppState>,
    Path(repository): Path<String>,
    Query(query): Query<TreeQuery>,
) -> Result<Response> {
    browse(state, repository, String::new(), query.branch).await
}

async fn tree_path(
    State(state): State<AppState>,
    Path((repository, path)): Path<(String, String)>,
    Query(query): Query<TreeQuery>,
) -> Result<Response> {
    browse(state, repository, path, query.branch).await
}

async fn browse(state: AppState, repository: String, path: String, branch: String) -> Result<Response> {
    let store = Arc::clone(&state.store);
    let (name, request_path) = (repository.clone(), path.clone());
    let browse = blocking(move || store.browse(&name, &request_path, &branch)).await?;

    let response = match browse {
        Browse::Directory { branch, context } => {
            Html(render::context(&repository, &path, &branch, &context)).into_response()
        }
        Browse::File { path, contents } => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.as_ref().to_string())], contents).into_response()
        }
    };

    Ok(response)
}
