//! GET / - list local mirrors.

use std::sync::Arc;

use axum::{extract::State, response::Html, routing::get, Router};

use crate::error::Result;
use crate::routes::{blocking, render, AppState};

pub fn routes(state: AppState) -> Router {
    Router::new().route("/", get(home)).with_state(state)
}

async fn home(State(state): State<AppState>) -> Result<Html<String>> {
    let store = Arc::clone(&state.store);
    let repositories = blocking(move || store.list()).await?;
    Ok(Html(render::home(&state.user, &repositories)))
}
