//! HTTP gateway - maps routes to mirror operations.
//!
//! - `home`: GET / lists local mirrors
//! - `tree`: branch checkout plus directory context or raw file bytes
//! - `commit`: unified diff for one commit
//! - `render`: HTML for the pages above
//!
//! Mirror operations block on the repository lock and on git I/O, so every
//! handler runs them through `blocking`.

pub mod commit;
pub mod home;
pub mod render;
pub mod tree;

use std::sync::Arc;

use axum::Router;

use crate::error::{AppError, Result};
use crate::git::SharedStore;

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    /// Account name shown on the home page.
    pub user: Arc<str>,
}

impl AppState {
    pub fn new(store: SharedStore, user: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            user: user.into(),
        }
    }
}

/// Run a blocking mirror operation on the blocking thread pool.
pub(crate) async fn blocking<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("worker failed: {}", e)))?
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(home::routes(state.clone()))
        .merge(tree::routes(state.clone()))
        .merge(commit::routes(state))
}
