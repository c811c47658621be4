//! Application error types and HTTP response mapping.
//!
//! Defines `AppError` for every failure the mirror engine can surface and
//! implements Axum's `IntoResponse` so handlers can return it directly with a
//! JSON error body.
//!
//! Error mappings:
//! - `NotFound` → 404
//! - `InvalidInput` → 400
//! - `RemoteIo` → 502
//! - `LocalIo`, `Git`, `Internal` → 500

use std::path::Path;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// An unknown repository, branch, commit, parent or path.
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Remote error: {0}")]
    RemoteIo(String),

    #[error("Local storage error: {0}")]
    LocalIo(String),

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        AppError::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn local_io(path: &Path, err: std::io::Error) -> Self {
        AppError::LocalIo(format!("{}: {}", path.display(), err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::RemoteIo(_) => StatusCode::BAD_GATEWAY,
            AppError::LocalIo(_) | AppError::Git(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        tracing::warn!(status = status.as_u16(), error = %self, "request failed");

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
