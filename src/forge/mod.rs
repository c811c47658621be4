//! Remote repository listing.
//!
//! The sync engine only needs an ordered list of `{clone URL, name}` pairs.
//! `RepoLister` is the seam; `GitHubLister` asks the GitHub REST API for a
//! user's repositories and `StaticLister` serves a fixed list (offline mode
//! and tests).

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use crate::error::AppError;
use crate::models::RemoteRepo;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

#[derive(Debug, Clone, Error)]
pub enum ForgeError {
    /// The account does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    #[error("rate limited")]
    RateLimited,

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("network error: {0}")]
    NetworkError(String),
}

impl From<ForgeError> for AppError {
    fn from(err: ForgeError) -> Self {
        AppError::RemoteIo(format!("repository listing failed: {}", err))
    }
}

#[async_trait]
pub trait RepoLister: Send + Sync {
    /// Repositories to mirror, in the order the remote returns them.
    async fn list_repos(&self) -> Result<Vec<RemoteRepo>, ForgeError>;
}

#[derive(Debug, Deserialize)]
struct GitHubErrorResponse {
    message: String,
}

#[derive(Debug, Clone)]
pub struct GitHubLister {
    client: Client,
    api_base: String,
    user: String,
    per_page: u32,
}

impl GitHubLister {
    pub fn new(api_base: impl Into<String>, user: impl Into<String>, per_page: u32) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into(),
            user: user.into(),
            per_page,
        }
    }

    fn repos_url(&self) -> String {
        format!(
            "{}/users/{}/repos?per_page={}",
            self.api_base.trim_end_matches('/'),
            self.user,
            self.per_page
        )
    }
}

#[async_trait]
impl RepoLister for GitHubLister {
    async fn list_repos(&self) -> Result<Vec<RemoteRepo>, ForgeError> {
        let url = self.repos_url();
        tracing::debug!(%url, "listing repositories");

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, concat!("git-mirror/", env!("CARGO_PKG_VERSION")))
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(|e| ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("Failed to parse response: {}", e),
            });
        }

        let message = match response.json::<GitHubErrorResponse>().await {
            Ok(err) => err.message,
            Err(_) => "Unknown error".to_string(),
        };
        tracing::warn!(%url, status = status.as_u16(), %message, "repository listing rejected");

        Err(match status {
            StatusCode::NOT_FOUND => ForgeError::NotFound(self.user.clone()),
            StatusCode::TOO_MANY_REQUESTS => ForgeError::RateLimited,
            _ => ForgeError::ApiError {
                status: status.as_u16(),
                message,
            },
        })
    }
}

/// A fixed list of repositories.
#[derive(Debug, Clone, Default)]
pub struct StaticLister {
    repos: Vec<RemoteRepo>,
}

impl StaticLister {
    pub fn new(repos: Vec<RemoteRepo>) -> Self {
        Self { repos }
    }
}

#[async_trait]
impl RepoLister for StaticLister {
    async fn list_repos(&self) -> Result<Vec<RemoteRepo>, ForgeError> {
        Ok(self.repos.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repos_url_includes_user_and_page_size() {
        let lister = GitHubLister::new("https://api.github.com/", "octocat", 5);
        assert_eq!(
            lister.repos_url(),
            "https://api.github.com/users/octocat/repos?per_page=5"
        );
    }

    #[test]
    fn listing_payload_maps_clone_url_and_name() {
        let body = r#"[
            {"name": "demo", "clone_url": "https://github.com/octocat/demo.git", "private": false},
            {"name": "site", "clone_url": "https://github.com/octocat/site.git"}
        ]"#;

        let repos: Vec<RemoteRepo> = serde_json::from_str(body).unwrap();
        assert_eq!(
            repos,
            vec![
                RemoteRepo::new("demo", "https://github.com/octocat/demo.git"),
                RemoteRepo::new("site", "https://github.com/octocat/site.git"),
            ]
        );
    }

    #[test]
    fn forge_errors_become_remote_errors() {
        let err: AppError = ForgeError::RateLimited.into();
        assert!(matches!(err, AppError::RemoteIo(_)));
    }

    #[tokio::test]
    async fn static_lister_returns_its_list() {
        let lister = StaticLister::new(vec![RemoteRepo::new("demo", "/tmp/demo")]);
        assert_eq!(lister.list_repos().await.unwrap().len(), 1);
        assert!(StaticLister::default().list_repos().await.unwrap().is_empty());
    }
}
