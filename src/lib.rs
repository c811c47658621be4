//! git-mirror - keep local mirrors of a user's remote repositories and browse
//! them over HTTP.
//!
//! - `git`: the mirror engine (locks, sync, branch resolution, browsing, diffs)
//! - `forge`: remote repository listing
//! - `scheduler`: periodic background sync
//! - `routes`: the HTTP gateway
//! - `config`: process configuration

pub mod config;
pub mod error;
pub mod forge;
pub mod git;
pub mod models;
pub mod routes;
pub mod scheduler;
