//! Browsing DTOs.
//!
//! - `FileEntry`: Direct child of a directory in a mirror's checkout
//! - `ResolvedBranch`: Outcome of resolving a short branch name
//! - `BrowsingContext`: Branches, files and commits for one request

use serde::{Deserialize, Serialize};

use super::CommitRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub is_dir: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBranch {
    pub revision: git2::Oid,
    /// The requested name, or the reported default when none was requested.
    pub short_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowsingContext {
    pub branches: Vec<String>,
    pub files: Vec<FileEntry>,
    pub commits: Vec<CommitRecord>,
}
