use serde::{Deserialize, Serialize};

/// One commit in a mirror's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub oid: String,
    pub author: String,
    /// Raw message, trailing newline included.
    pub message: String,
    pub timestamp: i64,
    pub parents: Vec<String>,
}

impl CommitRecord {
    /// First line of the message, for one-line listings.
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}
