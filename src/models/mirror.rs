//! Synchronization DTOs.

use serde::{Deserialize, Serialize};

/// One repository the remote account owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRepo {
    #[serde(rename = "clone_url")]
    pub url: String,
    pub name: String,
}

impl RemoteRepo {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
        }
    }
}

/// What a sync pass did to one mirror. None of these is a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOutcome {
    Cloned,
    Updated,
    AlreadyUpToDate,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    pub mirrors: Vec<(String, SyncOutcome)>,
}

impl SyncReport {
    pub fn outcome(&self, name: &str) -> Option<SyncOutcome> {
        self.mirrors
            .iter()
            .find(|(mirror, _)| mirror == name)
            .map(|(_, outcome)| *outcome)
    }

    pub fn count(&self, outcome: SyncOutcome) -> usize {
        self.mirrors.iter().filter(|(_, o)| *o == outcome).count()
    }
}
