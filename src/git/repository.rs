use chrono::{DateTime, TimeDelta, Utc};
use git2::Repository;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::git::locks::LockRegistry;
use crate::models::CommitRecord;

/// Name of the version-control metadata directory inside each mirror.
pub const METADATA_DIR: &str = ".git";

/// The set of mirrors under one root directory, plus the locks guarding them.
pub struct MirrorStore {
    root: PathBuf,
    locks: LockRegistry,
}

impl MirrorStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            locks: LockRegistry::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn locks(&self) -> &LockRegistry {
        &self.locks
    }

    /// Create the mirror root if it does not exist yet.
    pub fn ensure_root(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root).map_err(|e| AppError::local_io(&self.root, e))
    }

    /// Local path of the mirror called `name`.
    ///
    /// Only a single plain path component is accepted as a name.
    pub fn path_for(&self, name: &str) -> Result<PathBuf> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) if !name.contains(['/', '\\']) => {
                Ok(self.root.join(name))
            }
            _ => Err(AppError::InvalidInput(format!(
                "invalid repository name: {:?}",
                name
            ))),
        }
    }

    /// Names of all mirrors present on disk, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        let read_dir =
            std::fs::read_dir(&self.root).map_err(|e| AppError::local_io(&self.root, e))?;

        let mut names = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| AppError::local_io(&self.root, e))?;
            let is_dir = entry
                .file_type()
                .map_err(|e| AppError::local_io(&entry.path(), e))?
                .is_dir();

            if is_dir {
                names.push(entry.file_name().to_string_lossy().to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    /// Open the mirror's repository. Does not take the lock.
    pub fn open(&self, name: &str) -> Result<Repository> {
        let path = self.path_for(name)?;
        if !path.is_dir() {
            return Err(AppError::not_found("repository", name));
        }

        Repository::open(&path).map_err(|e| match e.code() {
            git2::ErrorCode::NotFound => AppError::not_found("repository", name),
            _ => AppError::Git(e),
        })
    }

    /// Run `f` against the opened mirror while holding its lock.
    pub fn with_mirror<F, T>(&self, name: &str, f: F) -> Result<T>
    where
        F: FnOnce(&Repository) -> Result<T>,
    {
        self.locks.with_lock(name, || {
            let repo = self.open(name)?;
            f(&repo)
        })
    }
}

pub type SharedStore = Arc<MirrorStore>;

pub fn commit_to_record(commit: &git2::Commit) -> CommitRecord {
    CommitRecord {
        oid: commit.id().to_string(),
        author: commit.author().name().unwrap_or("Unknown").to_string(),
        message: String::from_utf8_lossy(commit.message_bytes()).to_string(),
        timestamp: commit.time().seconds(),
        parents: commit.parent_ids().map(|id| id.to_string()).collect(),
    }
}

/// Age of a commit timestamp relative to now, in the largest whole unit.
pub fn format_relative_time(timestamp: i64) -> String {
    match DateTime::from_timestamp(timestamp, 0) {
        Some(then) => describe_age(Utc::now() - then),
        None => "unknown".to_string(),
    }
}

fn describe_age(elapsed: TimeDelta) -> String {
    let days = elapsed.num_days();
    let (count, unit) = if elapsed.num_minutes() < 1 {
        return "just now".to_string();
    } else if elapsed.num_hours() < 1 {
        (elapsed.num_minutes(), "minute")
    } else if days < 1 {
        (elapsed.num_hours(), "hour")
    } else if days < 30 {
        (days, "day")
    } else if days < 365 {
        (days / 30, "month")
    } else {
        (days / 365, "year")
    };

    let plural = if count == 1 { "" } else { "s" };
    format!("{count} {unit}{plural} ago")
}
