//! Browsing context assembly.
//!
//! Produces the branch list, the directory listing at a path, and the commit
//! history for whatever revision is currently checked out. Callers must hold
//! the mirror's lock and have checked out the revision they want to show;
//! `MirrorStore::browse` does both.

use git2::{Repository, Sort};
use std::path::{Component, Path, PathBuf};

use crate::error::{AppError, Result};
use crate::git::branch::{checkout_branch, remote_branches};
use crate::git::repository::{commit_to_record, MirrorStore, METADATA_DIR};
use crate::models::{BrowsingContext, CommitRecord, FileEntry};

/// Result of a browsing request.
#[derive(Debug)]
pub enum Browse {
    /// Directory-like path: the full context for the checked-out branch.
    Directory {
        branch: String,
        context: BrowsingContext,
    },
    /// File path: the file's bytes as checked out.
    File { path: PathBuf, contents: Vec<u8> },
}

/// Whether a request path should render a directory context.
pub fn is_directory_like(path: &str) -> bool {
    path.is_empty() || path.ends_with('/')
}

/// Join `relative` onto the working copy, refusing anything that leaves it.
fn resolve_in_workdir(workdir: &Path, relative: &str) -> Result<PathBuf> {
    let mut target = workdir.to_path_buf();

    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) if part != METADATA_DIR => target.push(part),
            Component::CurDir => {}
            _ => {
                return Err(AppError::InvalidInput(format!(
                    "path escapes repository: {}",
                    relative
                )));
            }
        }
    }

    Ok(target)
}

/// Follow symlinks in `target` and refuse anything that lands outside the
/// working copy or inside its metadata.
fn confine(workdir: &Path, target: &Path, relative: &str) -> Result<PathBuf> {
    let root = workdir
        .canonicalize()
        .map_err(|e| AppError::local_io(workdir, e))?;
    let real = target
        .canonicalize()
        .map_err(|e| AppError::local_io(target, e))?;

    let inside = real
        .strip_prefix(&root)
        .map(|rest| rest.components().all(|c| c.as_os_str() != METADATA_DIR))
        .unwrap_or(false);
    if !inside {
        return Err(AppError::InvalidInput(format!(
            "path escapes repository: {}",
            relative
        )));
    }

    Ok(real)
}

fn workdir(repo: &Repository) -> Result<&Path> {
    repo.workdir()
        .ok_or_else(|| AppError::Internal("mirror has no working copy".to_string()))
}

/// Direct children of `relative`, in storage enumeration order, without `.git`.
pub fn list_files(repo: &Repository, relative: &str) -> Result<Vec<FileEntry>> {
    let workdir = workdir(repo)?;
    let target = resolve_in_workdir(workdir, relative)?;

    if !target.exists() {
        return Err(AppError::not_found("path", relative));
    }
    let target = confine(workdir, &target, relative)?;
    if !target.is_dir() {
        return Err(AppError::InvalidInput(format!("{} is not a directory", relative)));
    }

    let read_dir = std::fs::read_dir(&target).map_err(|e| AppError::local_io(&target, e))?;

    let mut files = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| AppError::local_io(&target, e))?;
        let name = entry.file_name().to_string_lossy().to_string();

        if name == METADATA_DIR {
            continue;
        }

        let is_dir = entry
            .file_type()
            .map_err(|e| AppError::local_io(&entry.path(), e))?
            .is_dir();

        files.push(FileEntry { name, is_dir });
    }

    Ok(files)
}

/// Commits reachable from HEAD, newest first by commit time.
pub fn list_commits(repo: &Repository) -> Result<Vec<CommitRecord>> {
    let mut revwalk = repo.revwalk()?;
    revwalk.set_sorting(Sort::TIME)?;
    revwalk.push_head()?;

    let mut commits = Vec::new();
    for oid in revwalk {
        let oid = oid?;
        let commit = repo.find_commit(oid)?;
        commits.push(commit_to_record(&commit));
    }

    Ok(commits)
}

/// Branches, files at `relative`, and commits for the current checkout.
pub fn assemble_context(repo: &Repository, relative: &str) -> Result<BrowsingContext> {
    let branches = remote_branches(repo)?
        .into_iter()
        .map(|(short_name, _)| short_name)
        .collect();
    let files = list_files(repo, relative)?;
    let commits = list_commits(repo)?;

    Ok(BrowsingContext {
        branches,
        files,
        commits,
    })
}

/// Read a checked-out file's bytes.
///
/// The returned path is the one requested, so content types follow the name
/// the client asked for even when it is a symlink within the mirror.
pub fn read_file(repo: &Repository, relative: &str) -> Result<(PathBuf, Vec<u8>)> {
    let workdir = workdir(repo)?;
    let target = resolve_in_workdir(workdir, relative)?;

    if !target.is_file() {
        return Err(AppError::not_found("path", relative));
    }
    confine(workdir, &target, relative)?;

    let contents = std::fs::read(&target).map_err(|e| AppError::local_io(&target, e))?;
    Ok((target, contents))
}

impl MirrorStore {
    /// Context for the current checkout of `name`, under its lock.
    pub fn context(&self, name: &str, relative: &str) -> Result<BrowsingContext> {
        self.with_mirror(name, |repo| assemble_context(repo, relative))
    }

    /// Check out `branch` and then list `path` or read it, all under one lock.
    pub fn browse(&self, name: &str, path: &str, branch: &str) -> Result<Browse> {
        self.with_mirror(name, |repo| {
            let branch = checkout_branch(repo, branch)?;

            if is_directory_like(path) {
                let context = assemble_context(repo, path)?;
                Ok(Browse::Directory { branch, context })
            } else {
                let (path, contents) = read_file(repo, path)?;
                Ok(Browse::File { path, contents })
            }
        })
    }
}
