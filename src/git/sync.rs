//! Mirror synchronization.
//!
//! `MirrorStore::reconcile` walks the desired remote set in order. Missing
//! mirrors are cloned; present ones are force-fetched and their working copy
//! fast-forwarded to upstream. Each mirror is handled under its own lock,
//! released before moving on. The first fatal error ends the pass; an
//! "already up to date" step is an outcome, not an error.

use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{ErrorCode, FetchOptions, Oid, RemoteCallbacks, Repository};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{AppError, Result};
use crate::git::repository::MirrorStore;
use crate::models::{RemoteRepo, SyncOutcome, SyncReport};

/// Remote every mirror is cloned from.
pub const REMOTE: &str = "origin";

/// Overwrites divergent remote-tracking refs.
const FETCH_REFSPEC: &str = "+refs/heads/*:refs/remotes/origin/*";

fn remote_error(action: &str, target: &str, err: git2::Error) -> AppError {
    AppError::RemoteIo(format!("{} {}: {}", action, target, err.message()))
}

pub fn clone_mirror(url: &str, path: &Path) -> Result<Repository> {
    RepoBuilder::new()
        .clone(url, path)
        .map_err(|e| remote_error("clone", url, e))
}

/// Fetch every remote head. Returns whether any remote-tracking ref moved.
pub fn fetch_all(repo: &Repository) -> Result<bool> {
    let mut remote = repo
        .find_remote(REMOTE)
        .map_err(|e| remote_error("find remote", REMOTE, e))?;

    let mut updated = 0usize;
    {
        let mut callbacks = RemoteCallbacks::new();
        callbacks.update_tips(|refname, old, new| {
            tracing::debug!(reference = refname, %old, %new, "remote ref updated");
            updated += 1;
            true
        });

        let mut fetch_opts = FetchOptions::new();
        fetch_opts.remote_callbacks(callbacks);

        remote
            .fetch(&[FETCH_REFSPEC], Some(&mut fetch_opts), None)
            .map_err(|e| remote_error("fetch", REMOTE, e))?;
    }

    Ok(updated > 0)
}

/// Full name of the branch HEAD points at, born or not. `None` when detached.
fn head_branch(repo: &Repository) -> Result<Option<String>> {
    let head = repo.find_reference("HEAD")?;
    Ok(head.symbolic_target().map(str::to_string))
}

/// Revision HEAD currently targets. `None` on an unborn branch, which is what
/// cloning an empty remote leaves behind.
fn head_revision(repo: &Repository) -> Result<Option<Oid>> {
    match repo.head() {
        Ok(head) => Ok(head.target()),
        Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Revision the working copy should follow, if the remote has one for it.
///
/// A branch follows its remote-tracking namesake; a detached HEAD follows the
/// remote's default branch.
fn upstream_revision(repo: &Repository, branch: Option<&str>) -> Result<Option<Oid>> {
    let upstream = match branch.and_then(|b| b.strip_prefix("refs/heads/")) {
        Some(short) => format!("refs/remotes/{}/{}", REMOTE, short),
        None => format!("refs/remotes/{}/HEAD", REMOTE),
    };

    match repo.find_reference(&upstream) {
        Ok(reference) => Ok(reference.resolve()?.target()),
        Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Move the working copy to its upstream. Returns whether anything changed.
///
/// Mirrors carry no local work, so a diverged working copy is reset to
/// upstream rather than merged. An unborn branch is created at upstream once
/// the remote has commits for it.
pub fn fast_forward(repo: &Repository) -> Result<bool> {
    let branch = head_branch(repo)?;
    let Some(upstream) = upstream_revision(repo, branch.as_deref())? else {
        tracing::debug!("no upstream to follow");
        return Ok(false);
    };

    let current = head_revision(repo)?;
    if current == Some(upstream) {
        return Ok(false);
    }
    if let Some(current) = current {
        if !repo.graph_descendant_of(upstream, current)? {
            tracing::warn!(%upstream, %current, "working copy diverged from upstream, resetting");
        }
    }

    let target = repo.find_object(upstream, None)?;
    let mut checkout = CheckoutBuilder::new();
    checkout.force();
    repo.checkout_tree(&target, Some(&mut checkout))?;

    match branch {
        Some(branch) => {
            repo.reference(&branch, upstream, true, "git-mirror: fast-forward")?;
        }
        None => repo.set_head_detached(upstream)?,
    }

    Ok(true)
}

impl MirrorStore {
    /// Bring one present mirror up to date. Caller holds the lock.
    fn update_mirror(&self, name: &str) -> Result<SyncOutcome> {
        let repo = self.open(name)?;

        tracing::info!(repository = %name, "fetching");
        let fetched = fetch_all(&repo)?;

        tracing::info!(repository = %name, "pulling");
        let merged = fast_forward(&repo)?;

        Ok(if fetched || merged {
            SyncOutcome::Updated
        } else {
            SyncOutcome::AlreadyUpToDate
        })
    }

    /// Reconcile local mirrors against `desired`, stopping at the first failure.
    pub fn reconcile(&self, desired: &[RemoteRepo]) -> Result<SyncReport> {
        tracing::info!(repositories = desired.len(), "updating repositories");

        let mut present: HashSet<String> = self.list()?.into_iter().collect();
        let mut report = SyncReport::default();

        for remote in desired {
            let path = self.path_for(&remote.name)?;

            let outcome = self.locks().with_lock(&remote.name, || {
                if present.contains(&remote.name) {
                    self.update_mirror(&remote.name)
                } else {
                    tracing::info!(repository = %remote.name, url = %remote.url, "cloning");
                    clone_mirror(&remote.url, &path)?;
                    Ok(SyncOutcome::Cloned)
                }
            })?;

            tracing::info!(repository = %remote.name, ?outcome, "synchronized");
            present.insert(remote.name.clone());
            report.mirrors.push((remote.name.clone(), outcome));
        }

        Ok(report)
    }
}
