use git2::build::CheckoutBuilder;
use git2::{BranchType, Oid, Repository};

use crate::error::{AppError, Result};
use crate::git::repository::MirrorStore;
use crate::models::ResolvedBranch;

/// Strip the remote name from a remote-tracking shorthand (`origin/one` → `one`).
pub fn strip_remote(shorthand: &str) -> &str {
    shorthand
        .split_once('/')
        .map(|(_, branch)| branch)
        .unwrap_or(shorthand)
}

/// Remote-tracking branches as (short name, target) in reference iteration order.
///
/// Symbolic aliases such as `origin/HEAD` are skipped.
pub fn remote_branches(repo: &Repository) -> Result<Vec<(String, Oid)>> {
    let mut branches = Vec::new();

    for reference in repo.references_glob("refs/remotes/*")? {
        let reference = reference?;
        let Some(target) = reference.target() else {
            continue;
        };
        let Some(shorthand) = reference.shorthand() else {
            continue;
        };
        branches.push((strip_remote(shorthand).to_string(), target));
    }

    Ok(branches)
}

/// Resolve a short branch name to a revision.
///
/// An empty request reports the first local branch's name (or the first
/// remote-tracking name when there is none) but returns HEAD's revision.
/// The two can disagree once HEAD has been moved to another branch.
pub fn resolve_branch(repo: &Repository, requested: &str) -> Result<ResolvedBranch> {
    if requested.is_empty() {
        let short_name = default_branch_name(repo)?;
        let revision = repo.head()?.peel_to_commit()?.id();
        return Ok(ResolvedBranch {
            revision,
            short_name,
        });
    }

    remote_branches(repo)?
        .into_iter()
        .find(|(short_name, _)| short_name == requested)
        .map(|(short_name, revision)| ResolvedBranch {
            revision,
            short_name,
        })
        .ok_or_else(|| AppError::not_found("branch", requested))
}

fn default_branch_name(repo: &Repository) -> Result<String> {
    if let Some(branch) = repo.branches(Some(BranchType::Local))?.next() {
        let (branch, _) = branch?;
        if let Some(name) = branch.name()? {
            return Ok(name.to_string());
        }
    }

    remote_branches(repo)?
        .into_iter()
        .next()
        .map(|(short_name, _)| short_name)
        .ok_or_else(|| AppError::not_found("branch", ""))
}

/// Force the working copy to `revision` and detach HEAD there.
pub fn checkout_revision(repo: &Repository, revision: Oid) -> Result<()> {
    let commit = repo
        .find_commit(revision)
        .map_err(|_| AppError::not_found("commit", revision.to_string()))?;

    let mut checkout = CheckoutBuilder::new();
    checkout.force();
    repo.checkout_tree(commit.as_object(), Some(&mut checkout))?;
    repo.set_head_detached(revision)?;

    Ok(())
}

/// Resolve `requested`, check it out, and return the resolved short name.
pub fn checkout_branch(repo: &Repository, requested: &str) -> Result<String> {
    let resolved = resolve_branch(repo, requested)?;
    checkout_revision(repo, resolved.revision)?;

    tracing::debug!(
        branch = %resolved.short_name,
        revision = %resolved.revision,
        "checked out"
    );

    Ok(resolved.short_name)
}

impl MirrorStore {
    pub fn resolve_branch(&self, name: &str, requested: &str) -> Result<ResolvedBranch> {
        self.with_mirror(name, |repo| resolve_branch(repo, requested))
    }

    pub fn checkout_branch(&self, name: &str, requested: &str) -> Result<String> {
        self.with_mirror(name, |repo| checkout_branch(repo, requested))
    }
}
