use git2::{DiffFindOptions, DiffFormat, DiffOptions, Oid, Repository};

use crate::error::{AppError, Result};
use crate::git::repository::MirrorStore;

/// Accept only full 40-character hexadecimal revisions.
pub fn parse_revision(hash: &str) -> Result<Oid> {
    if hash.len() != 40 || !hash.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(AppError::InvalidInput(format!(
            "hash must be 40 hexadecimal characters: {}",
            hash
        )));
    }

    Oid::from_str(hash).map_err(|_| AppError::InvalidInput(format!("malformed hash: {}", hash)))
}

/// Unified diff of `hash` against its first parent, with rename detection.
pub fn render_commit(repo: &Repository, hash: &str) -> Result<String> {
    let oid = parse_revision(hash)?;
    let commit = repo
        .find_commit(oid)
        .map_err(|_| AppError::not_found("commit", hash))?;

    if commit.parent_count() == 0 {
        return Err(AppError::not_found("parent", hash));
    }

    let parent_tree = commit.parent(0)?.tree()?;
    let tree = commit.tree()?;

    let mut opts = DiffOptions::new();
    opts.context_lines(3);

    let mut diff = repo.diff_tree_to_tree(Some(&parent_tree), Some(&tree), Some(&mut opts))?;

    let mut find = DiffFindOptions::new();
    find.renames(true);
    diff.find_similar(Some(&mut find))?;

    let mut patch = Vec::new();
    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        match line.origin() {
            origin @ ('+' | '-' | ' ') => {
                patch.push(origin as u8);
                patch.extend_from_slice(line.content());
            }
            _ => patch.extend_from_slice(line.content()),
        }
        true
    })?;

    Ok(String::from_utf8_lossy(&patch).to_string())
}

impl MirrorStore {
    /// Render a commit of mirror `name` under its lock.
    pub fn commit_diff(&self, name: &str, hash: &str) -> Result<String> {
        self.with_mirror(name, |repo| render_commit(repo, hash))
    }
}
