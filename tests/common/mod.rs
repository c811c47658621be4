//! Shared fixtures: real git repositories built with git2 in temp directories.
//!
//! A `Workspace` holds a directory of "remote" source repositories and a
//! mirror root. Remotes are cloned by local path, so no network is needed.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use git2::{Oid, Repository, RepositoryInitOptions, Signature, Time};
use tempfile::TempDir;

use git_mirror::git::MirrorStore;
use git_mirror::models::RemoteRepo;

pub struct Workspace {
    dir: TempDir,
    pub store: Arc<MirrorStore>,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let store = Arc::new(MirrorStore::new(dir.path().join("mirrors")));
        store.ensure_root().expect("failed to create mirror root");
        Self { dir, store }
    }

    pub fn remotes_dir(&self) -> PathBuf {
        self.dir.path().join("remotes")
    }

    /// Create an empty source repository whose HEAD points at `initial_branch`.
    pub fn source(&self, name: &str, initial_branch: &str) -> Source {
        let path = self.remotes_dir().join(name);
        std::fs::create_dir_all(&path).unwrap();

        let mut opts = RepositoryInitOptions::new();
        opts.initial_head(initial_branch);
        let repo = Repository::init_opts(&path, &opts).expect("failed to init source");

        Source {
            name: name.to_string(),
            path,
            repo,
            clock: 1_700_000_000,
        }
    }

    /// The `demo` remote: branch `one` adds a.txt, branch `two` adds b.txt on top.
    pub fn demo(&self) -> Demo {
        let mut source = self.source("demo", "one");
        let one = source.commit("refs/heads/one", None, &[("a.txt", "a\n")], "Add a\n");
        let two = source.commit("refs/heads/two", Some(one), &[("b.txt", "b\n")], "Add b\n");
        Demo { source, one, two }
    }

    pub fn mirror(&self, name: &str) -> Repository {
        Repository::open(self.store.root().join(name)).expect("mirror missing")
    }
}

pub struct Demo {
    pub source: Source,
    pub one: Oid,
    pub two: Oid,
}

pub struct Source {
    pub name: String,
    pub path: PathBuf,
    pub repo: Repository,
    clock: i64,
}

impl Source {
    pub fn remote(&self) -> RemoteRepo {
        RemoteRepo::new(&self.name, self.path.to_string_lossy())
    }

    /// Commit `files` on top of `parent` and point `reference` at the result.
    ///
    /// Each commit is one minute newer than the previous one.
    pub fn commit(
        &mut self,
        reference: &str,
        parent: Option<Oid>,
        files: &[(&str, &str)],
        message: &str,
    ) -> Oid {
        self.commit_with_removals(reference, parent, files, &[], message)
    }

    pub fn commit_with_removals(
        &mut self,
        reference: &str,
        parent: Option<Oid>,
        files: &[(&str, &str)],
        removed: &[&str],
        message: &str,
    ) -> Oid {
        self.build(reference, parent, message, |workdir, index| {
            for (path, content) in files {
                let full = workdir.join(path);
                std::fs::create_dir_all(full.parent().unwrap()).unwrap();
                std::fs::write(&full, content).unwrap();
                index.add_path(Path::new(path)).unwrap();
            }
            for path in removed {
                index.remove_path(Path::new(path)).unwrap();
            }
        })
    }

    /// Commit symbolic links `(path, target)` on top of `parent`.
    #[cfg(unix)]
    pub fn commit_symlinks(
        &mut self,
        reference: &str,
        parent: Option<Oid>,
        links: &[(&str, &Path)],
        message: &str,
    ) -> Oid {
        self.build(reference, parent, message, |workdir, index| {
            for (path, target) in links {
                let full = workdir.join(path);
                std::fs::create_dir_all(full.parent().unwrap()).unwrap();
                std::os::unix::fs::symlink(target, &full).unwrap();
                index.add_path(Path::new(path)).unwrap();
            }
        })
    }

    fn build(
        &mut self,
        reference: &str,
        parent: Option<Oid>,
        message: &str,
        stage: impl FnOnce(&Path, &mut git2::Index),
    ) -> Oid {
        self.clock += 60;
        let repo = &self.repo;
        let workdir = repo.workdir().unwrap().to_path_buf();

        let mut index = repo.index().unwrap();
        match parent {
            Some(parent) => {
                let tree = repo.find_commit(parent).unwrap().tree().unwrap();
                index.read_tree(&tree).unwrap();
            }
            None => index.clear().unwrap(),
        }

        stage(&workdir, &mut index);

        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = Signature::new("Test User", "test@example.com", &Time::new(self.clock, 0)).unwrap();
        let parents: Vec<_> = parent
            .map(|p| repo.find_commit(p).unwrap())
            .into_iter()
            .collect();
        let parent_refs: Vec<_> = parents.iter().collect();

        // Replace the ref outright so rewritten history is possible.
        let oid = repo
            .commit(None, &sig, &sig, message, &tree, &parent_refs)
            .unwrap();
        repo.reference(reference, oid, true, "fixture").unwrap();
        oid
    }
}

/// Every reference's target plus HEAD, for before/after comparisons.
pub fn snapshot(repo: &Repository) -> Vec<(String, String)> {
    let mut refs: Vec<(String, String)> = repo
        .references()
        .unwrap()
        .filter_map(|r| r.ok())
        .map(|r| {
            let target = match r.target() {
                Some(oid) => oid.to_string(),
                None => r.symbolic_target().unwrap_or("").to_string(),
            };
            (r.name().unwrap_or("").to_string(), target)
        })
        .collect();
    refs.sort();

    let head = repo.head().unwrap().target().unwrap().to_string();
    refs.push(("HEAD".to_string(), head));
    refs
}

pub fn sorted_names(files: &[git_mirror::models::FileEntry]) -> Vec<(String, bool)> {
    let mut names: Vec<_> = files.iter().map(|f| (f.name.clone(), f.is_dir)).collect();
    names.sort();
    names
}
