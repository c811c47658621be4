//! Commit rendering against real mirrors.

mod common;

use common::Workspace;
use git_mirror::error::AppError;

#[test]
fn renders_diff_against_first_parent() {
    let ws = Workspace::new();
    let demo = ws.demo();
    ws.store.reconcile(&[demo.source.remote()]).unwrap();

    let patch = ws.store.commit_diff("demo", &demo.two.to_string()).unwrap();

    assert!(patch.starts_with("diff --git a/b.txt b/b.txt\n"), "{}", patch);
    assert!(patch.contains("new file mode 100644"));
    assert!(patch.contains("+++ b/b.txt\n"));
    assert!(patch.contains("@@ -0,0 +1"));
    assert!(patch.contains("\n+b\n"));
    assert!(!patch.contains("a.txt"));
}

#[test]
fn root_commit_has_no_parent_to_diff() {
    let ws = Workspace::new();
    let demo = ws.demo();
    ws.store.reconcile(&[demo.source.remote()]).unwrap();

    let hash = demo.one.to_string();
    let err = ws.store.commit_diff("demo", &hash).unwrap_err();
    assert!(matches!(
        err,
        AppError::NotFound { kind: "parent", ref name } if *name == hash
    ));
}

#[test]
fn renames_are_detected() {
    let ws = Workspace::new();
    let mut source = ws.source("moves", "main");
    let content = "line one\nline two\nline three\n";
    let base = source.commit("refs/heads/main", None, &[("old.txt", content)], "Add old\n");
    let moved = source.commit_with_removals(
        "refs/heads/main",
        Some(base),
        &[("new.txt", content)],
        &["old.txt"],
        "Rename\n",
    );
    ws.store.reconcile(&[source.remote()]).unwrap();

    let patch = ws.store.commit_diff("moves", &moved.to_string()).unwrap();

    assert!(patch.contains("diff --git a/old.txt b/new.txt"), "{}", patch);
    assert!(patch.contains("rename from old.txt"));
    assert!(patch.contains("rename to new.txt"));
    assert!(!patch.contains("deleted file mode"));
}

#[test]
fn malformed_and_unknown_hashes() {
    let ws = Workspace::new();
    let demo = ws.demo();
    ws.store.reconcile(&[demo.source.remote()]).unwrap();

    for bad in ["abc", "HEAD", "zz23456789abcdef0123456789abcdef01234567"] {
        let err = ws.store.commit_diff("demo", bad).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)), "{}: {:?}", bad, err);
    }

    let unknown = "0123456789abcdef0123456789abcdef01234567";
    let err = ws.store.commit_diff("demo", unknown).unwrap_err();
    assert!(matches!(err, AppError::NotFound { kind: "commit", .. }));
}
