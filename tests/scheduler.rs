//! Background sync task lifecycle.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::Workspace;
use git_mirror::forge::{RepoLister, StaticLister};
use git_mirror::models::SyncOutcome;
use git_mirror::scheduler::{sync_once, SyncScheduler};

#[tokio::test]
async fn sync_once_reconciles_the_listed_repositories() {
    let ws = Workspace::new();
    let demo = ws.demo();
    let lister = StaticLister::new(vec![demo.source.remote()]);

    let report = sync_once(&ws.store, &lister).await.unwrap();
    assert_eq!(report.outcome("demo"), Some(SyncOutcome::Cloned));

    let report = sync_once(&ws.store, &lister).await.unwrap();
    assert_eq!(report.outcome("demo"), Some(SyncOutcome::AlreadyUpToDate));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn scheduler_runs_immediately_and_shuts_down() {
    let ws = Workspace::new();
    let demo = ws.demo();
    let lister: Arc<dyn RepoLister> = Arc::new(StaticLister::new(vec![demo.source.remote()]));

    let scheduler = SyncScheduler::spawn(ws.store.clone(), lister, Duration::from_secs(3600));

    let mut cloned = false;
    for _ in 0..100 {
        if ws.store.root().join("demo/a.txt").is_file() {
            cloned = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    tokio::time::timeout(Duration::from_secs(10), scheduler.shutdown())
        .await
        .expect("scheduler did not stop");

    assert!(cloned, "startup pass never cloned the mirror");
}

#[tokio::test]
async fn failed_pass_keeps_the_scheduler_alive() {
    let ws = Workspace::new();
    let broken = git_mirror::models::RemoteRepo::new(
        "broken",
        ws.remotes_dir().join("missing").to_string_lossy(),
    );
    let lister: Arc<dyn RepoLister> = Arc::new(StaticLister::new(vec![broken]));

    let scheduler = SyncScheduler::spawn(ws.store.clone(), lister, Duration::from_millis(20));
    tokio::time::sleep(Duration::from_millis(100)).await;

    tokio::time::timeout(Duration::from_secs(10), scheduler.shutdown())
        .await
        .expect("scheduler did not stop");
}
