//! Periodic background synchronization.
//!
//! `SyncScheduler::spawn` runs one pass immediately and then one per
//! interval. A failed pass is logged and retried on the next tick.
//! `shutdown` stops the loop and waits for an in-flight pass to finish.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::{AppError, Result};
use crate::forge::RepoLister;
use crate::git::SharedStore;
use crate::models::{SyncOutcome, SyncReport};

/// List the remote repositories and reconcile the store against them.
pub async fn sync_once(store: &SharedStore, lister: &dyn RepoLister) -> Result<SyncReport> {
    let desired = lister.list_repos().await?;
    let store = Arc::clone(store);

    tokio::task::spawn_blocking(move || store.reconcile(&desired))
        .await
        .map_err(|e| AppError::Internal(format!("sync task failed: {}", e)))?
}

pub struct SyncScheduler {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl SyncScheduler {
    pub fn spawn(store: SharedStore, lister: Arc<dyn RepoLister>, interval: Duration) -> Self {
        let (shutdown, mut stop) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match sync_once(&store, lister.as_ref()).await {
                            Ok(report) => tracing::info!(
                                cloned = report.count(SyncOutcome::Cloned),
                                updated = report.count(SyncOutcome::Updated),
                                unchanged = report.count(SyncOutcome::AlreadyUpToDate),
                                "sync pass finished"
                            ),
                            Err(e) => tracing::error!(error = %e, "sync pass failed"),
                        }
                    }
                    _ = stop.changed() => break,
                }
            }

            tracing::debug!("sync scheduler stopped");
        });

        Self { shutdown, handle }
    }

    /// Stop scheduling passes and wait for the loop to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.handle.await {
            tracing::error!(error = %e, "sync scheduler panicked");
        }
    }
}
