//! git-mirror - Mirror a user's repositories and browse them in your browser
//!
//! # Usage
//! ```bash
//! git-mirror --user octocat                        # Mirror and serve on :3001
//! git-mirror --user octocat --mirror-root /srv/git # Custom storage location
//! DEV=1 git-mirror --user octocat                  # Serve existing mirrors only
//! ```

use std::sync::Arc;

use axum::Router;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use git_mirror::config::Config;
use git_mirror::forge::{GitHubLister, RepoLister, StaticLister};
use git_mirror::git::MirrorStore;
use git_mirror::routes::{self, AppState};
use git_mirror::scheduler::SyncScheduler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "git_mirror=info,tower_http=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store = Arc::new(MirrorStore::new(&config.mirror_root));
    if let Err(e) = store.ensure_root() {
        eprintln!("✗ Failed to create mirror root: {}", e);
        std::process::exit(1);
    }

    let lister: Arc<dyn RepoLister> = if config.offline {
        tracing::info!("offline mode: serving existing mirrors only");
        Arc::new(StaticLister::default())
    } else {
        Arc::new(GitHubLister::new(&config.api_url, &config.user, config.per_page))
    };

    let scheduler = SyncScheduler::spawn(Arc::clone(&store), lister, config.sync_interval());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(routes::create_router(AppState::new(
            Arc::clone(&store),
            config.user.as_str(),
        )))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = config.bind_addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("✗ Failed to bind to {}: {}", addr, e);
            eprintln!("  Try a different port with --port <PORT>");
            std::process::exit(1);
        }
    };

    tracing::info!(
        %addr,
        mirror_root = %config.mirror_root.display(),
        user = %config.user,
        "serving mirrors"
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        tracing::info!("shutting down");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    scheduler.shutdown().await;

    Ok(())
}
