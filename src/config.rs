//! Process configuration.
//!
//! Parsed once in `main` from flags or environment variables and handed to
//! each component at construction. Nothing reads the environment after that.

use std::path::PathBuf;
use std::time::Duration;

use clap::builder::FalseyValueParser;
use clap::Parser;

/// git-mirror - Mirror a user's repositories and browse them in your browser
#[derive(Parser, Debug, Clone)]
#[command(name = "git-mirror")]
#[command(about = "Mirror remote git repositories and browse them locally", long_about = None)]
pub struct Config {
    /// Account whose repositories are mirrored
    #[arg(short, long, env = "GITHUB_USERNAME")]
    pub user: String,

    /// Page size hint passed to the repository listing API
    #[arg(long, env = "PER_PAGE", default_value_t = 100)]
    pub per_page: u32,

    /// Address to bind the server to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 3001)]
    pub port: u16,

    /// Directory holding one working copy per mirrored repository
    #[arg(long, env = "MIRROR_ROOT", default_value = "./repositories")]
    pub mirror_root: PathBuf,

    /// Seconds between background synchronization passes
    #[arg(long, env = "SYNC_INTERVAL", default_value_t = 3600)]
    pub sync_interval: u64,

    /// Base URL of the repository listing API
    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    pub api_url: String,

    /// Skip the remote listing and only serve mirrors already on disk.
    /// `DEV` set to anything but an empty or false-like value turns it on.
    #[arg(long, env = "DEV", value_parser = FalseyValueParser::new())]
    pub offline: bool,
}

impl Config {
    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval.max(1))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
