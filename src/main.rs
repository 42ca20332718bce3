mod config;
mod context;
mod domain;
mod error;
mod infra;
mod logging;
mod server;
mod services;
#[cfg(test)]
mod test_support;
mod workflow;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::github::GitHubClient;
use crate::infra::log_sink::TracingOutcomeSink;

#[derive(Parser)]
#[command(
    name = "branch-lock",
    author,
    version,
    about = "Locks and unlocks branches when tracker issues change status"
)]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, env = "BRANCH_LOCK_CONFIG")]
    config: Option<PathBuf>,
    /// Port to listen on; overrides the configured port.
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,
    /// Log at debug level, including raw webhook payloads.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.port = port;
    }
    let _log_guard = logging::init(config.log_path.as_deref(), cli.verbose)?;

    if cli.config.is_none() {
        warn!("no configuration file given; running with defaults");
    }
    if config.github_token.is_none() {
        warn!("GitHub token not configured; actionable events will fail");
    }
    if config.repositories.is_empty() {
        warn!("no repositories configured; events will not touch any branch");
    }
    if config.rules.is_empty() {
        warn!("no status rules configured; every event is a no-op");
    }
    info!(
        token = %config.masked_token(),
        repositories = ?config.repositories,
        rules = config.rules.len(),
        missing_protection = ?config.missing_protection,
        "configuration loaded"
    );

    let github = Arc::new(GitHubClient::new(
        config.api_base_url.clone(),
        config.github_token.clone(),
        config.user_agent.clone(),
        config.request_timeout,
    )?);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let context = AppContext::new(config, github, Arc::new(TracingOutcomeSink));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on {addr}");
    axum::serve(listener, server::build_router(context)).await?;

    Ok(())
}
