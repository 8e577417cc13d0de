use anyhow::{Context, Result};
use clap::Parser;
use job_analyzer::cli::{handle_command, Cli};
use job_analyzer::core::{ConfigManager, FsOps};
use std::fs::OpenOptions;
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigManager::load()?;
    if let Some(url) = &cli.api_url {
        config = config.with_api_url(url.clone());
    }

    // Initialize logging before any request goes out
    if let Some(parent) = config.log_path.parent() {
        FsOps::ensure_dir_exists(parent).await?;
    }
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true) // Clear file on startup
        .open(&config.log_path)
        .with_context(|| format!("Failed to open log file {}", config.log_path.display()))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Environment: {}", config.environment);
    info!("Session file: {}", config.session_path.display());

    handle_command(cli, config).await
}
