mod app;
mod banner;

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    sync::Mutex,
};

use memtui_core::config::{self, AppConfig};
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    let config_path = config::ensure_default_config().context("failed to write default config")?;
    let config = AppConfig::load()
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;
    info!(
        path = %config_path.display(),
        faces = config.faces.len(),
        columns = config.columns,
        seeded = config.seed.is_some(),
        "Configuration loaded"
    );

    let mut app = app::MemoryApp::new(&config);
    app.run().await
}

// The terminal owns stdout, so logs go to a file only.
fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("memtui.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
