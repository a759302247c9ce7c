use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;

use folio::app::{App, EVENT_CHANNEL_CAPACITY};
use folio::config::Config;
use folio::ui;

/// Get the config directory path (~/.config/folio/).
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("folio"))
}

#[derive(Parser, Debug)]
#[command(name = "folio", about = "Terminal client for browsing study content")]
struct Args {
    /// Path to a config file (default: ~/.config/folio/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the content API base URL
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Override the identity provider base URL
    #[arg(long, value_name = "URL")]
    auth_url: Option<String>,

    /// Override the content item id opened from the home screen
    #[arg(long, value_name = "ID")]
    content_id: Option<i64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => get_config_dir()?.join("config.toml"),
    };
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    if let Some(url) = args.api_url {
        config.api_base_url = url;
    }
    if let Some(url) = args.auth_url {
        config.auth_base_url = url;
    }
    if let Some(id) = args.content_id {
        config.content_id = id;
    }

    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let mut app = App::new(&config, event_tx).context("Failed to initialize application")?;

    ui::run(&mut app, event_rx).await
}
