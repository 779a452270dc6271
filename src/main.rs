mod cli;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use cli::{Cli, Commands};
use snapfeed::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snapfeed=info".into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run { config, out } => run(config, out).await,
        Commands::Check { config } => check(config),
        Commands::Normalize { file } => normalize_file(file),
    }
}

async fn run(config_path: PathBuf, out: PathBuf) -> Result<()> {
    let config = EndpointConfig::load(Some(&config_path))?;
    let status_path = out.with_extension("status.txt");
    let view = Box::new(HtmlFileView::new(out.clone(), status_path));
    let widget = GalleryWidget::new(config, view)?;

    match widget.upload_surface() {
        UploadSurface::Embedded(url) => info!(%url, "upload surface enabled"),
        UploadSurface::ComingSoon => info!("upload surface not configured; page shows a coming-soon note"),
    }

    let timer = widget.start().await;
    if timer.is_none() {
        warn!("gallery endpoint not configured; nothing to poll");
        return Ok(());
    }
    info!(out = %out.display(), interval_ms = widget.config().refresh_ms, "polling");
    tokio::signal::ctrl_c().await.context("waiting for shutdown signal")?;
    Ok(())
}

fn check(config_path: PathBuf) -> Result<()> {
    let config = EndpointConfig::load(Some(&config_path))?;
    report_endpoint("gallery", &config.gallery_url);
    report_endpoint("upload", &config.upload_url);
    println!("refresh interval: {}ms", config.refresh_ms);
    Ok(())
}

fn report_endpoint(name: &str, value: &str) {
    if !is_configured(value) {
        println!("{name}: not configured");
        return;
    }
    // Diagnostic only; the sync path treats endpoint URLs as opaque strings.
    match url::Url::parse(value) {
        Ok(parsed) => println!("{name}: configured ({})", parsed.host_str().unwrap_or("?")),
        Err(e) => println!("{name}: configured but does not parse as a URL ({e})"),
    }
}

fn normalize_file(file: PathBuf) -> Result<()> {
    let text = std::fs::read_to_string(&file)
        .with_context(|| format!("reading {}", file.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&text).context("payload is not valid JSON")?;
    let items = normalize(&value);
    println!("{} item(s)", items.len());
    for (i, item) in items.iter().enumerate() {
        println!("{:>3}. {} (thumb: {}, caption: {:?})", i + 1, item.url, item.thumbnail, item.caption);
    }
    Ok(())
}
