//! brew-preview: local preview server.
//!
//! This is the application entry point. It initializes tracing, loads
//! configuration, compiles the base themes, and only then starts serving.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use brew_preview::config::{AppConfig, DEFAULT_LOG_FILTER};
use brew_preview::http::shutdown_signal;
use brew_preview::templates::{init_templates, TeraRenderer};

/// brew-preview: preview a homebrew document with its theme
#[derive(Parser, Debug)]
#[command(name = "brew-preview", version, about)]
struct Args {
    /// Path to an optional configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding Manual.txt, themes and the build tree
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Log level filter (e.g., "brew_preview=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    config.apply_env(|key| std::env::var(key).ok())?;
    if let Some(root) = args.root {
        config.paths.root = root;
    }

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    let registry = tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    if config.logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!(
        root = %config.paths.root.display(),
        document = %config.paths.document.display(),
        "Loaded configuration"
    );

    let tera = init_templates(config.paths.templates.as_deref())?;
    tracing::info!("Initialized templates");

    let server = brew_preview::prepare(config, Arc::new(TeraRenderer::new(tera))).await?;
    tracing::info!("Preview on http://{}", server.local_addr()?);

    server.serve(shutdown_signal()).await?;

    Ok(())
}
