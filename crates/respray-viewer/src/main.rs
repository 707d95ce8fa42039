//! Respray - native car paint configurator
//!
//! Loads a car model, frames the camera around it, and lets the user repaint
//! the body through a palette or a custom color picker.

mod app;
mod config;
mod model;
mod paint;
mod scene;
mod ui;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "respray")]
#[command(about = "3D car color configurator")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "respray.toml")]
    config: PathBuf,

    /// Model path under the asset root (overrides config)
    #[arg(short, long)]
    model: Option<String>,

    /// Paint this color once the model is ready (hex, e.g. "#ef4444")
    #[arg(long)]
    color: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging. The engine's own LogPlugin is disabled in favor of
    // this subscriber so startup logging works before the App exists; wgpu
    // and naga are kept at warn to cut renderer chatter.
    let filter = EnvFilter::try_new(format!(
        "{},wgpu=warn,naga=warn",
        args.log_level.to_lowercase()
    ))
    .unwrap_or_else(|_| EnvFilter::new("info,wgpu=warn,naga=warn"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Respray v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration, then CLI overrides on top
    let mut config = config::load_config(&args.config)?;

    if let Some(model) = args.model {
        config.model.path = model;
    }
    if let Some(color) = args.color {
        config.paint.initial_color = Some(color);
    }

    let settings = config.to_viewer_settings()?;

    info!(
        model = %settings.model_path,
        swatches = settings.palette.len(),
        "Configuration loaded"
    );

    app::run(settings);

    Ok(())
}
