//! Kuma3d - Interactive 3D bear avatar
//!
//! Main entry point for the desktop application.

use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use kuma3d::{avatar::Mood, config::Config, ui::KumaApp};

/// Kuma3d - Interactive 3D bear avatar
#[derive(Parser, Debug)]
#[command(name = "kuma3d", version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Starting mood: idle, happy, or sleepy (overrides config)
    #[arg(short, long)]
    mood: Option<String>,

    /// Window width in logical pixels (overrides config)
    #[arg(long)]
    width: Option<u32>,

    /// Window height in logical pixels (overrides config)
    #[arg(long)]
    height: Option<u32>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy(),
        )
        .init();

    info!("Starting {} v{}", kuma3d::NAME, kuma3d::VERSION);

    // Load configuration
    let mut config = if let Some(ref path) = args.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };

    // Apply CLI overrides
    if let Some(ref mood) = args.mood {
        config.avatar.default_mood = mood.clone();
    }
    if let Some(width) = args.width {
        config.window.width = width;
    }
    if let Some(height) = args.height {
        config.window.height = height;
    }

    // Validate configuration
    config.validate()?;

    let mood = Mood::from_name(&config.avatar.default_mood);
    info!("Window: {}x{}", config.window.width, config.window.height);
    info!("Starting mood: {}", mood.as_str());

    // eframe::run_native blocks the main thread (winit requirement)
    if let Err(e) = KumaApp::run(config, mood) {
        error!("UI error: {}", e);
        anyhow::bail!("UI error: {}", e);
    }

    info!("Kuma3d stopped");
    Ok(())
}
