//! ChessTTY: play chess in the terminal against a person or an out-of-process
//! search engine.

use std::path::PathBuf;

use chesstty::config;
use chesstty::ui::{self, AppOptions};
use chesstty::AnimationSettings;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "chesstty", version, about = "Terminal chess with an engine opponent")]
struct Cli {
    /// Path to a UCI search engine (defaults to the bundled chesstty-search)
    #[arg(long, value_name = "PATH")]
    engine: Option<PathBuf>,

    /// Search depth passed to the engine
    #[arg(long)]
    depth: Option<u8>,

    /// Disable move animation
    #[arg(long)]
    no_animation: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing with file output; the terminal belongs to the UI
    let log_dir = config::get_log_dir();
    std::fs::create_dir_all(&log_dir).ok();
    let file_appender = tracing_appender::rolling::daily(&log_dir, "chesstty");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("ChessTTY starting up");

    let options = AppOptions {
        engine_path: cli.engine.unwrap_or_else(config::get_engine_path),
        search_depth: cli.depth.unwrap_or_else(config::get_search_depth),
        animation: AnimationSettings {
            enabled: !cli.no_animation,
            frames_per_square: config::get_frames_per_square(),
        },
        animation_fps: config::get_animation_fps(),
        max_fps: config::get_max_fps(),
    };

    ui::run_app(options).await?;

    tracing::info!("ChessTTY shutting down");
    Ok(())
}
