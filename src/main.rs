//! logview: an interactive terminal viewer for newline-delimited JSON logs

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use logview_core::Config;
use logview_tui::App;
use logview_tui::ingest::InputSource;
use std::fs::File;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{EnvFilter, prelude::*};

/// logview: browse, search and zoom into JSON log streams
#[derive(Parser, Debug)]
#[command(name = "logview")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Read records from FILE instead of stdin
    file: Option<PathBuf>,

    /// Path to config file (default: <config_dir>/logview/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Log file path (default: <temp_dir>/logview.log)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    color_eyre::install()?;

    // Log to a file; anything on stdout would corrupt the TUI
    let log_path = resolve_log_path(cli.log_file);
    let log_file = File::create(&log_path)
        .wrap_err_with(|| format!("failed to create log file {}", log_path.display()))?;

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(log_file)
                .with_ansi(false)
                .with_target(false),
        )
        .with(filter)
        .init();

    tracing::info!("Starting logview");

    let config = Config::load(cli.config.as_deref()).wrap_err("failed to load config")?;
    let source = input_source(cli.file);

    let mut app = App::new(&config, source)?;
    app.run().await?;

    tracing::info!("Goodbye!");

    // The stdin reader may still be parked in a blocking read that the
    // runtime would wait for on shutdown
    std::process::exit(0);
}

/// Resolve the log file path, falling back to the platform temp directory.
fn resolve_log_path(log_file: Option<PathBuf>) -> PathBuf {
    log_file.unwrap_or_else(|| std::env::temp_dir().join("logview.log"))
}

/// A positional `-` means stdin, like most Unix filters
fn input_source(file: Option<PathBuf>) -> InputSource {
    match file {
        Some(path) if path.as_os_str() != "-" => InputSource::File(path),
        _ => InputSource::Stdin,
    }
}
