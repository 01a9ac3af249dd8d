//! lamco-display-layout - Display Arrangement Tool
//!
//! Entry point for the command line binary.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lamco_display_layout::config::{Config, LoggingConfig};
use lamco_display_layout::layout::RenderGeometry;
use lamco_display_layout::service::{DisplayConfigService, DisplayLayoutEntry, InMemoryDisplayService};
use lamco_display_layout::session::{DragEvent, DragOutcome, LayoutSession};
use lamco_display_layout::utils::format_user_error;

/// Command-line arguments for lamco-display-layout
#[derive(Parser, Debug)]
#[command(name = "lamco-display-layout")]
#[command(version, about = "Arrange displays by dragging their rectangles", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "/etc/lamco-display-layout/config.toml")]
    pub config: String,

    /// Display snapshot (TOML list of displays and layouts)
    #[arg(short, long, env = "LAMCO_DISPLAY_SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Drag script to replay (JSON array of pointer events)
    #[arg(short, long)]
    pub drag_script: Option<PathBuf>,

    /// Arrangement area width in rendered pixels
    #[arg(long, env = "LAMCO_AREA_WIDTH")]
    pub area_width: Option<u32>,

    /// Arrangement area height in rendered pixels
    #[arg(long, env = "LAMCO_AREA_HEIGHT")]
    pub area_height: Option<u32>,

    /// Verbose logging (can be specified multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log format (json|pretty|compact)
    #[arg(long, default_value = "pretty")]
    pub log_format: String,

    /// Write logs to file (in addition to stderr)
    #[arg(long)]
    pub log_file: Option<String>,
}

/// JSON document written to stdout
#[derive(Debug, Serialize)]
struct Report {
    /// Arrangement before any scripted event
    initial: RenderGeometry,
    /// One entry per scripted event
    outcomes: Vec<DragOutcome>,
    /// Arrangement after the script
    geometry: RenderGeometry,
    /// Layouts held by the display service after the script
    layouts: Vec<DisplayLayoutEntry>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logging level comes from the config unless -v was given
    let config = Config::load(&args.config);
    let logging = config
        .as_ref()
        .map(|config| config.logging.clone())
        .unwrap_or_default();
    init_logging(&args, &logging)?;

    info!("════════════════════════════════════════════════════════");
    info!("  lamco-display-layout v{}", env!("CARGO_PKG_VERSION"));
    info!("  Built: {} {}", env!("BUILD_DATE"), env!("BUILD_TIME"));
    info!("  Commit: {}", env!("GIT_HASH"));
    info!("════════════════════════════════════════════════════════");

    let config = config.unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {:#}, using defaults", e);
        Config::default_config()
    });

    // Override config with CLI args
    let config = config.with_overrides(args.area_width, args.area_height);
    if let Err(e) = config.validate() {
        eprintln!("{}", format_user_error(&e));
        return Err(e);
    }

    info!("Configuration loaded successfully");
    tracing::debug!("Config: {:?}", config);

    if let Err(e) = run(&args, &config).await {
        eprintln!("{}", format_user_error(&e));
        return Err(e);
    }

    Ok(())
}

async fn run(args: &Args, config: &Config) -> Result<()> {
    let service = Arc::new(InMemoryDisplayService::load_snapshot(&args.snapshot)?);

    let events = match &args.drag_script {
        Some(path) => load_drag_script(path)?,
        None => Vec::new(),
    };

    let mut session = LayoutSession::open(Arc::clone(&service), config.session_options()).await?;
    let initial = session.render_geometry();

    let mut outcomes = Vec::with_capacity(events.len());
    for (index, event) in events.into_iter().enumerate() {
        let outcome = session
            .handle(event)
            .await
            .with_context(|| format!("drag script event {} failed", index))?;
        tracing::debug!("Event {}: {:?} -> {:?}", index, event, outcome);
        outcomes.push(outcome);
    }

    if let Some(display_id) = session.dragging() {
        tracing::warn!("Drag script ended while {} was still being dragged", display_id);
    }

    let report = Report {
        initial,
        outcomes,
        geometry: session.render_geometry(),
        layouts: service.display_layouts().await?,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn load_drag_script(path: &Path) -> Result<Vec<DragEvent>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read drag script: {}", path.display()))?;
    let events: Vec<DragEvent> =
        serde_json::from_str(&content).context("Failed to parse drag script")?;

    info!("Loaded {} drag events from {}", events.len(), path.display());
    Ok(events)
}

fn init_logging(args: &Args, logging: &LoggingConfig) -> Result<()> {
    use std::fs::File;

    let log_level = match args.verbose {
        0 => logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "lamco_display_layout={level},warn",
            level = log_level
        ))
    });

    // stdout carries the JSON report, so console logs go to stderr
    let log_file = args
        .log_file
        .clone()
        .map(PathBuf::from)
        .or_else(|| logging.log_file.clone());

    if let Some(log_file_path) = &log_file {
        let file = File::create(log_file_path)
            .with_context(|| format!("Failed to create log file: {}", log_file_path.display()))?;

        match args.log_format.as_str() {
            "json" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_writer(std::io::stderr),
                    )
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_writer(file)
                            .with_ansi(false),
                    )
                    .init();
            }
            "compact" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_writer(std::io::stderr),
                    )
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_writer(file)
                            .with_ansi(false),
                    )
                    .init();
            }
            _ => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .pretty()
                            .with_writer(std::io::stderr),
                    )
                    .with(
                        tracing_subscriber::fmt::layer()
                            .with_writer(file)
                            .with_ansi(false),
                    )
                    .init();
            }
        }
        info!("Logging to file: {}", log_file_path.display());
    } else {
        match args.log_format.as_str() {
            "json" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                    .init();
            }
            "compact" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_writer(std::io::stderr),
                    )
                    .init();
            }
            _ => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .pretty()
                            .with_writer(std::io::stderr),
                    )
                    .init();
            }
        }
    }

    Ok(())
}
