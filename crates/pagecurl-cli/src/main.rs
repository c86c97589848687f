use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pagecurl_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "pagecurl")]
#[command(author, version, about = "Page-curl image carousel for the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Use this config file instead of ~/.config/pagecurl/config.toml
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive carousel
    Run,
    /// Replay a drag headlessly and print every frame
    Simulate {
        /// Number of pages (defaults to the configured pages)
        #[arg(short = 'p', long)]
        pages: Option<usize>,
        /// Page the drag starts on
        #[arg(short = 'i', long, default_value_t = 1)]
        index: usize,
        /// Release velocity in px/s; negative turns forward
        #[arg(short = 'v', long, default_value_t = -500.0, allow_hyphen_values = true)]
        velocity: f64,
        /// Surface width in px
        #[arg(long, default_value_t = 400.0)]
        width: f64,
        /// Surface height in px
        #[arg(long, default_value_t = 800.0)]
        height: f64,
        /// JSON file with a list of pointer events to replay instead of a synthetic drag
        #[arg(short = 's', long)]
        script: Option<PathBuf>,
        /// Frame step in milliseconds
        #[arg(long, default_value_t = 16)]
        frame_ms: u64,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration
    Config {
        /// Print the built-in defaults instead
        #[arg(long)]
        default: bool,
        /// Print the config file location only
        #[arg(long)]
        path: bool,
        /// Write the defaults to the config file if it does not exist yet
        #[arg(long)]
        init: bool,
    },
}

/// Install the global subscriber. The interactive UI owns the terminal, so it
/// logs to a file under the data directory; everything else logs to stderr.
fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.general.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if to_file {
        let log_path = config.log_path();
        if let Some(parent) = log_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating log directory {}", parent.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("opening log file {}", log_path.display()))?;

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);
    let config = Arc::new(AppConfig::load_from(&config_path)?);

    let interactive = matches!(cli.command, None | Some(Commands::Run));
    init_logging(&config, interactive)?;

    match cli.command {
        Some(Commands::Run) | None => commands::run::run(config).await,
        Some(Commands::Simulate {
            pages,
            index,
            velocity,
            width,
            height,
            script,
            frame_ms,
            json,
        }) => commands::simulate::run(
            &config,
            commands::simulate::SimulateOptions {
                pages,
                index,
                velocity,
                width,
                height,
                script,
                frame_ms,
                json,
            },
        ),
        Some(Commands::Config {
            default,
            path,
            init,
        }) => commands::config::run(&config, &config_path, default, path, init),
    }
}
