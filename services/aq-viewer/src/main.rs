//! Air-quality viewer.
//!
//! Drives the overlay and chart crates against a live data service:
//! - `heatmap`: one heatmap fetch rendered to PNG
//! - `replay`: viewport events from stdin through the debounced controller
//! - `chart`: history for a location as chart geometry and trend outlook

mod commands;
mod config;
mod sink;

use std::path::PathBuf;

use anyhow::Result;
use aq_common::Pollutant;
use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::config::ViewerConfig;

#[derive(Parser, Debug)]
#[command(name = "aq-viewer")]
#[command(about = "Air-quality heatmap overlays and history charts")]
struct Args {
    /// YAML config file with overlay, chart and history sections
    #[arg(long, env = "AQ_CONFIG")]
    config: Option<PathBuf>,

    /// Data service base URL
    #[arg(long, env = "AQ_API_URL")]
    api_url: Option<String>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a heatmap for a bounding box and write it as PNG
    Heatmap {
        /// Corners as lat1,lon1,lat2,lon2
        #[arg(long, allow_hyphen_values = true)]
        bbox: String,

        /// Output PNG path; a JSON sidecar is written next to it
        #[arg(long, default_value = "overlay.png")]
        out: PathBuf,
    },

    /// Replay viewport lines from stdin through the overlay controller
    Replay {
        /// Directory receiving every displayed overlay
        #[arg(long, default_value = "overlays")]
        out_dir: PathBuf,
    },

    /// Fetch history for a location and print chart geometry
    Chart {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Series key: aqi, pm25, pm10, no2, so2, co, o3
        #[arg(long, default_value = "aqi")]
        pollutant: Pollutant,

        /// Also render the chart as SVG
        #[arg(long)]
        svg: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr; stdout carries command output
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = ViewerConfig::load(args.config.as_deref(), args.api_url.as_deref())?;
    info!(base_url = %config.overlay.base_url, "Starting aq-viewer");

    match args.command {
        Command::Heatmap { bbox, out } => commands::heatmap(&config, &bbox, &out).await,
        Command::Replay { out_dir } => {
            let stdin = BufReader::new(tokio::io::stdin());
            commands::replay(&config, stdin, &out_dir).await
        }
        Command::Chart {
            lat,
            lon,
            pollutant,
            svg,
        } => commands::chart(&config, lat, lon, pollutant, svg).await,
    }
}
