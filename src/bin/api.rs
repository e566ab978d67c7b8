//! ETF Monitor API Server
//!
//! Run with: cargo run --bin etf-monitor-api
//!
//! # Configuration
//!
//! Settings come from `--config`, `~/.config/etf-monitor/config.toml` or
//! `./config.toml`, then environment variables:
//! - `ETF_MONITOR_HOST`: Host to bind to (default: 0.0.0.0)
//! - `ETF_MONITOR_PORT` or `PORT`: Port to listen on (default: 5000)
//! - `ETF_MONITOR_PRICES_FILE`: Price table CSV (default: data/prices.csv)
//! - `ETF_MONITOR_TOP_HOLDINGS`: Default top holdings count (default: 10)
//! - `ETF_MONITOR_LOG_LEVEL` / `ETF_MONITOR_LOG_FORMAT`: Logging
//! - `RUST_LOG`: Overrides the log filter entirely

use anyhow::Context;
use clap::Parser;
use etf_monitor::api::{serve, AppState};
use etf_monitor::config::Config;
use etf_monitor::etf::CsvPriceTable;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "etf-monitor-api")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "ETF Monitor HTTP API")]
struct Args {
    /// Path to a config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let loaded = Config::load_default(args.config.as_deref())?;
    etf_monitor::logging::init(&loaded.config.logging).context("Failed to initialize logging")?;

    tracing::info!("Starting ETF Monitor API server v{}", env!("CARGO_PKG_VERSION"));
    loaded.log_source();
    let config = loaded.config;

    let prices_path = Path::new(&config.prices.path);
    let prices = CsvPriceTable::from_path(prices_path, &config.prices.date_column)
        .with_context(|| format!("Failed to load price table from {}", prices_path.display()))?;

    tracing::info!("Default top holdings: {}", config.upload.default_top_holdings);

    let state = AppState::new(config, Arc::new(prices))?;
    serve(state).await?;

    tracing::info!("ETF Monitor API server stopped");
    Ok(())
}
