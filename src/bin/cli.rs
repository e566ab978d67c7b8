//! ETF Monitor CLI
//!
//! Command-line interface for ETF Monitor:
//! - Upload a holdings file to the API and print the results
//! - Check a holdings file locally against a price table
//! - Generate a default config file

use anyhow::Context;
use clap::{Parser, Subcommand};
use etf_monitor::client::{resolve_base_url, EtfClient};
use etf_monitor::config::{generate_default_config, Config};
use etf_monitor::etf::{calculate_etf_data, validate_holdings_file, CsvPriceTable};
use etf_monitor::report;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "etf-monitor")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Upload ETF holdings and inspect constituents, top holdings and price history")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload a holdings CSV to the API server
    Upload {
        /// Path to the holdings CSV
        file: PathBuf,
        /// API server URL (default: `client.api_url` or $ETF_MONITOR_API_URL, then http://localhost:5000)
        #[arg(long)]
        api_url: Option<String>,
        /// Number of top holdings to request
        #[arg(short, long)]
        top: Option<usize>,
        /// Only show constituents whose ticker contains this text
        #[arg(short, long)]
        search: Option<String>,
        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// Validate a holdings CSV and compute results locally
    Check {
        /// Path to the holdings CSV
        file: PathBuf,
        /// Price table CSV (default: from config)
        #[arg(short, long)]
        prices: Option<PathBuf>,
        /// Number of top holdings to compute (default: from config)
        #[arg(short, long)]
        top: Option<usize>,
    },

    /// Generate default config file
    InitConfig {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Upload {
            file,
            api_url,
            top,
            search,
            json,
        } => {
            let config = Config::load_default(cli.config.as_deref())?.config;
            let file_name = file_name(&file);
            let bytes = std::fs::read(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;

            let base_url = resolve_base_url(api_url.as_deref(), config.client.api_url.as_deref());
            let mut client = EtfClient::new(base_url);
            if let Some(count) = top {
                client = client.with_top_holdings(count);
            }

            match client.upload_etf(&file_name, bytes).await {
                Ok(data) if json => {
                    println!("{}", serde_json::to_string_pretty(&data)?);
                }
                Ok(data) => {
                    println!("File uploaded successfully!");
                    println!();
                    print!("{}", report::render(&data, search.as_deref()));
                }
                Err(e) => {
                    eprintln!("Upload failed: {}", e.error);
                    if let Some(detail) = e.error_detail {
                        eprintln!("Details: {}", detail);
                    }
                    eprintln!();
                    eprintln!("API server: {}", client.base_url());
                    std::process::exit(1);
                }
            }
        }

        Commands::Check { file, prices, top } => {
            let config = Config::load_default(cli.config.as_deref())?.config;
            let prices_path = prices.unwrap_or_else(|| PathBuf::from(&config.prices.path));
            let top = top.unwrap_or(config.upload.default_top_holdings);

            let holdings = match validate_holdings_file(&file) {
                Ok(holdings) => holdings,
                Err(e) => {
                    eprintln!("{}", e.log_message());
                    std::process::exit(1);
                }
            };
            println!("Validated {} holdings in {}", holdings.len(), file.display());

            let table = CsvPriceTable::from_path(&prices_path, &config.prices.date_column)
                .with_context(|| {
                    format!("Failed to load price table from {}", prices_path.display())
                })?;

            match calculate_etf_data(&holdings, &table, top) {
                Ok(data) => {
                    println!();
                    print!("{}", report::render(&data, None));
                }
                Err(e) => {
                    eprintln!("{}", e.log_message());
                    std::process::exit(1);
                }
            }
        }

        Commands::InitConfig { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    // Create parent directory if needed
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
