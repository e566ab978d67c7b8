//! # ETF Monitor
//!
//! Upload an ETF holdings CSV and get back its constituents, its top
//! holdings and the ETF price history computed from a price table.
//!
//! ## Modules
//!
//! - [`etf`]: Holdings validation, price table and analytics
//! - [`api`]: REST API server with Axum
//! - [`client`]: HTTP client for the upload endpoint
//! - [`report`]: Plain-text rendering of an upload result
//! - [`config`]: TOML configuration with environment overrides
//! - [`logging`]: Tracing subscriber setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use etf_monitor::etf::{calculate_etf_data, validate_holdings_file, CsvPriceTable};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let holdings = validate_holdings_file(Path::new("data/sample_etf.csv"))?;
//!     let prices = CsvPriceTable::from_path(Path::new("data/prices.csv"), "DATE")?;
//!
//!     let report = calculate_etf_data(&holdings, &prices, 10)?;
//!     println!("Latest ETF price: {:?}", report.etf_prices.last());
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod etf;
pub mod logging;
pub mod report;

// Re-export top-level types for convenience
pub use etf::{
    calculate_etf_data, validate_holdings, validate_holdings_file, Constituent, CsvPriceTable,
    ErrorResponse, EtfError, EtfReport, EtfResult, Holding, PricePoint, PriceSource, TopHolding,
};

pub use api::{build_router, serve, ApiError, AppState};

pub use client::{EtfClient, UploadError};

pub use config::{Config, ConfigError, LoadedConfig, LoggingConfig};
