//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::api::error::ApiResult;
use crate::api::metrics::HttpMetrics;
use crate::config::Config;
use crate::etf::PriceSource;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<Config>,
    /// Price history used to value uploaded holdings
    pub prices: Arc<dyn PriceSource>,
    /// Request metrics served at `/metrics`
    pub metrics: Arc<HttpMetrics>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: Config, prices: Arc<dyn PriceSource>) -> ApiResult<Self> {
        Ok(Self {
            config: Arc::new(config),
            prices,
            metrics: Arc::new(HttpMetrics::new()?),
            start_time: Instant::now(),
        })
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Top holdings count used when a request does not specify one
    pub fn default_top_holdings(&self) -> usize {
        self.config.upload.default_top_holdings
    }
}
