//! Data Transfer Objects
//!
//! Request and response types for the API endpoints that are not part of
//! the ETF wire format in [`crate::etf::types`].

use serde::{Deserialize, Serialize};

/// Query parameters for `POST /api/etf/upload`
#[derive(Debug, Default, Deserialize)]
pub struct UploadQuery {
    /// How many top holdings to return
    #[serde(default)]
    pub top_holdings_count: Option<usize>,
}

/// Full health status
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,
    /// Crate version
    pub version: String,
    /// Seconds since the server started
    pub uptime_seconds: u64,
    /// Number of tickers in the loaded price table
    pub tickers: usize,
}
