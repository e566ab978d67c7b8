//! ETF Data Types
//!
//! Wire types shared by the API server, the native client and the CLI.

use serde::{Deserialize, Serialize};

/// One validated row of an uploaded holdings file
#[derive(Debug, Clone, PartialEq)]
pub struct Holding {
    /// Ticker symbol
    pub name: String,
    /// Portfolio weight as a fraction (0-1)
    pub weight: f64,
}

impl Holding {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

/// An ETF constituent with its weight and latest price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constituent {
    pub name: String,
    pub weight: f64,
    pub price: f64,
}

/// A constituent ranked by holding size (weight * latest price)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopHolding {
    pub name: String,
    pub holding_size: f64,
}

/// ETF price on a single date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// ISO date (YYYY-MM-DD)
    pub date: String,
    pub price: f64,
}

/// Successful upload response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EtfReport {
    pub constituents: Vec<Constituent>,
    pub top_holdings: Vec<TopHolding>,
    pub etf_prices: Vec<PricePoint>,
}

/// Error response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_omits_missing_detail() {
        let body = ErrorResponse {
            error: "No file provided".to_string(),
            error_code: Some(1001),
            error_detail: None,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error_code"], 1001);
        assert!(json.get("error_detail").is_none());
    }

    #[test]
    fn test_report_uses_snake_case_field_names() {
        let json = r#"{
            "constituents": [{"name": "AAPL", "weight": 0.07, "price": 150.23}],
            "top_holdings": [{"name": "AAPL", "holding_size": 0.07}],
            "etf_prices": [{"date": "2024-01-02", "price": 102.5}]
        }"#;

        let report: EtfReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.constituents[0].name, "AAPL");
        assert_eq!(report.top_holdings[0].holding_size, 0.07);
        assert_eq!(report.etf_prices[0].date, "2024-01-02");
    }
}
