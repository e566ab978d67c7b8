//! ETF Data
//!
//! Records received from the upload endpoint. The dashboard never mutates
//! them; derived values are computed at render time.

use serde::{Deserialize, Serialize};

/// One underlying security of the ETF
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Constituent {
    /// Ticker symbol
    pub name: String,
    /// Portfolio weight as a fraction
    pub weight: f64,
    pub price: f64,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct TopHolding {
    pub name: String,
    pub holding_size: f64,
}

/// ETF price on one date. Series order is chronological as received.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct PricePoint {
    pub date: String,
    pub price: f64,
}

/// The three datasets of a successful upload, always set together
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct EtfData {
    pub constituents: Vec<Constituent>,
    pub top_holdings: Vec<TopHolding>,
    pub etf_prices: Vec<PricePoint>,
}

/// Failed upload, as reported by the server or the fallback
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, thiserror::Error)]
#[error("{error}")]
pub struct UploadError {
    pub error: String,
    #[serde(default)]
    pub error_detail: Option<String>,
}

/// A file read into memory, ready to send
#[derive(Clone, Debug, PartialEq)]
pub struct UploadRequest {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_body_decodes() {
        let body = r#"{
            "constituents": [{"name": "AAPL", "weight": 0.07, "price": 150.23}],
            "top_holdings": [{"name": "AAPL", "holding_size": 0.07}],
            "etf_prices": [{"date": "2024-01-02", "price": 102.5}]
        }"#;

        let data: EtfData = serde_json::from_str(body).unwrap();
        assert_eq!(data.constituents[0].name, "AAPL");
        assert_eq!(data.top_holdings[0].holding_size, 0.07);
        assert_eq!(data.etf_prices[0].date, "2024-01-02");
    }

    #[test]
    fn test_error_body_detail_optional() {
        let err: UploadError = serde_json::from_str(r#"{"error": "Boom"}"#).unwrap();
        assert_eq!(err.error_detail, None);
        assert_eq!(err.to_string(), "Boom");
    }
}
