//! ETF Monitor API Client
//!
//! HTTP client for `POST /api/etf/upload`, used by the CLI.
//!
//! Every failure is reported as an [`UploadError`] shaped like the server's
//! error body. When no structured body is available the client falls back to
//! [`FALLBACK_ERROR_MESSAGE`].

use reqwest::{multipart, Client};
use serde::Deserialize;
use thiserror::Error;

use crate::etf::EtfReport;

/// Base URL used when none is configured
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Path of the upload endpoint, relative to the base URL
pub const UPLOAD_PATH: &str = "/api/etf/upload";

/// Message reported when the server gave no usable error body
pub const FALLBACK_ERROR_MESSAGE: &str =
    "An error occurred during upload. Contact system maintainer.";

/// Upload failure as reported by the server, or the fallback
#[derive(Error, Debug, Clone, PartialEq, Deserialize)]
#[error("{error}")]
pub struct UploadError {
    /// Human-readable message
    pub error: String,
    /// Optional diagnostic detail
    #[serde(default)]
    pub error_detail: Option<String>,
}

impl UploadError {
    /// The generic fallback error, optionally carrying a diagnostic
    pub fn fallback(detail: Option<String>) -> Self {
        Self {
            error: FALLBACK_ERROR_MESSAGE.to_string(),
            error_detail: detail,
        }
    }
}

/// Resolve the API base URL: explicit value, then configured, then default
pub fn resolve_base_url(explicit: Option<&str>, configured: Option<&str>) -> String {
    let url = [explicit, configured]
        .into_iter()
        .flatten()
        .find(|url| !url.trim().is_empty())
        .unwrap_or(DEFAULT_API_URL);

    url.trim().trim_end_matches('/').to_string()
}

/// Client for the ETF upload endpoint
#[derive(Debug, Clone)]
pub struct EtfClient {
    client: Client,
    base_url: String,
    top_holdings_count: Option<usize>,
}

impl EtfClient {
    /// Create a client for the given base URL (trailing slashes are ignored)
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            top_holdings_count: None,
        }
    }

    /// Ask the server for a specific number of top holdings
    pub fn with_top_holdings(mut self, count: usize) -> Self {
        self.top_holdings_count = Some(count);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn upload_url(&self) -> String {
        match self.top_holdings_count {
            Some(count) => format!(
                "{}{}?top_holdings_count={}",
                self.base_url, UPLOAD_PATH, count
            ),
            None => format!("{}{}", self.base_url, UPLOAD_PATH),
        }
    }

    /// Upload a holdings file and return the computed datasets
    ///
    /// The file is sent as the multipart field `file`. No retries are made.
    pub async fn upload_etf(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<EtfReport, UploadError> {
        let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Upload request failed: {}", e);
                UploadError::fallback(None)
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            tracing::warn!("Failed to read upload response: {}", e);
            UploadError::fallback(None)
        })?;

        if status.is_success() {
            return serde_json::from_slice::<EtfReport>(&body).map_err(|e| {
                tracing::warn!("Upload response could not be decoded: {}", e);
                UploadError::fallback(Some(e.to_string()))
            });
        }

        tracing::debug!(status = %status, "Upload rejected by server");
        Err(error_from_body(&body))
    }
}

/// Map a non-success response body to an [`UploadError`]
fn error_from_body(body: &[u8]) -> UploadError {
    if body.iter().all(u8::is_ascii_whitespace) {
        return UploadError::fallback(None);
    }

    serde_json::from_slice::<UploadError>(body)
        .unwrap_or_else(|e| UploadError::fallback(Some(e.to_string())))
}
