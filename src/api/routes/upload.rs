//! Upload Routes
//!
//! - POST /api/etf/upload - Process an ETF holdings CSV
//!
//! The request is multipart form data with a single `file` field. An
//! optional `top_holdings_count` query parameter limits the ranking; a
//! missing or unparsable value falls back to the configured default.

use axum::{
    body::Bytes,
    extract::{Multipart, Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::UploadQuery;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::etf::{calculate_etf_data, validate_holdings, EtfError, EtfReport};

/// Name of the multipart field carrying the CSV
pub const FILE_FIELD: &str = "file";

/// POST /api/etf/upload
pub async fn upload_etf(
    State(state): State<Arc<AppState>>,
    query: Option<Query<UploadQuery>>,
    mut multipart: Multipart,
) -> ApiResult<Json<EtfReport>> {
    tracing::info!("ETF CSV upload request received");

    let top_holdings_count = query
        .and_then(|Query(q)| q.top_holdings_count)
        .unwrap_or_else(|| state.default_top_holdings());

    let (filename, bytes) = read_file_field(&mut multipart).await?;
    check_file_name(&filename)?;

    tracing::info!(file = %filename, bytes = bytes.len(), "Processing file");

    let holdings = validate_holdings(&bytes)?;
    tracing::info!(file = %filename, "CSV validation successful");

    let report = calculate_etf_data(&holdings, state.prices.as_ref(), top_holdings_count)?;

    tracing::info!(
        file = %filename,
        constituents = report.constituents.len(),
        prices = report.etf_prices.len(),
        "Successfully processed ETF CSV"
    );

    Ok(Json(report))
}

/// Find the `file` field and read it fully into memory
async fn read_file_field(multipart: &mut Multipart) -> ApiResult<(String, Bytes)> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        return Ok((filename, bytes));
    }

    Err(EtfError::NoFileProvided.into())
}

fn check_file_name(filename: &str) -> Result<(), EtfError> {
    if filename.is_empty() {
        return Err(EtfError::NoFileSelected);
    }
    if !filename.ends_with(".csv") {
        return Err(EtfError::InvalidFileType(filename.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_checks() {
        assert!(check_file_name("holdings.csv").is_ok());
        assert_eq!(check_file_name(""), Err(EtfError::NoFileSelected));
        assert_eq!(
            check_file_name("report.txt"),
            Err(EtfError::InvalidFileType("report.txt".to_string()))
        );
        // extension check is case-sensitive
        assert!(check_file_name("HOLDINGS.CSV").is_err());
    }
}
