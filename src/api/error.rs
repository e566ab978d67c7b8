//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::etf::{EtfError, ErrorResponse};

/// Error code for request bodies that are not readable multipart data
pub const MALFORMED_UPLOAD_CODE: u32 = 1000;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Upload rejected while validating or processing the ETF file
    #[error(transparent)]
    Etf(#[from] EtfError),

    /// Multipart body could not be read
    #[error("Malformed upload request: {message}")]
    Multipart { status: StatusCode, message: String },

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Metrics registry could not be set up or encoded
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Multipart {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Etf(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Etf(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Multipart { status, .. } => *status,
            ApiError::Internal(_) | ApiError::Io(_) | ApiError::Metrics(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// JSON body for this error
    pub fn body(&self) -> ErrorResponse {
        match self {
            ApiError::Etf(e) => ErrorResponse {
                error: e.message(),
                error_code: Some(e.code()),
                error_detail: e.detail(),
            },
            ApiError::Multipart { message, .. } => ErrorResponse {
                error: "The upload could not be read. Please send the file as multipart form data."
                    .to_string(),
                error_code: Some(MALFORMED_UPLOAD_CODE),
                error_detail: Some(message.clone()),
            },
            ApiError::Internal(msg) => unexpected(msg),
            ApiError::Io(e) => unexpected(&e.to_string()),
            ApiError::Metrics(e) => unexpected(&e.to_string()),
        }
    }
}

fn unexpected(details: &str) -> ErrorResponse {
    let err = EtfError::Unexpected(details.to_string());
    ErrorResponse {
        error: err.message(),
        error_code: Some(err.code()),
        error_detail: None,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = self.body();
        let request_id = uuid::Uuid::new_v4().to_string();
        let log_message = match &self {
            ApiError::Etf(e) => e.log_message(),
            other => other.to_string(),
        };

        if status.is_server_error() {
            tracing::error!(
                request_id = %request_id,
                status = status.as_u16(),
                "{}",
                log_message
            );
        } else {
            tracing::warn!(
                request_id = %request_id,
                status = status.as_u16(),
                "{}",
                log_message
            );
        }

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_bad_requests() {
        let err = ApiError::from(EtfError::EmptyFile);

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let body = err.body();
        assert_eq!(body.error, "There was a problem processing the file.");
        assert_eq!(body.error_code, Some(1004));
        assert!(body.error_detail.unwrap().contains("appears to be empty"));
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let err = ApiError::Internal("price table lock poisoned".to_string());

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = err.body();
        assert_eq!(body.error_code, Some(5000));
        assert!(body.error_detail.is_none());
    }

    #[test]
    fn test_unexpected_etf_error_is_server_error() {
        let err = ApiError::from(EtfError::Unexpected("x".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
