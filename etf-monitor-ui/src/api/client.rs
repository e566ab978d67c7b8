//! HTTP API Client
//!
//! Sends an ETF holdings file to `POST /api/etf/upload` and maps the
//! response onto [`EtfData`] or [`UploadError`].

use gloo_net::http::Request;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

use crate::state::etf::{EtfData, UploadError, UploadRequest};

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:5000";

/// Local storage key that overrides the API base URL
pub const API_URL_STORAGE_KEY: &str = "etf_monitor_api_url";

/// Path of the upload endpoint
pub const UPLOAD_PATH: &str = "/api/etf/upload";

/// Multipart field carrying the file
pub const FILE_FIELD: &str = "file";

/// Shown when the server gave no usable error body
pub const FALLBACK_ERROR_MESSAGE: &str =
    "An error occurred during upload. Contact system maintainer.";

/// Get the API base URL from local storage, the build environment or the default
pub fn get_api_base() -> String {
    let stored = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(API_URL_STORAGE_KEY).ok().flatten());

    resolve_api_base(stored, option_env!("ETF_MONITOR_API_URL"))
}

/// Pick the first non-blank URL and drop trailing slashes
pub fn resolve_api_base(stored: Option<String>, compiled: Option<&str>) -> String {
    let url = stored
        .filter(|url| !url.trim().is_empty())
        .or_else(|| {
            compiled
                .filter(|url| !url.trim().is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

    url.trim().trim_end_matches('/').to_string()
}

pub fn fallback_error(detail: Option<String>) -> UploadError {
    UploadError {
        error: FALLBACK_ERROR_MESSAGE.to_string(),
        error_detail: detail,
    }
}

/// Map a non-success response body to an upload error
pub fn error_from_body(body: &str) -> UploadError {
    if body.trim().is_empty() {
        return fallback_error(None);
    }

    serde_json::from_str::<UploadError>(body).unwrap_or_else(|e| fallback_error(Some(e.to_string())))
}

/// Read a selected file into memory
pub async fn read_file(file: &web_sys::File) -> Result<UploadRequest, UploadError> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| fallback_error(Some(format!("Could not read file: {:?}", e))))?;

    Ok(UploadRequest {
        file_name: file.name(),
        bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
    })
}

fn multipart_body(request: &UploadRequest) -> Result<web_sys::FormData, JsValue> {
    let form = web_sys::FormData::new()?;

    let bytes = js_sys::Uint8Array::from(request.bytes.as_slice());
    let blob = web_sys::Blob::new_with_u8_array_sequence(&js_sys::Array::of1(&bytes))?;
    form.append_with_blob_and_filename(FILE_FIELD, &blob, &request.file_name)?;

    Ok(form)
}

/// Upload a holdings file
pub async fn upload_etf(request: &UploadRequest) -> Result<EtfData, UploadError> {
    let url = format!("{}{}", get_api_base(), UPLOAD_PATH);

    let form = multipart_body(request)
        .map_err(|e| fallback_error(Some(format!("Could not build request: {:?}", e))))?;

    let response = Request::post(&url)
        .body(form)
        .map_err(|e| fallback_error(Some(e.to_string())))?
        .send()
        .await
        .map_err(|e| {
            web_sys::console::error_1(&format!("Network error: {}", e).into());
            fallback_error(None)
        })?;

    let ok = response.ok();
    let body = response.text().await.map_err(|_| fallback_error(None))?;

    if !ok {
        return Err(error_from_body(&body));
    }

    serde_json::from_str::<EtfData>(&body).map_err(|e| fallback_error(Some(e.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_base_resolution() {
        assert_eq!(resolve_api_base(None, None), "http://localhost:5000");
        assert_eq!(
            resolve_api_base(None, Some("https://etf.example.com/")),
            "https://etf.example.com"
        );
        assert_eq!(
            resolve_api_base(Some("http://127.0.0.1:9000//".into()), Some("https://etf.example.com")),
            "http://127.0.0.1:9000"
        );
        assert_eq!(
            resolve_api_base(Some("  ".into()), None),
            "http://localhost:5000"
        );
    }

    #[test]
    fn test_structured_error_body() {
        let err = error_from_body(
            r#"{"error":"Invalid CSV format","error_detail":"missing column 'symbol'"}"#,
        );
        assert_eq!(err.error, "Invalid CSV format");
        assert_eq!(err.error_detail.as_deref(), Some("missing column 'symbol'"));
    }

    #[test]
    fn test_error_code_ignored() {
        let err = error_from_body(r#"{"error":"Price data for stock 'TSLA' not found.","error_code":3001}"#);
        assert_eq!(err.error, "Price data for stock 'TSLA' not found.");
        assert_eq!(err.error_detail, None);
    }

    #[test]
    fn test_missing_body_uses_fallback() {
        assert_eq!(error_from_body(""), fallback_error(None));
        assert_eq!(error_from_body("  \n"), fallback_error(None));
    }

    #[test]
    fn test_unparseable_body_uses_fallback_with_detail() {
        let err = error_from_body("<html>502 Bad Gateway</html>");
        assert_eq!(err.error, FALLBACK_ERROR_MESSAGE);
        assert!(err.error_detail.is_some());
    }
}
