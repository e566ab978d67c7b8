//! Prometheus Metrics
//!
//! Per-request counters and latency histograms labelled by method, route and
//! status, plus an `app_info` gauge. Each [`HttpMetrics`] owns its registry,
//! so several routers in one process never share series.
//!
//! - GET /metrics - Prometheus text exposition

use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;
use std::time::Instant;

use crate::api::state::AppState;

/// Reported in the `app_name` label of `app_info`
pub const APP_NAME: &str = "ETF Monitor Backend";

/// Route label for requests that matched no route
const UNMATCHED_ROUTE: &str = "unmatched";

const REQUEST_LABELS: [&str; 3] = ["method", "path", "status"];

/// Request metrics and the registry they are exposed from
pub struct HttpMetrics {
    registry: Registry,
    requests: IntCounterVec,
    latency: HistogramVec,
}

impl HttpMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests = IntCounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &REQUEST_LABELS,
        )?;
        let latency = HistogramVec::new(
            HistogramOpts::new("http_request_duration_seconds", "HTTP request latency in seconds"),
            &REQUEST_LABELS,
        )?;
        let info = IntGaugeVec::new(
            Opts::new("app_info", "Application info"),
            &["version", "app_name"],
        )?;

        registry.register(Box::new(requests.clone()))?;
        registry.register(Box::new(latency.clone()))?;
        registry.register(Box::new(info.clone()))?;

        info.with_label_values(&[env!("CARGO_PKG_VERSION"), APP_NAME]).set(1);

        Ok(Self {
            registry,
            requests,
            latency,
        })
    }

    /// Record one finished request
    pub fn observe(&self, method: &str, path: &str, status: StatusCode, seconds: f64) {
        let labels = [method, path, status.as_str()];
        self.requests.with_label_values(&labels).inc();
        self.latency.with_label_values(&labels).observe(seconds);
    }

    /// Render every registered family in the Prometheus text format
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

/// Middleware recording every routed request
///
/// The route template is used as the path label to keep label cardinality
/// bounded.
pub async fn track_requests(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().as_str().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string());

    let start = Instant::now();
    let response = next.run(request).await;

    state.metrics.observe(
        &method,
        &path,
        response.status(),
        start.elapsed().as_secs_f64(),
    );

    response
}

/// GET /metrics
pub async fn export(State(state): State<Arc<AppState>>) -> Response {
    match state.metrics.render() {
        Ok(body) => {
            let content_type = TextEncoder::new().format_type().to_string();
            ([(header::CONTENT_TYPE, content_type)], body).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_info_is_exported() {
        let metrics = HttpMetrics::new().unwrap();
        let text = metrics.render().unwrap();

        assert!(text.contains("app_info{app_name=\"ETF Monitor Backend\""));
        assert!(text.contains(&format!("version=\"{}\"", env!("CARGO_PKG_VERSION"))));
    }

    #[test]
    fn test_observe_counts_by_route_and_status() {
        let metrics = HttpMetrics::new().unwrap();
        metrics.observe("POST", "/api/etf/upload", StatusCode::OK, 0.02);
        metrics.observe("POST", "/api/etf/upload", StatusCode::OK, 0.03);
        metrics.observe("POST", "/api/etf/upload", StatusCode::BAD_REQUEST, 0.01);

        let text = metrics.render().unwrap();
        assert!(text.contains(
            "http_requests_total{method=\"POST\",path=\"/api/etf/upload\",status=\"200\"} 2"
        ));
        assert!(text.contains(
            "http_requests_total{method=\"POST\",path=\"/api/etf/upload\",status=\"400\"} 1"
        ));
        assert!(text.contains("http_request_duration_seconds_count{method=\"POST\",path=\"/api/etf/upload\",status=\"200\"} 2"));
    }
}
