//! Request logging middleware

use axum::{body::Body, middleware::Next, response::Response};
use http::Request;
use std::time::Instant;
use tracing::{info_span, Instrument};

/// Wraps each request in an `http_request` span and logs its outcome:
/// info for success, warn for client errors, error for server errors.
pub async fn log_request(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let span = info_span!("http_request", method = %method, path = %path);
    let start = Instant::now();

    tracing::debug!(parent: &span, "started processing request");

    let response = next.run(req).instrument(span.clone()).await;

    let status = response.status();
    let latency_ms = start.elapsed().as_millis();

    span.in_scope(|| {
        if status.is_success() || status.is_redirection() {
            tracing::info!(status = status.as_u16(), latency_ms = latency_ms, "request completed");
        } else if status.is_client_error() {
            tracing::warn!(status = status.as_u16(), latency_ms = latency_ms, "client error response");
        } else {
            tracing::error!(status = status.as_u16(), latency_ms = latency_ms, "server error response");
        }
    });

    response
}
