use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, info_span, Instrument};

/// Request observability middleware: every request runs inside a span
/// carrying the matched route and a fresh request id, and logs its status
/// and latency on the way out.
pub async fn observability_middleware(
    matched_path: Option<MatchedPath>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    // Static file serving has no matched route pattern; fall back to the path.
    let route = matched_path
        .as_ref()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    let start_time = Instant::now();

    let span = info_span!(
        "http_request",
        method = %method,
        uri = %uri,
        route = %route,
        request_id = %uuid::Uuid::now_v7(),
    );

    let response = next.run(request).instrument(span).await;

    let status_code = response.status().as_u16();
    info!(
        method = %method,
        route = %route,
        status = status_code,
        latency_ms = start_time.elapsed().as_millis() as u64,
        "request completed"
    );

    response
}
