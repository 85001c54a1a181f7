//! Request/response access logging.
//!
//! [`log_requests`] wraps every inbound request and records method, URI,
//! request headers, response status, response headers, and elapsed
//! wall-clock time as one structured event. It is purely observational:
//! the wrapped response passes through unchanged, and panics propagate
//! to the catch-panic layer above it.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

pub async fn log_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_headers = format_headers(request.headers());

    let response = next.run(request).await;

    tracing::info!(
        method = %method,
        uri = %uri,
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        request_headers = %request_headers,
        response_headers = %format_headers(response.headers()),
        "request completed"
    );

    response
}

fn format_headers(headers: &axum::http::HeaderMap) -> String {
    let mut out = String::new();
    for (name, value) in headers {
        if !out.is_empty() {
            out.push_str(", ");
        }
        out.push_str(name.as_str());
        out.push('=');
        out.push_str(value.to_str().unwrap_or("<binary>"));
    }
    out
}
