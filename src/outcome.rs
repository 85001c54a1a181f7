//! The normalized result of one backend call.
//!
//! Every outbound call produces exactly one [`Outcome`], and the client
//! only ever sees its three shapes: a verbatim success passthrough, a
//! 503 naming the unreachable backend, or the backend's own non-2xx
//! status with a descriptive detail. Raw transport errors and backend
//! stack traces never leak.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use serde::Serialize;

use crate::backends::ServiceName;

/// Longest backend body excerpt embedded in an upstream-error detail.
const BODY_SUMMARY_LIMIT: usize = 256;

#[derive(Debug)]
pub enum Outcome {
    /// Backend answered 2xx; body is passed through verbatim.
    Success { status: StatusCode, body: Bytes },
    /// The backend could not be reached at all (connect, DNS, TLS, timeout).
    ServiceUnavailable {
        service: ServiceName,
        message: String,
    },
    /// The backend answered with a non-2xx status, forwarded as-is.
    UpstreamError { status: StatusCode, detail: String },
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self {
            Self::Success { status, body } => (
                status,
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                )],
                body,
            )
                .into_response(),
            Self::ServiceUnavailable { message, .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorBody { error: message }),
            )
                .into_response(),
            Self::UpstreamError { status, detail } => {
                (status, Json(ErrorBody { error: detail })).into_response()
            }
        }
    }
}

/// Client input errors resolved locally — never forwarded to a backend.
#[must_use]
pub fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Truncate a backend body for embedding in an error detail.
#[must_use]
pub fn summarize_body(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return "(empty body)".to_string();
    }
    let mut summary: String = trimmed.chars().take(BODY_SUMMARY_LIMIT).collect();
    if trimmed.chars().count() > BODY_SUMMARY_LIMIT {
        summary.push_str("...");
    }
    summary
}
