//! Composite and per-service health endpoints.
//!
//! The composite `GET /health` probes all four backends concurrently and
//! always answers 200 — one unhealthy dependency must not mask the
//! health of the others, so each backend's outcome is recorded
//! independently in the report. The per-service endpoints are the strict
//! counterpart: they apply the normal error mapping, so an unreachable
//! backend yields a 503 and a non-2xx health response forwards the
//! backend's own status.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::backends::{BackendClient, ServiceName};
use crate::outcome::Outcome;
use crate::server::SharedState;

#[derive(Debug, Serialize, Deserialize)]
pub struct CompositeHealth {
    pub status: String,
    pub services: ServiceReports,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceReports {
    pub account_service: Value,
    pub file_service: Value,
    pub statement_service: Value,
    pub tag_service: Value,
}

pub async fn composite_health(State(state): State<SharedState>) -> Json<CompositeHealth> {
    let backends = &state.backends;
    let (account_service, file_service, statement_service, tag_service) = tokio::join!(
        probe(backends.client_for(ServiceName::Account)),
        probe(backends.client_for(ServiceName::File)),
        probe(backends.client_for(ServiceName::Statement)),
        probe(backends.client_for(ServiceName::Tag)),
    );

    Json(CompositeHealth {
        status: "ok".to_string(),
        services: ServiceReports {
            account_service,
            file_service,
            statement_service,
            tag_service,
        },
    })
}

/// One backend's entry in the composite report. Never fails: a degraded
/// backend becomes a `status: error` object instead.
async fn probe(client: &BackendClient) -> Value {
    match client.get("/health").await {
        Outcome::Success { body, .. } => parse_health_body(&body),
        Outcome::ServiceUnavailable { message, .. } => serde_json::json!({
            "status": "error",
            "message": message,
        }),
        Outcome::UpstreamError { status, detail } => serde_json::json!({
            "status": "error",
            "message": detail,
            "status_code": status.as_u16(),
        }),
    }
}

fn parse_health_body(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap_or_else(|_| serde_json::json!({ "status": "ok" }))
}

pub async fn account_health(State(state): State<SharedState>) -> Response {
    service_health(&state, ServiceName::Account).await
}

pub async fn file_health(State(state): State<SharedState>) -> Response {
    service_health(&state, ServiceName::File).await
}

pub async fn statements_health(State(state): State<SharedState>) -> Response {
    service_health(&state, ServiceName::Statement).await
}

pub async fn tags_health(State(state): State<SharedState>) -> Response {
    service_health(&state, ServiceName::Tag).await
}

async fn service_health(state: &SharedState, name: ServiceName) -> Response {
    match state.backends.client_for(name).get("/health").await {
        Outcome::Success { body, .. } => {
            let mut report = serde_json::Map::new();
            report.insert("status".to_string(), Value::String("ok".to_string()));
            report.insert(name.report_key().to_string(), parse_health_body(&body));
            Json(Value::Object(report)).into_response()
        }
        other => other.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_body_falls_back_on_invalid_json() {
        let parsed = parse_health_body(b"not json");
        assert_eq!(parsed["status"], "ok");
    }

    #[test]
    fn health_body_passes_backend_payload_through() {
        let parsed = parse_health_body(b"{\"status\":\"ok\",\"version\":\"1.2.3\"}");
        assert_eq!(parsed["version"], "1.2.3");
    }

    #[test]
    fn composite_report_round_trips() {
        let report = CompositeHealth {
            status: "ok".into(),
            services: ServiceReports {
                account_service: serde_json::json!({"status": "ok"}),
                file_service: serde_json::json!({"status": "error", "message": "down"}),
                statement_service: serde_json::json!({"status": "ok"}),
                tag_service: serde_json::json!({"status": "ok"}),
            },
        };
        let text = serde_json::to_string(&report).unwrap();
        let back: CompositeHealth = serde_json::from_str(&text).unwrap();
        assert_eq!(back.services.file_service["status"], "error");
    }
}
