//! Statement forwarders: list (with optional filters), create, get,
//! update, and delete against the statement service.

use axum::extract::{Path, Query, State};
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::backends::{encode_path_segment, ServiceName, API_ROOT};
use crate::outcome::Outcome;
use crate::server::SharedState;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StatementFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct StatementCreate {
    pub account_id: String,
    pub date: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StatementUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

pub async fn list_statements(
    State(state): State<SharedState>,
    Query(filters): Query<StatementFilters>,
) -> Response {
    state
        .backends
        .client_for(ServiceName::Statement)
        .get_filtered(&format!("{API_ROOT}/statements/"), &filters)
        .await
        .into_response()
}

pub async fn create_statement(
    State(state): State<SharedState>,
    Json(statement): Json<StatementCreate>,
) -> Response {
    state
        .backends
        .client_for(ServiceName::Statement)
        .send_json(Method::POST, &format!("{API_ROOT}/statements/"), &statement)
        .await
        .into_response()
}

pub async fn get_statement(
    State(state): State<SharedState>,
    Path(statement_id): Path<String>,
) -> Response {
    state
        .backends
        .client_for(ServiceName::Statement)
        .get(&format!(
            "{API_ROOT}/statements/{}",
            encode_path_segment(&statement_id)
        ))
        .await
        .into_response()
}

pub async fn update_statement(
    State(state): State<SharedState>,
    Path(statement_id): Path<String>,
    Json(statement): Json<StatementUpdate>,
) -> Response {
    state
        .backends
        .client_for(ServiceName::Statement)
        .send_json(
            Method::PUT,
            &format!(
                "{API_ROOT}/statements/{}",
                encode_path_segment(&statement_id)
            ),
            &statement,
        )
        .await
        .into_response()
}

pub async fn delete_statement(
    State(state): State<SharedState>,
    Path(statement_id): Path<String>,
) -> Response {
    let outcome = state
        .backends
        .client_for(ServiceName::Statement)
        .delete(&format!(
            "{API_ROOT}/statements/{}",
            encode_path_segment(&statement_id)
        ))
        .await;
    match outcome {
        Outcome::Success { .. } => Json(serde_json::json!({ "ok": true })).into_response(),
        other => other.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::query_string;

    #[test]
    fn single_set_filter_forwards_one_pair() {
        let filters = StatementFilters {
            tag: Some("food".into()),
            ..StatementFilters::default()
        };
        assert_eq!(query_string(&filters), "tag=food");
    }

    #[test]
    fn create_requires_amount_and_account() {
        let parsed: Result<StatementCreate, _> =
            serde_json::from_str("{\"date\":\"2024-01-01\",\"amount\":9.5}");
        assert!(parsed.is_err());
    }
}
