//! Account forwarders: list, create, get, update, delete, and alias
//! creation, each issuing exactly one call to the account service.

use axum::extract::{Path, Query, State};
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::backends::{encode_path_segment, ServiceName, API_ROOT};
use crate::outcome::Outcome;
use crate::server::SharedState;

/// Optional list filters. Only fields the caller actually set are
/// forwarded; unset fields are pruned so the account service applies
/// its own defaults.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AccountsFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AccountCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
}

/// Partial update — only explicitly set fields are forwarded, so the
/// account service never sees a `null` overwrite.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AccountUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AccountAlias {
    pub account_id: String,
    pub alias: String,
}

pub async fn list_accounts(
    State(state): State<SharedState>,
    Query(filters): Query<AccountsFilter>,
) -> Response {
    state
        .backends
        .client_for(ServiceName::Account)
        .get_filtered(&format!("{API_ROOT}/accounts/"), &filters)
        .await
        .into_response()
}

pub async fn create_account(
    State(state): State<SharedState>,
    Json(account): Json<AccountCreate>,
) -> Response {
    state
        .backends
        .client_for(ServiceName::Account)
        .send_json(Method::POST, &format!("{API_ROOT}/accounts/"), &account)
        .await
        .into_response()
}

pub async fn get_account(
    State(state): State<SharedState>,
    Path(account_id): Path<String>,
) -> Response {
    state
        .backends
        .client_for(ServiceName::Account)
        .get(&format!(
            "{API_ROOT}/accounts/{}",
            encode_path_segment(&account_id)
        ))
        .await
        .into_response()
}

pub async fn create_alias(
    State(state): State<SharedState>,
    Json(alias): Json<AccountAlias>,
) -> Response {
    state
        .backends
        .client_for(ServiceName::Account)
        .send_json(Method::POST, &format!("{API_ROOT}/accounts/alias"), &alias)
        .await
        .into_response()
}

pub async fn update_account(
    State(state): State<SharedState>,
    Path(account_id): Path<String>,
    Json(account): Json<AccountUpdate>,
) -> Response {
    state
        .backends
        .client_for(ServiceName::Account)
        .send_json(
            Method::PUT,
            &format!("{API_ROOT}/accounts/{}", encode_path_segment(&account_id)),
            &account,
        )
        .await
        .into_response()
}

pub async fn delete_account(
    State(state): State<SharedState>,
    Path(account_id): Path<String>,
) -> Response {
    let outcome = state
        .backends
        .client_for(ServiceName::Account)
        .delete(&format!(
            "{API_ROOT}/accounts/{}",
            encode_path_segment(&account_id)
        ))
        .await;
    match outcome {
        Outcome::Success { .. } => Json(serde_json::json!({
            "message": "Account deleted successfully"
        }))
        .into_response(),
        other => other.into_response(),
    }
}
