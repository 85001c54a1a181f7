//! Tag forwarders. Lookup accepts either an opaque ID or a tag name —
//! the distinction is the tag service's concern, not the gateway's.

use axum::extract::{Path, State};
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::backends::{encode_path_segment, ServiceName, API_ROOT};
use crate::server::SharedState;

#[derive(Debug, Deserialize, Serialize)]
pub struct TagCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TagUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

pub async fn list_tags(State(state): State<SharedState>) -> Response {
    state
        .backends
        .client_for(ServiceName::Tag)
        .get(&format!("{API_ROOT}/tags/"))
        .await
        .into_response()
}

pub async fn get_tag(
    State(state): State<SharedState>,
    Path(tag_id_or_name): Path<String>,
) -> Response {
    state
        .backends
        .client_for(ServiceName::Tag)
        .get(&format!(
            "{API_ROOT}/tags/{}",
            encode_path_segment(&tag_id_or_name)
        ))
        .await
        .into_response()
}

pub async fn create_tag(State(state): State<SharedState>, Json(tag): Json<TagCreate>) -> Response {
    state
        .backends
        .client_for(ServiceName::Tag)
        .send_json(Method::POST, &format!("{API_ROOT}/tags/"), &tag)
        .await
        .into_response()
}

pub async fn update_tag(
    State(state): State<SharedState>,
    Path(tag_id): Path<String>,
    Json(tag): Json<TagUpdate>,
) -> Response {
    state
        .backends
        .client_for(ServiceName::Tag)
        .send_json(
            Method::PUT,
            &format!("{API_ROOT}/tags/{}", encode_path_segment(&tag_id)),
            &tag,
        )
        .await
        .into_response()
}

/// Delete passes the tag service's response body through unchanged.
pub async fn delete_tag(State(state): State<SharedState>, Path(tag_id): Path<String>) -> Response {
    state
        .backends
        .client_for(ServiceName::Tag)
        .delete(&format!("{API_ROOT}/tags/{}", encode_path_segment(&tag_id)))
        .await
        .into_response()
}
