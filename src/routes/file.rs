//! File forwarders: zip/CSV upload, processing, and raw-file listing.
//!
//! Uploads are validated locally before any backend call — a declared
//! media type or filename extension that does not match the expected
//! kind is a client error (400), never forwarded. Valid uploads are
//! re-encoded as a single-field multipart body for the file service.

use axum::extract::{Multipart, State};
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::backends::{ServiceName, API_ROOT};
use crate::outcome::{bad_request, Outcome};
use crate::server::SharedState;

#[derive(Debug, Clone, Copy)]
struct UploadKind {
    field: &'static str,
    media_type: &'static str,
    extension: &'static str,
    label: &'static str,
    success_message: &'static str,
}

const ZIP_UPLOAD: UploadKind = UploadKind {
    field: "zip_file",
    media_type: "application/zip",
    extension: ".zip",
    label: "zip",
    success_message: "Zip file uploaded successfully",
};

const CSV_UPLOAD: UploadKind = UploadKind {
    field: "csv_file",
    media_type: "text/csv",
    extension: ".csv",
    label: "CSV",
    success_message: "CSV file uploaded successfully",
};

#[derive(Debug)]
struct Upload {
    file_name: String,
    content_type: String,
    content: Bytes,
}

fn default_delimiter() -> String {
    ";".to_string()
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ProcessRequest {
    pub file_name: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

pub async fn upload_zip(State(state): State<SharedState>, multipart: Multipart) -> Response {
    forward_upload(&state, multipart, ZIP_UPLOAD).await
}

pub async fn upload_csv(State(state): State<SharedState>, multipart: Multipart) -> Response {
    forward_upload(&state, multipart, CSV_UPLOAD).await
}

async fn forward_upload(state: &SharedState, multipart: Multipart, kind: UploadKind) -> Response {
    let upload = match read_upload(multipart, kind.field).await {
        Ok(upload) => upload,
        Err(response) => return response,
    };

    if let Err(message) = validate_upload(&upload.file_name, &upload.content_type, kind) {
        return bad_request(message);
    }

    let outcome = state
        .backends
        .client_for(ServiceName::File)
        .upload(
            &format!("{API_ROOT}/upload/{}", kind.extension.trim_start_matches('.')),
            &upload.file_name,
            upload.content,
        )
        .await;

    match outcome {
        Outcome::Success { .. } => Json(serde_json::json!({
            "message": kind.success_message
        }))
        .into_response(),
        other => other.into_response(),
    }
}

/// Pull the expected file field out of the multipart stream.
async fn read_upload(mut multipart: Multipart, field_name: &str) -> Result<Upload, Response> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => {
                return Err(bad_request(format!("missing multipart field '{field_name}'")))
            }
            Err(e) => return Err(bad_request(format!("invalid multipart request: {e}"))),
        };

        if field.name() != Some(field_name) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let content = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return Err(bad_request(format!("failed to read upload: {e}"))),
        };

        return Ok(Upload {
            file_name,
            content_type,
            content,
        });
    }
}

fn validate_upload(file_name: &str, content_type: &str, kind: UploadKind) -> Result<(), String> {
    if content_type != kind.media_type {
        return Err(format!(
            "Invalid file type. Only {} files are allowed.",
            kind.label
        ));
    }
    if !file_name.ends_with(kind.extension) {
        return Err(format!("File is not a {} file", kind.label));
    }
    Ok(())
}

pub async fn process_file(
    State(state): State<SharedState>,
    Json(request): Json<ProcessRequest>,
) -> Response {
    let outcome = state
        .backends
        .client_for(ServiceName::File)
        .send_json(Method::POST, &format!("{API_ROOT}/process"), &request)
        .await;

    match outcome {
        Outcome::Success { body, .. } => {
            let data: serde_json::Value = serde_json::from_slice(&body)
                .unwrap_or(serde_json::Value::Null);
            Json(serde_json::json!({
                "message": "File processed successfully",
                "data": data
            }))
            .into_response()
        }
        other => other.into_response(),
    }
}

pub async fn list_raw_files(State(state): State<SharedState>) -> Response {
    state
        .backends
        .client_for(ServiceName::File)
        .get(&format!("{API_ROOT}/files/raw"))
        .await
        .into_response()
}
