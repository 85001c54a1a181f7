//! Integration tests for file upload validation and forwarding.

mod common;

use common::{start_gateway, start_stub_backend, uniform_urls};
use reqwest::multipart::{Form, Part};

fn file_part(name: &str, mime: &str, content: &[u8]) -> Part {
    Part::bytes(content.to_vec())
        .file_name(name.to_string())
        .mime_str(mime)
        .unwrap()
}

#[tokio::test]
async fn wrong_extension_rejected_before_any_backend_call() {
    let stub = start_stub_backend().await;
    let gateway = start_gateway(uniform_urls(&stub.url())).await;

    let form = Form::new().part("csv_file", file_part("report.txt", "text/csv", b"a;b"));
    let resp = reqwest::Client::new()
        .post(format!("http://{gateway}/upload/csv"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "File is not a CSV file");
    assert_eq!(stub.hit_count(), 0);
}

#[tokio::test]
async fn wrong_media_type_rejected_locally() {
    let stub = start_stub_backend().await;
    let gateway = start_gateway(uniform_urls(&stub.url())).await;

    let form = Form::new().part("csv_file", file_part("report.csv", "text/plain", b"a;b"));
    let resp = reqwest::Client::new()
        .post(format!("http://{gateway}/upload/csv"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Invalid file type. Only CSV files are allowed.");
    assert_eq!(stub.hit_count(), 0);
}

#[tokio::test]
async fn missing_field_rejected_locally() {
    let stub = start_stub_backend().await;
    let gateway = start_gateway(uniform_urls(&stub.url())).await;

    let form = Form::new().part("other", file_part("report.csv", "text/csv", b"a;b"));
    let resp = reqwest::Client::new()
        .post(format!("http://{gateway}/upload/csv"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    assert_eq!(stub.hit_count(), 0);
}

#[tokio::test]
async fn valid_csv_is_forwarded_to_file_service() {
    let stub = start_stub_backend().await;
    let gateway = start_gateway(uniform_urls(&stub.url())).await;

    let form = Form::new().part(
        "csv_file",
        file_part("report.csv", "text/csv", b"date;amount\n2024-01-01;9.50"),
    );
    let resp = reqwest::Client::new()
        .post(format!("http://{gateway}/upload/csv"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "CSV file uploaded successfully");
    assert_eq!(stub.hit_count(), 1);
}

#[tokio::test]
async fn valid_zip_is_forwarded_to_file_service() {
    let stub = start_stub_backend().await;
    let gateway = start_gateway(uniform_urls(&stub.url())).await;

    let form = Form::new().part(
        "zip_file",
        file_part("statements.zip", "application/zip", b"PK\x03\x04"),
    );
    let resp = reqwest::Client::new()
        .post(format!("http://{gateway}/upload/zip"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Zip file uploaded successfully");
    assert_eq!(stub.hit_count(), 1);
}

#[tokio::test]
async fn process_forwards_delimiter_default() {
    let stub = start_stub_backend().await;
    let gateway = start_gateway(uniform_urls(&stub.url())).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{gateway}/process"))
        .json(&serde_json::json!({ "file_name": "statements.csv" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "File processed successfully");
    // The echoed outbound body shows the defaulted delimiter was forwarded
    let forwarded = body["data"]["body"].as_str().unwrap();
    assert!(forwarded.contains("\"delimiter\":\";\""), "{forwarded}");
    assert_eq!(body["data"]["path"], "/api/v1/process");
}
