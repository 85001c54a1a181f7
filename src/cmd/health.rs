//! `fingate health` — check the health of a running instance.
//!
//! Sends a `GET /health` request to the specified URL and displays the
//! composite report as formatted text or raw JSON. The endpoint itself
//! always answers 200 when the gateway is up, so per-service state is
//! read from the report body.

use http_body_util::BodyExt;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::cli::HealthArgs;
use crate::error::GatewayError;
use crate::routes::health::CompositeHealth;

pub async fn execute(args: HealthArgs) -> Result<(), GatewayError> {
    let url = format!("{}/health", args.url.trim_end_matches('/'));
    let uri: hyper::Uri =
        url.parse()
            .map_err(|e: hyper::http::uri::InvalidUri| GatewayError::UriParse {
                source: Box::new(e),
            })?;

    let connector = hyper_util::client::legacy::connect::HttpConnector::new();
    let client = Client::builder(TokioExecutor::new()).build(connector);

    let req = hyper::Request::builder()
        .uri(uri)
        .body(http_body_util::Full::new(bytes::Bytes::new()))
        .map_err(|e| GatewayError::HttpRequest {
            source: Box::new(e),
        })?;

    let response = tokio::time::timeout(std::time::Duration::from_secs(10), client.request(req))
        .await
        .map_err(|_| GatewayError::HttpRequest {
            source: "health check timed out after 10s".into(),
        })?
        .map_err(|e| GatewayError::HttpRequest {
            source: Box::new(e),
        })?;

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .map_err(|e| GatewayError::HttpRequest {
            source: Box::new(e),
        })?
        .to_bytes();

    if !status.is_success() {
        return Err(GatewayError::HealthCheckFailed(status));
    }

    if args.json {
        println!("{}", String::from_utf8_lossy(&body));
        return Ok(());
    }

    let body_str = String::from_utf8_lossy(&body);
    match serde_json::from_str::<CompositeHealth>(&body_str) {
        Ok(health) => {
            println!("\u{2713} fingate is up ({})", args.url);
            print_service("account", &health.services.account_service);
            print_service("file", &health.services.file_service);
            print_service("statement", &health.services.statement_service);
            print_service("tag", &health.services.tag_service);
        }
        Err(e) => {
            eprintln!("Failed to parse health response: {e}");
            println!("{}", String::from_utf8_lossy(&body));
        }
    }

    Ok(())
}

fn print_service(name: &str, report: &serde_json::Value) {
    let status = report["status"].as_str().unwrap_or("unknown");
    if status == "error" {
        let message = report["message"].as_str().unwrap_or("no detail");
        println!("  \u{2717} {name:<10} {message}");
    } else {
        println!("  \u{2713} {name:<10} {status}");
    }
}
