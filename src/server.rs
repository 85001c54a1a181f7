//! Axum server setup, shared application state, and graceful shutdown.
//!
//! Contains [`AppState`] (the `Arc`-shared state holding the backend
//! client registry), [`build_router`] for constructing the Axum router
//! with middleware layers, [`build_http_client`] for the
//! connection-pooled hyper client, and [`shutdown_signal`] for
//! SIGTERM / Ctrl+C handling.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::limit::RequestBodyLimitLayer;

use crate::backends::BackendRegistry;
use crate::middleware::log_requests;
use crate::routes::{account, file, health, statement, tag};

pub type HttpsConnector =
    hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>;
pub type HttpClient = Client<HttpsConnector, http_body_util::Full<bytes::Bytes>>;

pub struct AppState {
    pub backends: BackendRegistry,
}

pub type SharedState = Arc<AppState>;

#[must_use]
pub fn build_http_client() -> HttpClient {
    // When multiple rustls crypto providers are compiled in, rustls cannot
    // auto-detect which one to use. Explicitly install `ring`.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let https = hyper_rustls::HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .build();
    Client::builder(TokioExecutor::new())
        .pool_idle_timeout(Duration::from_secs(30))
        .build(https)
}

pub fn build_router(state: SharedState, max_body: usize) -> Router {
    Router::new()
        // Health: composite view is tolerant, per-service views are strict
        .route("/health", get(health::composite_health))
        .route("/account/health", get(health::account_health))
        .route("/file/health", get(health::file_health))
        .route("/statements/health", get(health::statements_health))
        .route("/tags/health", get(health::tags_health))
        // Account
        .route(
            "/accounts/",
            get(account::list_accounts).post(account::create_account),
        )
        .route("/accounts/alias", post(account::create_alias))
        .route(
            "/accounts/{account_id}",
            get(account::get_account)
                .put(account::update_account)
                .delete(account::delete_account),
        )
        // File
        .route("/upload/zip", post(file::upload_zip))
        .route("/upload/csv", post(file::upload_csv))
        .route("/process", post(file::process_file))
        .route("/files/raw", get(file::list_raw_files))
        // Statement
        .route(
            "/statements/",
            get(statement::list_statements).post(statement::create_statement),
        )
        .route(
            "/statements/{statement_id}",
            get(statement::get_statement)
                .put(statement::update_statement)
                .delete(statement::delete_statement),
        )
        // Tag
        .route("/tags/", get(tag::list_tags).post(tag::create_tag))
        .route(
            "/tags/{tag_id_or_name}",
            get(tag::get_tag).put(tag::update_tag).delete(tag::delete_tag),
        )
        .layer(
            ServiceBuilder::new()
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(axum::middleware::from_fn(log_requests))
                .layer(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(max_body)),
        )
        .with_state(state)
}

/// Outermost boundary for unhandled faults: log, answer a generic 500,
/// leak no internal detail.
fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| err.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    tracing::error!(error = %detail, "unhandled panic in request handler");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        axum::Json(serde_json::json!({ "error": "Internal Server Error" })),
    )
        .into_response()
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
