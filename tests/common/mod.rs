//! Shared harness: a stub backend that echoes requests, and a gateway
//! instance wired to arbitrary backend addresses.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use url::Url;

use fingate::backends::{BackendRegistry, BackendUrls};
use fingate::server::{self, AppState};

pub struct StubBackend {
    pub addr: SocketAddr,
    /// Number of non-health requests the stub has served.
    pub hits: Arc<AtomicUsize>,
}

impl StubBackend {
    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).unwrap()
    }

    pub fn hit_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Echo every request back as JSON; paths ending in `/does-not-exist`
/// answer 404 so upstream-error forwarding can be exercised.
async fn echo(State(hits): State<Arc<AtomicUsize>>, request: Request) -> Response {
    hits.fetch_add(1, Ordering::SeqCst);

    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();

    if parts.uri.path().ends_with("/does-not-exist") {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "detail": "resource not found" })),
        )
            .into_response();
    }

    Json(serde_json::json!({
        "method": parts.method.as_str(),
        "path": parts.uri.path(),
        "query": parts.uri.query(),
        "body": String::from_utf8_lossy(&bytes),
    }))
    .into_response()
}

pub async fn start_stub_backend() -> StubBackend {
    let hits = Arc::new(AtomicUsize::new(0));

    let router = Router::new()
        .route(
            "/health",
            get(|| async { Json(serde_json::json!({ "status": "ok", "version": "stub" })) }),
        )
        .fallback(echo)
        .with_state(hits.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    StubBackend { addr, hits }
}

/// An address nothing is listening on — connections are refused.
pub async fn dead_url() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{addr}")).unwrap()
}

pub fn uniform_urls(url: &Url) -> BackendUrls {
    BackendUrls {
        account: url.clone(),
        file: url.clone(),
        statement: url.clone(),
        tag: url.clone(),
    }
}

pub async fn start_gateway(urls: BackendUrls) -> SocketAddr {
    let state = Arc::new(AppState {
        backends: BackendRegistry::new(
            urls,
            server::build_http_client(),
            Duration::from_millis(2000),
        ),
    });

    let router = server::build_router(state, 10 * 1024 * 1024);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    addr
}
