//! `fingate run` — start the gateway server.
//!
//! Resolves the four backend base URLs (startup-fatal if any is
//! missing), builds the immutable backend client registry, and starts
//! the Axum HTTP server with graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::backends::{BackendRegistry, BackendUrls, ServiceName};
use crate::cli::RunArgs;
use crate::error::GatewayError;
use crate::logging;
use crate::server::{self, AppState};

pub async fn execute(args: RunArgs) -> Result<(), GatewayError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let urls = resolve_backend_urls(
        args.account_url,
        args.file_url,
        args.statement_url,
        args.tag_url,
    )?;

    let state = Arc::new(AppState {
        backends: BackendRegistry::new(
            urls,
            server::build_http_client(),
            Duration::from_millis(args.timeout),
        ),
    });

    let router = server::build_router(state, args.max_body);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        timeout_ms = args.timeout,
        "fingate started"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    tracing::info!("fingate stopped");
    Ok(())
}

/// All four backend URLs must be present; a gateway without a backend
/// address cannot serve any request type referencing it, so this is
/// fatal rather than a per-request error.
fn resolve_backend_urls(
    account: Option<Url>,
    file: Option<Url>,
    statement: Option<Url>,
    tag: Option<Url>,
) -> Result<BackendUrls, GatewayError> {
    let require = |url: Option<Url>, service: ServiceName| {
        url.ok_or(GatewayError::MissingBackendUrl {
            service,
            env: service.env_var(),
        })
    };

    Ok(BackendUrls {
        account: require(account, ServiceName::Account)?,
        file: require(file, ServiceName::File)?,
        statement: require(statement, ServiceName::Statement)?,
        tag: require(tag, ServiceName::Tag)?,
    })
}
