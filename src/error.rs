//! Unified error types for Fingate.
//!
//! [`GatewayError`] covers everything fatal: startup configuration problems
//! (a missing backend base URL must prevent the process from serving any
//! traffic), listener setup, and CLI health-probe failures. Per-request
//! backend failures never appear here — they flow through
//! [`Outcome`](crate::outcome::Outcome) instead.

use crate::backends::ServiceName;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GatewayError {
    #[error(
        "{service} service URL is not configured.\n\n  \
         Set {env} or pass --{service}-url <URL>."
    )]
    MissingBackendUrl { service: ServiceName, env: &'static str },

    #[error("Invalid address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("Invalid URI: {source}")]
    UriParse {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("HTTP request failed: {source}")]
    HttpRequest {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Health check failed with status {0}")]
    HealthCheckFailed(hyper::StatusCode),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_backend_url_names_service_and_env() {
        let err = GatewayError::MissingBackendUrl {
            service: ServiceName::Statement,
            env: "STATEMENT_SERVICE_URL",
        };
        let message = err.to_string();
        assert!(message.contains("statement"));
        assert!(message.contains("STATEMENT_SERVICE_URL"));
    }
}
