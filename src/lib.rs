//! Fingate is a backend-for-frontend gateway for the finances services.
//!
//! It exposes a single client-facing HTTP surface and forwards each request
//! to one of four independent backend services (account, file, statement,
//! tag). Backend failures are normalized into a uniform error shape, and a
//! composite `/health` endpoint reports the status of every backend without
//! failing when an individual backend is down.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, health).
//! - [`backends`] -- The backend client registry: one persistent HTTP client
//!   per service, bound to a base URL resolved once at startup.
//! - [`outcome`] -- The normalized result of a backend call
//!   ([`Outcome`](outcome::Outcome)) and its client-facing response mapping.
//! - [`routes`] -- Per-resource forwarders (account, file, statement, tag)
//!   and the health aggregator.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`middleware`] -- Request/response access logging.
//! - [`server`] -- Axum server setup, shared application state, HTTP client,
//!   and graceful shutdown.

// Binary crate — public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod backends;
pub mod cli;
pub mod cmd;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod outcome;
pub mod routes;
pub mod server;
