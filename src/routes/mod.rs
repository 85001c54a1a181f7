//! Per-resource forwarders and the health aggregator.
//!
//! Each resource module maps one gateway operation to exactly one
//! backend call: shape the inbound request, issue the call through the
//! backend client registry, and let the normalized
//! [`Outcome`](crate::outcome::Outcome) build the client response.
//! [`health`] adds the composite and per-service health endpoints.

pub mod account;
pub mod file;
pub mod health;
pub mod statement;
pub mod tag;
