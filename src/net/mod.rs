//! Networking modules for the REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `client` owns request/response interception, `api` maps endpoints to
//! typed calls, `types` defines the wire schema and `error` the failure modes.

pub mod api;
pub mod client;
pub mod error;
pub mod types;
