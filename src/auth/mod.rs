//! Bearer-token persistence and local validity checks.
//!
//! SYSTEM CONTEXT
//! ==============
//! `token_store` owns the single persisted token; `token` decodes its claims
//! without touching the network. The HTTP wrapper and the session controller
//! both consult these before deciding whether a session is usable.

pub mod token;
pub mod token_store;
