//! Shared application state modules.
//!
//! DESIGN
//! ======
//! `session` holds who is signed in; `events` carries the signals
//! (navigation, notices) the top-level application reacts to.

pub mod events;
pub mod session;
